use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use appvisor::{
    App, AppConfig, AppError, AppState, BoxError, HaltSignal, Resources, RoutineFn, RoutineRef,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

fn cfg() -> AppConfig {
    AppConfig {
        termination_timeout: Duration::from_secs(1),
        handle_signals: false,
        ..AppConfig::default()
    }
}

#[derive(Default)]
struct Mock {
    calls: Mutex<Vec<&'static str>>,
    init_err: bool,
    init_delay: Option<Duration>,
    watch_exit_after: Option<Duration>,
    watch_err: bool,
    watch_panics: bool,
    release_err: bool,
    stop: CancellationToken,
}

impl Mock {
    fn push(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resources for Mock {
    async fn init(&self, _deadline: Option<tokio::time::Instant>) -> Result<(), BoxError> {
        self.push("init");
        if let Some(d) = self.init_delay {
            tokio::time::sleep(d).await;
        }
        if self.init_err {
            return Err("init failed".into());
        }
        Ok(())
    }

    async fn watch(&self) -> Result<(), BoxError> {
        self.push("watch");
        if self.watch_panics {
            panic!("watch exploded");
        }
        match self.watch_exit_after {
            Some(d) => tokio::time::sleep(d).await,
            None => self.stop.cancelled().await,
        }
        self.push("watch-exit");
        if self.watch_err {
            return Err("connection lost".into());
        }
        Ok(())
    }

    fn stop(&self) {
        self.push("stop");
        self.stop.cancel();
    }

    async fn release(&self) -> Result<(), BoxError> {
        self.push("release");
        if self.release_err {
            return Err("close failed".into());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Main routine that runs until halted and records whether it started.
fn tracked_main(started: Arc<AtomicBool>) -> RoutineRef {
    RoutineFn::arc("tracked", move |halt: HaltSignal| {
        let started = Arc::clone(&started);
        async move {
            started.store(true, Ordering::SeqCst);
            halt.halted().await;
            Ok::<(), BoxError>(())
        }
    })
}

fn quick_main(result: Result<(), &'static str>) -> RoutineRef {
    RoutineFn::arc("quick", move |_halt: HaltSignal| async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        result.map_err(BoxError::from)
    })
}

#[tokio::test]
async fn test_init_failure_prevents_main() {
    let res = Arc::new(Mock {
        init_err: true,
        ..Mock::default()
    });
    let started = Arc::new(AtomicBool::new(false));
    let app = App::builder(cfg())
        .with_main(tracked_main(started.clone()))
        .with_resources(res.clone())
        .build();

    match app.run().await {
        Err(AppError::ResourceInit(e)) => assert_eq!(e.to_string(), "init failed"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!started.load(Ordering::SeqCst));
    assert_eq!(res.calls(), vec!["init"]);
    assert_eq!(app.state(), AppState::Shutdown);
    assert!(app.halt_signal().is_halted());
}

#[tokio::test]
async fn test_init_deadline_is_enforced() {
    let res = Arc::new(Mock {
        init_delay: Some(Duration::from_secs(5)),
        ..Mock::default()
    });
    let started = Arc::new(AtomicBool::new(false));
    let app = App::builder(AppConfig {
        init_timeout: Duration::from_millis(30),
        ..cfg()
    })
    .with_main(tracked_main(started.clone()))
    .with_resources(res.clone())
    .build();

    let begun = Instant::now();
    let err = app.run().await.unwrap_err();

    assert!(matches!(err, AppError::InitTimeout { timeout } if timeout == Duration::from_millis(30)));
    assert!(begun.elapsed() < Duration::from_secs(2));
    assert!(!started.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_teardown_order() {
    let res = Arc::new(Mock::default());
    let app = App::builder(cfg())
        .with_main(quick_main(Ok(())))
        .with_resources(res.clone())
        .build();

    app.run().await.unwrap();
    assert_eq!(
        res.calls(),
        vec!["init", "watch", "stop", "watch-exit", "release"]
    );
}

#[tokio::test]
async fn test_watch_failure_halts_main() {
    let res = Arc::new(Mock {
        watch_exit_after: Some(Duration::from_millis(30)),
        watch_err: true,
        ..Mock::default()
    });
    let started = Arc::new(AtomicBool::new(false));
    let app = App::builder(cfg())
        .with_main(tracked_main(started.clone()))
        .with_resources(res.clone())
        .build();

    let begun = Instant::now();
    match app.run().await {
        Err(AppError::ResourceWatch(e)) => assert_eq!(e.to_string(), "connection lost"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(begun.elapsed() < Duration::from_secs(1));
    assert!(started.load(Ordering::SeqCst));
    assert_eq!(
        res.calls(),
        vec!["init", "watch", "watch-exit", "stop", "release"]
    );
}

#[tokio::test]
async fn test_clean_watch_exit_still_shuts_down() {
    let res = Arc::new(Mock {
        watch_exit_after: Some(Duration::from_millis(30)),
        ..Mock::default()
    });
    let app = App::builder(cfg())
        .with_main(tracked_main(Arc::new(AtomicBool::new(false))))
        .with_resources(res.clone())
        .build();

    app.run().await.unwrap();
    assert_eq!(app.state(), AppState::Shutdown);
    assert_eq!(res.calls().last(), Some(&"release"));
}

#[tokio::test]
async fn test_watch_panic_is_reported() {
    let res = Arc::new(Mock {
        watch_panics: true,
        ..Mock::default()
    });
    let app = App::builder(cfg())
        .with_main(tracked_main(Arc::new(AtomicBool::new(false))))
        .with_resources(res.clone())
        .build();

    let err = app.run().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Panicked { unit: "watch", ref reason } if reason == "watch exploded"
    ));
    assert_eq!(res.calls().last(), Some(&"release"));
}

#[tokio::test]
async fn test_release_error_surfaces_when_nothing_else_failed() {
    let res = Arc::new(Mock {
        release_err: true,
        ..Mock::default()
    });
    let app = App::builder(cfg())
        .with_main(quick_main(Ok(())))
        .with_resources(res)
        .build();

    match app.run().await {
        Err(AppError::ResourceRelease(e)) => assert_eq!(e.to_string(), "close failed"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_first_error_wins_over_release_error() {
    let res = Arc::new(Mock {
        release_err: true,
        ..Mock::default()
    });
    let app = App::builder(cfg())
        .with_main(quick_main(Err("boom")))
        .with_resources(res)
        .build();

    match app.run().await {
        Err(AppError::Main(e)) => assert_eq!(e.to_string(), "boom"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_unrepresentable_init_timeout_means_no_deadline() {
    let res = Arc::new(Mock {
        init_delay: Some(Duration::from_millis(20)),
        ..Mock::default()
    });
    let app = App::builder(AppConfig {
        init_timeout: Duration::MAX,
        ..cfg()
    })
    .with_main(quick_main(Ok(())))
    .with_resources(res.clone())
    .build();

    app.run().await.unwrap();
    assert_eq!(res.calls().first(), Some(&"init"));
    assert_eq!(res.calls().last(), Some(&"release"));
}
