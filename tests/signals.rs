//! Delivers a real OS signal to the process; kept in its own test binary so
//! no other test shares the process while the signal is in flight.
#![cfg(unix)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use appvisor::{App, AppConfig, BoxError, Event, EventKind, HaltSignal, RoutineFn, Subscribe};
use async_trait::async_trait;
use nix::sys::signal::{Signal, raise};

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Event>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.seen.lock().unwrap().push(ev.clone());
    }
}

#[tokio::test]
async fn test_sigterm_halts_main() {
    let rec = Arc::new(Recorder::default());
    let app = App::builder(AppConfig {
        termination_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    })
    .with_main(RoutineFn::arc("signalled", |halt: HaltSignal| async move {
        raise(Signal::SIGTERM)?;
        halt.halted().await;
        Ok::<(), BoxError>(())
    }))
    .with_subscribers(vec![rec.clone() as Arc<dyn Subscribe>])
    .build();

    app.run().await.unwrap();

    let seen = rec.seen.lock().unwrap();
    let signal = seen
        .iter()
        .find(|ev| ev.kind == EventKind::SignalReceived)
        .expect("no SignalReceived event");
    assert_eq!(signal.signal, Some("SIGTERM"));

    let kinds: Vec<EventKind> = seen.iter().map(|ev| ev.kind).collect();
    let at = |kind| kinds.iter().position(|k| *k == kind).unwrap();
    assert!(at(EventKind::SignalReceived) < at(EventKind::HaltRequested));
    assert!(at(EventKind::HaltRequested) < at(EventKind::ShutdownRequested));
    drop(seen);

    // Handlers outlive the run: a late SIGTERM is consumed, not fatal.
    raise(Signal::SIGTERM).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.state(), appvisor::AppState::Shutdown);
}
