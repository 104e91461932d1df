//! Integration tests for partix-telemetry.

use partix_telemetry::bus::EventBus;
use partix_telemetry::events::{EventKind, SimulationEvent};
use partix_telemetry::sinks::{EventSink, TracingSink, VecSink};

fn begin(timestep: u32) -> SimulationEvent {
    SimulationEvent::new(
        timestep,
        EventKind::StepBegin {
            sim_time: timestep as f64 * 0.02,
            dt: 0.02,
        },
    )
}

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let events = sink.events();
    bus.add_sink(Box::new(sink));

    bus.emit(begin(0));
    bus.emit(SimulationEvent::new(
        0,
        EventKind::StepEnd {
            wall_time: 0.001,
            active_volumes: 1,
            frozen_volumes: 0,
        },
    ));
    assert!(events.lock().unwrap().is_empty());

    assert_eq!(bus.flush(), 2);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], begin(0));
    assert!(matches!(events[1].kind, EventKind::StepEnd { .. }));
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let events = sink.events();
    bus.add_sink(Box::new(sink));

    bus.set_enabled(false);
    assert!(!bus.is_enabled());
    bus.emit(begin(0));
    assert_eq!(bus.flush(), 0);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn every_sink_sees_every_event() {
    let a = VecSink::new();
    let b = VecSink::new();
    let (ea, eb) = (a.events(), b.events());
    let mut bus = EventBus::new().with_sink(a).with_sink(b);
    assert_eq!(bus.sink_count(), 2);

    for t in 0..3 {
        bus.emit(begin(t));
    }
    bus.finalize();

    let ea = ea.lock().unwrap();
    let eb = eb.lock().unwrap();
    assert_eq!(ea.len(), 3);
    assert_eq!(*ea, *eb);
    assert_eq!(
        ea.iter().map(|e| e.timestep).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn tracing_sink_accepts_events() {
    let mut sink = TracingSink::new(tracing::Level::DEBUG);
    sink.handle(&SimulationEvent::new(
        4,
        EventKind::FreezeChanged {
            body: 1,
            frozen: true,
        },
    ));
    assert_eq!(sink.name(), "tracing_sink");
}

#[test]
fn event_serialization() {
    let event = SimulationEvent::new(
        42,
        EventKind::Contacts {
            body: 2,
            resolved_count: 4,
            max_penetration: 0.01,
            max_impulse: 1.5,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("Contacts"));
    let back: SimulationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);

    let energy = SimulationEvent::new(1, EventKind::Energy { body: 0, kinetic: 3.5 });
    let json = serde_json::to_string(&energy).unwrap();
    assert_eq!(serde_json::from_str::<SimulationEvent>(&json).unwrap(), energy);
}
