//! End-to-end command tests: requests enter through `SimTransport::dispatch`
//! exactly as the HTTP server would route them.

use std::sync::Arc;

use waterpump::adapters::http::SimTransport;
use waterpump::app::commands::{ACK_BODY, Reply, Verb};
use waterpump::app::events::{AppEvent, IgnoreReason};
use waterpump::app::state::RequestSource;
use waterpump::boot::BootSequencer;
use waterpump::error::ActuatorError;

use crate::mock_hw::{MockNetwork, PumpProbes, RecordingSink, make_pump};

struct Rig {
    transport: SimTransport,
    sink: Arc<RecordingSink>,
    probes: PumpProbes,
}

impl Rig {
    fn booted() -> Self {
        let (pump, probes) = make_pump();
        let sink = Arc::new(RecordingSink::default());
        let mut boot = BootSequencer::new();
        let guard = boot.bring_up_driver(pump, sink.as_ref()).unwrap();
        let mut net = MockNetwork::new();
        let mut transport = SimTransport::new();
        boot.bring_up_service(&guard, &sink, &mut net, &mut transport)
            .unwrap();
        Self {
            transport,
            sink,
            probes,
        }
    }

    fn get(&self, uri: &str) -> Reply {
        self.transport
            .dispatch(uri)
            .unwrap_or_else(|| panic!("no route for {uri}"))
    }

    fn intensity(&self) -> String {
        self.get("/status").body
    }
}

#[test]
fn spray_then_stop() {
    let rig = Rig::booted();

    let reply = rig.get("/spray?pwm=128");
    assert_eq!(reply, Reply::ok(ACK_BODY));
    assert_eq!(rig.probes.pwm.duty(), 128);
    assert_eq!(rig.intensity(), "intensity=128");

    let reply = rig.get("/stop");
    assert_eq!(reply.body, ACK_BODY);
    assert_eq!(rig.probes.pwm.duty(), 0);
    assert_eq!(rig.intensity(), "intensity=0");
}

#[test]
fn spray_without_pwm_is_acknowledged_noop() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=90");

    for uri in ["/spray", "/spray?", "/spray?speed=10"] {
        let reply = rig.get(uri);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, ACK_BODY);
        assert_eq!(rig.probes.pwm.duty(), 90, "{uri} changed the output");
        assert!(matches!(
            rig.sink.last(),
            Some(AppEvent::CommandIgnored {
                verb: Verb::Spray,
                reason: IgnoreReason::MissingParameter,
                ..
            })
        ));
    }
}

#[test]
fn malformed_pwm_is_acknowledged_noop() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=33");

    for uri in ["/spray?pwm=", "/spray?pwm=fast", "/spray?pwm=1.5", "/spray?pwm=0x10"] {
        assert_eq!(rig.get(uri).body, ACK_BODY);
        assert_eq!(rig.probes.pwm.duty(), 33, "{uri} changed the output");
        assert!(matches!(
            rig.sink.last(),
            Some(AppEvent::CommandIgnored {
                reason: IgnoreReason::MalformedParameter,
                ..
            })
        ));
    }
}

#[test]
fn out_of_range_pwm_is_clamped() {
    let rig = Rig::booted();

    assert_eq!(rig.get("/spray?pwm=1000").body, ACK_BODY);
    assert_eq!(rig.intensity(), "intensity=255");

    assert_eq!(rig.get("/spray?pwm=-5").body, ACK_BODY);
    assert_eq!(rig.intensity(), "intensity=0");

    rig.get("/spray?pwm=123456789012345678901234567890");
    assert_eq!(rig.intensity(), "intensity=255");
}

#[test]
fn applied_event_carries_request_and_result() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=400");

    match rig.sink.last() {
        Some(AppEvent::IntensityApplied {
            source: RequestSource::Remote(_),
            requested,
            applied,
        }) => {
            assert_eq!(requested, 400);
            assert_eq!(applied, 255);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn each_request_gets_a_fresh_source() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=1");
    rig.get("/spray?pwm=2");
    rig.get("/stop");

    let sources: Vec<_> = rig
        .sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::IntensityApplied { source, .. } | AppEvent::Stopped { source } => {
                Some(source)
            }
            _ => None,
        })
        .collect();
    assert_eq!(sources.len(), 3);
    assert_ne!(sources[0], sources[1]);
    assert_ne!(sources[1], sources[2]);
}

#[test]
fn first_pwm_parameter_wins() {
    let rig = Rig::booted();
    rig.get("/spray?mode=x&pwm=40&pwm=200");
    assert_eq!(rig.intensity(), "intensity=40");
}

#[test]
fn stop_ignores_parameters() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=77");
    assert_eq!(rig.get("/stop?pwm=200").body, ACK_BODY);
    assert_eq!(rig.probes.pwm.duty(), 0);
}

#[test]
fn stop_when_already_stopped_is_harmless() {
    let rig = Rig::booted();
    assert_eq!(rig.get("/stop").body, ACK_BODY);
    assert_eq!(rig.get("/stop").body, ACK_BODY);
    assert_eq!(rig.intensity(), "intensity=0");
}

#[test]
fn register_fault_is_still_acknowledged() {
    let rig = Rig::booted();
    rig.get("/spray?pwm=60");

    rig.probes.pwm.fail_writes(true);
    assert_eq!(rig.get("/spray?pwm=200").body, ACK_BODY);
    assert!(matches!(
        rig.sink.last(),
        Some(AppEvent::ActuatorFault {
            error: ActuatorError::PwmWriteFailed,
            ..
        })
    ));
    assert_eq!(rig.intensity(), "intensity=60");

    assert_eq!(rig.get("/stop").body, ACK_BODY);
    assert_eq!(rig.intensity(), "intensity=60");
}

#[test]
fn unknown_path_has_no_route() {
    let rig = Rig::booted();
    assert!(rig.transport.dispatch("/reboot").is_none());
    assert!(rig.transport.dispatch("/").is_none());
}

#[test]
fn concurrent_remote_requests_settle_on_one_of_them() {
    let rig = Arc::new(Rig::booted());

    let handles: Vec<_> = ["/spray?pwm=64", "/spray?pwm=192"]
        .into_iter()
        .map(|uri| {
            let rig = Arc::clone(&rig);
            std::thread::spawn(move || rig.get(uri))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().body, ACK_BODY);
    }

    let body = rig.intensity();
    assert!(body == "intensity=64" || body == "intensity=192", "{body}");
    assert!(!rig.probes.pwm.saw_torn_write());
}
