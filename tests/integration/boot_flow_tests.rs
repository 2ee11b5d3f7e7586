//! Boot sequencing: Uninitialized → DriverReady → ServiceReady, with every
//! failure leaving the sequencer where it was.

use std::sync::Arc;

use waterpump::adapters::http::SimTransport;
use waterpump::app::commands::Verb;
use waterpump::app::events::AppEvent;
use waterpump::boot::{BootError, BootSequencer, BootState};
use waterpump::error::{ActuatorError, ConnectivityError, TransportError};

use crate::mock_hw::{MockNetwork, MockPin, MockPwm, RecordingSink, make_pump, make_pump_with};

#[test]
fn driver_ready_forces_pump_off() {
    let (pump, probes) = make_pump();
    assert_ne!(probes.pwm.duty(), 0, "mock should power up mid-duty");

    let sink = RecordingSink::default();
    let mut boot = BootSequencer::new();
    let guard = boot.bring_up_driver(pump, &sink).unwrap();

    assert_eq!(boot.state(), BootState::DriverReady);
    assert_eq!(probes.pwm.duty(), 0);
    assert_eq!(probes.pwm.history(), vec![0]);
    assert_eq!(guard.snapshot().intensity, 0);
    assert_eq!(
        sink.events(),
        vec![AppEvent::BootStateChanged {
            from: BootState::Uninitialized,
            to: BootState::DriverReady,
        }]
    );
}

#[test]
fn full_boot_reaches_service_ready_with_all_routes() {
    let (pump, probes) = make_pump();
    let sink = Arc::new(RecordingSink::default());
    let mut boot = BootSequencer::new();

    let guard = boot.bring_up_driver(pump, sink.as_ref()).unwrap();
    let mut net = MockNetwork::observing(probes.pwm.clone());
    let mut transport = SimTransport::new();
    let _handler = boot
        .bring_up_service(&guard, &sink, &mut net, &mut transport)
        .unwrap();

    assert_eq!(boot.state(), BootState::ServiceReady);
    assert!(transport.is_started());
    let mut routes: Vec<_> = transport.routes().collect();
    routes.sort_by_key(|v| v.path());
    let mut expected = Verb::ALL.to_vec();
    expected.sort_by_key(|v| v.path());
    assert_eq!(routes, expected);

    // The pump was already off when the radio came up.
    assert_eq!(net.duty_at_start, Some(0));

    assert_eq!(
        sink.last(),
        Some(AppEvent::BootStateChanged {
            from: BootState::DriverReady,
            to: BootState::ServiceReady,
        })
    );
}

#[test]
fn service_before_driver_is_out_of_order() {
    let (pump, _probes) = make_pump();
    let sink = Arc::new(RecordingSink::default());

    // A guard built outside the sequencer cannot skip the driver step.
    let mut other = BootSequencer::new();
    let guard = other.bring_up_driver(pump, sink.as_ref()).unwrap();

    let mut boot = BootSequencer::new();
    let result = boot.bring_up_service(
        &guard,
        &sink,
        &mut MockNetwork::new(),
        &mut SimTransport::new(),
    );
    assert!(matches!(
        result,
        Err(BootError::OutOfOrder {
            current: BootState::Uninitialized,
            requested: BootState::ServiceReady,
        })
    ));
    assert_eq!(boot.state(), BootState::Uninitialized);
}

#[test]
fn driver_step_cannot_run_twice() {
    let sink = RecordingSink::default();
    let mut boot = BootSequencer::new();
    let (first, _) = make_pump();
    boot.bring_up_driver(first, &sink).unwrap();

    let (second, second_probes) = make_pump();
    let err = boot.bring_up_driver(second, &sink).err();
    assert_eq!(
        err,
        Some(BootError::OutOfOrder {
            current: BootState::DriverReady,
            requested: BootState::DriverReady,
        })
    );
    assert!(second_probes.pwm.history().is_empty());
}

#[test]
fn coarse_pwm_resolution_is_fatal() {
    let (pwm, probe) = MockPwm::new(0);
    let (pump, _probes) = make_pump_with(pwm.with_max_duty(127), probe);
    let sink = RecordingSink::default();
    let mut boot = BootSequencer::new();

    let err = boot.bring_up_driver(pump, &sink).err();
    assert_eq!(
        err,
        Some(BootError::Driver(ActuatorError::ResolutionTooCoarse {
            max_duty: 127
        }))
    );
    assert_eq!(boot.state(), BootState::Uninitialized);
    assert!(sink.events().is_empty());
}

#[test]
fn direction_pin_failure_is_fatal() {
    let (pwm, _probe) = MockPwm::new(0);
    let pump = waterpump::drivers::pump::PumpDriver::new(
        pwm,
        MockPin::failing(),
        crate::mock_hw::MockClock::default(),
    );
    let mut boot = BootSequencer::new();

    let err = boot.bring_up_driver(pump, &RecordingSink::default()).err();
    assert_eq!(
        err,
        Some(BootError::Driver(ActuatorError::DirectionWriteFailed))
    );
    assert_eq!(boot.state(), BootState::Uninitialized);
}

#[test]
fn forced_stop_failure_is_fatal() {
    let (pump, probes) = make_pump();
    probes.pwm.fail_writes(true);
    let mut boot = BootSequencer::new();

    let err = boot.bring_up_driver(pump, &RecordingSink::default()).err();
    assert_eq!(err, Some(BootError::Driver(ActuatorError::PwmWriteFailed)));
    assert_eq!(boot.state(), BootState::Uninitialized);
}

#[test]
fn network_failure_stops_before_transport() {
    let (pump, _probes) = make_pump();
    let sink = Arc::new(RecordingSink::default());
    let mut boot = BootSequencer::new();
    let guard = boot.bring_up_driver(pump, sink.as_ref()).unwrap();

    let mut transport = SimTransport::new();
    let result = boot.bring_up_service(&guard, &sink, &mut MockNetwork::failing(), &mut transport);

    assert!(matches!(
        result,
        Err(BootError::Network(ConnectivityError::StartFailed(-1)))
    ));
    assert!(!transport.is_started());
    assert_eq!(boot.state(), BootState::DriverReady);
}

#[test]
fn transport_failure_is_fatal() {
    let (pump, probes) = make_pump();
    let sink = Arc::new(RecordingSink::default());
    let mut boot = BootSequencer::new();
    let guard = boot.bring_up_driver(pump, sink.as_ref()).unwrap();

    let result = boot.bring_up_service(
        &guard,
        &sink,
        &mut MockNetwork::new(),
        &mut SimTransport::failing(),
    );

    assert!(matches!(
        result,
        Err(BootError::Transport(TransportError::StartFailed(-1)))
    ));
    assert_eq!(boot.state(), BootState::DriverReady);
    // The pump stays in its safe state.
    assert_eq!(probes.pwm.duty(), 0);
}

#[test]
fn service_step_cannot_run_twice() {
    let (pump, _probes) = make_pump();
    let sink = Arc::new(RecordingSink::default());
    let mut boot = BootSequencer::new();
    let guard = boot.bring_up_driver(pump, sink.as_ref()).unwrap();
    let mut transport = SimTransport::new();
    boot.bring_up_service(&guard, &sink, &mut MockNetwork::new(), &mut transport)
        .unwrap();

    let again = boot.bring_up_service(&guard, &sink, &mut MockNetwork::new(), &mut transport);
    assert!(matches!(
        again,
        Err(BootError::OutOfOrder {
            current: BootState::ServiceReady,
            ..
        })
    ));
}

#[test]
fn error_converts_into_crate_error() {
    let err: waterpump::error::Error = BootError::Driver(ActuatorError::PwmWriteFailed).into();
    assert!(err.to_string().contains("driver"));
}
