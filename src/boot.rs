//! Boot sequencer.
//!
//! ```text
//!  Uninitialized ──(driver init + forced stop)──▶ DriverReady
//!  DriverReady ──(network up + transport up + verbs registered)──▶ ServiceReady
//! ```
//!
//! `ServiceReady` is terminal.  There are no backward transitions, and any
//! failure is fatal: the caller is expected to halt or restart the chip,
//! since a half-initialized actuator must not be left running unattended.

use core::fmt;
use std::sync::Arc;

use log::info;

use crate::app::commands::CommandHandler;
use crate::app::events::AppEvent;
use crate::app::guard::ActuatorGuard;
use crate::app::ports::{ActuatorPort, CommandTransport, ConnectivityPort, EventSink};
use crate::error::{ActuatorError, ConnectivityError, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    DriverReady,
    ServiceReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// A transition was requested from the wrong state.
    OutOfOrder { current: BootState, requested: BootState },
    /// Driver initialization or the forced initial stop failed.
    Driver(ActuatorError),
    /// The access point could not be brought up.
    Network(ConnectivityError),
    /// The transport could not start or reject a registration.
    Transport(TransportError),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { current, requested } => {
                write!(f, "cannot enter {:?} from {:?}", requested, current)
            }
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

pub struct BootSequencer {
    state: BootState,
}

impl Default for BootSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl BootSequencer {
    pub fn new() -> Self {
        Self {
            state: BootState::Uninitialized,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    fn require(&self, current: BootState, requested: BootState) -> Result<(), BootError> {
        if self.state == current {
            Ok(())
        } else {
            Err(BootError::OutOfOrder {
                current: self.state,
                requested,
            })
        }
    }

    fn advance(&mut self, to: BootState, sink: &impl EventSink) {
        let from = self.state;
        self.state = to;
        info!("boot: {:?} -> {:?}", from, to);
        sink.emit(&AppEvent::BootStateChanged { from, to });
    }

    /// `Uninitialized → DriverReady`.
    ///
    /// Initializes the actuator and forces it to zero before anything else
    /// can reach it, then hands it to a fresh [`ActuatorGuard`].
    pub fn bring_up_driver<A: ActuatorPort>(
        &mut self,
        mut actuator: A,
        sink: &impl EventSink,
    ) -> Result<Arc<ActuatorGuard<A>>, BootError> {
        self.require(BootState::Uninitialized, BootState::DriverReady)?;

        actuator.initialize().map_err(BootError::Driver)?;
        actuator.stop().map_err(BootError::Driver)?;

        self.advance(BootState::DriverReady, sink);
        Ok(Arc::new(ActuatorGuard::new(actuator)))
    }

    /// `DriverReady → ServiceReady`.
    ///
    /// Starts the network, then the transport, then registers the command
    /// verbs.  Returns the handler so the caller can keep it alive alongside
    /// the transport.
    pub fn bring_up_service<A, S, N, T>(
        &mut self,
        guard: &Arc<ActuatorGuard<A>>,
        sink: &Arc<S>,
        network: &mut N,
        transport: &mut T,
    ) -> Result<Arc<CommandHandler<A, S>>, BootError>
    where
        A: ActuatorPort + Send + 'static,
        S: EventSink + Send + Sync + 'static,
        N: ConnectivityPort,
        T: CommandTransport,
    {
        self.require(BootState::DriverReady, BootState::ServiceReady)?;

        network.start().map_err(BootError::Network)?;
        transport.start().map_err(BootError::Transport)?;

        let handler = Arc::new(CommandHandler::new(Arc::clone(guard), Arc::clone(sink)));
        handler.register(transport).map_err(BootError::Transport)?;

        self.advance(BootState::ServiceReady, sink.as_ref());
        Ok(handler)
    }
}
