//! Inbound command surface.
//!
//! Maps the transport's verbs onto the [`ActuatorGuard`].  The external
//! contract is permissive: a missing or malformed `pwm` parameter is a
//! no-op, out-of-range values are clamped, and every verb answers with a
//! success reply.  The reply says "command received", not "command valid".

use std::num::IntErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::info;

use crate::error::TransportError;

use super::events::{AppEvent, IgnoreReason};
use super::guard::ActuatorGuard;
use super::ports::{ActuatorPort, CommandTransport, EventSink};
use super::state::{IntensityRequest, RequestSource};

/// Fixed acknowledgment body for `spray` and `stop`.
pub const ACK_BODY: &str = "OK";

/// Query parameter carrying the requested duty level.
pub const PWM_PARAM: &str = "pwm";

// ───────────────────────────────────────────────────────────────
// Verbs and replies
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Set pump intensity from the `pwm` parameter.
    Spray,
    /// Force the pump off.
    Stop,
    /// Report the current intensity.
    Status,
}

impl Verb {
    pub const ALL: [Verb; 3] = [Verb::Spray, Verb::Stop, Verb::Status];

    /// URI path the transport routes to this verb.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Spray => "/spray",
            Self::Stop => "/stop",
            Self::Status => "/status",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.path() == path)
    }
}

/// Plain-text response handed back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn ack() -> Self {
        Self::ok(ACK_BODY)
    }
}

// ───────────────────────────────────────────────────────────────
// Query parsing
// ───────────────────────────────────────────────────────────────

/// Split `"/spray?pwm=10"` into `("/spray", "pwm=10")`.
pub fn split_uri(uri: &str) -> (&str, &str) {
    uri.split_once('?').unwrap_or((uri, ""))
}

/// Value of the first `key=value` pair named `key`.  A bare `key` with no
/// `=` yields an empty value.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find_map(|(k, v)| (k == key).then_some(v))
}

/// Parse-or-default step for the `pwm` parameter.
///
/// `None` means "leave the pump alone".  Integers too large for `i64`
/// saturate so that they still clamp to the nearest end of the duty range.
pub fn parse_pwm(query: &str) -> Option<i64> {
    let raw = query_param(query, PWM_PARAM)?;
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

// ───────────────────────────────────────────────────────────────
// Command handler
// ───────────────────────────────────────────────────────────────

pub struct CommandHandler<A, S> {
    guard: Arc<ActuatorGuard<A>>,
    sink: Arc<S>,
    next_request: AtomicU32,
}

impl<A, S> CommandHandler<A, S>
where
    A: ActuatorPort + Send + 'static,
    S: EventSink + Send + Sync + 'static,
{
    pub fn new(guard: Arc<ActuatorGuard<A>>, sink: Arc<S>) -> Self {
        Self {
            guard,
            sink,
            next_request: AtomicU32::new(1),
        }
    }

    fn next_source(&self) -> RequestSource {
        RequestSource::Remote(self.next_request.fetch_add(1, Ordering::Relaxed))
    }

    /// `spray?pwm=<n>`: clamp and apply, or ignore when `pwm` is missing or
    /// not an integer.
    pub fn handle_spray(&self, query: &str, source: RequestSource) -> Reply {
        let Some(requested) = parse_pwm(query) else {
            let reason = if query_param(query, PWM_PARAM).is_some() {
                IgnoreReason::MalformedParameter
            } else {
                IgnoreReason::MissingParameter
            };
            self.sink.emit(&AppEvent::CommandIgnored {
                source,
                verb: Verb::Spray,
                reason,
            });
            return Reply::ack();
        };

        let request = IntensityRequest::new(requested, source);
        match self.guard.apply(request) {
            Ok(applied) => self.sink.emit(&AppEvent::IntensityApplied {
                source,
                requested,
                applied,
            }),
            Err(error) => self.sink.emit(&AppEvent::ActuatorFault { source, error }),
        }
        Reply::ack()
    }

    /// `stop`: parameters are ignored.
    pub fn handle_stop(&self, _query: &str, source: RequestSource) -> Reply {
        match self.guard.stop(source) {
            Ok(()) => self.sink.emit(&AppEvent::Stopped { source }),
            Err(error) => self.sink.emit(&AppEvent::ActuatorFault { source, error }),
        }
        Reply::ack()
    }

    /// `status`: current intensity as `intensity=<n>`.
    pub fn handle_status(&self) -> Reply {
        let state = self.guard.snapshot();
        Reply::ok(format!("intensity={}", state.intensity))
    }

    pub fn handle(&self, verb: Verb, query: &str, source: RequestSource) -> Reply {
        match verb {
            Verb::Spray => self.handle_spray(query, source),
            Verb::Stop => self.handle_stop(query, source),
            Verb::Status => self.handle_status(),
        }
    }

    /// Route every verb on `transport` to this handler.  Each inbound
    /// request is tagged with a fresh [`RequestSource::Remote`] number.
    pub fn register(
        self: &Arc<Self>,
        transport: &mut impl CommandTransport,
    ) -> Result<(), TransportError> {
        for verb in Verb::ALL {
            let handler = Arc::clone(self);
            transport.register(
                verb,
                Box::new(move |query: &str| handler.handle(verb, query, handler.next_source())),
            )?;
            info!("commands: registered {}", verb.path());
        }
        Ok(())
    }
}
