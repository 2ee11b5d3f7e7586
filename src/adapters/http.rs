//! HTTP command transport adapter.
//!
//! Implements [`CommandTransport`]: one `GET` route per [`Verb`], each
//! answering with a `text/plain` body.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`HttpTransport`] wraps `EspHttpServer`.
//! - **all other targets**: [`SimTransport`] keeps an in-memory route table
//!   and exposes [`SimTransport::dispatch`] so tests can drive requests.

use log::info;

use crate::app::commands::Verb;
#[cfg(not(target_os = "espidf"))]
use crate::app::commands::{Reply, split_uri};
use crate::app::ports::{CommandTransport, VerbHandler};
use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// ESP-IDF server
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct HttpTransport {
    port: u16,
    server: Option<esp_idf_svc::http::server::EspHttpServer<'static>>,
}

#[cfg(target_os = "espidf")]
impl HttpTransport {
    pub fn new(port: u16) -> Self {
        Self { port, server: None }
    }
}

#[cfg(target_os = "espidf")]
impl CommandTransport for HttpTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        use esp_idf_svc::http::server::{Configuration, EspHttpServer};

        let config = Configuration {
            http_port: self.port,
            ..Default::default()
        };
        let server =
            EspHttpServer::new(&config).map_err(|e| TransportError::StartFailed(e.code()))?;
        self.server = Some(server);
        info!("http: listening on port {}", self.port);
        Ok(())
    }

    fn register(&mut self, verb: Verb, handler: VerbHandler) -> Result<(), TransportError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::io::Write;

        use crate::app::commands::split_uri;

        let server = self.server.as_mut().ok_or(TransportError::NotStarted)?;
        server
            .fn_handler::<anyhow::Error, _>(verb.path(), Method::Get, move |req| {
                let (_, query) = split_uri(req.uri());
                let reply = handler(query);
                let mut resp =
                    req.into_response(reply.status, None, &[("Content-Type", "text/plain")])?;
                resp.write_all(reply.body.as_bytes())?;
                Ok(())
            })
            .map_err(|e| TransportError::RegisterFailed(e.code()))?;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct SimTransport {
    started: bool,
    fail_start: bool,
    routes: Vec<(Verb, VerbHandler)>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl SimTransport {
    pub fn new() -> Self {
        Self {
            started: false,
            fail_start: false,
            routes: Vec::new(),
        }
    }

    /// A transport whose `start()` always fails, for boot-failure tests.
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn routes(&self) -> impl Iterator<Item = Verb> + '_ {
        self.routes.iter().map(|(verb, _)| *verb)
    }

    /// Route a request URI such as `/spray?pwm=10`.  `None` means no route
    /// matched (the real server answers 404).
    pub fn dispatch(&self, uri: &str) -> Option<Reply> {
        let (path, query) = split_uri(uri);
        let verb = Verb::from_path(path)?;
        self.routes
            .iter()
            .find(|(v, _)| *v == verb)
            .map(|(_, handler)| handler(query))
    }
}

#[cfg(not(target_os = "espidf"))]
impl CommandTransport for SimTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        if self.fail_start {
            return Err(TransportError::StartFailed(-1));
        }
        self.started = true;
        info!("http(sim): transport started");
        Ok(())
    }

    fn register(&mut self, verb: Verb, handler: VerbHandler) -> Result<(), TransportError> {
        if !self.started {
            return Err(TransportError::NotStarted);
        }
        if self.routes.iter().any(|(v, _)| *v == verb) {
            return Err(TransportError::DuplicateRoute(verb.path()));
        }
        self.routes.push((verb, handler));
        Ok(())
    }
}
