//! Session lifecycle: registration, data attach, requests and teardown.

use core::marker::PhantomData;

use embassy_time::Instant;
use embedded_io::Error as _;

use crate::clock::Clock;
use crate::config::TelemetryConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::gprs::Gprs;
use crate::gsm::Gsm;
use crate::http::{self, Method};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
}

/// Outcome of one [`ConnectionManager::poll_incoming`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Incoming {
    /// One byte of the server's response.
    Byte(u8),
    Idle,
    /// The server closed the connection and the transport has been released.
    PeerClosed,
    /// The server kept the connection open past the data timeout; the
    /// transport has been released.
    TimedOut,
}

/// Owns the modem session and the transport to the server.
///
/// Connect attempts are caller driven: nothing is retried in the background,
/// and attempts closer together than `Cfg::RECONNECT_COOLDOWN` are rejected
/// without touching the modem.
pub struct ConnectionManager<Cfg, M, T, C>
where
    Cfg: TelemetryConfig,
    M: Gsm + Gprs,
    T: Transport,
    C: Clock,
{
    modem: M,
    transport: T,
    clock: C,
    state: ConnectionState,
    last_attempt: Option<Instant>,
    ready_until: Instant,
    /// When the outstanding request was written, if any.
    request_sent_at: Option<Instant>,
    diagnostics: Diagnostics,
    _config: PhantomData<Cfg>,
}

impl<Cfg, M, T, C> ConnectionManager<Cfg, M, T, C>
where
    Cfg: TelemetryConfig,
    M: Gsm + Gprs,
    T: Transport,
    C: Clock,
{
    pub fn new(modem: M, transport: T, clock: C) -> Self {
        let now = clock.now();
        Self {
            modem,
            transport,
            clock,
            state: ConnectionState::Disconnected,
            last_attempt: None,
            ready_until: now,
            request_sent_at: None,
            diagnostics: Diagnostics::default(),
            _config: PhantomData,
        }
    }

    /// Current state. A session whose ready window has run out reads as
    /// `Disconnected`.
    pub fn state(&self) -> ConnectionState {
        match self.state {
            ConnectionState::Ready if !self.is_ready() => ConnectionState::Disconnected,
            state => state,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Ready && self.clock.now() < self.ready_until
    }

    /// No request is waiting for the server to close the connection.
    pub fn is_idle(&self) -> bool {
        self.request_sent_at.is_none()
    }

    pub fn connect(&mut self) -> Result<(), Error> {
        if self.is_ready() {
            return Ok(());
        }

        let now = self.clock.now();
        if let Some(last) = self.last_attempt {
            if now.saturating_duration_since(last) < Cfg::RECONNECT_COOLDOWN {
                self.diagnostics.rate_limited += 1;
                debug!("Connect attempt throttled");
                return Err(Error::RateLimited);
            }
        }

        self.last_attempt = Some(now);
        self.diagnostics.connect_attempts += 1;
        self.state = ConnectionState::Connecting;
        info!("Connecting to the network");

        match self.handshake() {
            Ok(()) => {
                self.ready_until = self.clock.now() + Cfg::CONNECTION_TIMEOUT;
                self.state = ConnectionState::Ready;
                info!("Connected");
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                self.diagnostics.connect_failures += 1;
                warn!("Connection failed: {:?}", e);
                Err(e)
            }
        }
    }

    fn handshake(&mut self) -> Result<(), Error> {
        self.modem.begin(Cfg::PIN)?;
        self.modem.attach_gprs(&Cfg::APN)
    }

    /// Release the transport and detach. Calling it again is a no-op apart
    /// from releasing the transport once more.
    pub fn disconnect(&mut self) {
        self.transport.stop();
        self.request_sent_at = None;

        if self.state != ConnectionState::Disconnected {
            if let Err(e) = self.modem.detach_gprs() {
                warn!("Detach failed: {:?}", e);
            }
            info!("Disconnected");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Open a connection to the server and write one request.
    ///
    /// Connects first if the session is not ready. Success means the request
    /// left the device; the response, if any, is drained by
    /// [`ConnectionManager::poll_incoming`].
    pub fn send_request(&mut self, path: &str, method: Method) -> Result<(), Error> {
        if !self.is_ready() {
            self.connect()?;
        }

        if self.request_sent_at.take().is_some() {
            // The previous response was never fully drained.
            self.transport.stop();
        }

        match self.write_request(path, method) {
            Ok(()) => {
                self.request_sent_at = Some(self.clock.now());
                self.diagnostics.requests_sent += 1;
                debug!("{} {}", method.as_str(), path);
                Ok(())
            }
            Err(e) => {
                self.transport.stop();
                self.diagnostics.requests_failed += 1;
                Err(e)
            }
        }
    }

    fn write_request(&mut self, path: &str, method: Method) -> Result<(), Error> {
        self.transport
            .connect(Cfg::SERVER, Cfg::PORT)
            .map_err(|e| {
                warn!("Connection to {} failed: {:?}", Cfg::SERVER, e.kind());
                Error::Transport
            })?;

        http::write_request(&mut self.transport, method, Cfg::SERVER, path).map_err(|e| {
            warn!("Request write failed: {:?}", e.kind());
            Error::Transport
        })
    }

    /// Drain at most one byte of the server's response, and release the
    /// transport once the server has closed its side.
    ///
    /// Must be called every dispatch cycle while a request is outstanding.
    pub fn poll_incoming(&mut self) -> Incoming {
        if self.transport.read_ready().unwrap_or(false) {
            let mut byte = [0u8; 1];
            match self.transport.read(&mut byte) {
                Ok(1) => {
                    trace!("<- {:?}", byte[0] as char);
                    return Incoming::Byte(byte[0]);
                }
                Ok(_) => {}
                Err(e) => warn!("Read failed: {:?}", e.kind()),
            }
        }

        let Some(sent_at) = self.request_sent_at else {
            return Incoming::Idle;
        };

        if !self.transport.is_connected() {
            debug!("Server closed the connection");
            self.transport.stop();
            self.request_sent_at = None;
            return Incoming::PeerClosed;
        }

        if self.clock.now().saturating_duration_since(sent_at) >= Cfg::DATA_TIMEOUT {
            warn!("No end of response within the data timeout");
            self.transport.stop();
            self.request_sent_at = None;
            return Incoming::TimedOut;
        }

        Incoming::Idle
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn modem(&self) -> &M {
        &self.modem
    }

    pub fn modem_mut(&mut self) -> &mut M {
        &mut self.modem
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
