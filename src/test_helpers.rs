//! Mocks shared by the unit tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use embassy_time::Instant;
use embedded_io::ErrorKind;
use env_logger::Env;

use crate::clock::Clock;
use crate::config::{Apn, TelemetryConfig};
use crate::error::Error;
use crate::gprs::Gprs;
use crate::gsm::Gsm;
use crate::transport::Transport;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("trace"))
            .is_test(true)
            .init();
    });
}

/// Configuration with short, distinct values so tests can tell them apart.
pub struct TestConfig;

impl TelemetryConfig for TestConfig {
    const PIN: Option<&'static str> = Some("1234");
    const APN: Apn<'static> = Apn::Given {
        name: "zonginternet",
        username: None,
        password: None,
    };
    const WRITE_API_KEY: &'static str = "WKEY";
    const READ_API_KEY: &'static str = "RKEY";
    const CHANNEL_ID: &'static str = "1234567";
}

/// Manually advanced clock, in milliseconds. Clones share the same time.
#[derive(Debug, Clone)]
pub struct MockClock(Rc<Cell<u64>>);

impl MockClock {
    pub fn new() -> Self {
        init_logging();
        Self(Rc::new(Cell::new(0)))
    }

    pub fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.get())
    }
}

/// Serial port of a modem that answers commands from a script.
///
/// Commands are collected until `\n`. The reply of the rule whose command
/// matches exactly wins, otherwise the longest matching prefix, otherwise the
/// default reply. A reply ending in `"> "` switches the port to data mode,
/// where everything up to Ctrl-Z is recorded as one payload.
#[derive(Debug, Default)]
pub struct ScriptedPort {
    rules: Vec<(String, String)>,
    default_reply: Option<String>,
    payload_reply: String,
    written: Vec<String>,
    line: Vec<u8>,
    data_mode: bool,
    rx: VecDeque<u8>,
}

impl ScriptedPort {
    /// A modem that never answers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying_to_all(reply: &str) -> Self {
        Self {
            default_reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn on(mut self, command: &str, reply: &str) -> Self {
        self.rules.push((command.to_string(), reply.to_string()));
        self
    }

    pub fn on_payload(mut self, reply: &str) -> Self {
        self.payload_reply = reply.to_string();
        self
    }

    /// Everything written so far, one entry per command or payload.
    pub fn written(&self) -> Vec<String> {
        self.written.clone()
    }

    fn reply_for(&self, command: &str) -> Option<String> {
        if let Some((_, reply)) = self.rules.iter().find(|(c, _)| c == command) {
            return Some(reply.clone());
        }
        self.rules
            .iter()
            .filter(|(c, _)| command.starts_with(c.as_str()))
            .max_by_key(|(c, _)| c.len())
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default_reply.clone())
    }

    fn complete_line(&mut self) {
        let raw = String::from_utf8_lossy(&self.line).to_string();
        self.line.clear();

        let reply = if self.data_mode {
            self.data_mode = false;
            self.written.push(raw);
            Some(self.payload_reply.clone())
        } else {
            let command = raw.trim_end_matches('\r').to_string();
            let reply = self.reply_for(&command);
            self.written.push(command);
            reply
        };

        if let Some(reply) = reply {
            self.data_mode = reply.ends_with("> ");
            self.rx.extend(reply.as_bytes());
        }
    }
}

impl embedded_io::ErrorType for ScriptedPort {
    type Error = core::convert::Infallible;
}

impl embedded_io::Read for ScriptedPort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = core::cmp::min(buf.len(), self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for ScriptedPort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for ScriptedPort {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            match (self.data_mode, b) {
                (true, 0x1A) | (false, b'\n') => self.complete_line(),
                _ => self.line.push(b),
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Byte transport to the server.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub connected: bool,
    pub refuse_connect: bool,
    pub fail_writes: bool,
    pub connects: Vec<(String, u16)>,
    pub sent: Vec<u8>,
    pub rx: VecDeque<u8>,
    pub stops: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a server response and close the connection from the far end.
    pub fn respond_and_close(&mut self, response: &str) {
        self.rx.extend(response.as_bytes());
        self.connected = false;
    }

    pub fn sent_text(&self) -> String {
        String::from_utf8_lossy(&self.sent).to_string()
    }
}

impl embedded_io::ErrorType for MockTransport {
    type Error = ErrorKind;
}

impl embedded_io::Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = core::cmp::min(buf.len(), self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockTransport {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes || !self.connected {
            return Err(ErrorKind::NotConnected);
        }
        self.sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error> {
        self.connects.push((host.to_string(), port));
        if self.refuse_connect {
            return Err(ErrorKind::ConnectionRefused);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn stop(&mut self) {
        self.connected = false;
        self.stops += 1;
    }
}

/// Modem whose registration and attach outcome is set by the test.
#[derive(Debug, Default)]
pub struct MockModem {
    pub fail_begin: bool,
    pub fail_attach: bool,
    pub begin_calls: usize,
    pub attach_calls: usize,
    pub detach_calls: usize,
    pub last_pin: Option<String>,
    pub last_apn: Option<String>,
}

impl MockModem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handshakes(&self) -> usize {
        self.begin_calls
    }
}

impl Gsm for MockModem {
    fn begin(&mut self, pin: Option<&str>) -> Result<(), Error> {
        self.begin_calls += 1;
        self.last_pin = pin.map(|p| p.to_string());
        if self.fail_begin {
            return Err(Error::Registration);
        }
        Ok(())
    }
}

impl Gprs for MockModem {
    fn attach_gprs(&mut self, apn: &Apn) -> Result<(), Error> {
        self.attach_calls += 1;
        self.last_apn = Some(apn.name().to_string());
        if self.fail_attach {
            return Err(Error::Attach);
        }
        Ok(())
    }

    fn detach_gprs(&mut self) -> Result<(), Error> {
        self.detach_calls += 1;
        Ok(())
    }
}

/// Blocking `atat` client answering from a table of raw responses.
///
/// Responses are given the way the ingress would hand them over: the
/// information text without the final `OK`. Commands without a rule time out.
#[derive(Debug, Default)]
pub struct MockAtClient {
    rules: Vec<(String, Result<Vec<u8>, atat::Error>)>,
    pub sent: Vec<String>,
}

impl MockAtClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, response: &str) -> Self {
        self.rules
            .push((command.to_string(), Ok(response.as_bytes().to_vec())));
        self
    }

    pub fn on_error(mut self, command: &str, error: atat::Error) -> Self {
        self.rules.push((command.to_string(), Err(error)));
        self
    }
}

impl atat::blocking::AtatClient for MockAtClient {
    fn send<Cmd: atat::AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, atat::Error> {
        let mut buf = std::vec![0u8; Cmd::MAX_LEN];
        let len = cmd.write(&mut buf);
        let line = String::from_utf8_lossy(&buf[..len]).trim_end().to_string();

        let rule = self
            .rules
            .iter()
            .filter(|(c, _)| line == *c || line.starts_with(&std::format!("{}=", c)))
            .max_by_key(|(c, _)| c.len())
            .map(|(_, r)| r.clone());
        self.sent.push(line);

        match rule {
            Some(Ok(response)) => cmd.parse(Ok(response.as_slice())),
            Some(Err(e)) => Err(e),
            None => Err(atat::Error::Timeout),
        }
    }
}
