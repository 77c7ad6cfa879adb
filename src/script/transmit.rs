use core::fmt::Write as _;

use embassy_time::Duration;
use heapless::String;

use crate::config::TelemetryConfig;
use crate::error::Error;
use crate::http::{self, Method};
use crate::module_timing;
use crate::sequencer::{CommandStep, FailurePolicy, Terminator};

const START_COMMAND_LEN: usize = 96;

pub const TRANSMIT_STEPS: usize = 4;

/// One HTTP request over the module's own TCP stack.
///
/// `P` bounds the request head, path included.
#[derive(Debug, Clone)]
pub struct TransmitScript<const P: usize = 512> {
    start: String<START_COMMAND_LEN>,
    request: String<P>,
    command_timeout: Duration,
}

impl<const P: usize> TransmitScript<P> {
    pub fn new<Cfg: TelemetryConfig>(method: Method, path: &str) -> Result<Self, Error> {
        let mut start = String::new();
        write!(
            start,
            "AT+CIPSTART=\"TCP\",\"{}\",{}",
            Cfg::SERVER,
            Cfg::HTTP_PORT
        )
        .map_err(|_| Error::Overflow)?;

        let mut request = String::new();
        http::format_request(&mut request, method, Cfg::SERVER, path)
            .map_err(|_| Error::Overflow)?;

        Ok(Self {
            start,
            request,
            command_timeout: Cfg::COMMAND_TIMEOUT,
        })
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn steps(&self) -> [CommandStep<'_>; TRANSMIT_STEPS] {
        let timeout = self.command_timeout;
        [
            CommandStep::new(&self.start, "CONNECT OK", module_timing::tcp_connect_time())
                .on_failure(FailurePolicy::Abort),
            CommandStep::new("AT+CIPSEND", ">", timeout).on_failure(FailurePolicy::Abort),
            CommandStep::new(&self.request, "SEND OK", module_timing::send_time())
                .on_failure(FailurePolicy::Abort)
                .terminated_by(Terminator::CtrlZ),
            // The server usually hangs up first.
            CommandStep::new("AT+CIPCLOSE", "CLOSE OK", timeout).best_effort(),
        ]
    }
}
