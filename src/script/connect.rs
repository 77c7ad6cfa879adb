use core::fmt::Write as _;

use embassy_time::Duration;
use heapless::String;

use crate::config::{Apn, TelemetryConfig};
use crate::error::Error;
use crate::module_timing;
use crate::sequencer::CommandStep;

/// `AT+CSTT="<apn>","<user>","<password>"` with the longest values the
/// module accepts.
const APN_COMMAND_LEN: usize = 160;

pub const CONNECT_STEPS: usize = 8;

/// Bring-up of a data session: SIM check, registration, APN and context
/// activation.
#[derive(Debug, Clone)]
pub struct ConnectScript {
    apn_command: String<APN_COMMAND_LEN>,
    command_timeout: Duration,
    retry_delay: Duration,
}

impl ConnectScript {
    pub fn new<Cfg: TelemetryConfig>() -> Result<Self, Error> {
        Self::with_apn(&Cfg::APN, Cfg::COMMAND_TIMEOUT, Cfg::RETRY_DELAY)
    }

    pub fn with_apn(
        apn: &Apn<'_>,
        command_timeout: Duration,
        retry_delay: Duration,
    ) -> Result<Self, Error> {
        let mut apn_command = String::new();
        write!(
            apn_command,
            "AT+CSTT=\"{}\",\"{}\",\"{}\"",
            apn.name(),
            apn.username(),
            apn.password()
        )
        .map_err(|_| Error::Overflow)?;

        Ok(Self {
            apn_command,
            command_timeout,
            retry_delay,
        })
    }

    pub fn steps(&self) -> [CommandStep<'_>; CONNECT_STEPS] {
        let timeout = self.command_timeout;
        let retry = self.retry_delay;
        [
            CommandStep::new("AT", "OK", module_timing::boot_time()).restart_after(retry),
            CommandStep::new("ATE0", "OK", timeout).best_effort(),
            CommandStep::new("AT+CPIN?", "READY", timeout).restart_after(retry),
            CommandStep::new("AT+CREG?", "+CREG: 0,1", timeout).restart_after(retry),
            // Tears down a context left over from before a reset.
            CommandStep::new("AT+CIPSHUT", "SHUT OK", timeout).best_effort(),
            CommandStep::new(&self.apn_command, "OK", timeout).restart_after(retry),
            CommandStep::new("AT+CIICR", "OK", module_timing::pdp_activation_time())
                .restart_after(retry),
            // The local address is the only answer; any dotted quad will do.
            CommandStep::new("AT+CIFSR", ".", timeout).restart_after(retry),
        ]
    }
}
