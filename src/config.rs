use embassy_time::Duration;

/// Build-time configuration of a telemetry device.
///
/// Implement this on a unit struct in the application; the defaults match the
/// reference deployment and only the credentials have to be supplied.
pub trait TelemetryConfig {
    /// SIM PIN, if the card is locked.
    const PIN: Option<&'static str> = None;
    const APN: Apn<'static> = Apn::None;

    const SERVER: &'static str = "api.thingspeak.com";
    /// Port used through the modem's TLS client.
    const PORT: u16 = 443;
    /// Port used by the raw AT command flow, which speaks plain TCP.
    const HTTP_PORT: u16 = 80;

    const WRITE_API_KEY: &'static str;
    const READ_API_KEY: &'static str;
    const CHANNEL_ID: &'static str;

    /// How long an established session is trusted without re-attaching.
    const CONNECTION_TIMEOUT: Duration = Duration::from_millis(30_000);
    const COMMAND_TIMEOUT: Duration = Duration::from_millis(5_000);
    const DATA_TIMEOUT: Duration = Duration::from_millis(10_000);

    const SAMPLE_INTERVAL: Duration = Duration::from_millis(5_000);
    const TRANSMIT_INTERVAL: Duration = Duration::from_millis(30_000);

    /// Minimum spacing between two connect attempts.
    const RECONNECT_COOLDOWN: Duration = Duration::from_millis(5_000);
    /// Backoff before a failed command sequence starts over.
    const RETRY_DELAY: Duration = Duration::from_millis(5_000);
    /// Consecutive failed transmissions before the bring-up is repeated.
    const MAX_RETRY_ATTEMPTS: u8 = 3;

    const MAX_CHUNKS: usize = crate::MAX_CHUNKS;
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Apn<'a> {
    None,
    Given {
        name: &'a str,
        username: Option<&'a str>,
        password: Option<&'a str>,
    },
}

impl Default for Apn<'_> {
    fn default() -> Self {
        Self::None
    }
}

impl<'a> Apn<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self::Given {
            name,
            username: None,
            password: None,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::None => "",
            Self::Given { name, .. } => name,
        }
    }

    pub fn username(&self) -> &'a str {
        match self {
            Self::Given {
                username: Some(u), ..
            } => u,
            _ => "",
        }
    }

    pub fn password(&self) -> &'a str {
        match self {
            Self::Given {
                password: Some(p), ..
            } => p,
            _ => "",
        }
    }
}
