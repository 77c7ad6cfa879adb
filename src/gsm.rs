use crate::error::Error;

/// Circuit switched side of the modem: SIM unlock and network registration.
pub trait Gsm {
    /// Make sure the SIM is unlocked and the module is registered.
    ///
    /// Implementations check once and return; they must not loop until the
    /// network shows up; the caller retries on a later poll.
    fn begin(&mut self, pin: Option<&str>) -> Result<(), Error>;
}
