use crate::config::Apn;
use crate::error::Error;

/// Packet switched side of the modem: the data session.
pub trait Gprs {
    fn attach_gprs(&mut self, apn: &Apn) -> Result<(), Error>;
    fn detach_gprs(&mut self) -> Result<(), Error>;
}
