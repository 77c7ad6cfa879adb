//! ### 8.3 - Device lock

mod impl_;
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::PinStatus;

use super::NoResponse;

/// 8.3 Enter PIN +CPIN
///
/// Read whether the MT is waiting for a password, and which one.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN?", PinStatus, timeout_ms = 5000)]
pub struct GetPinStatus;

/// 8.3 Enter PIN +CPIN
///
/// Send the PIN the MT is waiting for. A wrong PIN given three times locks
/// the card until the PUK is entered.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN", NoResponse, timeout_ms = 5000)]
pub struct SetPin<'a> {
    #[at_arg(position = 0, len = 8)]
    pub pin: &'a str,
}
