//! ### 10 - Packet switched data services
//!
//! Just enough to define the default PDP context and attach to GPRS. Context
//! activation and the IP connection itself are left to the module's own
//! socket or TLS client.

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::GPRSAttached;
use types::GPRSAttachedState;

use super::NoResponse;

/// 10.1.1 Define PDP context +CGDCONT
///
/// Defines the connection parameters for the PDP context identified by the
/// local context identification parameter `<cid>`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 99)]
    pub apn: &'a str,
}

/// 10.1.9 PS attach or detach +CGATT
///
/// If the MT is already in the requested state the command is ignored and OK
/// is returned. Any active PDP context is deactivated on detach.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGATT", NoResponse, attempts = 1, timeout_ms = 75000)]
pub struct SetGPRSAttached {
    #[at_arg(position = 0)]
    pub state: GPRSAttachedState,
}

/// 10.1.9 Read PS attach state +CGATT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGATT?", GPRSAttached, attempts = 1, timeout_ms = 10000)]
pub struct GetGPRSAttached;
