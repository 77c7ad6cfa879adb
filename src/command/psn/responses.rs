//! Responses for Packet switched data services Commands
use super::types::GPRSAttachedState;
use atat::atat_derive::AtatResp;

/// 10.1.9 PS attach or detach +CGATT
#[derive(Clone, Debug, PartialEq, AtatResp)]
pub struct GPRSAttached {
    #[at_arg(position = 0)]
    pub state: GPRSAttachedState,
}
