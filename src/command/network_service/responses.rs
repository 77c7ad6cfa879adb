//! Responses for Network service Commands
use super::types::{NetworkRegistrationStat, NetworkRegistrationUrc};
use atat::atat_derive::AtatResp;

/// 7.2 Network registration +CREG
#[derive(Clone, Debug, PartialEq, AtatResp)]
pub struct NetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: NetworkRegistrationUrc,
    #[at_arg(position = 1)]
    pub stat: NetworkRegistrationStat,
}
