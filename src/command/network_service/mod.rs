//! ### 7.2 - Network service

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::NetworkRegistrationStatus;

/// 7.2 Network registration +CREG
///
/// The read command reports the URC setting `<n>` together with the circuit
/// switched registration status `<stat>`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG?", NetworkRegistrationStatus)]
pub struct GetNetworkRegistrationStatus;
