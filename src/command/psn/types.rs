//! Argument and parameter types used by Packet switched data services Commands
//! and Responses
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GPRSAttachedState {
    Detached = 0,
    Attached = 1,
}

/// Context used for the data session.
pub const DEFAULT_CONTEXT_ID: u8 = 1;
