//! Argument and parameter types used by Network service Commands and Responses
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, PartialEq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkRegistrationUrc {
    /// • 0 (default value): network registration URC disabled
    UrcDisabled = 0,
    /// • 1: network registration URC +CREG: <stat> enabled
    UrcEnabled = 1,
    /// • 2: network registration and location information URC +CREG:
    /// <stat>[,<lac>,<ci>] enabled
    UrcVerbose = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkRegistrationStat {
    /// • 0: not registered, the MT is not currently searching a new operator
    NotRegistered = 0,
    /// • 1: registered, home network
    Registered = 1,
    /// • 2: not registered, but the MT is currently searching a new operator
    NotRegisteredSearching = 2,
    /// • 3: registration denied
    RegistrationDenied = 3,
    /// • 4: unknown (e.g. out of coverage)
    Unknown = 4,
    /// • 5: registered, roaming
    RegisteredRoaming = 5,
}

impl NetworkRegistrationStat {
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered | Self::RegisteredRoaming)
    }
}
