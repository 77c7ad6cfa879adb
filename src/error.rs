#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // Session errors
    /// A connect attempt was rejected because the reconnect cooldown has not
    /// elapsed yet.
    RateLimited,
    Pin,
    Registration,
    Attach,
    NotReady,
    Busy,

    // Transport errors
    Transport,
    /// The modem did not answer in time.
    Timeout,

    // Request building
    Overflow,
    InvalidField,

    Atat(atat::Error),
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Self::Timeout,
            e => Self::Atat(e),
        }
    }
}
