/// Password the MT is waiting for.
///
/// Reported as plain text (`READY`, `SIM PIN`, ...), hence the hand written
/// serde implementation in `impl_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinStatusCode {
    /// MT is not pending for any password
    Ready,
    /// MT is waiting SIM PIN to be given
    SimPin,
    /// MT is waiting SIM PUK to be given
    SimPuk,
    /// MT is waiting SIM PIN2 to be given
    SimPin2,
    /// MT is waiting SIM PUK2 to be given
    SimPuk2,
    /// MT is waiting network personalization password to be given
    PhNetPin,
    /// MT is waiting phone-to-SIM card password to be given
    PhSimPin,
}

impl PinStatusCode {
    pub(crate) const TABLE: [(Self, &'static [u8]); 7] = [
        (Self::Ready, b"READY"),
        (Self::SimPin, b"SIM PIN"),
        (Self::SimPuk, b"SIM PUK"),
        (Self::SimPin2, b"SIM PIN2"),
        (Self::SimPuk2, b"SIM PUK2"),
        (Self::PhNetPin, b"PH-NET PIN"),
        (Self::PhSimPin, b"PH-SIM PIN"),
    ];

    pub fn as_bytes(&self) -> &'static [u8] {
        Self::TABLE
            .iter()
            .find(|(code, _)| code == self)
            .map(|(_, text)| *text)
            .unwrap_or(b"")
    }

    pub fn from_bytes(text: &[u8]) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, t)| *t == text)
            .map(|(code, _)| *code)
    }
}
