/// Running counters of everything that went wrong, or right, since boot.
///
/// Nothing in the crate acts on these; they exist so a device in the field
/// can report its health.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    pub samples_taken: u32,
    /// Samples lost to a full buffer, or cut from a chunk whose text was full.
    pub samples_dropped: u32,
    pub connect_attempts: u32,
    pub connect_failures: u32,
    /// Connect attempts rejected by the reconnect cooldown.
    pub rate_limited: u32,
    pub requests_sent: u32,
    pub requests_failed: u32,
    pub sequence_restarts: u32,
    pub step_timeouts: u32,
    /// Serialized data that did not fit its fixed-size buffer.
    pub capacity_overruns: u32,
}

impl Diagnostics {
    pub fn log_summary(&self) {
        info!(
            "samples: {} taken, {} dropped | connect: {} attempts, {} failed, {} throttled",
            self.samples_taken,
            self.samples_dropped,
            self.connect_attempts,
            self.connect_failures,
            self.rate_limited
        );
        info!(
            "requests: {} sent, {} failed | sequences: {} restarts, {} step timeouts | {} overruns",
            self.requests_sent,
            self.requests_failed,
            self.sequence_restarts,
            self.step_timeouts,
            self.capacity_overruns
        );
    }
}
