#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod buffer;
pub mod clock;
pub mod command;
pub mod config;
pub mod connection;
pub mod diagnostics;
pub mod error;
pub mod gprs;
pub mod gsm;
pub mod http;
mod module_timing;
pub mod modem;
pub mod ring_buffer;
pub mod script;
pub mod sequencer;
pub mod session;
pub mod thingspeak;
pub mod timer;
pub mod transport;
pub mod uploader;

#[cfg(test)]
mod test_helpers;

pub use buffer::{Chunks, SampleBuffer};
pub use clock::{Clock, SystemClock};
pub use config::{Apn, TelemetryConfig};
pub use connection::{ConnectionManager, ConnectionState, Incoming};
pub use error::Error;
pub use gprs::Gprs;
pub use gsm::Gsm;
pub use modem::AtModem;
pub use sequencer::{CommandSequencer, CommandStep, FailurePolicy, SequencerStatus};
pub use session::{AtSession, SessionEvent};
pub use timer::Timer;
pub use transport::Transport;
pub use uploader::{Sensor, UploadEvent, Uploader};

/// Capacity of the sample buffer used by the default telemetry cycle.
pub const MAX_SAMPLES: usize = 500;

/// Samples collected per transmit cycle on the reference device.
pub const SAMPLES_PER_CYCLE: usize = 432;

/// Capacity in bytes of a single serialized chunk.
pub const CHUNK_CAPACITY: usize = 200;

/// Maximum number of fields of a ThingSpeak channel.
pub const MAX_CHUNKS: usize = 8;
