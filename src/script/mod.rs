//! Command tables for modems driven through raw AT text, SIM800 style.
//!
//! The scripts own every string their steps point at, so a step table can be
//! rebuilt on each poll without allocating.

mod connect;
mod transmit;

pub use connect::ConnectScript;
pub use transmit::TransmitScript;
