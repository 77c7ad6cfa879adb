//! AT commands needed to register a GSM modem and attach its data session.
//!
//! Command numbering follows the 3GPP TS 27.007 chapters the commands are
//! defined in.

pub mod device_lock;
pub mod network_service;
pub mod psn;

use atat::atat_derive::{AtatCmd, AtatResp};

#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Attention; used to check the module answers at all.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct AT;
