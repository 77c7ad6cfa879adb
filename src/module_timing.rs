#![allow(clippy::if_same_then_else)]

use embassy_time::Duration;

/// Time to wait after power-up before the module answers `AT`
pub fn boot_time() -> Duration {
    if cfg!(feature = "sara-u201") {
        Duration::from_secs(5)
    } else {
        Duration::from_secs(3)
    }
}

/// Settle time between two consecutive commands of a sequence
pub fn inter_command_delay() -> Duration {
    if cfg!(feature = "sara-u201") {
        Duration::from_millis(20)
    } else {
        Duration::from_millis(100)
    }
}

/// Maximum response time of the PDP context activation (`+CIICR`)
pub fn pdp_activation_time() -> Duration {
    if cfg!(feature = "sara-u201") {
        Duration::from_secs(150)
    } else {
        Duration::from_secs(85)
    }
}

/// Maximum time for a TCP connection to be reported as established
pub fn tcp_connect_time() -> Duration {
    if cfg!(feature = "sara-u201") {
        Duration::from_secs(20)
    } else {
        Duration::from_secs(75)
    }
}

/// Maximum time between handing a payload to the module and `SEND OK`
pub fn send_time() -> Duration {
    Duration::from_secs(10)
}
