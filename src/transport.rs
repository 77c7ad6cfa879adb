use embedded_io::{Read, ReadReady, Write};

/// Byte stream to the remote server.
///
/// Usually the modem's socket or TLS client. Reads must not block: callers
/// check [`ReadReady::read_ready`] before reading.
pub trait Transport: Read + Write + ReadReady {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;

    /// Whether the far end still holds the connection open.
    fn is_connected(&mut self) -> bool;

    /// Release the connection. Safe to call when nothing is open.
    fn stop(&mut self);
}
