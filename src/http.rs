//! Minimal HTTP/1.1 request heads.
//!
//! Requests carry no body and always ask the server to close the connection,
//! so the end of the response is signalled by the transport closing.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Write the request head into a text buffer.
pub fn format_request<W: fmt::Write>(
    out: &mut W,
    method: Method,
    host: &str,
    path: &str,
) -> fmt::Result {
    write!(
        out,
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        method.as_str(),
        path,
        host
    )
}

/// Write the request head to a byte stream.
pub fn write_request<W: embedded_io::Write>(
    out: &mut W,
    method: Method,
    host: &str,
    path: &str,
) -> Result<(), W::Error> {
    for part in [
        method.as_str(),
        " ",
        path,
        " HTTP/1.1\r\nHost: ",
        host,
        "\r\nConnection: close\r\n\r\n",
    ] {
        out.write_all(part.as_bytes())?;
    }
    out.flush()
}
