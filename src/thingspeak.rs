//! Request paths of the ThingSpeak channel API.

use core::fmt::Write;

use heapless::String;

use crate::config::TelemetryConfig;
use crate::error::Error;

/// Number of data fields of a channel.
pub const FIELDS: u8 = 8;

/// A ThingSpeak channel and the keys to access it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel<'a> {
    pub host: &'a str,
    pub port: u16,
    pub id: &'a str,
    pub write_key: &'a str,
    pub read_key: &'a str,
}

impl Channel<'static> {
    pub fn from_config<Cfg: TelemetryConfig>() -> Self {
        Self {
            host: Cfg::SERVER,
            port: Cfg::PORT,
            id: Cfg::CHANNEL_ID,
            write_key: Cfg::WRITE_API_KEY,
            read_key: Cfg::READ_API_KEY,
        }
    }
}

impl<'a> Channel<'a> {
    /// `/update?api_key=<key>&field<N>=<value>`
    ///
    /// Characters that would break the query string are percent encoded, so
    /// space separated chunks travel as `1%202%203`.
    pub fn write_path<const L: usize>(&self, field: u8, value: &str) -> Result<String<L>, Error> {
        check_field(field)?;
        let mut path = String::new();
        write!(path, "/update?api_key={}&field{}=", self.write_key, field)
            .map_err(|_| Error::Overflow)?;
        push_encoded(&mut path, value)?;
        Ok(path)
    }

    pub fn write_value_path<const L: usize>(
        &self,
        field: u8,
        value: i32,
    ) -> Result<String<L>, Error> {
        let mut text: String<12> = String::new();
        write!(text, "{}", value).map_err(|_| Error::Overflow)?;
        self.write_path(field, &text)
    }

    /// `/channels/<id>/fields/<N>/last.json?api_key=<key>&results=<n>`
    pub fn read_path<const L: usize>(&self, field: u8, results: u16) -> Result<String<L>, Error> {
        check_field(field)?;
        let mut path = String::new();
        write!(
            path,
            "/channels/{}/fields/{}/last.json?api_key={}&results={}",
            self.id, field, self.read_key, results
        )
        .map_err(|_| Error::Overflow)?;
        Ok(path)
    }
}

/// Field that carries the chunk at `index` of a chunked write.
pub fn chunk_field(index: usize) -> Result<u8, Error> {
    u8::try_from(index + 1)
        .ok()
        .filter(|f| *f <= FIELDS)
        .ok_or(Error::InvalidField)
}

fn check_field(field: u8) -> Result<(), Error> {
    if (1..=FIELDS).contains(&field) {
        Ok(())
    } else {
        Err(Error::InvalidField)
    }
}

fn push_encoded<const L: usize>(out: &mut String<L>, value: &str) -> Result<(), Error> {
    for c in value.chars() {
        let pushed = match c {
            ' ' => out.push_str("%20"),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        };
        pushed.map_err(|_| Error::Overflow)?;
    }
    Ok(())
}
