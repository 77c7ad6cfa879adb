//! The telemetry dispatch cycle.

use heapless::{String, Vec};

use crate::buffer::SampleBuffer;
use crate::clock::Clock;
use crate::config::TelemetryConfig;
use crate::connection::ConnectionManager;
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::gprs::Gprs;
use crate::gsm::Gsm;
use crate::http::Method;
use crate::thingspeak::{self, Channel};
use crate::timer::Timer;
use crate::transport::Transport;
use crate::{CHUNK_CAPACITY, MAX_CHUNKS, MAX_SAMPLES};

/// Room for a chunk after percent encoding, plus the query prefix.
const PATH_CAPACITY: usize = 512;

/// Source of samples, typically an ADC channel.
pub trait Sensor {
    fn read(&mut self) -> i32;
}

impl<F: FnMut() -> i32> Sensor for F {
    fn read(&mut self) -> i32 {
        self()
    }
}

/// What one [`Uploader::poll`] call delivered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UploadEvent {
    Idle,
    /// One chunk was written to the given field.
    Sent { field: u8 },
    /// The last chunk of a cycle was written.
    Completed,
    /// Delivery stopped; the remaining chunks are retried on the next transmit
    /// tick.
    Failed(Error),
}

/// Samples a sensor and uploads the readings in chunks, one field per chunk.
///
/// On every transmit tick the buffer is serialized into up to `MAX_CHUNKS`
/// chunks which move to an outbox, and the buffer is cleared. One chunk is
/// sent per poll, and only once the server has closed the previous request.
/// Chunks that could not be sent stay in the outbox until a later tick.
pub struct Uploader<Cfg, M, T, C, const N: usize = MAX_SAMPLES>
where
    Cfg: TelemetryConfig,
    M: Gsm + Gprs,
    T: Transport,
    C: Clock + Clone,
{
    connection: ConnectionManager<Cfg, M, T, C>,
    buffer: SampleBuffer<N>,
    sample_timer: Timer<C>,
    transmit_timer: Timer<C>,
    channel: Channel<'static>,
    outbox: Vec<String<CHUNK_CAPACITY>, MAX_CHUNKS>,
    cursor: usize,
    paused: bool,
}

impl<Cfg, M, T, C, const N: usize> Uploader<Cfg, M, T, C, N>
where
    Cfg: TelemetryConfig,
    M: Gsm + Gprs,
    T: Transport,
    C: Clock + Clone,
{
    pub fn new(modem: M, transport: T, clock: C) -> Self {
        Self {
            sample_timer: Timer::new(clock.clone(), Cfg::SAMPLE_INTERVAL),
            transmit_timer: Timer::new(clock.clone(), Cfg::TRANSMIT_INTERVAL),
            connection: ConnectionManager::new(modem, transport, clock),
            buffer: SampleBuffer::new(),
            channel: Channel::from_config::<Cfg>(),
            outbox: Vec::new(),
            cursor: 0,
            paused: false,
        }
    }

    /// Run one dispatch cycle. Never blocks.
    pub fn poll<S: Sensor>(&mut self, sensor: &mut S) -> UploadEvent {
        self.connection.poll_incoming();

        if self.sample_timer.is_complete() {
            self.sample_timer.reset();
            self.sample(sensor.read());
        }

        if self.transmit_timer.is_complete() {
            self.transmit_timer.reset();
            if self.pending() == 0 {
                self.stage();
            } else {
                self.paused = false;
            }
        }

        self.deliver()
    }

    fn sample(&mut self, value: i32) {
        let diagnostics = self.connection.diagnostics_mut();
        if self.buffer.is_full() {
            diagnostics.samples_dropped += 1;
            trace!("Buffer full, dropping {}", value);
            return;
        }
        self.buffer.append(value);
        diagnostics.samples_taken += 1;
    }

    fn stage(&mut self) {
        if self.buffer.is_empty() {
            debug!("Nothing to transmit");
            return;
        }

        let chunks = self
            .buffer
            .serialize_to_chunks::<CHUNK_CAPACITY, MAX_CHUNKS>(Cfg::MAX_CHUNKS);
        if chunks.truncated > 0 {
            warn!("{} samples did not fit their chunk", chunks.truncated);
            let diagnostics = self.connection.diagnostics_mut();
            diagnostics.capacity_overruns += 1;
            diagnostics.samples_dropped += chunks.truncated as u32;
        }

        self.outbox = chunks.texts;
        self.cursor = 0;
        self.paused = false;
        info!(
            "Staged {} chunks from {} samples",
            self.outbox.len(),
            self.buffer.count()
        );
        self.buffer.clear();
    }

    fn deliver(&mut self) -> UploadEvent {
        if self.paused || self.pending() == 0 || !self.connection.is_idle() {
            return UploadEvent::Idle;
        }

        let result = thingspeak::chunk_field(self.cursor).and_then(|field| {
            let path: String<PATH_CAPACITY> =
                self.channel.write_path(field, &self.outbox[self.cursor])?;
            self.connection.send_request(&path, Method::Get)?;
            Ok(field)
        });

        match result {
            Ok(field) => self.advance(UploadEvent::Sent { field }),
            Err(e @ (Error::Overflow | Error::InvalidField)) => {
                warn!("Dropping chunk {}: {:?}", self.cursor, e);
                self.connection.diagnostics_mut().capacity_overruns += 1;
                self.advance(UploadEvent::Failed(e))
            }
            Err(e) => {
                warn!("Upload paused: {:?}", e);
                self.paused = true;
                UploadEvent::Failed(e)
            }
        }
    }

    fn advance(&mut self, event: UploadEvent) -> UploadEvent {
        self.cursor += 1;
        if self.pending() > 0 {
            return event;
        }
        self.outbox.clear();
        self.cursor = 0;
        match event {
            UploadEvent::Sent { .. } => {
                info!("Cycle uploaded");
                self.connection.diagnostics().log_summary();
                UploadEvent::Completed
            }
            other => other,
        }
    }

    /// Chunks staged but not sent yet.
    pub fn pending(&self) -> usize {
        self.outbox.len() - self.cursor
    }

    pub fn buffer(&self) -> &SampleBuffer<N> {
        &self.buffer
    }

    pub fn connection(&self) -> &ConnectionManager<Cfg, M, T, C> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut ConnectionManager<Cfg, M, T, C> {
        &mut self.connection
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.connection.diagnostics()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::{MockClock, MockModem, MockTransport, TestConfig};

    type TestUploader<const N: usize> = Uploader<TestConfig, MockModem, MockTransport, MockClock, N>;

    fn counter() -> impl FnMut() -> i32 {
        let mut next = 0;
        move || {
            next += 1;
            next
        }
    }

    fn run<const N: usize, S: Sensor>(
        up: &mut TestUploader<N>,
        clock: &MockClock,
        sensor: &mut S,
        ms: u64,
    ) -> std::vec::Vec<UploadEvent> {
        let mut events = std::vec::Vec::new();
        for _ in 0..ms / 100 {
            clock.advance_ms(100);
            let event = up.poll(sensor);
            if event != UploadEvent::Idle {
                events.push(event);
            }
            // The server answers and hangs up right away.
            if up.connection().transport().connected {
                up.connection_mut().transport_mut().respond_and_close("1");
            }
        }
        events
    }

    #[test]
    fn samples_on_the_sample_interval() {
        let clock = MockClock::new();
        let mut up: TestUploader<16> =
            Uploader::new(MockModem::new(), MockTransport::new(), clock.clone());
        let mut sensor = counter();

        run(&mut up, &clock, &mut sensor, 25_000);
        assert_eq!(up.buffer().samples(), &[1, 2, 3, 4, 5]);
        assert_eq!(up.diagnostics().samples_taken, 5);
    }

    #[test]
    fn transmit_tick_uploads_one_chunk_per_field() {
        let clock = MockClock::new();
        let mut up: TestUploader<16> =
            Uploader::new(MockModem::new(), MockTransport::new(), clock.clone());
        let mut sensor = counter();

        let events = run(&mut up, &clock, &mut sensor, 31_000);

        // Six samples into eight chunks: one sample each.
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], UploadEvent::Sent { field: 1 });
        assert_eq!(events[4], UploadEvent::Sent { field: 5 });
        assert_eq!(events[5], UploadEvent::Completed);
        assert!(up.buffer().is_empty());
        assert_eq!(up.pending(), 0);

        let sent = up.connection().transport().sent_text();
        assert!(sent.contains("GET /update?api_key=WKEY&field1=1 HTTP/1.1\r\n"));
        assert!(sent.contains("GET /update?api_key=WKEY&field6=6 HTTP/1.1\r\n"));
        assert_eq!(up.diagnostics().requests_sent, 6);
    }

    #[test]
    fn overflowing_samples_are_counted() {
        let clock = MockClock::new();
        let mut up: TestUploader<2> =
            Uploader::new(MockModem::new(), MockTransport::new(), clock.clone());
        let mut sensor = counter();

        run(&mut up, &clock, &mut sensor, 25_000);
        assert_eq!(up.buffer().samples(), &[1, 2]);
        assert_eq!(up.diagnostics().samples_dropped, 3);
    }

    #[test]
    fn failed_delivery_keeps_chunks_for_the_next_tick() {
        let clock = MockClock::new();
        let mut modem = MockModem::new();
        modem.fail_attach = true;
        let mut up: TestUploader<16> = Uploader::new(modem, MockTransport::new(), clock.clone());
        let mut sensor = counter();

        let events = run(&mut up, &clock, &mut sensor, 30_000);
        assert_eq!(events, [UploadEvent::Failed(Error::Attach)]);
        assert_eq!(up.pending(), 6);
        assert!(up.buffer().is_empty());

        // Sampling continues into the cleared buffer meanwhile.
        up.connection_mut().modem_mut().fail_attach = false;
        let events = run(&mut up, &clock, &mut sensor, 31_000);
        assert_eq!(events.len(), 6);
        assert_eq!(events[5], UploadEvent::Completed);
        assert_eq!(up.buffer().count(), 6);
    }

    #[test]
    fn delivery_resumes_at_the_first_unsent_field() {
        let clock = MockClock::new();
        let mut up: TestUploader<16> =
            Uploader::new(MockModem::new(), MockTransport::new(), clock.clone());
        let mut sensor = counter();

        let mut events = std::vec::Vec::new();
        for _ in 0..310 {
            clock.advance_ms(100);
            let event = up.poll(&mut sensor);
            if event != UploadEvent::Idle {
                events.push(event);
            }
            // The link drops after the third chunk went out.
            if events.len() == 3 {
                up.connection_mut().transport_mut().fail_writes = true;
            }
            if up.connection().transport().connected {
                up.connection_mut().transport_mut().respond_and_close("1");
            }
        }
        assert_eq!(
            events,
            [
                UploadEvent::Sent { field: 1 },
                UploadEvent::Sent { field: 2 },
                UploadEvent::Sent { field: 3 },
                UploadEvent::Failed(Error::Transport),
            ]
        );
        assert_eq!(up.pending(), 3);

        up.connection_mut().transport_mut().fail_writes = false;
        let events = run(&mut up, &clock, &mut sensor, 31_000);
        assert_eq!(
            events,
            [
                UploadEvent::Sent { field: 4 },
                UploadEvent::Sent { field: 5 },
                UploadEvent::Completed,
            ]
        );

        let sent = up.connection().transport().sent_text();
        assert_eq!(sent.matches("&field1=").count(), 1);
        assert!(sent.contains("GET /update?api_key=WKEY&field4=4 HTTP/1.1\r\n"));
        assert!(sent.contains("GET /update?api_key=WKEY&field6=6 HTTP/1.1\r\n"));
    }

    #[test]
    fn samples_cut_from_a_full_chunk_are_counted() {
        let clock = MockClock::new();
        let mut up: TestUploader<160> =
            Uploader::new(MockModem::new(), MockTransport::new(), clock.clone());

        // 20 samples of 11 characters per chunk; only 16 fit in 199 bytes.
        for _ in 0..160 {
            up.buffer.append(-2_000_000_000);
        }
        up.stage();

        assert_eq!(up.pending(), 8);
        assert!(up.buffer().is_empty());
        assert_eq!(up.diagnostics().capacity_overruns, 1);
        assert_eq!(up.diagnostics().samples_dropped, 32);
    }
}
