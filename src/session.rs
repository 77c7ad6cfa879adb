//! Telemetry over a modem that only speaks raw AT text.
//!
//! [`AtSession`] runs the bring-up script once, then one transmit script per
//! submitted request. Both go through a [`CommandSequencer`], so a poll never
//! waits on the modem.

use core::marker::PhantomData;

use embedded_io::{Read, ReadReady, Write};

use crate::clock::Clock;
use crate::config::TelemetryConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::http::Method;
use crate::module_timing;
use crate::script::{ConnectScript, TransmitScript};
use crate::sequencer::{CommandSequencer, SequencerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// The bring-up script is still running.
    Connecting,
    /// The bring-up script finished during this poll.
    Established,
    Idle,
    Sending,
    Sent,
    SendFailed,
}

pub struct AtSession<Cfg, C>
where
    Cfg: TelemetryConfig,
    C: Clock + Clone,
{
    bring_up: CommandSequencer<C>,
    sender: CommandSequencer<C>,
    connect: ConnectScript,
    transmit: Option<TransmitScript>,
    established: bool,
    /// Consecutive failed transmissions.
    failures: u8,
    diagnostics: Diagnostics,
    _config: PhantomData<Cfg>,
}

impl<Cfg, C> AtSession<Cfg, C>
where
    Cfg: TelemetryConfig,
    C: Clock + Clone,
{
    pub fn new(clock: C) -> Result<Self, Error> {
        let settle = module_timing::inter_command_delay();
        Ok(Self {
            bring_up: CommandSequencer::new(clock.clone()).with_settle(settle),
            sender: CommandSequencer::new(clock).with_settle(settle),
            connect: ConnectScript::new::<Cfg>()?,
            transmit: None,
            established: false,
            failures: 0,
            diagnostics: Diagnostics::default(),
            _config: PhantomData,
        })
    }

    /// Advance whichever script is running by one step at most.
    pub fn poll<P>(&mut self, port: &mut P) -> SessionEvent
    where
        P: Read + Write + ReadReady,
    {
        if !self.established {
            return match self.bring_up.poll(&self.connect.steps(), port) {
                SequencerStatus::Complete => {
                    info!("Data session established");
                    self.established = true;
                    SessionEvent::Established
                }
                SequencerStatus::Pending => SessionEvent::Connecting,
                SequencerStatus::Failed => {
                    self.bring_up.reset();
                    SessionEvent::Connecting
                }
            };
        }

        let Some(script) = self.transmit.as_ref() else {
            return SessionEvent::Idle;
        };

        match self.sender.poll(&script.steps(), port) {
            SequencerStatus::Pending => SessionEvent::Sending,
            SequencerStatus::Complete => {
                self.transmit = None;
                self.failures = 0;
                self.diagnostics.requests_sent += 1;
                SessionEvent::Sent
            }
            SequencerStatus::Failed => {
                self.transmit = None;
                self.failures += 1;
                self.diagnostics.requests_failed += 1;
                if self.failures >= Cfg::MAX_RETRY_ATTEMPTS {
                    warn!(
                        "{} transmissions failed in a row, bringing the session up again",
                        self.failures
                    );
                    self.restart_bring_up();
                }
                SessionEvent::SendFailed
            }
        }
    }

    /// Queue a GET request for `path`. It goes out over the next polls.
    pub fn submit(&mut self, path: &str) -> Result<(), Error> {
        if !self.established {
            return Err(Error::NotReady);
        }
        if self.transmit.is_some() {
            return Err(Error::Busy);
        }

        let script = TransmitScript::new::<Cfg>(Method::Get, path).map_err(|e| {
            self.diagnostics.capacity_overruns += 1;
            e
        })?;
        debug!("Submitting {}", path);
        self.sender.reset();
        self.transmit = Some(script);
        Ok(())
    }

    /// Drop any request in flight and start the bring-up from scratch.
    pub fn reset(&mut self) {
        self.sender.reset();
        self.transmit = None;
        self.restart_bring_up();
    }

    fn restart_bring_up(&mut self) {
        self.bring_up.reset();
        self.established = false;
        self.failures = 0;
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    /// No command is waiting for the modem and no request is queued.
    pub fn is_idle(&self) -> bool {
        self.bring_up.is_idle() && self.sender.is_idle() && self.transmit.is_none()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            sequence_restarts: self.bring_up.restarts() + self.sender.restarts(),
            step_timeouts: self.bring_up.timeouts() + self.sender.timeouts(),
            ..self.diagnostics
        }
    }
}
