//! Table-driven AT command sequencing.
//!
//! A sequence is a slice of [`CommandStep`]s. [`CommandSequencer::poll`] is
//! called every dispatch cycle; it issues at most one command, performs at
//! most one non-blocking read, and never waits. Only one command is ever in
//! flight: the next one is issued after the previous one matched (plus a
//! settle delay), timed out, or its failure backoff elapsed, and only once
//! the port has no unread input left over from earlier commands.

mod matcher;

pub use matcher::ResponseMatcher;

use embassy_time::Duration;
use embedded_io::{Error as _, Read, ReadReady, Write};

use crate::clock::Clock;
use crate::timer::Timer;

/// Backoff before a failed sequence starts over, unless a step says otherwise.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(5_000);

const CTRL_Z: u8 = 0x1A;

/// Bytes taken from the port per poll.
const READ_CHUNK: usize = 32;

/// What to do when a step times out or the port fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailurePolicy {
    /// Best-effort step: move on as if it had matched.
    Continue,
    /// Hard dependency: start over from step 0 after `backoff`.
    Restart { backoff: Duration },
    /// Stop the sequence and report [`SequencerStatus::Failed`].
    Abort,
}

/// Where to go after a step matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Next,
    Goto(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminator {
    /// Command line, terminated by `\r\n`.
    CrLf,
    /// Data payload after a `>` prompt, terminated by Ctrl-Z.
    CtrlZ,
}

impl Terminator {
    fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n",
            Self::CtrlZ => &[CTRL_Z],
        }
    }
}

/// One command and the response that completes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStep<'a> {
    pub command: &'a str,
    /// Substring that marks the step as successful. An empty pattern succeeds
    /// without waiting for any response.
    pub expect: &'a str,
    pub timeout: Duration,
    pub on_success: Transition,
    pub on_failure: FailurePolicy,
    pub terminator: Terminator,
}

impl<'a> CommandStep<'a> {
    pub const fn new(command: &'a str, expect: &'a str, timeout: Duration) -> Self {
        Self {
            command,
            expect,
            timeout,
            on_success: Transition::Next,
            on_failure: FailurePolicy::Restart {
                backoff: DEFAULT_BACKOFF,
            },
            terminator: Terminator::CrLf,
        }
    }

    pub const fn on_failure(self, on_failure: FailurePolicy) -> Self {
        Self { on_failure, ..self }
    }

    pub const fn best_effort(self) -> Self {
        self.on_failure(FailurePolicy::Continue)
    }

    pub const fn restart_after(self, backoff: Duration) -> Self {
        self.on_failure(FailurePolicy::Restart { backoff })
    }

    pub const fn goto(self, step: usize) -> Self {
        Self {
            on_success: Transition::Goto(step),
            ..self
        }
    }

    pub const fn terminated_by(self, terminator: Terminator) -> Self {
        Self { terminator, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerStatus {
    Pending,
    /// Every step has been passed. The sequencer holds here until reset.
    Complete,
    /// A step with [`FailurePolicy::Abort`] failed.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the timer, then for the port to run dry, before issuing
    /// the current step.
    Issue,
    /// Command written, collecting the response.
    Await,
    Complete,
    Failed,
}

pub struct CommandSequencer<C: Clock, const W: usize = 64> {
    timer: Timer<C>,
    matcher: ResponseMatcher<W>,
    index: usize,
    phase: Phase,
    settle: Duration,
    restarts: u32,
    timeouts: u32,
}

impl<C: Clock, const W: usize> CommandSequencer<C, W> {
    pub fn new(clock: C) -> Self {
        Self {
            timer: Timer::expired(clock),
            matcher: ResponseMatcher::new(),
            index: 0,
            phase: Phase::Issue,
            settle: Duration::from_ticks(0),
            restarts: 0,
            timeouts: 0,
        }
    }

    /// Delay between a matched response and the next command.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Abandon the current sequence and start again from step 0 immediately.
    ///
    /// The restart and timeout counters are kept.
    pub fn reset(&mut self) {
        self.index = 0;
        self.phase = Phase::Issue;
        self.matcher.clear();
        self.timer.reset_with(Duration::from_ticks(0));
    }

    /// Index of the step currently being issued or awaited.
    pub fn step(&self) -> usize {
        self.index
    }

    /// No command is in flight.
    pub fn is_idle(&self) -> bool {
        self.phase != Phase::Await
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Number of times a hard failure sent the sequence back to step 0.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Number of steps that timed out or hit a port error.
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    pub fn poll<P>(&mut self, steps: &[CommandStep<'_>], port: &mut P) -> SequencerStatus
    where
        P: Read + Write + ReadReady,
    {
        match self.phase {
            Phase::Complete => SequencerStatus::Complete,
            Phase::Failed => SequencerStatus::Failed,
            Phase::Issue => {
                if !self.timer.is_complete() {
                    return SequencerStatus::Pending;
                }
                let Some(step) = steps.get(self.index) else {
                    return self.finish();
                };
                match self.issue(step, port) {
                    Ok(_) => SequencerStatus::Pending,
                    Err(()) => self.step_failed(step, steps.len()),
                }
            }
            Phase::Await => {
                let Some(step) = steps.get(self.index) else {
                    return self.finish();
                };
                match self.receive(step, port) {
                    Ok(true) => self.step_matched(step, steps.len()),
                    Ok(false) if self.timer.is_complete() => {
                        warn!(
                            "[Step {}] No {:?} within {} ms",
                            self.index,
                            step.expect,
                            step.timeout.as_millis()
                        );
                        self.step_failed(step, steps.len())
                    }
                    Ok(false) => SequencerStatus::Pending,
                    Err(()) => self.step_failed(step, steps.len()),
                }
            }
        }
    }

    /// Write the step's command, unless input is still pending. Pending input
    /// answers an earlier command; one chunk of it is discarded instead and
    /// the command goes out on a later poll. Returns whether it was written.
    fn issue<P>(&mut self, step: &CommandStep<'_>, port: &mut P) -> Result<bool, ()>
    where
        P: Read + Write + ReadReady,
    {
        if port.read_ready().map_err(|e| io_error("read_ready", e))? {
            let mut stale = [0u8; READ_CHUNK];
            let n = port.read(&mut stale).map_err(|e| io_error("read", e))?;
            trace!("[Step {}] Discarded {} stale bytes", self.index, n);
            return Ok(false);
        }

        self.matcher.clear();
        debug!("[Step {}] -> {:?}", self.index, step.command);

        port.write_all(step.command.as_bytes())
            .map_err(|e| io_error("write", e))?;
        port.write_all(step.terminator.as_bytes())
            .map_err(|e| io_error("write", e))?;
        port.flush().map_err(|e| io_error("flush", e))?;

        self.timer.reset_with(step.timeout);
        self.phase = Phase::Await;
        Ok(true)
    }

    /// One non-blocking read, fed byte by byte into the matcher.
    fn receive<P>(&mut self, step: &CommandStep<'_>, port: &mut P) -> Result<bool, ()>
    where
        P: Read + Write + ReadReady,
    {
        if step.expect.is_empty() {
            return Ok(true);
        }
        if !port.read_ready().map_err(|e| io_error("read_ready", e))? {
            return Ok(false);
        }

        let mut chunk = [0u8; READ_CHUNK];
        let n = port.read(&mut chunk).map_err(|e| io_error("read", e))?;
        let pattern = step.expect.as_bytes();
        Ok(chunk[..n].iter().any(|b| self.matcher.push(*b, pattern)))
    }

    fn step_matched(&mut self, step: &CommandStep<'_>, len: usize) -> SequencerStatus {
        trace!("[Step {}] <- {:?}", self.index, step.expect);
        let next = match step.on_success {
            Transition::Next => self.index + 1,
            Transition::Goto(i) => i,
        };
        self.advance(next, len)
    }

    fn step_failed(&mut self, step: &CommandStep<'_>, len: usize) -> SequencerStatus {
        self.timeouts += 1;
        match step.on_failure {
            FailurePolicy::Continue => {
                debug!("[Step {}] Best-effort step failed, continuing", self.index);
                self.advance(self.index + 1, len)
            }
            FailurePolicy::Restart { backoff } => {
                self.restarts += 1;
                warn!(
                    "[Step {}] Failed, restarting sequence in {} ms",
                    self.index,
                    backoff.as_millis()
                );
                self.index = 0;
                self.phase = Phase::Issue;
                self.timer.reset_with(backoff);
                SequencerStatus::Pending
            }
            FailurePolicy::Abort => {
                error!("[Step {}] Failed, aborting sequence", self.index);
                self.phase = Phase::Failed;
                SequencerStatus::Failed
            }
        }
    }

    fn advance(&mut self, next: usize, len: usize) -> SequencerStatus {
        self.index = next;
        if self.index >= len {
            return self.finish();
        }
        self.phase = Phase::Issue;
        self.timer.reset_with(self.settle);
        SequencerStatus::Pending
    }

    fn finish(&mut self) -> SequencerStatus {
        if self.phase != Phase::Complete {
            info!("Sequence complete");
        }
        self.phase = Phase::Complete;
        SequencerStatus::Complete
    }
}

fn io_error<E: embedded_io::Error>(op: &str, e: E) {
    warn!("Port {} failed: {:?}", op, e.kind());
}
