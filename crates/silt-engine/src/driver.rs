//! The tick loop.
//!
//! [`SimulationLoop`] alternates between advancing the [`Simulation`] by one
//! tick and yielding to a [`Presenter`]. The yield point is the only place
//! where outside requests take effect: [`Command`]s sent through a
//! [`ControlHandle`] queue up on a crossbeam channel and are drained there,
//! each applied in full before the next tick starts. A stop request is
//! observed at the same point, so a run never ends with a tick half
//! applied.
//!
//! ```text
//!   ┌──────────── RUNNING ─────────────┐
//!   │ drain commands → tick → present  │──► STOPPED
//!   └──────────────────────────────────┘   (Stop command, Flow::Stop,
//!                                           max_ticks reached)
//! ```

use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, SendError, Sender, TryRecvError};
use silt_core::{SourceSpec, TickId};
use silt_field::FieldView;
use tracing::{debug, info};

use crate::config::LoopConfig;
use crate::metrics::StepMetrics;
use crate::simulation::{SimError, Simulation};

// ── Commands ────────────────────────────────────────────────────

/// A request from the presentation layer, applied at the next yield point.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Deposit a source.
    Inject(SourceSpec),
    /// Zero the field.
    Reset,
    /// Stop the loop.
    Stop,
}

/// Sending half of a loop's command channel.
///
/// Cheap to clone and usable from any thread.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    tx: Sender<Command>,
}

impl ControlHandle {
    /// Queue `command`. Fails only if the loop has been dropped.
    pub fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.tx.send(command)
    }

    /// Queue a source deposit.
    pub fn inject(&self, source: SourceSpec) -> Result<(), SendError<Command>> {
        self.send(Command::Inject(source))
    }

    /// Queue a reset.
    pub fn reset(&self) -> Result<(), SendError<Command>> {
        self.send(Command::Reset)
    }

    /// Ask the loop to stop at its next yield point.
    pub fn stop(&self) -> Result<(), SendError<Command>> {
        self.send(Command::Stop)
    }
}

// ── Presenter ───────────────────────────────────────────────────

/// What the loop hands the presenter after each tick.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// The grid published by the tick.
    pub view: FieldView<'a>,
    /// Statistics for the tick.
    pub metrics: &'a StepMetrics,
}

/// Whether the loop should keep going after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Run the next tick.
    Continue,
    /// Stop, as if a [`Command::Stop`] had arrived.
    Stop,
}

/// Render/input callback invoked once per tick at the yield point.
pub trait Presenter {
    /// Consume one frame.
    fn present(&mut self, frame: &Frame<'_>) -> Flow;
}

impl<F> Presenter for F
where
    F: FnMut(&Frame<'_>) -> Flow,
{
    fn present(&mut self, frame: &Frame<'_>) -> Flow {
        self(frame)
    }
}

// ── SimulationLoop ──────────────────────────────────────────────

/// Lifecycle of a [`SimulationLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking.
    Running,
    /// Not ticking: never started, or stopped.
    Stopped,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A [`Command::Stop`] was drained.
    Command,
    /// The presenter returned [`Flow::Stop`].
    Presenter,
    /// `max_ticks` ticks were run.
    TickLimit,
}

/// Outcome of [`SimulationLoop::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Ticks executed during this run.
    pub ticks: u64,
    /// Tick of the published grid when the run ended.
    pub final_tick: TickId,
    /// Why the run ended.
    pub reason: StopReason,
    /// Commands applied during this run, `Stop` included.
    pub commands: u64,
}

/// Drives a [`Simulation`] one tick at a time.
pub struct SimulationLoop {
    sim: Simulation,
    config: LoopConfig,
    tx: Sender<Command>,
    rx: Receiver<Command>,
    state: LoopState,
}

impl SimulationLoop {
    /// Wrap `sim` in a loop paced by `config`.
    pub fn new(sim: Simulation, config: LoopConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            sim,
            config,
            tx,
            rx,
            state: LoopState::Stopped,
        }
    }

    /// A handle for sending commands to this loop.
    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            tx: self.tx.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The simulation being driven.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Mutable access to the simulation between runs.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Give back the simulation.
    pub fn into_simulation(self) -> Simulation {
        self.sim
    }

    /// Run until stopped.
    ///
    /// Pending commands are drained before the first tick and after every
    /// presented frame. Ending the run leaves any commands queued behind a
    /// `Stop` for the next run.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if a stepper fails or a drained command is
    /// rejected. The loop is left `Stopped` and the published grid is the
    /// last one successfully produced.
    pub fn run(&mut self, presenter: &mut impl Presenter) -> Result<RunSummary, SimError> {
        self.state = LoopState::Running;
        let result = self.run_inner(presenter);
        self.state = LoopState::Stopped;
        if let Ok(summary) = &result {
            info!(
                ticks = summary.ticks,
                final_tick = %summary.final_tick,
                reason = ?summary.reason,
                "simulation loop stopped"
            );
        }
        result
    }

    fn run_inner(&mut self, presenter: &mut impl Presenter) -> Result<RunSummary, SimError> {
        let mut ticks = 0u64;
        let mut commands = 0u64;

        let reason = loop {
            // ── yield point ──
            if self.drain(&mut commands)? {
                break StopReason::Command;
            }
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                break StopReason::TickLimit;
            }

            let started = Instant::now();
            let step = self.sim.tick()?;
            ticks += 1;
            let frame = Frame {
                view: step.view,
                metrics: &step.metrics,
            };
            if presenter.present(&frame) == Flow::Stop {
                break StopReason::Presenter;
            }

            if let Some(pace) = self.config.pace {
                let elapsed = started.elapsed();
                if elapsed < pace {
                    thread::sleep(pace - elapsed);
                }
            }
        };

        Ok(RunSummary {
            ticks,
            final_tick: self.sim.tick_id(),
            reason,
            commands,
        })
    }

    /// Apply queued commands in order. Returns `true` on `Stop`.
    fn drain(&mut self, applied: &mut u64) -> Result<bool, SimError> {
        loop {
            let command = match self.rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(false),
            };
            *applied += 1;
            debug!(?command, tick = %self.sim.tick_id(), "applying command");
            match command {
                Command::Inject(source) => {
                    self.sim.inject_source(source)?;
                }
                Command::Reset => self.sim.reset()?,
                Command::Stop => return Ok(true),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use silt_core::Scheme;

    fn small_loop(max_ticks: Option<u64>) -> SimulationLoop {
        let cfg = SimConfig {
            width: 12.0,
            height: 12.0,
            ..SimConfig::reference(Scheme::FiniteDifference)
        };
        let sim = Simulation::new(cfg).unwrap();
        SimulationLoop::new(
            sim,
            LoopConfig {
                pace: None,
                max_ticks,
            },
        )
    }

    #[test]
    fn starts_stopped_and_ends_stopped() {
        let mut lp = small_loop(Some(3));
        assert_eq!(lp.state(), LoopState::Stopped);
        let summary = lp.run(&mut |_: &Frame<'_>| Flow::Continue).unwrap();
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.reason, StopReason::TickLimit);
        assert_eq!(summary.final_tick, TickId(3));
        assert_eq!(lp.state(), LoopState::Stopped);
    }

    #[test]
    fn presenter_sees_each_tick() {
        let mut lp = small_loop(Some(1));
        let mut seen = 0;
        lp.run(&mut |frame: &Frame<'_>| {
            seen += 1;
            assert_eq!(frame.metrics.tick, TickId(1));
            Flow::Continue
        })
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn zero_tick_limit_runs_nothing() {
        let mut lp = small_loop(Some(0));
        let summary = lp.run(&mut |_: &Frame<'_>| Flow::Continue).unwrap();
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.final_tick, TickId(0));
    }

    #[test]
    fn send_fails_after_loop_dropped() {
        let lp = small_loop(None);
        let handle = lp.handle();
        drop(lp);
        assert!(handle.stop().is_err());
    }
}
