// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential batch execution
//!
//! An [`Executor`] runs the commands of a valid [`Batch`] one after another
//! on a separate tokio task, so the caller is never blocked. Delays suspend
//! the task, requests are expanded into individual [`Call`]s that are
//! performed by a [`Transport`]. Progress is reported as [`Event`]s.
//!
//! [`Call`]: crate::command::Call

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::{runtime::Handle, sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{Batch, Error, Result};

mod event;
mod run;
mod transport;

pub use self::{
    event::{channel, Event, EventReceiver, EventSender, TransportEvent},
    transport::Transport,
};

use self::run::Run;

/// Default pause after each request command.
const DEFAULT_COMMAND_PAUSE: Duration = Duration::from_millis(10);

/// Execution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    command_pause: Duration,
    repeat: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_pause: DEFAULT_COMMAND_PAUSE,
            repeat: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause after each request command (optional).
    ///
    /// Keeps event consumers that drive a user interface from being flooded.
    /// The last delay or request of a pass is not followed by a pause.
    #[must_use]
    pub fn command_pause(mut self, command_pause: Duration) -> Self {
        self.command_pause = command_pause;
        self
    }

    /// Repeat the batch according to its `@PERIOD` directive (optional).
    ///
    /// Without a period, or with a period of `0`, the batch runs once.
    #[must_use]
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// Execution state of an [`Executor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    /// A stop has been requested, but the run has not ended yet.
    Stopping,
}

#[derive(Debug)]
struct ActiveRun {
    stop: CancellationToken,
    kill: CancellationToken,
    handle: JoinHandle<bool>,
}

/// Runs batches against a transport, one run at a time.
#[derive(Debug)]
pub struct Executor<T> {
    config: Config,
    transport: Arc<Mutex<T>>,
    run: Option<ActiveRun>,
}

impl<T: Transport> Executor<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, Config::default())
    }

    #[must_use]
    pub fn with_config(transport: T, config: Config) -> Self {
        Self {
            config,
            transport: Arc::new(Mutex::new(transport)),
            run: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared access to the transport.
    ///
    /// The transport is locked for the whole duration of a run.
    #[must_use]
    pub fn transport(&self) -> &Arc<Mutex<T>> {
        &self.transport
    }

    #[must_use]
    pub fn state(&self) -> State {
        match &self.run {
            Some(run) if !run.handle.is_finished() => {
                if run.stop.is_cancelled() {
                    State::Stopping
                } else {
                    State::Running
                }
            }
            _ => State::Idle,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() != State::Idle
    }

    /// Start executing `batch` on a new task of the current tokio runtime.
    ///
    /// The commands are copied, rebuilding the batch afterwards doesn't
    /// affect the run. All progress is delivered to `events`.
    ///
    /// # Errors
    ///
    /// Fails if a run is still active, if the batch contains an invalid
    /// command, or if called outside of a tokio runtime.
    pub fn start(&mut self, batch: &Batch, events: EventSender<T>) -> Result<()> {
        if self.is_running() {
            warn!("Rejected start, batch execution is already running");
            return Err(Error::AlreadyRunning);
        }
        if let Err(err) = batch.check() {
            warn!("Rejected start: {err}");
            return Err(err);
        }
        let runtime = Handle::try_current()?;

        let period = batch
            .period()
            .map(|period| period.period())
            .filter(|&millis| self.config.repeat && millis > 0)
            .map(Duration::from_millis);
        let stop = CancellationToken::new();
        let kill = CancellationToken::new();
        let run = Run {
            commands: batch.commands().to_vec(),
            transport: Arc::clone(&self.transport),
            events,
            stop: stop.clone(),
            kill: kill.clone(),
            command_pause: self.config.command_pause,
            period,
        };
        debug!(
            "Starting batch execution of {} command(s), period = {period:?}",
            batch.len()
        );
        let handle = runtime.spawn(run.execute());
        self.run = Some(ActiveRun { stop, kill, handle });
        Ok(())
    }

    /// Request the active run to stop.
    ///
    /// A cooperative stop takes effect between commands and after a delay
    /// has elapsed. With `force` the current call is abandoned immediately,
    /// which may leave the transport in an undefined state, i.e. with a
    /// half-completed transaction.
    ///
    /// # Errors
    ///
    /// Fails if no run is active.
    pub fn request_stop(&mut self, force: bool) -> Result<()> {
        let run = match &self.run {
            Some(run) if !run.handle.is_finished() => run,
            _ => return Err(Error::NotRunning),
        };
        debug!("Requesting batch execution to stop (force = {force})");
        run.stop.cancel();
        if force {
            warn!("Terminating batch execution, the current call is abandoned");
            run.kill.cancel();
        }
        Ok(())
    }

    /// Wait for the current run to end.
    ///
    /// Returns `true` if the run completed.
    ///
    /// # Errors
    ///
    /// Fails if no run has been started since the last join or if the
    /// run task panicked.
    pub async fn join(&mut self) -> Result<bool> {
        let run = self.run.take().ok_or(Error::NotRunning)?;
        Ok(run.handle.await?)
    }
}

impl<T> Drop for Executor<T> {
    fn drop(&mut self) {
        if let Some(run) = &self.run {
            // Detached runs end at the next command boundary
            run.stop.cancel();
        }
    }
}
