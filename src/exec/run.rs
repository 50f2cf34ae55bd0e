// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The body of a batch run, executed on its own task.

use std::{sync::Arc, time::Duration};

use log::{debug, trace};
use tokio::{
    sync::Mutex,
    time::{sleep, sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;

use super::{
    event::{notify, EventSender},
    Event, Transport,
};
use crate::command::{Command, Kind};

/// Everything a run needs, moved into the spawned task.
pub(super) struct Run<T: Transport> {
    pub(super) commands: Vec<Command>,
    pub(super) transport: Arc<Mutex<T>>,
    pub(super) events: EventSender<T>,
    pub(super) stop: CancellationToken,
    pub(super) kill: CancellationToken,
    pub(super) command_pause: Duration,
    pub(super) period: Option<Duration>,
}

impl<T: Transport> Run<T> {
    /// Runs until all commands are executed or a stop is requested.
    ///
    /// Returns `true` if the run completed.
    pub(super) async fn execute(self) -> bool {
        notify::<T>(&self.events, Event::Started);
        let completed = tokio::select! {
            biased;
            () = self.kill.cancelled() => {
                debug!("Batch execution has been terminated");
                false
            }
            completed = self.execute_passes() => completed,
        };
        debug!("Batch execution stopped (completed = {completed})");
        notify::<T>(&self.events, Event::Stopped { completed });
        completed
    }

    async fn execute_passes(&self) -> bool {
        let mut transport = self.transport.lock().await;
        loop {
            let pass_started = Instant::now();
            if !self.execute_pass(&mut *transport).await {
                return false;
            }
            let Some(period) = self.period else {
                return true;
            };
            trace!("Waiting for the next period");
            tokio::select! {
                () = self.stop.cancelled() => return false,
                () = sleep_until(pass_started + period) => {}
            }
        }
    }

    async fn execute_pass(&self, transport: &mut T) -> bool {
        // No pause after the last delay or request of a pass
        let last_executed = self
            .commands
            .iter()
            .rposition(|command| matches!(command.kind(), Kind::Delay(_) | Kind::Request(_)));
        for (index, command) in self.commands.iter().enumerate() {
            if self.stop.is_cancelled() {
                return false;
            }
            match command.kind() {
                Kind::Delay(delay) => {
                    notify::<T>(&self.events, Event::Command { index });
                    trace!("Delaying for {} ms", delay.millis());
                    // Not interrupted by a stop request
                    sleep(delay.duration()).await;
                    if self.stop.is_cancelled() {
                        return false;
                    }
                }
                Kind::Request(request) => {
                    notify::<T>(&self.events, Event::Command { index });
                    for call in request.calls() {
                        trace!(
                            "Calling function {} at address {} of slave {} with value {}",
                            call.function,
                            call.address,
                            call.slave,
                            call.value
                        );
                        let outcome = transport.execute(call).await;
                        notify::<T>(
                            &self.events,
                            Event::Request {
                                index,
                                call,
                                outcome,
                            },
                        );
                    }
                    if Some(index) != last_executed && !self.command_pause.is_zero() {
                        sleep(self.command_pause).await;
                    }
                }
                Kind::Empty
                | Kind::Comment
                | Kind::Period(_)
                | Kind::Output(_)
                | Kind::InvalidDirective(_) => {}
            }
        }
        true
    }
}
