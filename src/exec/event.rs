// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use log::trace;
use tokio::sync::mpsc;

use super::Transport;
use crate::command::Call;

/// Progress notification of a batch run.
///
/// Per run the events arrive in this order: [`Event::Started`], then for
/// every executed command an [`Event::Command`] followed by one
/// [`Event::Request`] per call, and finally [`Event::Stopped`].
#[derive(Debug)]
pub enum Event<R, E> {
    /// The run has started.
    Started,

    /// The command at `index` is being executed.
    Command { index: usize },

    /// A single call of the request at `index` has been performed.
    Request {
        index: usize,
        call: Call,
        outcome: Result<R, E>,
    },

    /// The run has ended.
    ///
    /// `completed` is `false` if the run has been stopped before executing
    /// all commands.
    Stopped { completed: bool },
}

impl<R, E> Event<R, E> {
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }
}

/// The event type emitted when running a batch with transport `T`.
pub type TransportEvent<T> = Event<<T as Transport>::Response, <T as Transport>::Error>;

/// Sending half of the event stream.
pub type EventSender<T> = mpsc::UnboundedSender<TransportEvent<T>>;

/// Receiving half of the event stream.
pub type EventReceiver<T> = mpsc::UnboundedReceiver<TransportEvent<T>>;

/// Creates a new event stream for transport `T`.
#[must_use]
pub fn channel<T: Transport>() -> (EventSender<T>, EventReceiver<T>) {
    mpsc::unbounded_channel()
}

/// Delivers `event`, a vanished receiver doesn't affect the run.
pub(super) fn notify<T: Transport>(events: &EventSender<T>, event: TransportEvent<T>) {
    if events.send(event).is_err() {
        trace!("Event receiver has been dropped");
    }
}
