// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use super::{skip_marker, strip_whitespace, DELAY_MARKER};
use crate::CommandError;

/// Suspends the execution for a number of milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delay {
    millis: u64,
}

impl Delay {
    /// Duration in milliseconds, `0` if the delay is invalid.
    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.millis
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

pub(super) fn parse(text: &str) -> (Delay, Option<CommandError>) {
    let millis = strip_whitespace(skip_marker(text, DELAY_MARKER));
    match millis.parse::<i64>() {
        Ok(millis) if millis >= 1 => (
            Delay {
                millis: millis.unsigned_abs(),
            },
            None,
        ),
        Ok(millis) => (Delay::default(), Some(CommandError::DelayOutOfRange(millis))),
        Err(_) => (Delay::default(), Some(CommandError::InvalidDelay(millis))),
    }
}
