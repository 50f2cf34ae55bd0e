// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch commands
//!
//! A batch is split into segments on [`COMMAND_SEPARATOR`]. Each segment
//! becomes exactly one [`Command`] whose kind is decided by its first
//! non-whitespace character.

use std::ops::Range;

use log::trace;

use crate::CommandError;

mod delay;
mod directive;
mod request;

pub use self::{
    delay::Delay,
    directive::{Output, Period},
    request::{Call, Request},
};

/// Separates two commands.
pub const COMMAND_SEPARATOR: char = ';';

/// Starts a [`Kind::Delay`] command.
pub const DELAY_MARKER: char = '+';

/// Starts a directive command.
pub const DIRECTIVE_MARKER: char = '@';

/// Starts a [`Kind::Comment`] command.
pub const COMMENT_MARKER: char = '#';

/// What a command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Whitespace only.
    Empty,

    /// Ignored text after [`COMMENT_MARKER`].
    Comment,

    /// `@PERIOD=<ms>`
    Period(Period),

    /// `@OUTPUT=<path>`
    Output(Output),

    /// A directive with an unknown name.
    InvalidDirective(String),

    /// `+<ms>`
    Delay(Delay),

    /// `<slave>x<function>:<groups>`
    Request(Request),
}

/// A single parsed command together with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    start: usize,
    len: usize,
    kind: Kind,
    error: Option<CommandError>,
}

impl Command {
    /// Parse a single command segment.
    ///
    /// `start` is the byte offset of `text` within the whole batch. Parsing
    /// never fails, an unparseable segment yields an invalid command.
    #[must_use]
    pub fn parse(text: &str, start: usize) -> Self {
        let (kind, error) = match text.trim_start().chars().next() {
            None => (Kind::Empty, None),
            Some(DELAY_MARKER) => {
                let (delay, error) = delay::parse(text);
                (Kind::Delay(delay), error)
            }
            Some(DIRECTIVE_MARKER) => directive::parse(text),
            Some(COMMENT_MARKER) => (Kind::Comment, None),
            Some(_) => {
                let (request, error) = request::parse(text);
                (Kind::Request(request), error)
            }
        };
        let command = Self {
            start,
            len: text.len(),
            kind,
            error,
        };
        trace!("Parsed {command:?}");
        command
    }

    /// Byte offset of the first character.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Length in bytes, without the separator.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the last character.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The reason why this command is invalid, if it is.
    #[must_use]
    pub const fn error(&self) -> Option<&CommandError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub const fn as_request(&self) -> Option<&Request> {
        match &self.kind {
            Kind::Request(request) => Some(request),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_delay(&self) -> Option<&Delay> {
        match &self.kind {
            Kind::Delay(delay) => Some(delay),
            _ => None,
        }
    }
}

/// Removes all whitespace, which is insignificant within delays and requests.
fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Skips leading whitespace and the given marker character.
fn skip_marker(text: &str, marker: char) -> &str {
    let text = text.trim_start();
    text.strip_prefix(marker).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty() {
        for text in ["", " ", "\n\t  "] {
            let command = Command::parse(text, 3);
            assert_eq!(command.kind(), &Kind::Empty);
            assert!(command.is_valid());
            assert_eq!(command.start(), 3);
            assert_eq!(command.len(), text.len());
        }
    }

    #[test]
    fn parse_comment() {
        let command = Command::parse("  # anything @PERIOD=x 1x99", 0);
        assert_eq!(command.kind(), &Kind::Comment);
        assert!(command.is_valid());
    }

    #[test]
    fn dispatch_on_first_non_whitespace() {
        assert!(matches!(Command::parse("\n+5", 0).kind(), Kind::Delay(_)));
        assert!(matches!(
            Command::parse(" @OUTPUT=a", 0).kind(),
            Kind::Output(_)
        ));
        assert!(matches!(
            Command::parse("\t1x03:0", 0).kind(),
            Kind::Request(_)
        ));
        assert!(Command::parse("\t1x03:0", 0).as_request().is_some());
        assert!(Command::parse("+5", 0).as_delay().is_some());
    }

    #[test]
    fn span() {
        let command = Command::parse(" 1x01:10 ", 4);
        assert_eq!(command.span(), 4..13);
        assert_eq!(command.end(), 13);
        assert!(!command.is_empty());
    }

    #[test]
    fn invalid_commands_keep_their_reason() {
        let command = Command::parse("hello", 0);
        assert!(!command.is_valid());
        assert_eq!(
            command.error(),
            Some(&CommandError::MissingFunctionSeparator)
        );
    }
}
