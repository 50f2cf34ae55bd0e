// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The parsed batch model

use std::slice;

use log::debug;

use crate::{
    command::{Command, Kind, Output, Period, COMMAND_SEPARATOR},
    CommandError, Error, Result,
};

/// Width of [`COMMAND_SEPARATOR`] in the source text.
const SEPARATOR_LEN: usize = COMMAND_SEPARATOR.len_utf8();

/// An ordered list of commands parsed from a single source text.
///
/// The commands are never modified individually. Any change of the source
/// text replaces all of them, see [`Batch::rebuild()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    source: String,
    commands: Vec<Command>,
}

impl Default for Batch {
    /// Same as parsing the empty text, i.e. a single empty command.
    fn default() -> Self {
        Self::parse("")
    }
}

impl Batch {
    /// Parse a batch.
    ///
    /// Never fails, invalid commands are retained and reported by
    /// [`Batch::is_valid()`] and [`Batch::errors()`].
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut commands = Vec::new();
        let mut start = 0;
        for segment in source.split(COMMAND_SEPARATOR) {
            let command = Command::parse(segment, start);
            start = command.end() + SEPARATOR_LEN;
            commands.push(command);
        }
        debug!("Parsed batch with {} command(s)", commands.len());
        Self { source, commands }
    }

    /// Re-parse the batch if `source` differs from the current one.
    ///
    /// Returns `true` if the commands have been replaced.
    pub fn rebuild(&mut self, source: &str) -> bool {
        if self.source == source {
            return false;
        }
        *self = Self::parse(source);
        true
    }

    /// The text the batch has been parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Checks if all commands are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.commands.iter().all(Command::is_valid)
    }

    /// Fails with the first invalid command.
    pub fn check(&self) -> Result<()> {
        match self.errors().next() {
            Some((index, error)) => Err(Error::InvalidCommand {
                index,
                source: error.clone(),
            }),
            None => Ok(()),
        }
    }

    /// All invalid commands with their index.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &CommandError)> {
        self.commands
            .iter()
            .enumerate()
            .filter_map(|(index, command)| command.error().map(|error| (index, error)))
    }

    /// The command at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// The source text covered by the command at `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        self.get(index)
            .and_then(|command| self.source.get(command.span()))
    }

    /// Index of the command at byte `offset` of the source text.
    ///
    /// Offsets on a separator belong to the preceding command. Returns `None`
    /// only if there is no command starting at or before `offset`.
    #[must_use]
    pub fn command_index(&self, offset: usize) -> Option<usize> {
        self.commands
            .partition_point(|command| command.start() <= offset)
            .checked_sub(1)
    }

    /// The first `@PERIOD` directive.
    #[must_use]
    pub fn period(&self) -> Option<&Period> {
        self.commands.iter().find_map(|command| match command.kind() {
            Kind::Period(period) => Some(period),
            _ => None,
        })
    }

    /// The first `@OUTPUT` directive.
    #[must_use]
    pub fn output(&self) -> Option<&Output> {
        self.commands.iter().find_map(|command| match command.kind() {
            Kind::Output(output) => Some(output),
            _ => None,
        })
    }

    pub fn iter(&self) -> slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub(crate) fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Command;
    type IntoIter = slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
