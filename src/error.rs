// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use thiserror::Error;

/// The reason why a single batch command is invalid.
///
/// Every variant corresponds to one validation step. Parsing a batch never
/// fails as a whole, instead the offending command carries one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The request lacks exactly one `:` between destination and data.
    #[error("expected exactly one ':' between destination and data")]
    MissingFunctionSeparator,

    /// The destination is not of the form `<slave>x<function>`.
    #[error("expected destination of the form '<slave>x<function>', found '{0}'")]
    MalformedDestination(String),

    /// The slave id is not a decimal number.
    #[error("invalid slave id '{0}'")]
    InvalidSlave(String),

    /// The slave id is outside of `[0, 254]`.
    #[error("slave id {0} is out of range [0, 254]")]
    SlaveOutOfRange(i64),

    /// The function id is not a hexadecimal number.
    #[error("invalid function code '{0}'")]
    InvalidFunction(String),

    /// The function id neither reads nor writes coils or registers.
    #[error("unsupported function code 0x{0:02X}")]
    UnsupportedFunction(u32),

    /// The request contains no address group.
    #[error("missing address data")]
    MissingData,

    /// A read request group carries a value.
    #[error("unexpected value in group '{0}' of a read request")]
    UnexpectedValue(String),

    /// A write request group lacks exactly one value.
    #[error("expected '<address>=<value>' in group '{0}' of a write request")]
    MissingValue(String),

    /// The value is not a decimal number.
    #[error("invalid value '{0}'")]
    InvalidValue(String),

    /// The value is outside of `[0, 65535]`.
    #[error("value {0} is out of range [0, 65535]")]
    ValueOutOfRange(i64),

    /// The address is not a decimal number.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The address is outside of `[0, 65535]`.
    #[error("address {0} is out of range [0, 65535]")]
    AddressOutOfRange(i64),

    /// The address part contains more than one `-`.
    #[error("malformed address range '{0}'")]
    MalformedRange(String),

    /// The first address of a range is not below the last one.
    #[error("address range {first}-{last} must be ascending")]
    DegenerateRange { first: u16, last: u16 },

    /// The delay duration is not a decimal number.
    #[error("invalid delay '{0}'")]
    InvalidDelay(String),

    /// The delay duration is below 1 ms.
    #[error("delay {0} ms must be at least 1 ms")]
    DelayOutOfRange(i64),

    /// The `PERIOD` directive data is not a non-negative number.
    #[error("invalid period '{0}'")]
    InvalidPeriod(String),

    /// The directive name is not recognized.
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The batch contains an invalid command and cannot be executed.
    #[error("command #{index} is invalid: {source}")]
    InvalidCommand {
        index: usize,
        #[source]
        source: CommandError,
    },

    /// A run is already active on this executor.
    #[error("batch execution is already running")]
    AlreadyRunning,

    /// No run has been started on this executor.
    #[error("batch execution is not running")]
    NotRunning,

    /// Execution requires a tokio runtime.
    #[error("no tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// The background task panicked.
    #[error("batch execution task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Specialized [`std::result::Result`] type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
