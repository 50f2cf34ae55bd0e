// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [Modbus](https://en.wikipedia.org/wiki/Modbus) batch command language
//! based on [tokio](https://tokio.rs).
//!
//! A batch describes a sequence of Modbus operations as a single string:
//!
//! ```text
//! @PERIOD=1000; # poll every second
//! 1x03:0-3;     # read holding registers 0..=3 of slave 1
//! +100;         # wait 100 ms
//! 2x10:100-102=7,200=1
//! ```
//!
//! Commands are separated by `;`. A command is either empty, a comment
//! (`#`), a directive (`@NAME=data`), a delay in milliseconds (`+ms`) or a
//! request `<slave>x<hex function>:<groups>`. Every group is an address or
//! an ascending address range, followed by `=<value>` for write functions.
//!
//! Parsing never fails as a whole. Invalid commands are retained and
//! report the reason, so the caller is able to point at the broken part:
//!
//! ```
//! use modbus_batch::prelude::*;
//!
//! let batch = Batch::parse("1x01:10;2x10:100-102=7;1x03:5-5");
//! assert!(!batch.is_valid());
//!
//! let (index, error) = batch.errors().next().unwrap();
//! assert_eq!(index, 2);
//! assert_eq!(error, &CommandError::DegenerateRange { first: 5, last: 5 });
//! ```
//!
//! Valid batches are run by an [`Executor`](exec::Executor) against a
//! [`Transport`](exec::Transport) on a separate task.

mod batch;
pub use self::batch::Batch;

pub mod command;

mod error;
pub use self::error::{CommandError, Error, Result};

pub mod exec;

mod function;
pub use self::function::{
    classify, Address, FuncType, FunctionCode, Operation, Scope, Subject, Word,
};

pub mod prelude;

mod slave;
pub use self::slave::{Slave, SlaveId};
