// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Function codes and their classification.
//!
//! The classification only decides the data arity of a batch request, i.e.
//! whether a group carries a value. It has no influence on how a transport
//! performs the call.

use std::fmt::{self, Display};

/// A Modbus protocol address is represented by 16 bit from `0` to `65535`.
pub type Address = u16;

/// Modbus uses 16 bit for its data items.
pub type Word = u16;

/// A Modbus function code.
///
/// Only the data access functions are named, everything else is `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCode {
    /// 01 (0x01) Read Coils.
    ReadCoils,

    /// 02 (0x02) Read Discrete Inputs
    ReadDiscreteInputs,

    /// 03 (0x03) Read Holding Registers
    ReadHoldingRegisters,

    /// 04 (0x04) Read Input Registers
    ReadInputRegisters,

    /// 05 (0x05) Write Single Coil
    WriteSingleCoil,

    /// 06 (0x06) Write Single Register
    WriteSingleRegister,

    /// 15 (0x0F) Write Multiple Coils
    WriteMultipleCoils,

    /// 16 (0x10) Write Multiple Registers
    WriteMultipleRegisters,

    /// Any other function code.
    Custom(u8),
}

impl FunctionCode {
    /// Create a new [`FunctionCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x01 => Self::ReadCoils,
            0x02 => Self::ReadDiscreteInputs,
            0x03 => Self::ReadHoldingRegisters,
            0x04 => Self::ReadInputRegisters,
            0x05 => Self::WriteSingleCoil,
            0x06 => Self::WriteSingleRegister,
            0x0F => Self::WriteMultipleCoils,
            0x10 => Self::WriteMultipleRegisters,
            code => Self::Custom(code),
        }
    }

    /// Gets the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadCoils => 0x01,
            Self::ReadDiscreteInputs => 0x02,
            Self::ReadHoldingRegisters => 0x03,
            Self::ReadInputRegisters => 0x04,
            Self::WriteSingleCoil => 0x05,
            Self::WriteSingleRegister => 0x06,
            Self::WriteMultipleCoils => 0x0F,
            Self::WriteMultipleRegisters => 0x10,
            Self::Custom(code) => code,
        }
    }

    /// Classify the function code.
    #[must_use]
    pub const fn func_type(self) -> FuncType {
        use FunctionCode::*;

        let operation = match self {
            ReadCoils | ReadDiscreteInputs | ReadHoldingRegisters | ReadInputRegisters => {
                Operation::Read
            }
            WriteSingleCoil | WriteSingleRegister | WriteMultipleCoils | WriteMultipleRegisters => {
                Operation::Write
            }
            Custom(_) => return FuncType::INVALID,
        };
        let subject = match self {
            ReadCoils | WriteSingleCoil | WriteMultipleCoils => Subject::Coil,
            ReadDiscreteInputs => Subject::DiscreteInput,
            ReadInputRegisters => Subject::InputRegister,
            _ => Subject::HoldingRegister,
        };
        let scope = match self {
            WriteSingleCoil | WriteSingleRegister => Scope::Single,
            _ => Scope::Multiple,
        };
        FuncType {
            operation,
            subject,
            scope,
        }
    }
}

impl Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0>2X}", self.value())
    }
}

/// Direction of the data transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Invalid,
    Read,
    Write,
}

/// The kind of data item a function accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Invalid,
    Coil,
    DiscreteInput,
    HoldingRegister,
    InputRegister,
}

/// Whether a function accesses one or many data items per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Invalid,
    Single,
    Multiple,
}

/// Classification of a function code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncType {
    pub operation: Operation,
    pub subject: Subject,
    pub scope: Scope,
}

impl FuncType {
    /// The classification of every unsupported function code.
    pub const INVALID: Self = Self {
        operation: Operation::Invalid,
        subject: Subject::Invalid,
        scope: Scope::Invalid,
    };

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self.operation, Operation::Invalid)
    }
}

/// Classify a raw function id.
///
/// Ids that do not fit into a single byte are never valid.
#[must_use]
pub fn classify(func_id: u32) -> FuncType {
    u8::try_from(func_id).map_or(FuncType::INVALID, |code| {
        FunctionCode::new(code).func_type()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_function_code() {
        assert_eq!(FunctionCode::ReadCoils, FunctionCode::new(0x01));
        assert_eq!(FunctionCode::ReadDiscreteInputs, FunctionCode::new(0x02));
        assert_eq!(FunctionCode::ReadHoldingRegisters, FunctionCode::new(0x03));
        assert_eq!(FunctionCode::ReadInputRegisters, FunctionCode::new(0x04));

        assert_eq!(FunctionCode::WriteSingleCoil, FunctionCode::new(0x05));
        assert_eq!(FunctionCode::WriteSingleRegister, FunctionCode::new(0x06));
        assert_eq!(FunctionCode::WriteMultipleCoils, FunctionCode::new(0x0F));
        assert_eq!(
            FunctionCode::WriteMultipleRegisters,
            FunctionCode::new(0x10)
        );

        assert_eq!(FunctionCode::Custom(0x16), FunctionCode::new(0x16));
        assert_eq!(FunctionCode::Custom(0x16).value(), 0x16);
    }

    #[test]
    fn classify_reads() {
        let fc = classify(0x01);
        assert_eq!(fc.operation, Operation::Read);
        assert_eq!(fc.subject, Subject::Coil);
        assert_eq!(fc.scope, Scope::Multiple);

        assert_eq!(classify(0x02).subject, Subject::DiscreteInput);
        assert_eq!(classify(0x03).subject, Subject::HoldingRegister);
        assert_eq!(classify(0x04).subject, Subject::InputRegister);
        assert_eq!(classify(0x04).operation, Operation::Read);
    }

    #[test]
    fn classify_writes() {
        let fc = classify(0x05);
        assert_eq!(fc.operation, Operation::Write);
        assert_eq!(fc.subject, Subject::Coil);
        assert_eq!(fc.scope, Scope::Single);

        let fc = classify(0x06);
        assert_eq!(fc.subject, Subject::HoldingRegister);
        assert_eq!(fc.scope, Scope::Single);

        let fc = classify(0x0F);
        assert_eq!(fc.subject, Subject::Coil);
        assert_eq!(fc.scope, Scope::Multiple);

        let fc = classify(0x10);
        assert_eq!(fc.operation, Operation::Write);
        assert_eq!(fc.subject, Subject::HoldingRegister);
        assert_eq!(fc.scope, Scope::Multiple);
    }

    #[test]
    fn classify_unsupported() {
        for id in [0x00, 0x07, 0x16, 0x17, 0x2B, 0xFF, 0x101, u32::MAX] {
            assert_eq!(classify(id), FuncType::INVALID, "0x{id:X}");
        }
        assert!(!FuncType::INVALID.is_valid());
    }

    #[test]
    fn display_function_code() {
        assert_eq!(FunctionCode::WriteMultipleRegisters.to_string(), "0x10");
        assert_eq!(FunctionCode::Custom(0xAB).to_string(), "0xAB");
    }
}
