// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Requests, i.e. `2x10:100-102=7,200=1`.
//!
//! The destination consists of the decimal slave id and the hexadecimal
//! function code. The data is a list of groups, each either a single
//! address or an ascending address range. Write requests assign a value
//! to every group, read requests must not.

use super::strip_whitespace;
use crate::{
    classify, Address, CommandError, FuncType, FunctionCode, Operation, Slave, Word,
};

pub const SLAVE_FUNC_SEPARATOR: char = 'x';

pub const FUNC_DATA_SEPARATOR: char = ':';

pub const GROUP_SEPARATOR: char = ',';

pub const ADDR_VALUE_SEPARATOR: char = '=';

pub const ADDR_RANGE_SEPARATOR: char = '-';

/// A single Modbus operation of an expanded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Call {
    pub slave: Slave,
    pub function: FunctionCode,
    pub address: Address,
    /// The value to write, `0` for reads.
    pub value: Word,
}

/// One or more Modbus operations against a single slave device.
///
/// Address ranges are expanded while parsing, so the request is a flat
/// list of address/value pairs in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    slave: Option<Slave>,
    function: Option<FunctionCode>,
    addrs: Vec<Address>,
    vals: Vec<Word>,
}

impl Request {
    /// The slave id, if parsing got that far.
    #[must_use]
    pub const fn slave(&self) -> Option<Slave> {
        self.slave
    }

    /// The function code, if parsing got that far.
    #[must_use]
    pub const fn function(&self) -> Option<FunctionCode> {
        self.function
    }

    #[must_use]
    pub fn func_type(&self) -> FuncType {
        self.function
            .map_or(FuncType::INVALID, FunctionCode::func_type)
    }

    #[must_use]
    pub fn addrs(&self) -> &[Address] {
        &self.addrs
    }

    /// One value per address.
    #[must_use]
    pub fn vals(&self) -> &[Word] {
        &self.vals
    }

    /// The individual operations in execution order.
    pub fn calls(&self) -> impl Iterator<Item = Call> + '_ {
        self.slave
            .zip(self.function)
            .into_iter()
            .flat_map(move |(slave, function)| {
                self.addrs
                    .iter()
                    .zip(&self.vals)
                    .map(move |(&address, &value)| Call {
                        slave,
                        function,
                        address,
                        value,
                    })
            })
    }

    /// Validates `text` step by step, assigning fields as it goes.
    ///
    /// Returns on the first failure, leaving the fields assigned so far.
    fn fill(&mut self, text: &str) -> Result<(), CommandError> {
        let (destination, data) = split_exactly_once(text, FUNC_DATA_SEPARATOR)
            .ok_or(CommandError::MissingFunctionSeparator)?;

        let (slave, function) = split_exactly_once(destination, SLAVE_FUNC_SEPARATOR)
            .ok_or_else(|| CommandError::MalformedDestination(destination.to_owned()))?;
        self.slave = Some(parse_slave(slave)?);
        let func_id = u32::from_str_radix(function, 16)
            .map_err(|_| CommandError::InvalidFunction(function.to_owned()))?;
        self.function = u8::try_from(func_id).ok().map(FunctionCode::new);
        let func_type = classify(func_id);
        if !func_type.is_valid() {
            return Err(CommandError::UnsupportedFunction(func_id));
        }

        if data.is_empty() {
            return Err(CommandError::MissingData);
        }
        for group in data.split(GROUP_SEPARATOR) {
            self.push_group(group, func_type.operation)?;
        }
        debug_assert_eq!(self.addrs.len(), self.vals.len());
        Ok(())
    }

    fn push_group(&mut self, group: &str, operation: Operation) -> Result<(), CommandError> {
        let mut parts = group.split(ADDR_VALUE_SEPARATOR);
        let addr = parts.next().unwrap_or_default();
        let value = match (operation, parts.next(), parts.next()) {
            (Operation::Read, None, _) => 0,
            (Operation::Read, Some(_), _) => {
                return Err(CommandError::UnexpectedValue(group.to_owned()))
            }
            (Operation::Write, Some(value), None) => parse_value(value)?,
            _ => return Err(CommandError::MissingValue(group.to_owned())),
        };

        let bounds: Vec<_> = addr.split(ADDR_RANGE_SEPARATOR).collect();
        let (first, last) = match bounds.as_slice() {
            [single] => {
                let addr = parse_address(single)?;
                (addr, addr)
            }
            [first, last] => {
                let first = parse_address(first)?;
                let last = parse_address(last)?;
                if first >= last {
                    return Err(CommandError::DegenerateRange { first, last });
                }
                (first, last)
            }
            _ => return Err(CommandError::MalformedRange(addr.to_owned())),
        };
        for addr in first..=last {
            self.addrs.push(addr);
            self.vals.push(value);
        }
        Ok(())
    }
}

pub(super) fn parse(text: &str) -> (Request, Option<CommandError>) {
    let mut request = Request::default();
    let error = request.fill(&strip_whitespace(text)).err();
    (request, error)
}

/// Splits `text` into two parts if it contains `separator` exactly once.
fn split_exactly_once(text: &str, separator: char) -> Option<(&str, &str)> {
    text.split_once(separator)
        .filter(|(_, tail)| !tail.contains(separator))
}

fn parse_decimal(text: &str) -> Option<i64> {
    text.parse().ok()
}

fn parse_slave(text: &str) -> Result<Slave, CommandError> {
    let id = parse_decimal(text).ok_or_else(|| CommandError::InvalidSlave(text.to_owned()))?;
    u8::try_from(id)
        .ok()
        .filter(|&id| id < Slave::tcp_device().0)
        .map(Slave)
        .ok_or(CommandError::SlaveOutOfRange(id))
}

fn parse_address(text: &str) -> Result<Address, CommandError> {
    let addr = parse_decimal(text).ok_or_else(|| CommandError::InvalidAddress(text.to_owned()))?;
    Address::try_from(addr).map_err(|_| CommandError::AddressOutOfRange(addr))
}

fn parse_value(text: &str) -> Result<Word, CommandError> {
    let value = parse_decimal(text).ok_or_else(|| CommandError::InvalidValue(text.to_owned()))?;
    Word::try_from(value).map_err(|_| CommandError::ValueOutOfRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_valid(text: &str) -> Request {
        let (request, error) = parse(text);
        assert_eq!(error, None, "{text}");
        request
    }

    fn parse_error(text: &str) -> CommandError {
        parse(text).1.unwrap_or_else(|| panic!("{text} should be invalid"))
    }

    #[test]
    fn parse_single_read() {
        let request = parse_valid("1x01:10");
        assert_eq!(request.slave(), Some(Slave(1)));
        assert_eq!(request.function(), Some(FunctionCode::ReadCoils));
        assert_eq!(request.func_type().operation, Operation::Read);
        assert_eq!(request.addrs(), &[10]);
        assert_eq!(request.vals(), &[0]);
    }

    #[test]
    fn parse_ranged_write() {
        let request = parse_valid("2x10:100-102=7");
        assert_eq!(request.slave(), Some(Slave(2)));
        assert_eq!(request.function(), Some(FunctionCode::WriteMultipleRegisters));
        assert_eq!(request.addrs(), &[100, 101, 102]);
        assert_eq!(request.vals(), &[7, 7, 7]);
    }

    #[test]
    fn keep_group_order() {
        let request = parse_valid("3x06:9=1,1-2=2,5=3");
        assert_eq!(request.addrs(), &[9, 1, 2, 5]);
        assert_eq!(request.vals(), &[1, 2, 2, 3]);
    }

    #[test]
    fn ignore_whitespace() {
        let request = parse_valid(" 1 x 0F :\n 4 - 5 = 1 ,\t7 = 0 ");
        assert_eq!(request.function(), Some(FunctionCode::WriteMultipleCoils));
        assert_eq!(request.addrs(), &[4, 5, 7]);
        assert_eq!(request.vals(), &[1, 1, 0]);
    }

    #[test]
    fn hexadecimal_function_code() {
        assert_eq!(
            parse_valid("1x0f:0=1").function(),
            Some(FunctionCode::WriteMultipleCoils)
        );
        assert_eq!(
            parse_valid("1x4:0").function(),
            Some(FunctionCode::ReadInputRegisters)
        );
    }

    #[test]
    fn expand_calls() {
        let request = parse_valid("7x05:3-4=1");
        let calls: Vec<_> = request.calls().collect();
        assert_eq!(
            calls,
            vec![
                Call {
                    slave: Slave(7),
                    function: FunctionCode::WriteSingleCoil,
                    address: 3,
                    value: 1,
                },
                Call {
                    slave: Slave(7),
                    function: FunctionCode::WriteSingleCoil,
                    address: 4,
                    value: 1,
                },
            ]
        );
    }

    #[test]
    fn boundaries() {
        let request = parse_valid("254x01:65535");
        assert_eq!(request.slave(), Some(Slave(254)));
        assert_eq!(request.addrs(), &[65535]);
        parse_valid("0x03:0");
        parse_valid("1x06:0=65535");

        assert_eq!(parse_error("255x01:0"), CommandError::SlaveOutOfRange(255));
        assert_eq!(parse_error("-1x01:0"), CommandError::SlaveOutOfRange(-1));
        assert_eq!(
            parse_error("1x01:65536"),
            CommandError::AddressOutOfRange(65536)
        );
        assert_eq!(
            parse_error("1x06:0=65536"),
            CommandError::ValueOutOfRange(65536)
        );
    }

    #[test]
    fn reject_degenerate_ranges() {
        assert_eq!(
            parse_error("1x01:5-5"),
            CommandError::DegenerateRange { first: 5, last: 5 }
        );
        assert_eq!(
            parse_error("1x01:6-5"),
            CommandError::DegenerateRange { first: 6, last: 5 }
        );
        parse_valid("1x01:5");
        assert_eq!(
            parse_error("1x01:1-2-3"),
            CommandError::MalformedRange("1-2-3".to_owned())
        );
        assert_eq!(
            parse_error("1x01:-5"),
            CommandError::InvalidAddress(String::new())
        );
    }

    #[test]
    fn check_data_arity() {
        assert_eq!(
            parse_error("1x03:0=1"),
            CommandError::UnexpectedValue("0=1".to_owned())
        );
        assert_eq!(
            parse_error("1x10:0"),
            CommandError::MissingValue("0".to_owned())
        );
        assert_eq!(
            parse_error("1x10:0=1=2"),
            CommandError::MissingValue("0=1=2".to_owned())
        );
    }

    #[test]
    fn reject_malformed_destination() {
        assert_eq!(parse_error("1x01"), CommandError::MissingFunctionSeparator);
        assert_eq!(
            parse_error("1x01:0:1"),
            CommandError::MissingFunctionSeparator
        );
        assert_eq!(
            parse_error("101:0"),
            CommandError::MalformedDestination("101".to_owned())
        );
        assert_eq!(
            parse_error("1x0x1:0"),
            CommandError::MalformedDestination("1x0x1".to_owned())
        );
        assert_eq!(
            parse_error("ax01:0"),
            CommandError::InvalidSlave("a".to_owned())
        );
        assert_eq!(
            parse_error("1xzz:0"),
            CommandError::InvalidFunction("zz".to_owned())
        );
    }

    #[test]
    fn reject_unsupported_function() {
        assert_eq!(parse_error("1x16:0"), CommandError::UnsupportedFunction(0x16));
        assert_eq!(parse_error("1x101:0"), CommandError::UnsupportedFunction(0x101));
    }

    #[test]
    fn reject_missing_data() {
        assert_eq!(parse_error("1x01:"), CommandError::MissingData);
        assert_eq!(
            parse_error("1x01:1,"),
            CommandError::InvalidAddress(String::new())
        );
    }

    #[test]
    fn keep_partial_fields() {
        let (request, error) = parse("3x03:1,2,x");
        assert_eq!(error, Some(CommandError::InvalidAddress("x".to_owned())));
        assert_eq!(request.slave(), Some(Slave(3)));
        assert_eq!(request.function(), Some(FunctionCode::ReadHoldingRegisters));
        assert_eq!(request.addrs(), &[1, 2]);

        let (request, _) = parse("3x16:1");
        assert_eq!(request.slave(), Some(Slave(3)));
        assert_eq!(request.function(), Some(FunctionCode::Custom(0x16)));
        assert_eq!(request.calls().count(), 0);

        let (request, _) = parse("3x101:1");
        assert_eq!(request.function(), None);
    }
}
