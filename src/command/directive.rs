// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directives configure the whole batch, i.e. `@PERIOD=1000`.

use super::{skip_marker, Kind, DIRECTIVE_MARKER};
use crate::CommandError;

/// Separates the directive name from its data.
pub const DIRECTIVE_DATA_SEPARATOR: char = '=';

pub const PERIOD: &str = "PERIOD";

pub const OUTPUT: &str = "OUTPUT";

/// Repetition period of the batch in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    period: u64,
}

impl Period {
    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }
}

/// Output target of the batch results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    path: String,
}

impl Output {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

pub(super) fn parse(text: &str) -> (Kind, Option<CommandError>) {
    let text = skip_marker(text, DIRECTIVE_MARKER);
    let (name, data) = match text.split_once(DIRECTIVE_DATA_SEPARATOR) {
        Some((name, data)) => (name.trim(), Some(data.trim())),
        None => (text.trim(), None),
    };
    match name {
        PERIOD => {
            let data = data.unwrap_or_default();
            match data.parse::<u64>() {
                Ok(period) => (Kind::Period(Period { period }), None),
                Err(_) => (
                    Kind::Period(Period::default()),
                    Some(CommandError::InvalidPeriod(data.to_owned())),
                ),
            }
        }
        OUTPUT => {
            let path = data.unwrap_or_default().to_owned();
            (Kind::Output(Output { path }), None)
        }
        name => (
            Kind::InvalidDirective(name.to_owned()),
            Some(CommandError::UnknownDirective(name.to_owned())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_period() {
        assert_eq!(
            parse("@PERIOD=500"),
            (Kind::Period(Period { period: 500 }), None)
        );
        assert_eq!(
            parse(" @ PERIOD = 0 "),
            (Kind::Period(Period { period: 0 }), None)
        );
    }

    #[test]
    fn reject_invalid_period() {
        for (text, data) in [("@PERIOD=-1", "-1"), ("@PERIOD=abc", "abc"), ("@PERIOD", "")] {
            let (kind, error) = parse(text);
            assert_eq!(kind, Kind::Period(Period::default()));
            assert_eq!(error, Some(CommandError::InvalidPeriod(data.to_owned())));
        }
    }

    #[test]
    fn parse_output() {
        let (kind, error) = parse("@OUTPUT= out.csv ");
        assert_eq!(error, None);
        match kind {
            Kind::Output(output) => assert_eq!(output.path(), "out.csv"),
            kind => panic!("unexpected {kind:?}"),
        }

        // The path may itself contain the separator
        let (kind, _) = parse("@OUTPUT=a=b");
        assert_eq!(
            kind,
            Kind::Output(Output {
                path: "a=b".to_owned()
            })
        );

        assert_eq!(parse("@OUTPUT"), (Kind::Output(Output::default()), None));
    }

    #[test]
    fn reject_unknown_directive() {
        let (kind, error) = parse("@UNKNOWN=x");
        assert_eq!(kind, Kind::InvalidDirective("UNKNOWN".to_owned()));
        assert_eq!(
            error,
            Some(CommandError::UnknownDirective("UNKNOWN".to_owned()))
        );

        // Names are case sensitive
        assert!(parse("@period=5").1.is_some());
    }
}
