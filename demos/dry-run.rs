// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Dry run example
//!
//! This example parses the batch given on the command line, reports invalid
//! commands and runs a valid batch against a simulated device that keeps
//! its coils and registers in memory.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example dry-run -- "2x10:100-102=7;+100;2x03:100-102"
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use modbus_batch::{
    exec::{channel, Event},
    prelude::*,
    Operation, Subject,
};

const DEFAULT_BATCH: &str = "@OUTPUT=dry-run.csv; 1x06:1=42; +50; 1x03:0-2; 1x0F:5-6=1; 1x01:4-7";

#[derive(Debug, Default)]
struct SimulatedDevice {
    coils: HashMap<(Slave, u16), bool>,
    registers: HashMap<(Slave, u16), u16>,
}

#[async_trait]
impl Transport for SimulatedDevice {
    type Response = u16;
    type Error = String;

    async fn execute(&mut self, call: Call) -> Result<u16, String> {
        let key = (call.slave, call.address);
        let func_type = call.function.func_type();
        if call.slave.is_broadcast() && func_type.operation == Operation::Read {
            return Err("broadcast requests are never answered".to_owned());
        }
        match (func_type.operation, func_type.subject) {
            (Operation::Read, Subject::Coil | Subject::DiscreteInput) => {
                Ok(self.coils.get(&key).copied().unwrap_or_default().into())
            }
            (Operation::Read, _) => Ok(self.registers.get(&key).copied().unwrap_or_default()),
            (Operation::Write, Subject::Coil) => {
                self.coils.insert(key, call.value != 0);
                Ok(call.value)
            }
            (Operation::Write, _) => {
                self.registers.insert(key, call.value);
                Ok(call.value)
            }
            (Operation::Invalid, _) => Err(format!("function {} not implemented", call.function)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BATCH.to_owned());
    let batch = Batch::parse(source);
    for (index, error) in batch.errors() {
        eprintln!(
            "Command #{index} '{}' is invalid: {error}",
            batch.text(index).unwrap_or_default().trim()
        );
    }
    batch.check()?;
    if let Some(output) = batch.output() {
        println!("Output would be written to '{}'", output.path());
    }

    let mut executor = Executor::new(SimulatedDevice::default());
    let (tx, mut rx) = channel::<SimulatedDevice>();
    executor.start(&batch, tx)?;

    while let Some(event) = rx.recv().await {
        match event {
            Event::Started => println!("Started"),
            Event::Command { index } => {
                println!("> {}", batch.text(index).unwrap_or_default().trim());
            }
            Event::Request { call, outcome, .. } => match outcome {
                Ok(value) => println!(
                    "  {}, {}, {}, {value}",
                    call.slave, call.function, call.address
                ),
                Err(err) => println!(
                    "  {}, {}, {}, error: {err}",
                    call.slave, call.function, call.address
                ),
            },
            Event::Stopped { completed } => {
                println!("Stopped (completed = {completed})");
                break;
            }
        }
    }
    executor.join().await?;

    Ok(())
}
