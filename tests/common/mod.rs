#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sungrow_bridge::charger::Sungrow;
use sungrow_bridge::error::{Error, Result};
use sungrow_bridge::modbus::Connection;
use sungrow_bridge::sponsor::SponsorToken;

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ReadHolding(u16, u16),
    ReadInput(u16, u16),
    Write(u16, u16),
}

/// Scripted register bank. Each address holds one 16-bit word; multi-register
/// reads return consecutive addresses.
#[derive(Default)]
pub struct MockConnection {
    holding: Mutex<HashMap<u16, u16>>,
    input: Mutex<HashMap<u16, u16>>,
    failing: Mutex<HashSet<u16>>,
    ops: Mutex<Vec<Op>>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_holding(&self, address: u16, value: u16) {
        self.holding.lock().unwrap().insert(address, value);
    }

    pub fn set_input(&self, address: u16, value: u16) {
        self.input.lock().unwrap().insert(address, value);
    }

    /// Stores a 32-bit input value the way the charger does, low word first.
    pub fn set_input_u32_swapped(&self, address: u16, value: u32) {
        self.set_input(address, (value & 0xffff) as u16);
        self.set_input(address + 1, (value >> 16) as u16);
    }

    pub fn fail(&self, address: u16) {
        self.failing.lock().unwrap().insert(address);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(a, v) => Some((a, v)),
                _ => None,
            })
            .collect()
    }

    fn check(&self, address: u16) -> Result<()> {
        if self.failing.lock().unwrap().contains(&address) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("no reply for {}", address),
            )));
        }
        Ok(())
    }

    fn read(bank: &Mutex<HashMap<u16, u16>>, address: u16, count: u16) -> Vec<u8> {
        let bank = bank.lock().unwrap();
        (address..address + count)
            .flat_map(|a| bank.get(&a).copied().unwrap_or(0).to_be_bytes())
            .collect()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u8>> {
        self.ops.lock().unwrap().push(Op::ReadHolding(address, count));
        self.check(address)?;
        Ok(Self::read(&self.holding, address, count))
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> Result<Vec<u8>> {
        self.ops.lock().unwrap().push(Op::ReadInput(address, count));
        self.check(address)?;
        Ok(Self::read(&self.input, address, count))
    }

    async fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Write(address, value));
        self.check(address)?;
        self.holding.lock().unwrap().insert(address, value);
        Ok(())
    }
}

pub struct Factory;

impl Factory {
    pub fn sungrow(conn: &Arc<MockConnection>) -> Sungrow {
        Sungrow::new(conn.clone(), &SponsorToken::new(Some("token".to_string()))).expect("authorized")
    }
}
