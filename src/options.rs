use clap::{Parser, Subcommand};

/// Sungrow Bridge - control and inspect Sungrow AC chargers over Modbus
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Charger to talk to, defaults to the first enabled one
    #[clap(long = "charger")]
    pub charger: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the charge status (A-F) and whether charging is enabled
    Status,
    /// Allow charging
    Enable,
    /// Stop charging
    Disable,
    /// Set the current limit in amperes
    Current { amps: f64 },
    /// Switch between single (1) and three (3) phase charging
    Phases { phases: i32 },
    /// Print power, energy and per-phase readings
    Meter,
    /// Dump raw device registers
    Diagnose,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
