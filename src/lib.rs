// Module declarations for the application's core components
pub mod api;        // Capability traits consumed by energy managers
pub mod charger;    // Charger drivers
pub mod config;     // Configuration management
pub mod error;      // Error handling and types
pub mod modbus;     // Modbus connection and decoding helpers
pub mod options;    // Command line options parsing
pub mod prelude;    // Common imports and types
pub mod register;   // Register definitions and device enumerations
pub mod registry;   // Charger driver registry
pub mod sponsor;    // Sponsorship gate

pub use error::Error;

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::options::{Command, Options};
use crate::prelude::*;
use std::io::Write;
use std::sync::Arc;

fn init_logging(level: &str) -> std::result::Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
}

/// Main application entry point
///
/// Loads the configuration, builds the selected charger through the driver
/// registry and runs a single command against it.
pub async fn app(options: Options) -> Result<()> {
    let config = Config::new(options.config_file.clone())?;

    if let Err(e) = init_logging(config.loglevel()) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    info!("sungrow-bridge {} starting", CARGO_PKG_VERSION);
    info!("Read configuration from {}", options.config_file);
    config.log_summary();

    let registry = Registry::new();
    let charger = config.charger(options.charger.as_deref())?;
    let sponsor: Arc<dyn Sponsor> = Arc::new(config.sponsor());

    info!("Creating {} charger {}", charger.charger_type(), charger.name());
    let device = registry
        .create(charger.charger_type(), charger.other(), sponsor)
        .await?;

    let mut out = std::io::stdout();
    run(device.as_ref(), &options.command, &mut out).await
}

/// Executes one command against a device, writing results to `out`.
pub async fn run(device: &dyn Device, command: &Command, out: &mut (dyn Write + Send)) -> Result<()> {
    match command {
        Command::Status => {
            writeln!(out, "Status:\t{}", device.status().await?)?;
            writeln!(out, "Enabled:\t{}", device.enabled().await?)?;
        }
        Command::Enable => device.enable(true).await?,
        Command::Disable => device.enable(false).await?,
        Command::Current { amps } => match device.as_charger_ex() {
            Some(ex) => ex.max_current_millis(*amps).await?,
            None => device.max_current(*amps as i64).await?,
        },
        Command::Phases { phases } => {
            let switcher = device
                .as_phase_switcher()
                .ok_or_else(|| anyhow!("charger does not support phase switching"))?;
            switcher.phases_1p3p(*phases).await?;
        }
        Command::Meter => {
            if let Some(m) = device.as_meter() {
                writeln!(out, "Power:\t{:.0}W", m.current_power().await?)?;
            }
            if let Some(m) = device.as_meter_energy() {
                writeln!(out, "Energy:\t{:.3}kWh", m.total_energy().await?)?;
            }
            if let Some(m) = device.as_charge_rater() {
                writeln!(out, "Charged:\t{:.3}kWh", m.charged_energy().await?)?;
            }
            if let Some(m) = device.as_phase_currents() {
                let (l1, l2, l3) = m.currents().await?;
                writeln!(out, "Current L1..L3:\t{:.1}A {:.1}A {:.1}A", l1, l2, l3)?;
            }
            if let Some(m) = device.as_phase_voltages() {
                let (l1, l2, l3) = m.voltages().await?;
                writeln!(out, "Voltage L1..L3:\t{:.1}V {:.1}V {:.1}V", l1, l2, l3)?;
            }
        }
        Command::Diagnose => {
            let diag = device
                .as_diagnosis()
                .ok_or_else(|| anyhow!("charger does not support diagnosis"))?;
            diag.diagnose(out).await;
        }
    }

    Ok(())
}
