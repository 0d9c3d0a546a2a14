//! Capability contracts exposed to the energy manager.
//!
//! Each capability is its own trait so a host can depend on only what it
//! uses. Units: amperes, volts, watts and kilowatt-hours.

use crate::error::Result;

use {async_trait::async_trait, std::fmt, std::io::Write};

/// IEC 61851 control pilot states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChargeStatus {
    /// Vehicle not connected
    A,
    /// Connected, not charging
    B,
    /// Charging
    C,
    /// Charging with ventilation
    D,
    /// No power
    E,
    /// Fault
    F,
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        };
        write!(f, "{}", s)
    }
}

#[async_trait]
pub trait Charger: Send + Sync {
    async fn status(&self) -> Result<ChargeStatus>;
    async fn enabled(&self) -> Result<bool>;
    async fn enable(&self, enable: bool) -> Result<()>;
    /// Whole-ampere current limit.
    async fn max_current(&self, current: i64) -> Result<()>;
}

#[async_trait]
pub trait ChargerEx: Send + Sync {
    /// Fractional current limit in amperes.
    async fn max_current_millis(&self, current: f64) -> Result<()>;
}

#[async_trait]
pub trait Meter: Send + Sync {
    async fn current_power(&self) -> Result<f64>;
}

#[async_trait]
pub trait MeterEnergy: Send + Sync {
    async fn total_energy(&self) -> Result<f64>;
}

#[async_trait]
pub trait ChargeRater: Send + Sync {
    /// Energy delivered in the current session.
    async fn charged_energy(&self) -> Result<f64>;
}

#[async_trait]
pub trait PhaseCurrents: Send + Sync {
    async fn currents(&self) -> Result<(f64, f64, f64)>;
}

#[async_trait]
pub trait PhaseVoltages: Send + Sync {
    async fn voltages(&self) -> Result<(f64, f64, f64)>;
}

#[async_trait]
pub trait PhaseSwitcher: Send + Sync {
    async fn phases_1p3p(&self, phases: i32) -> Result<()>;
}

#[async_trait]
pub trait Diagnosis: Send + Sync {
    /// Best effort dump of device registers, one line each.
    async fn diagnose(&self, out: &mut (dyn Write + Send));
}

/// A charger as handed out by the registry. Optional capabilities are
/// discovered through the `as_*` accessors.
pub trait Device: Charger {
    fn as_charger_ex(&self) -> Option<&dyn ChargerEx> {
        None
    }
    fn as_meter(&self) -> Option<&dyn Meter> {
        None
    }
    fn as_meter_energy(&self) -> Option<&dyn MeterEnergy> {
        None
    }
    fn as_charge_rater(&self) -> Option<&dyn ChargeRater> {
        None
    }
    fn as_phase_currents(&self) -> Option<&dyn PhaseCurrents> {
        None
    }
    fn as_phase_voltages(&self) -> Option<&dyn PhaseVoltages> {
        None
    }
    fn as_phase_switcher(&self) -> Option<&dyn PhaseSwitcher> {
        None
    }
    fn as_diagnosis(&self) -> Option<&dyn Diagnosis> {
        None
    }
}
