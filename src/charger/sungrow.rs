use crate::api::*;
use crate::error::{Error, Result};
use crate::modbus::{encoding, Connection, ModbusConnection, Settings};
use crate::register::{self, ChargerState, Kind, Register};
use crate::sponsor::Sponsor;

use {
    async_trait::async_trait,
    futures::future::BoxFuture,
    log::{debug, info},
    std::{io::Write, sync::Arc},
};

pub const DEFAULT_ID: u8 = 248;

/// Minimum current a charging session can be sustained at.
pub const MIN_CURRENT: f64 = 6.0;

/// Sungrow AC charger over Modbus. Holds no register state between calls.
pub struct Sungrow {
    conn: Arc<dyn Connection>,
}

impl Sungrow {
    pub fn new(conn: Arc<dyn Connection>, sponsor: &dyn Sponsor) -> Result<Self> {
        if !sponsor.is_authorized() {
            return Err(Error::SponsorRequired);
        }

        Ok(Self { conn })
    }

    /// Factory for the driver registry.
    pub fn from_config(
        other: serde_yaml::Mapping,
        sponsor: Arc<dyn Sponsor>,
    ) -> BoxFuture<'static, Result<Arc<dyn Device>>> {
        Box::pin(async move {
            let settings = Settings::from_other(other)?;
            let id = settings.id_or(DEFAULT_ID);

            let conn = ModbusConnection::new(&settings, id).await?;
            info!("sungrow charger at {} (id {})", conn.name(), id);

            let wb = Self::new(Arc::new(conn), sponsor.as_ref())?;
            Ok(Arc::new(wb) as Arc<dyn Device>)
        })
    }

    async fn read(&self, reg: &Register) -> Result<Vec<u8>> {
        let count = reg.width.count();
        match reg.kind {
            Kind::Holding => self.conn.read_holding_registers(reg.address, count).await,
            Kind::Input => self.conn.read_input_registers(reg.address, count).await,
        }
    }

    async fn read_u16(&self, reg: &Register) -> Result<u16> {
        encoding::uint16(&self.read(reg).await?)
    }

    async fn read_scaled(&self, reg: &Register) -> Result<f64> {
        let b = self.read(reg).await?;
        let raw = match reg.width {
            register::Width::Single => encoding::uint16(&b)? as u32,
            register::Width::Double => encoding::uint32_swapped(&b)?,
        };
        Ok(reg.decode(raw))
    }

    async fn write(&self, reg: &Register, value: u16) -> Result<()> {
        debug!("write {} ({}) = {}", reg.name, reg.address, value);
        self.conn.write_single_register(reg.address, value).await
    }

    /// Reads three non-contiguous registers one at a time, in L1, L2, L3 order.
    async fn phase_values(&self, regs: &[Register; 3]) -> Result<(f64, f64, f64)> {
        let mut res = [0f64; 3];
        for (i, reg) in regs.iter().enumerate() {
            res[i] = self.read_scaled(reg).await?;
        }

        Ok((res[0], res[1], res[2]))
    }
}

#[async_trait]
impl Charger for Sungrow {
    async fn status(&self) -> Result<ChargeStatus> {
        let s = self.read_u16(&register::STATE).await?;
        let state = ChargerState::try_from(s).map_err(|_| Error::InvalidStatus(s))?;
        Ok(state.into())
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(self.read_u16(&register::ENABLE).await? == 1)
    }

    async fn enable(&self, enable: bool) -> Result<()> {
        self.write(&register::ENABLE, enable as u16).await
    }

    async fn max_current(&self, current: i64) -> Result<()> {
        self.max_current_millis(current as f64).await
    }
}

#[async_trait]
impl ChargerEx for Sungrow {
    async fn max_current_millis(&self, current: f64) -> Result<()> {
        if current.is_nan() || current < MIN_CURRENT {
            return Err(Error::InvalidCurrent(current));
        }

        let reg = &register::MAX_CURRENT;
        let raw = (current * reg.scale).round();
        if raw > u16::MAX as f64 {
            debug!("current {:.1} out of register range, clamped to {}", current, u16::MAX);
        }

        self.write(reg, raw as u16).await
    }
}

#[async_trait]
impl Meter for Sungrow {
    async fn current_power(&self) -> Result<f64> {
        self.read_scaled(&register::ACTIVE_POWER).await
    }
}

#[async_trait]
impl MeterEnergy for Sungrow {
    async fn total_energy(&self) -> Result<f64> {
        self.read_scaled(&register::TOTAL_ENERGY).await
    }
}

#[async_trait]
impl ChargeRater for Sungrow {
    async fn charged_energy(&self) -> Result<f64> {
        self.read_scaled(&register::CHARGED_ENERGY).await
    }
}

#[async_trait]
impl PhaseCurrents for Sungrow {
    async fn currents(&self) -> Result<(f64, f64, f64)> {
        self.phase_values(&register::CURRENTS).await
    }
}

#[async_trait]
impl PhaseVoltages for Sungrow {
    async fn voltages(&self) -> Result<(f64, f64, f64)> {
        self.phase_values(&register::VOLTAGES).await
    }
}

#[async_trait]
impl PhaseSwitcher for Sungrow {
    /// 1 forces single phase, anything else allows three.
    async fn phases_1p3p(&self, phases: i32) -> Result<()> {
        self.write(&register::PHASES, (phases == 1) as u16).await
    }
}

#[async_trait]
impl Diagnosis for Sungrow {
    async fn diagnose(&self, out: &mut (dyn Write + Send)) {
        for reg in register::DIAGNOSTICS.iter() {
            if let Ok(v) = self.read_u16(reg).await {
                let _ = writeln!(out, "\t{}:\t{}", reg.name, register::describe(reg, v));
            }
        }
    }
}

impl Device for Sungrow {
    fn as_charger_ex(&self) -> Option<&dyn ChargerEx> {
        Some(self)
    }
    fn as_meter(&self) -> Option<&dyn Meter> {
        Some(self)
    }
    fn as_meter_energy(&self) -> Option<&dyn MeterEnergy> {
        Some(self)
    }
    fn as_charge_rater(&self) -> Option<&dyn ChargeRater> {
        Some(self)
    }
    fn as_phase_currents(&self) -> Option<&dyn PhaseCurrents> {
        Some(self)
    }
    fn as_phase_voltages(&self) -> Option<&dyn PhaseVoltages> {
        Some(self)
    }
    fn as_phase_switcher(&self) -> Option<&dyn PhaseSwitcher> {
        Some(self)
    }
    fn as_diagnosis(&self) -> Option<&dyn Diagnosis> {
        Some(self)
    }
}
