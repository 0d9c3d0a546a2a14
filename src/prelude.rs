pub use anyhow::{anyhow, bail, Error, Result};
pub use log::{debug, error, info, trace, warn};

pub use crate::api::{
    ChargeRater, ChargeStatus, Charger, ChargerEx, Device, Diagnosis, Meter, MeterEnergy,
    PhaseCurrents, PhaseSwitcher, PhaseVoltages,
};
pub use crate::config::{self, Config};
pub use crate::registry::Registry;
pub use crate::sponsor::{Sponsor, SponsorToken};
