use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::api::ChargeStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Holding,
    Input,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// uint16
    Single,
    /// uint32, low word first
    Double,
}

impl Width {
    pub fn count(self) -> u16 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Register {
    pub address: u16,
    pub name: &'static str,
    pub kind: Kind,
    pub width: Width,
    /// Raw value is divided by this to get engineering units.
    pub scale: f64,
}

impl Register {
    const fn holding(address: u16, name: &'static str) -> Self {
        Self {
            address,
            name,
            kind: Kind::Holding,
            width: Width::Single,
            scale: 1.0,
        }
    }

    const fn input(address: u16, name: &'static str, width: Width, scale: f64) -> Self {
        Self {
            address,
            name,
            kind: Kind::Input,
            width,
            scale,
        }
    }

    pub fn decode(&self, raw: u32) -> f64 {
        raw as f64 / self.scale
    }
}

// holding
pub const ENABLE: Register = Register::holding(21210, "Enable");
// TODO: device documentation says 0.01A, observed encoding is 0.1A; confirm against a unit
pub const MAX_CURRENT: Register = Register {
    scale: 10.0,
    ..Register::holding(21202, "MaxCurrent")
};
pub const PHASES: Register = Register::holding(21203, "Phases");
pub const WORKING_MODE: Register = Register::holding(21262, "WorkingMode");

// input
pub const PHASES_POWER: Register = Register::input(21224, "PhasesPower", Width::Single, 1.0);
pub const PHASES_STATE: Register = Register::input(21269, "PhasesState", Width::Single, 1.0);
pub const TOTAL_ENERGY: Register = Register::input(21299, "TotalEnergy", Width::Double, 1e3);
pub const ACTIVE_POWER: Register = Register::input(21307, "ActivePower", Width::Double, 1.0);
pub const CHARGED_ENERGY: Register = Register::input(21309, "ChargedEnergy", Width::Double, 1e3);
pub const START_MODE: Register = Register::input(21313, "StartMode", Width::Single, 1.0);
pub const STATE: Register = Register::input(21316, "State", Width::Single, 1.0);

pub const VOLTAGES: [Register; 3] = [
    Register::input(21301, "VoltageL1", Width::Single, 10.0),
    Register::input(21303, "VoltageL2", Width::Single, 10.0),
    Register::input(21305, "VoltageL3", Width::Single, 10.0),
];
pub const CURRENTS: [Register; 3] = [
    Register::input(21302, "CurrentL1", Width::Single, 10.0),
    Register::input(21304, "CurrentL2", Width::Single, 10.0),
    Register::input(21306, "CurrentL3", Width::Single, 10.0),
];

pub const REGISTERS: [Register; 17] = [
    ENABLE,
    MAX_CURRENT,
    PHASES,
    WORKING_MODE,
    PHASES_POWER,
    PHASES_STATE,
    TOTAL_ENERGY,
    VOLTAGES[0],
    CURRENTS[0],
    VOLTAGES[1],
    CURRENTS[1],
    VOLTAGES[2],
    CURRENTS[2],
    ACTIVE_POWER,
    CHARGED_ENERGY,
    START_MODE,
    STATE,
];

/// Registers read by the diagnostic dump, in output order.
pub const DIAGNOSTICS: [Register; 8] = [
    MAX_CURRENT,
    PHASES,
    ENABLE,
    WORKING_MODE,
    PHASES_POWER,
    PHASES_STATE,
    START_MODE,
    STATE,
];

// ChargerState {{{
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum ChargerState {
    Idle = 1,
    Standby = 2,
    Charging = 3,
    SuspendedEvse = 4,
    SuspendedEv = 5,
    Completed = 6,
    Reserved = 7,
    Disabled = 8,
    Faulted = 9,
}

impl From<ChargerState> for ChargeStatus {
    fn from(state: ChargerState) -> Self {
        use ChargerState::*;

        match state {
            Idle => ChargeStatus::A,
            Standby | SuspendedEvse | SuspendedEv | Completed => ChargeStatus::B,
            Charging => ChargeStatus::C,
            Reserved | Disabled | Faulted => ChargeStatus::F,
        }
    }
} // }}}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum WorkingMode {
    Network = 0,
    PlugAndPlay = 2,
    Ems = 6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum StartMode {
    Ems = 1,
    Swiping = 2,
}

/// Human readable form of a raw diagnostic value; unknown codes stay numeric.
pub fn describe(register: &Register, raw: u16) -> String {
    let name = match register.address {
        a if a == WORKING_MODE.address => WorkingMode::try_from(raw).ok().map(|m| format!("{:?}", m)),
        a if a == START_MODE.address => StartMode::try_from(raw).ok().map(|m| format!("{:?}", m)),
        a if a == STATE.address => ChargerState::try_from(raw).ok().map(|s| format!("{:?}", s)),
        _ => None,
    };

    match name {
        Some(name) => format!("{} ({})", raw, name),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn addresses_unique_per_kind() {
        for kind in [Kind::Holding, Kind::Input] {
            let mut seen = HashSet::new();
            for reg in REGISTERS.iter().filter(|r| r.kind == kind) {
                for offset in 0..reg.width.count() {
                    assert!(
                        seen.insert(reg.address + offset),
                        "{} overlaps at {}",
                        reg.name,
                        reg.address + offset
                    );
                }
            }
        }
    }

    #[test]
    fn phase_groups_are_interleaved() {
        assert_eq!(VOLTAGES.map(|r| r.address), [21301, 21303, 21305]);
        assert_eq!(CURRENTS.map(|r| r.address), [21302, 21304, 21306]);
    }

    #[test]
    fn state_classification() {
        for (code, expected) in [
            (1u16, ChargeStatus::A),
            (2, ChargeStatus::B),
            (3, ChargeStatus::C),
            (4, ChargeStatus::B),
            (5, ChargeStatus::B),
            (6, ChargeStatus::B),
            (7, ChargeStatus::F),
            (8, ChargeStatus::F),
            (9, ChargeStatus::F),
        ] {
            let state = ChargerState::try_from(code).unwrap();
            assert_eq!(ChargeStatus::from(state), expected, "code {}", code);
        }

        assert!(ChargerState::try_from(0u16).is_err());
        assert!(ChargerState::try_from(10u16).is_err());
    }

    #[test]
    fn max_current_scale() {
        assert_eq!(MAX_CURRENT.decode(160), 16.0);
        assert_eq!(TOTAL_ENERGY.decode(12345), 12.345);
    }

    #[test]
    fn describe_known_and_unknown() {
        assert_eq!(describe(&WORKING_MODE, 6), "6 (Ems)");
        assert_eq!(describe(&WORKING_MODE, 4), "4");
        assert_eq!(describe(&START_MODE, 2), "2 (Swiping)");
        assert_eq!(describe(&STATE, 3), "3 (Charging)");
        assert_eq!(describe(&ENABLE, 1), "1");
    }
}
