pub mod connection;
pub mod encoding;

pub use connection::ModbusConnection;

use crate::error::{Error, Result};

use {
    async_trait::async_trait,
    serde::Deserialize,
    serde_with::{serde_as, DurationMilliSeconds},
    std::{str::FromStr, time::Duration},
};

pub const DEFAULT_PORT: u16 = 502;

/// Register-level access to a single slave. Replies are big-endian, two bytes
/// per register, in register order.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u8>>;
    async fn read_input_registers(&self, address: u16, count: u16) -> Result<Vec<u8>>;
    async fn write_single_register(&self, address: u16, value: u16) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    RtuOverTcp,
    Rtu,
}

impl Protocol {
    pub fn from_rtu(rtu: Option<bool>) -> Self {
        if rtu == Some(true) {
            Self::RtuOverTcp
        } else {
            Self::Tcp
        }
    }
}

// Comset {{{
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comset {
    pub data_bits: tokio_serial::DataBits,
    pub parity: tokio_serial::Parity,
    pub stop_bits: tokio_serial::StopBits,
}

impl Default for Comset {
    fn default() -> Self {
        Self {
            data_bits: tokio_serial::DataBits::Eight,
            parity: tokio_serial::Parity::None,
            stop_bits: tokio_serial::StopBits::One,
        }
    }
}

impl FromStr for Comset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("invalid comset: {}", s));

        let mut chars = s.trim().chars();
        let (d, p, st) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(d), Some(p), Some(st), None) => (d, p, st),
            _ => return Err(invalid()),
        };

        let data_bits = match d {
            '5' => tokio_serial::DataBits::Five,
            '6' => tokio_serial::DataBits::Six,
            '7' => tokio_serial::DataBits::Seven,
            '8' => tokio_serial::DataBits::Eight,
            _ => return Err(invalid()),
        };
        let parity = match p.to_ascii_uppercase() {
            'N' => tokio_serial::Parity::None,
            'E' => tokio_serial::Parity::Even,
            'O' => tokio_serial::Parity::Odd,
            _ => return Err(invalid()),
        };
        let stop_bits = match st {
            '1' => tokio_serial::StopBits::One,
            '2' => tokio_serial::StopBits::Two,
            _ => return Err(invalid()),
        };

        Ok(Self {
            data_bits,
            parity,
            stop_bits,
        })
    }
} // }}}

// Settings {{{
/// Connection parameters decoded from a charger's generic configuration.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub uri: Option<String>,
    pub device: Option<String>,
    #[serde(default = "Settings::default_comset", deserialize_with = "de_comset")]
    pub comset: String,
    #[serde(default = "Settings::default_baudrate")]
    pub baudrate: u32,
    pub rtu: Option<bool>,
    pub id: Option<u8>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "Settings::default_timeout")]
    pub timeout: Duration,
}

impl Settings {
    pub fn from_other(other: serde_yaml::Mapping) -> Result<Self> {
        let settings: Self = serde_yaml::from_value(serde_yaml::Value::Mapping(other))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        match (self.uri.as_deref(), self.device.as_deref()) {
            (Some(_), Some(_)) => Err(Error::Config(
                "uri and device are mutually exclusive".to_string(),
            )),
            (None, None) => Err(Error::Config("either uri or device must be set".to_string())),
            (Some(uri), None) if uri.trim().is_empty() => {
                Err(Error::Config("uri cannot be empty".to_string()))
            }
            (None, Some(device)) if device.trim().is_empty() => {
                Err(Error::Config("device cannot be empty".to_string()))
            }
            _ => {
                self.comset.parse::<Comset>()?;
                if self.timeout.is_zero() {
                    return Err(Error::Config("invalid timeout: 0".to_string()));
                }
                Ok(())
            }
        }
    }

    pub fn protocol(&self) -> Protocol {
        if self.device.is_some() {
            Protocol::Rtu
        } else {
            Protocol::from_rtu(self.rtu)
        }
    }

    /// Slave id, falling back to the driver's default.
    pub fn id_or(&self, default: u8) -> u8 {
        self.id.unwrap_or(default)
    }

    /// `host:port`, appending the standard Modbus port when none is given.
    pub fn address(&self) -> Option<String> {
        self.uri.as_deref().map(|uri| {
            let uri = uri.trim();
            if uri.rsplit_once(':').map_or(false, |(_, port)| port.parse::<u16>().is_ok()) {
                uri.to_string()
            } else {
                format!("{}:{}", uri, DEFAULT_PORT)
            }
        })
    }

    fn default_comset() -> String {
        "8N1".to_string()
    }

    fn default_baudrate() -> u32 {
        9600
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(1)
    }
} // }}}

// unquoted 8E1 and friends are read by YAML as floats
fn de_comset<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(v) if v == 70.0 => Ok("7E1".to_string()),
            Some(v) if v == 700.0 => Ok("7E2".to_string()),
            Some(v) if v == 80.0 => Ok("8E1".to_string()),
            Some(v) if v == 800.0 => Ok("8E2".to_string()),
            _ => Err(D::Error::custom(format!(
                "invalid comset {}, quote the value e.g. \"8N1\"",
                n
            ))),
        },
        other => Err(D::Error::custom(format!(
            "invalid comset {:?}, quote the value e.g. \"8N1\"",
            other
        ))),
    }
}
