use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    // transport {{{
    #[error("modbus: {0}")]
    Modbus(#[from] tokio_modbus::Error),

    #[error("modbus exception: {0}")]
    Exception(#[from] tokio_modbus::ExceptionCode),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),
    // }}}

    #[error("invalid current {0:.1}")]
    InvalidCurrent(f64),

    #[error("invalid status: {0}")]
    InvalidStatus(u16),

    #[error("short response: expected {expected} bytes, got {got}")]
    ShortResponse { expected: usize, got: usize },

    #[error("charger requires sponsorship token")]
    SponsorRequired,

    #[error("config: {0}")]
    Config(String),

    #[error("unknown charger type: {0}")]
    UnknownDriver(String),
}

impl Error {
    /// Failure talking to the device; never produced by local checks.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Modbus(_) | Self::Exception(_) | Self::Io(_) | Self::Timeout(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidCurrent(_))
    }

    pub fn is_decoding(&self) -> bool {
        matches!(self, Self::InvalidStatus(_) | Self::ShortResponse { .. })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}
