/// Gate consulted once when a sponsored charger is constructed.
pub trait Sponsor: Send + Sync {
    fn is_authorized(&self) -> bool;
}

#[derive(Clone, Debug, Default)]
pub struct SponsorToken(Option<String>);

impl SponsorToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl Sponsor for SponsorToken {
    fn is_authorized(&self) -> bool {
        self.0.as_deref().map_or(false, |t| !t.trim().is_empty())
    }
}
