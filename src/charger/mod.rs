pub mod sungrow;

pub use sungrow::Sungrow;

use crate::registry::Registry;

/// Registers every charger driver this crate ships with.
pub fn register_all(registry: &mut Registry) {
    registry.add("sungrow", Sungrow::from_config);
}
