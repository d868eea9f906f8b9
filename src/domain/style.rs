//! Tattoo style lookup values.

use serde::{Deserialize, Serialize};

/// A fixed reference category for classifying portfolio work. Seeded at
/// startup; not user-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TattooStyle {
    pub id: i64,
    pub name: String,
}
