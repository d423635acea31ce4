//! Item warehouse status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Where an item currently is. Stored as its SCREAMING_SNAKE_CASE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    InWarehouse,
    OutOfWarehouse,
    Unknown,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::InWarehouse,
        ItemStatus::OutOfWarehouse,
        ItemStatus::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::InWarehouse => "IN_WAREHOUSE",
            ItemStatus::OutOfWarehouse => "OUT_OF_WAREHOUSE",
            ItemStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: IN_WAREHOUSE, OUT_OF_WAREHOUSE, UNKNOWN"
                ))
            })
    }
}
