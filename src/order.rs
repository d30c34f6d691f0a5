//! The [`Order`] value and its temperature classification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Temperature zone an order belongs to. Determines which shelf it is
/// placed on directly; the overflow shelf accepts any temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temp {
    Hot,
    Cold,
    Frozen,
}

impl Temp {
    /// Parses a temperature from the lowercase strings used in order
    /// records and configuration keys. Returns `None` on anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hot" => Some(Temp::Hot),
            "cold" => Some(Temp::Cold),
            "frozen" => Some(Temp::Frozen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Temp::Hot => "hot",
            Temp::Cold => "cold",
            Temp::Frozen => "frozen",
        }
    }
}

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order as it flows through the kitchen.
///
/// `id` is assumed globally unique by every caller; the kitchen never
/// validates that assumption. `extra` carries whatever opaque fields the
/// order source read off the record (e.g. a customer-facing `name`) so
/// they survive untouched end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub temp: Temp,
    pub extra: Map<String, Value>,
    pub cooked: bool,
    pub pickup_successful: bool,
}

impl Order {
    /// Creates a freshly submitted order: not yet cooked, not yet picked up.
    pub fn new(id: impl Into<String>, temp: Temp) -> Self {
        Order {
            id: id.into(),
            temp,
            extra: Map::new(),
            cooked: false,
            pickup_successful: false,
        }
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Attaches the `cooked` label. Pure; incurs no delay.
    pub fn cook(mut self) -> Self {
        self.cooked = true;
        self
    }
}
