//! Frozen, read-once simulation configuration.
//!
//! Loaded from a JSON file and then overridden key-by-key by environment
//! variables of the same name, upper-cased — the same override precedence
//! the teacher's `Consts` used for its ingredient quantities, generalized
//! to a file-backed config instead of `.env`-only.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::order::Temp;

/// Per-shelf capacities, keyed by temperature plus the overflow zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfCapacity {
    pub hot: usize,
    pub cold: usize,
    pub frozen: usize,
    pub overflow: usize,
}

impl ShelfCapacity {
    pub fn total(&self) -> usize {
        self.hot + self.cold + self.frozen + self.overflow
    }

    pub fn get(&self, temp: Temp) -> usize {
        match temp {
            Temp::Hot => self.hot,
            Temp::Cold => self.cold,
            Temp::Frozen => self.frozen,
        }
    }
}

/// Raw, pre-validation shape of the JSON config file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    orders_source: String,
    customer_wait_between_orders_ms: u64,
    courier_min_wait_ms: u64,
    courier_max_wait_ms: u64,
    shelf_capacity: RawShelfCapacity,
}

#[derive(Debug, Deserialize)]
struct RawShelfCapacity {
    hot: i64,
    cold: i64,
    frozen: i64,
    overflow: i64,
}

/// Validated, immutable configuration shared read-only for the lifetime
/// of the simulation.
#[derive(Debug, Clone)]
pub struct Config {
    pub orders_source: PathBuf,
    pub customer_wait_between_orders: Duration,
    pub courier_min_wait: Duration,
    pub courier_max_wait: Duration,
    pub shelf_capacity: ShelfCapacity,
}

impl Config {
    /// Loads the config file at `path`, applies environment overrides,
    /// and validates the result.
    ///
    /// # Arguments
    /// * `path` - location of the JSON config file.
    ///
    /// # Returns
    /// * `Ok(Config)` - a validated, ready-to-use configuration.
    /// * `Err(ConfigError)` - the file could not be read or parsed, or a
    ///   validation invariant failed (negative capacity, `min > max`, a
    ///   missing key).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let overrides = env_overrides();
        let customer_wait_between_orders_ms =
            u64_override(&overrides, "CUSTOMER_WAIT_BETWEEN_ORDERS_MS")
                .unwrap_or(raw.customer_wait_between_orders_ms);
        let courier_min_wait_ms = u64_override(&overrides, "COURIER_MIN_WAIT_MS")
            .unwrap_or(raw.courier_min_wait_ms);
        let courier_max_wait_ms = u64_override(&overrides, "COURIER_MAX_WAIT_MS")
            .unwrap_or(raw.courier_max_wait_ms);
        let orders_source = overrides
            .get("ORDERS_SOURCE")
            .cloned()
            .unwrap_or(raw.orders_source);

        let shelf_capacity_hot =
            i64_override(&overrides, "SHELF_CAPACITY_HOT").unwrap_or(raw.shelf_capacity.hot);
        let shelf_capacity_cold =
            i64_override(&overrides, "SHELF_CAPACITY_COLD").unwrap_or(raw.shelf_capacity.cold);
        let shelf_capacity_frozen = i64_override(&overrides, "SHELF_CAPACITY_FROZEN")
            .unwrap_or(raw.shelf_capacity.frozen);
        let shelf_capacity_overflow = i64_override(&overrides, "SHELF_CAPACITY_OVERFLOW")
            .unwrap_or(raw.shelf_capacity.overflow);

        let shelf_capacity = ShelfCapacity {
            hot: non_negative("shelf_capacity.hot", shelf_capacity_hot)?,
            cold: non_negative("shelf_capacity.cold", shelf_capacity_cold)?,
            frozen: non_negative("shelf_capacity.frozen", shelf_capacity_frozen)?,
            overflow: non_negative("shelf_capacity.overflow", shelf_capacity_overflow)?,
        };

        if courier_min_wait_ms > courier_max_wait_ms {
            return Err(ConfigError::Invalid(format!(
                "courier_min_wait_ms ({courier_min_wait_ms}) must be <= courier_max_wait_ms ({courier_max_wait_ms})"
            )));
        }

        Ok(Config {
            orders_source: PathBuf::from(orders_source),
            customer_wait_between_orders: Duration::from_millis(
                customer_wait_between_orders_ms,
            ),
            courier_min_wait: Duration::from_millis(courier_min_wait_ms),
            courier_max_wait: Duration::from_millis(courier_max_wait_ms),
            shelf_capacity,
        })
    }
}

fn non_negative(field: &str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .map_err(|_| ConfigError::Invalid(format!("{field} must be >= 0, got {value}")))
}

/// Collects the subset of environment variables this config knows how to
/// read as overrides, so a single lookup pass covers all of them.
fn env_overrides() -> HashMap<String, String> {
    const KEYS: &[&str] = &[
        "ORDERS_SOURCE",
        "CUSTOMER_WAIT_BETWEEN_ORDERS_MS",
        "COURIER_MIN_WAIT_MS",
        "COURIER_MAX_WAIT_MS",
        "SHELF_CAPACITY_HOT",
        "SHELF_CAPACITY_COLD",
        "SHELF_CAPACITY_FROZEN",
        "SHELF_CAPACITY_OVERFLOW",
    ];
    KEYS.iter()
        .filter_map(|key| env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect()
}

fn i64_override(overrides: &HashMap<String, String>, key: &str) -> Option<i64> {
    overrides.get(key).and_then(|v| v.parse::<i64>().ok())
}

fn u64_override(overrides: &HashMap<String, String>, key: &str) -> Option<u64> {
    overrides.get(key).and_then(|v| v.parse::<u64>().ok())
}
