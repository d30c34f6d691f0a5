//! Concurrent order-fulfillment kitchen simulation: cook, shelve,
//! dispatch, deliver.

pub mod config;
pub mod courier;
pub mod driver;
pub mod error;
pub mod kitchen;
pub mod logging;
pub mod order;
pub mod order_source;
pub mod shelf;
