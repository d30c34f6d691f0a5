//! Binary entry point: wires configuration, the order source, the
//! kitchen, and the customer driver together and runs one simulation
//! to completion.

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};

use kitchen_sim::config::Config;
use kitchen_sim::driver;
use kitchen_sim::kitchen::Kitchen;
use kitchen_sim::logging;
use kitchen_sim::order_source;

fn main() -> ExitCode {
    logging::init_logger();
    let _ = dotenv::dotenv();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            error!("[ CLI ] failed to load config {config_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let orders = match order_source::read_orders(&config.orders_source) {
        Ok(result) => {
            if !result.malformed.is_empty() {
                info!(
                    "[ CLI ] skipped {} malformed order record(s) from {}",
                    result.malformed.len(),
                    config.orders_source.display()
                );
            }
            result.orders
        }
        Err(err) => {
            error!(
                "[ CLI ] failed to read orders from {}: {err}",
                config.orders_source.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let total_orders = orders.len();
    info!("[ CLI ] loaded {total_orders} order(s) from {}", config.orders_source.display());

    let wait = config.customer_wait_between_orders;
    let config = Arc::new(config);
    let (handle, kitchen_join) = Kitchen::spawn(config);
    let delivery = handle.delivery.clone();

    let driver_join = driver::run_in_background(handle, orders, wait);

    let mut delivered = 0usize;
    while let Ok(order) = delivery.recv() {
        info!("[ CLI ] delivered order {}", order.id);
        delivered += 1;
    }

    if let Err(err) = driver_join.join().expect("driver thread panicked") {
        error!("[ CLI ] customer driver lost contact with the kitchen: {err}");
        return ExitCode::FAILURE;
    }
    kitchen_join.join().expect("kitchen thread panicked");

    info!(
        "[ CLI ] simulation complete: {delivered}/{total_orders} order(s) delivered"
    );
    ExitCode::SUCCESS
}
