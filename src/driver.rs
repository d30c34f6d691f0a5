//! The customer driver: paces a fixed batch of orders onto the
//! kitchen's `orders` channel, then signals end-of-orders.

use std::thread;
use std::time::Duration;

use log::info;

use crate::error::KitchenError;
use crate::kitchen::KitchenHandle;
use crate::order::Order;

/// Submits `orders` to `handle` one at a time, sleeping `wait` between
/// each submission, then sends end-of-orders. Runs on the calling
/// thread; callers that want this paced without blocking their own
/// thread should spawn it themselves, the way [`run_in_background`]
/// does.
///
/// # Returns
/// `Err` as soon as the kitchen is found to be disconnected; orders
/// after that point are not submitted.
pub fn run(handle: &KitchenHandle, orders: Vec<Order>, wait: Duration) -> Result<(), KitchenError> {
    let total = orders.len();
    for (index, order) in orders.into_iter().enumerate() {
        info!("[ DRIVER ] submitting order {} ({}/{total})", order.id, index + 1);
        handle.submit_order(order)?;
        if index + 1 < total {
            thread::sleep(wait);
        }
    }
    info!("[ DRIVER ] all orders submitted, signaling end-of-orders");
    handle.end_orders()
}

/// Spawns [`run`] on its own named thread so the caller's thread is
/// free to drain `handle.delivery` concurrently, mirroring how the
/// kitchen and couriers each get their own thread.
pub fn run_in_background(
    handle: KitchenHandle,
    orders: Vec<Order>,
    wait: Duration,
) -> thread::JoinHandle<Result<(), KitchenError>> {
    thread::Builder::new()
        .name("[ DRIVER ]".to_string())
        .spawn(move || run(&handle, orders, wait))
        .expect("failed to spawn driver thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ShelfCapacity};
    use crate::kitchen::Kitchen;
    use crate::order::Temp;
    use std::sync::Arc;

    fn config() -> Arc<Config> {
        Arc::new(Config {
            orders_source: "unused.jsonl".into(),
            customer_wait_between_orders: Duration::from_millis(0),
            courier_min_wait: Duration::from_millis(0),
            courier_max_wait: Duration::from_millis(0),
            shelf_capacity: ShelfCapacity {
                hot: 10,
                cold: 10,
                frozen: 10,
                overflow: 15,
            },
        })
    }

    #[test]
    fn paces_orders_and_signals_end() {
        let (handle, join) = Kitchen::spawn(config());
        let orders = vec![
            Order::new("a", Temp::Hot),
            Order::new("b", Temp::Cold),
            Order::new("c", Temp::Frozen),
        ];

        run(&handle, orders, Duration::from_millis(0)).unwrap();

        let mut delivered = Vec::new();
        while let Ok(order) = handle.delivery.recv_timeout(Duration::from_secs(2)) {
            delivered.push(order.id);
        }
        delivered.sort();
        assert_eq!(delivered, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        join.join().unwrap();
    }

    #[test]
    fn background_driver_lets_caller_drain_concurrently() {
        let (handle, kitchen_join) = Kitchen::spawn(config());
        let orders = vec![Order::new("a", Temp::Hot), Order::new("b", Temp::Cold)];
        let delivery = handle.delivery.clone();

        let driver_join = run_in_background(handle, orders, Duration::from_millis(0));

        let mut delivered = 0;
        while delivery.recv_timeout(Duration::from_secs(2)).is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, 2);
        driver_join.join().unwrap().unwrap();
        kitchen_join.join().unwrap();
    }
}
