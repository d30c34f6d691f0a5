//! The kitchen machine: a single-writer event loop multiplexing orders,
//! courier pickups, shutdown, end-of-orders, and report requests.
//!
//! Every mutation of the pick-up area, the outstanding-ticket set, and
//! the `orders_ended` flag happens on the one thread spawned by
//! [`Kitchen::spawn`]. Everything else talks to it only through the
//! channels handed back in [`KitchenHandle`].

use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Select, Sender};
use log::{debug, info};

use crate::config::Config;
use crate::courier;
use crate::error::KitchenError;
use crate::order::Order;
use crate::shelf::{PickUpArea, PickUpAreaSnapshot};

/// Default capacity of the internal `pickup` channel when the caller
/// does not need to tune it: generous enough that realistic in-flight
/// courier counts never have to wait on K to drain it.
const DEFAULT_PICKUP_CHANNEL_CAPACITY: usize = 4096;

/// Default capacity of the externally-facing `orders` channel. Bounded
/// so the channel can apply backpressure in principle; the customer
/// driver paces itself and is not expected to hit it.
const DEFAULT_ORDERS_CHANNEL_CAPACITY: usize = 1024;

/// A snapshot of the kitchen's state, returned in response to a
/// `report` request. Producing it never mutates the kitchen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenReport {
    pub pickup_area: PickUpAreaSnapshot,
    pub outstanding_tickets: usize,
    pub orders_ended: bool,
}

/// The five external endpoints of a running kitchen, plus the source of
/// delivered orders.
pub struct KitchenHandle {
    orders: Sender<Order>,
    end_orders: Sender<()>,
    stop: Sender<()>,
    report: Sender<Sender<KitchenReport>>,
    /// Source of orders that were successfully picked up. Closed exactly
    /// once, on graceful termination (see [`Kitchen::spawn`]).
    pub delivery: Receiver<Order>,
}

impl KitchenHandle {
    /// Submits a new order. A programmer error to call after
    /// [`KitchenHandle::end_orders`]; the kitchen does not validate this
    /// itself, but a closed channel (kitchen already exited) is reported
    /// as [`KitchenError::Disconnected`] rather than panicking.
    pub fn submit_order(&self, order: Order) -> Result<(), KitchenError> {
        self.orders.send(order).map_err(|_| KitchenError::Disconnected)
    }

    /// Signals that no further orders will be submitted.
    pub fn end_orders(&self) -> Result<(), KitchenError> {
        self.end_orders.send(()).map_err(|_| KitchenError::Disconnected)
    }

    /// Forces the event loop to terminate immediately without closing
    /// `delivery`. Outstanding courier threads may still fire; their
    /// sends are simply never received.
    pub fn stop(&self) -> Result<(), KitchenError> {
        self.stop.send(()).map_err(|_| KitchenError::Disconnected)
    }

    /// Requests a snapshot of the kitchen's current state.
    pub fn report(&self) -> Result<KitchenReport, KitchenError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.report
            .send(reply_tx)
            .map_err(|_| KitchenError::Disconnected)?;
        reply_rx.recv().map_err(|_| KitchenError::Disconnected)
    }
}

/// The kitchen machine itself. Only [`Kitchen::spawn`] is public: once
/// running, every interaction goes through [`KitchenHandle`].
pub struct Kitchen {
    config: Arc<Config>,
    pickup_area: PickUpArea,
    outstanding_tickets: HashSet<String>,
    orders_ended: bool,
}

impl Kitchen {
    /// Spawns the event loop on its own thread and returns a handle to
    /// it plus a [`JoinHandle`] so the caller can wait for graceful
    /// termination.
    pub fn spawn(config: Arc<Config>) -> (KitchenHandle, JoinHandle<()>) {
        let (orders_tx, orders_rx) = bounded(DEFAULT_ORDERS_CHANNEL_CAPACITY);
        let (end_orders_tx, end_orders_rx) = unbounded();
        let (stop_tx, stop_rx) = unbounded();
        let (report_tx, report_rx) = unbounded();
        let (pickup_tx, pickup_rx) = bounded(DEFAULT_PICKUP_CHANNEL_CAPACITY);
        let (delivery_tx, delivery_rx) = unbounded();

        let shelf_capacity = config.shelf_capacity;
        let mut kitchen = Kitchen {
            config,
            pickup_area: PickUpArea::new(shelf_capacity),
            outstanding_tickets: HashSet::new(),
            orders_ended: false,
        };

        let join_handle = thread::Builder::new()
            .name("[ KITCHEN ]".to_string())
            .spawn(move || {
                kitchen.run(orders_rx, pickup_rx, pickup_tx, end_orders_rx, stop_rx, report_rx, delivery_tx);
            })
            .expect("failed to spawn kitchen thread");

        let handle = KitchenHandle {
            orders: orders_tx,
            end_orders: end_orders_tx,
            stop: stop_tx,
            report: report_tx,
            delivery: delivery_rx,
        };

        (handle, join_handle)
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &mut self,
        orders_rx: Receiver<Order>,
        pickup_rx: Receiver<Order>,
        pickup_tx: Sender<Order>,
        end_orders_rx: Receiver<()>,
        stop_rx: Receiver<()>,
        report_rx: Receiver<Sender<KitchenReport>>,
        delivery_tx: Sender<Order>,
    ) {
        // Index positions into a fixed array so `Select`'s `index()`
        // result maps back onto the right handler without guesswork.
        const STOP: usize = 0;
        const REPORT: usize = 1;
        const ORDERS: usize = 2;
        const PICKUP: usize = 3;
        const END_ORDERS: usize = 4;

        loop {
            let mut select = Select::new();
            select.recv(&stop_rx);
            select.recv(&report_rx);
            select.recv(&orders_rx);
            select.recv(&pickup_rx);
            select.recv(&end_orders_rx);

            let op = select.select();
            match op.index() {
                STOP => {
                    let _ = op.recv(&stop_rx);
                    info!("[ KITCHEN ] stop received, terminating without closing delivery");
                    // Delivery is deliberately not closed on a forced
                    // stop: leak the sender so dropping it here does not
                    // close the channel out from under late couriers'
                    // already-in-flight (never-to-be-read) sends.
                    std::mem::forget(delivery_tx);
                    return;
                }
                REPORT => {
                    if let Ok(reply_to) = op.recv(&report_rx) {
                        let report = self.report();
                        let _ = reply_to.send(report);
                    }
                }
                ORDERS => {
                    if let Ok(order) = op.recv(&orders_rx) {
                        self.handle_order(order, &pickup_tx);
                    }
                }
                PICKUP => {
                    if let Ok(order) = op.recv(&pickup_rx) {
                        if self.handle_pickup(order, &delivery_tx) {
                            return;
                        }
                    }
                }
                END_ORDERS => {
                    let _ = op.recv(&end_orders_rx);
                    self.orders_ended = true;
                    info!("[ KITCHEN ] end-of-orders received");
                    if self.outstanding_tickets.is_empty() {
                        info!("[ KITCHEN ] no outstanding tickets, closing delivery");
                        return;
                    }
                }
                _ => unreachable!("Select only ever reports one of the five registered operations"),
            }
        }
    }

    fn handle_order(&mut self, order: Order, pickup_tx: &Sender<Order>) {
        let cooked = order.cook();
        let id = cooked.id.clone();
        let outcome = self.pickup_area.place(cooked.clone());

        match &outcome.action {
            None => debug!("[ KITCHEN ] order {id} placed on {:?}", outcome.shelf_placed),
            Some(crate::shelf::PlacementAction::Moved { affected_order }) => info!(
                "[ KITCHEN ] order {id} placed on overflow, relocated {} to its own shelf",
                affected_order.id
            ),
            Some(crate::shelf::PlacementAction::Discarded { affected_order }) => info!(
                "[ KITCHEN ] order {id} placed on overflow, force-discarded {}",
                affected_order.id
            ),
        }

        self.outstanding_tickets.insert(id);
        courier::schedule(
            cooked,
            pickup_tx.clone(),
            self.config.courier_min_wait,
            self.config.courier_max_wait,
        );
    }

    /// Returns `true` if this pickup drained the last outstanding ticket
    /// while orders have already ended, meaning the loop should close
    /// delivery and terminate.
    fn handle_pickup(&mut self, order: Order, delivery_tx: &Sender<Order>) -> bool {
        let id = order.id.clone();
        let picked = self.pickup_area.pickup(order);
        self.outstanding_tickets.remove(&id);

        if picked.pickup_successful {
            debug!("[ KITCHEN ] order {id} picked up successfully");
            let _ = delivery_tx.send(picked);
        } else {
            debug!("[ KITCHEN ] pickup miss for order {id}");
        }

        if self.orders_ended && self.outstanding_tickets.is_empty() {
            info!("[ KITCHEN ] quiescent, closing delivery");
            return true;
        }
        false
    }

    fn report(&self) -> KitchenReport {
        KitchenReport {
            pickup_area: self.pickup_area.snapshot(),
            outstanding_tickets: self.outstanding_tickets.len(),
            orders_ended: self.orders_ended,
        }
    }
}
