//! The courier scheduler: one short-lived named thread per order, woken
//! after a randomized delay to emit a pickup request.

use std::thread::{self, Builder};
use std::time::Duration;

use crossbeam_channel::Sender;
use log::debug;
use rand::Rng;

use crate::order::Order;

/// A counter purely for naming courier threads in logs; it carries no
/// other meaning and is never consulted by the kitchen machine.
static NEXT_COURIER_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Spawns an independent thread that sleeps for a duration sampled
/// uniformly from `[min_wait, max_wait]` and then sends `order` on
/// `pickup`. Retains no reference to the order after the send.
///
/// If the kitchen's receiving end of `pickup` has already been dropped
/// (the machine exited via `stop` while this courier was still
/// in flight), the send is logged and discarded rather than blocking —
/// couriers never hang the process past their own sleep.
pub fn schedule(order: Order, pickup: Sender<Order>, min_wait: Duration, max_wait: Duration) {
    let courier_id = NEXT_COURIER_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let wait = sample_wait(min_wait, max_wait);

    let spawned = Builder::new()
        .name(format!("[ COURIER#{courier_id} ]"))
        .spawn(move || {
            thread::sleep(wait);
            if let Err(err) = pickup.send(order) {
                debug!(
                    "[ COURIER#{courier_id} ] pickup channel closed, dropping delivery attempt: {err}"
                );
            }
        });

    if let Err(err) = spawned {
        debug!("[ COURIER#{courier_id} ] failed to spawn thread: {err}");
    }
}

/// Samples a wait duration uniformly from the closed millisecond
/// interval `[min_wait, max_wait]`. `rand`'s inclusive-range sampling
/// already matches the discrete uniform distribution the design calls
/// for, so no manual rounding is needed.
fn sample_wait(min_wait: Duration, max_wait: Duration) -> Duration {
    let min_ms = min_wait.as_millis() as u64;
    let max_ms = max_wait.as_millis() as u64;
    if min_ms == max_ms {
        return Duration::from_millis(min_ms);
    }
    let sampled = rand::thread_rng().gen_range(min_ms..=max_ms);
    Duration::from_millis(sampled)
}
