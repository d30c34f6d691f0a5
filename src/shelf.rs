//! The pick-up area: four bounded shelves and the pure placement/pickup
//! policy that keeps them within capacity.
//!
//! Everything here is deliberately side-effect free with respect to
//! anything outside `PickUpArea` itself — the kitchen event loop is the
//! only caller, and it owns the single mutable instance.

use std::collections::HashMap;

use log::info;
use rand::seq::IteratorRandom;

use crate::config::ShelfCapacity;
use crate::order::{Order, Temp};

/// Which shelf an order ended up on, or is being looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShelfKey {
    Hot,
    Cold,
    Frozen,
    Overflow,
}

impl ShelfKey {
    fn for_temp(temp: Temp) -> Self {
        match temp {
            Temp::Hot => ShelfKey::Hot,
            Temp::Cold => ShelfKey::Cold,
            Temp::Frozen => ShelfKey::Frozen,
        }
    }
}

/// An order sitting on a shelf, tagged with the order in which it was
/// placed there. The sequence number only matters for items on the
/// overflow shelf: it lets the relocate-from-overflow step break ties
/// deterministically (oldest insertion first) instead of depending on
/// hash-map iteration order.
#[derive(Debug, Clone)]
struct Placed {
    order: Order,
    seq: u64,
}

/// A bounded, id-keyed container of orders for one temperature (or the
/// overflow zone). Lookup by id is O(1) on average.
#[derive(Debug, Clone, Default)]
struct Shelf {
    capacity: usize,
    items: HashMap<String, Placed>,
}

impl Shelf {
    fn new(capacity: usize) -> Self {
        Shelf {
            capacity,
            items: HashMap::new(),
        }
    }

    fn available(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    fn insert(&mut self, placed: Placed) {
        self.items.insert(placed.order.id.clone(), placed);
    }

    fn remove(&mut self, id: &str) -> Option<Placed> {
        self.items.remove(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }
}

/// What, beyond placing the new order, the placement policy had to do to
/// make room for it.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementAction {
    /// An overflowed order was relocated onto its own temperature shelf.
    Moved { affected_order: Order },
    /// An overflowed order was dropped permanently to admit the new one.
    Discarded { affected_order: Order },
}

/// The result of placing a single order: where it landed, and what
/// secondary mutation (if any) was required to make room.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    pub shelf_placed: ShelfKey,
    pub action: Option<PlacementAction>,
}

/// The four shelves, plus the monotonic counter used to order overflow
/// placements for the relocate-from-overflow tie-break.
///
/// **Invariants**, preserved by every method:
/// - P1: `|shelf[s]| <= capacity[s]` for every shelf `s`.
/// - P2: every id appears in at most one shelf.
/// - P3: ids on `hot`/`cold`/`frozen` have matching temperature; `overflow`
///   may hold any temperature.
pub struct PickUpArea {
    hot: Shelf,
    cold: Shelf,
    frozen: Shelf,
    overflow: Shelf,
    next_seq: u64,
}

impl PickUpArea {
    pub fn new(capacity: ShelfCapacity) -> Self {
        PickUpArea {
            hot: Shelf::new(capacity.hot),
            cold: Shelf::new(capacity.cold),
            frozen: Shelf::new(capacity.frozen),
            overflow: Shelf::new(capacity.overflow),
            next_seq: 0,
        }
    }

    fn shelf(&self, key: ShelfKey) -> &Shelf {
        match key {
            ShelfKey::Hot => &self.hot,
            ShelfKey::Cold => &self.cold,
            ShelfKey::Frozen => &self.frozen,
            ShelfKey::Overflow => &self.overflow,
        }
    }

    fn shelf_mut(&mut self, key: ShelfKey) -> &mut Shelf {
        match key {
            ShelfKey::Hot => &mut self.hot,
            ShelfKey::Cold => &mut self.cold,
            ShelfKey::Frozen => &mut self.frozen,
            ShelfKey::Overflow => &mut self.overflow,
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Places a new order, always succeeding. See the module decision
    /// tree in the design docs: direct placement, overflow placement,
    /// relocate-from-overflow, or forced discard, tried in that order.
    ///
    /// # Arguments
    /// * `order` - a freshly cooked order not already present on any shelf.
    ///
    /// # Returns
    /// The shelf it landed on, and the secondary mutation (if any) that
    /// was required to make room for it.
    pub fn place(&mut self, order: Order) -> PlacementOutcome {
        let home = ShelfKey::for_temp(order.temp);

        if self.shelf(home).available() > 0 {
            let seq = self.next_seq();
            self.shelf_mut(home).insert(Placed { order, seq });
            return PlacementOutcome {
                shelf_placed: home,
                action: None,
            };
        }

        if self.shelf(ShelfKey::Overflow).available() > 0 {
            let seq = self.next_seq();
            self.shelf_mut(ShelfKey::Overflow)
                .insert(Placed { order, seq });
            return PlacementOutcome {
                shelf_placed: ShelfKey::Overflow,
                action: None,
            };
        }

        if let Some(relocated_id) = self.find_relocatable() {
            let relocated = self
                .overflow
                .remove(&relocated_id)
                .expect("id came from a scan of this exact shelf");
            let relocated_home = ShelfKey::for_temp(relocated.order.temp);
            let affected_order = relocated.order.clone();
            self.shelf_mut(relocated_home).insert(relocated);

            let seq = self.next_seq();
            self.overflow.insert(Placed { order, seq });

            info!(
                "[ PICK-UP-AREA ] relocated order {} from overflow to {:?} to admit order {}",
                affected_order.id, relocated_home, affected_order.id
            );

            return PlacementOutcome {
                shelf_placed: ShelfKey::Overflow,
                action: Some(PlacementAction::Moved { affected_order }),
            };
        }

        let discarded_id = self
            .overflow
            .items
            .keys()
            .choose(&mut rand::thread_rng())
            .expect("forced discard is only reached when overflow is full, hence non-empty")
            .clone();
        let discarded = self
            .overflow
            .remove(&discarded_id)
            .expect("id came from a key of this exact shelf");
        let affected_order = discarded.order;

        let seq = self.next_seq();
        self.overflow.insert(Placed { order, seq });

        info!(
            "[ PICK-UP-AREA ] overflow full: force-discarded order {}",
            affected_order.id
        );

        PlacementOutcome {
            shelf_placed: ShelfKey::Overflow,
            action: Some(PlacementAction::Discarded { affected_order }),
        }
    }

    /// Finds the oldest-placed overflow order whose own temperature shelf
    /// currently has room, if any qualify.
    fn find_relocatable(&self) -> Option<String> {
        self.overflow
            .items
            .values()
            .filter(|placed| self.shelf(ShelfKey::for_temp(placed.order.temp)).available() > 0)
            .min_by_key(|placed| placed.seq)
            .map(|placed| placed.order.id.clone())
    }

    /// Attempts to pick up the order identified by `requested.id` /
    /// `requested.temp`. Never errors: a miss simply returns `requested`
    /// with `pickup_successful` left `false`.
    pub fn pickup(&mut self, mut requested: Order) -> Order {
        let home = ShelfKey::for_temp(requested.temp);
        if self.shelf(home).contains(&requested.id) {
            let mut picked = self
                .shelf_mut(home)
                .remove(&requested.id)
                .expect("just confirmed contains")
                .order;
            picked.pickup_successful = true;
            return picked;
        }
        if self.overflow.contains(&requested.id) {
            let mut picked = self
                .overflow
                .remove(&requested.id)
                .expect("just confirmed contains")
                .order;
            picked.pickup_successful = true;
            return picked;
        }
        requested.pickup_successful = false;
        requested
    }

    /// A read-only snapshot used by [`crate::kitchen::KitchenReport`] and
    /// by tests asserting the capacity invariants.
    pub fn snapshot(&self) -> PickUpAreaSnapshot {
        PickUpAreaSnapshot {
            hot: self.hot.items.keys().cloned().collect(),
            cold: self.cold.items.keys().cloned().collect(),
            frozen: self.frozen.items.keys().cloned().collect(),
            overflow: self.overflow.items.keys().cloned().collect(),
            hot_capacity: self.hot.capacity,
            cold_capacity: self.cold.capacity,
            frozen_capacity: self.frozen.capacity,
            overflow_capacity: self.overflow.capacity,
        }
    }
}

/// A plain-data view of the pick-up area, safe to hand out for
/// observation without exposing the mutable shelves themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickUpAreaSnapshot {
    pub hot: Vec<String>,
    pub cold: Vec<String>,
    pub frozen: Vec<String>,
    pub overflow: Vec<String>,
    pub hot_capacity: usize,
    pub cold_capacity: usize,
    pub frozen_capacity: usize,
    pub overflow_capacity: usize,
}

impl PickUpAreaSnapshot {
    /// Checks invariants P1 and P2 (P3 is structural: items can only ever
    /// be inserted into their own temperature's shelf or overflow, so it
    /// cannot be violated by construction and isn't checked here).
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.hot.len() > self.hot_capacity {
            return Err(format!(
                "hot shelf over capacity: {} > {}",
                self.hot.len(),
                self.hot_capacity
            ));
        }
        if self.cold.len() > self.cold_capacity {
            return Err(format!(
                "cold shelf over capacity: {} > {}",
                self.cold.len(),
                self.cold_capacity
            ));
        }
        if self.frozen.len() > self.frozen_capacity {
            return Err(format!(
                "frozen shelf over capacity: {} > {}",
                self.frozen.len(),
                self.frozen_capacity
            ));
        }
        if self.overflow.len() > self.overflow_capacity {
            return Err(format!(
                "overflow shelf over capacity: {} > {}",
                self.overflow.len(),
                self.overflow_capacity
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for id in self
            .hot
            .iter()
            .chain(self.cold.iter())
            .chain(self.frozen.iter())
            .chain(self.overflow.iter())
        {
            if !seen.insert(id) {
                return Err(format!("id {id} present on more than one shelf"));
            }
        }

        Ok(())
    }

    pub fn total_len(&self) -> usize {
        self.hot.len() + self.cold.len() + self.frozen.len() + self.overflow.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(hot: usize, cold: usize, frozen: usize, overflow: usize) -> ShelfCapacity {
        ShelfCapacity {
            hot,
            cold,
            frozen,
            overflow,
        }
    }

    #[test]
    fn direct_placement_on_empty_area() {
        let mut area = PickUpArea::new(capacity(10, 10, 10, 15));
        let outcome = area.place(Order::new("a", Temp::Hot));
        assert_eq!(outcome.shelf_placed, ShelfKey::Hot);
        assert_eq!(outcome.action, None);
        assert_eq!(area.snapshot().hot, vec!["a".to_string()]);
    }

    #[test]
    fn overflow_placement_when_home_shelf_full() {
        let mut area = PickUpArea::new(capacity(1, 10, 10, 15));
        area.place(Order::new("a", Temp::Hot));
        let outcome = area.place(Order::new("b", Temp::Hot));
        assert_eq!(outcome.shelf_placed, ShelfKey::Overflow);
        assert_eq!(outcome.action, None);
    }

    #[test]
    fn relocate_from_overflow_picks_oldest_qualifying_item() {
        // cold shelf starts full, so two cold orders land on overflow in
        // placement order; freeing the cold shelf afterwards makes both
        // of them relocation candidates, and the oldest one must win.
        let mut area = PickUpArea::new(capacity(1, 1, 10, 2));
        area.place(Order::new("cold-resident", Temp::Cold)); // fills cold
        area.place(Order::new("cold-older", Temp::Cold)); // overflow (seq 1)
        area.place(Order::new("cold-newer", Temp::Cold)); // overflow (seq 2)
        area.pickup(Order::new("cold-resident", Temp::Cold)); // frees cold shelf

        let outcome = area.place(Order::new("hot-1", Temp::Hot));
        assert_eq!(outcome.shelf_placed, ShelfKey::Hot);
        assert_eq!(outcome.action, None);

        // overflow is still full; the next order forces a relocation scan.
        let outcome = area.place(Order::new("hot-2", Temp::Hot));
        match outcome.action {
            Some(PlacementAction::Moved { affected_order }) => {
                assert_eq!(affected_order.id, "cold-older");
            }
            other => panic!("expected Moved(cold-older), got {other:?}"),
        }
        assert!(area.snapshot().cold.contains(&"cold-older".to_string()));
        assert!(area.snapshot().overflow.contains(&"cold-newer".to_string()));
    }

    #[test]
    fn relocate_when_overflow_item_temperature_has_room() {
        let mut area = PickUpArea::new(capacity(1, 1, 10, 1));
        area.place(Order::new("hot-1", Temp::Hot)); // hot shelf full
        area.place(Order::new("cold-1", Temp::Cold)); // cold shelf full
        area.place(Order::new("cold-2", Temp::Cold)); // overflow (cold full, overflow has room)
        area.pickup(Order::new("cold-1", Temp::Cold)); // frees the cold shelf

        let outcome = area.place(Order::new("hot-2", Temp::Hot));
        assert_eq!(outcome.shelf_placed, ShelfKey::Overflow);
        match outcome.action {
            Some(PlacementAction::Moved { affected_order }) => {
                assert_eq!(affected_order.id, "cold-2");
            }
            other => panic!("expected Moved, got {other:?}"),
        }
        assert!(area.snapshot().cold.contains(&"cold-2".to_string()));
        assert!(area.snapshot().overflow.contains(&"hot-2".to_string()));
    }

    #[test]
    fn forced_discard_when_no_relocation_possible() {
        let mut area = PickUpArea::new(capacity(1, 1, 1, 1));
        area.place(Order::new("hot-1", Temp::Hot));
        area.place(Order::new("cold-1", Temp::Cold));
        area.place(Order::new("frozen-1", Temp::Frozen));
        area.place(Order::new("overflow-1", Temp::Hot)); // all home shelves full, overflow has room

        let outcome = area.place(Order::new("y", Temp::Hot));
        assert_eq!(outcome.shelf_placed, ShelfKey::Overflow);
        assert!(matches!(
            outcome.action,
            Some(PlacementAction::Discarded { .. })
        ));
        let snapshot = area.snapshot();
        assert!(snapshot.overflow.contains(&"y".to_string()));
        assert_eq!(snapshot.overflow.len(), 1);
        snapshot.check_invariants().unwrap();
    }

    #[test]
    fn pickup_round_trip() {
        let mut area = PickUpArea::new(capacity(10, 10, 10, 15));
        area.place(Order::new("a", Temp::Hot));
        let picked = area.pickup(Order::new("a", Temp::Hot));
        assert!(picked.pickup_successful);
        assert_eq!(area.snapshot().total_len(), 0);
    }

    #[test]
    fn pickup_miss_is_idempotent_and_unsuccessful() {
        let mut area = PickUpArea::new(capacity(10, 10, 10, 15));
        let before = area.snapshot();
        let picked = area.pickup(Order::new("ghost", Temp::Hot));
        assert!(!picked.pickup_successful);
        assert_eq!(area.snapshot(), before);
    }

    #[test]
    fn pickup_finds_order_relocated_onto_overflow() {
        let mut area = PickUpArea::new(capacity(1, 10, 10, 15));
        area.place(Order::new("a", Temp::Hot));
        area.place(Order::new("b", Temp::Hot)); // overflow
        let picked = area.pickup(Order::new("b", Temp::Hot));
        assert!(picked.pickup_successful);
    }
}
