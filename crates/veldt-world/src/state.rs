//! The predator world: position, weight, satiety, and tracked entities.
//!
//! [`EcosystemState`] owns both entity collections and the monotonic ID
//! counter. Every operation here assumes the caller already holds the
//! single state lock (see [`SharedEcosystem`]); none of them suspend.
//!
//! The per-tick consumption scan walks each collection from the most
//! recently added entity to the oldest. Prey are consumed by recorded
//! distance; resources by proximity on either coordinate axis (an
//! intentional OR, not AND). The moment the predator's weight reaches the
//! threshold, satiety flips to [`Satiety::Full`] and the scan stops; no
//! consumption happens again until the service ends the cooldown.
//!
//! [`SharedEcosystem`]: crate::shared::SharedEcosystem

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use chrono::Utc;
use veldt_types::{ConsumedNotice, EntityId, EntityKind, PreyDesc, ResourceDesc};

/// Tunable constants for the predator and its consumption rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRules {
    /// Weight at which the predator becomes full and resets.
    pub max_weight: u32,
    /// A prey within this distance is consumed.
    pub prey_radius: u32,
    /// A resource within this distance on either axis is consumed.
    pub resource_radius: u32,
    /// Lower bound of the predator's roaming coordinates (inclusive).
    pub roam_min: i32,
    /// Upper bound of the predator's roaming coordinates (inclusive).
    pub roam_max: i32,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            max_weight: 30,
            prey_radius: 30,
            resource_radius: 5,
            roam_min: -50,
            roam_max: 50,
        }
    }
}

/// The predator's satiety state machine: `Hungry -> Full -> Hungry`,
/// cycling for the lifetime of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Satiety {
    /// Below the weight threshold; consumption is active.
    Hungry,
    /// The threshold was crossed; consumption is suspended until the
    /// time-based cooldown ends, even though weight resets to zero.
    Full,
}

/// A prey entity tracked in the predator's area.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TrackedPrey {
    id: EntityId,
    name: String,
    weight: u32,
    distance: u32,
}

/// A resource entity tracked near the predator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedResource {
    id: EntityId,
    x: i32,
    y: i32,
    volume: u32,
}

/// What one tick did to the world.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// The predator's position after the move.
    pub position: (i32, i32),
    /// Entities consumed during the scan, in consumption order.
    pub consumed: Vec<ConsumedNotice>,
    /// Whether this tick crossed the weight threshold.
    pub became_full: bool,
}

/// The shared mutable world model.
///
/// Collections are never exposed; callers interact through the operations
/// below while holding the state lock.
#[derive(Debug)]
pub struct EcosystemState {
    rules: WorldRules,
    position: (i32, i32),
    weight: u32,
    satiety: Satiety,
    last_id: u64,
    prey: Vec<TrackedPrey>,
    resources: Vec<TrackedResource>,
}

impl EcosystemState {
    /// Create an empty world with the predator at the origin, weight zero.
    pub const fn new(rules: WorldRules) -> Self {
        Self {
            rules,
            position: (0, 0),
            weight: 0,
            satiety: Satiety::Hungry,
            last_id: 0,
            prey: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// The rules this world runs under.
    pub const fn rules(&self) -> &WorldRules {
        &self.rules
    }

    /// The predator's current position.
    pub const fn position(&self) -> (i32, i32) {
        self.position
    }

    /// The predator's accumulated weight.
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// The predator's satiety state.
    pub const fn satiety(&self) -> Satiety {
        self.satiety
    }

    /// Assign the next entity ID. Strictly increasing, unique across both
    /// collections, never reused.
    fn next_id(&mut self) -> EntityId {
        self.last_id = self.last_id.saturating_add(1);
        EntityId(self.last_id)
    }

    /// Register a prey entity and return its assigned ID.
    pub fn register_prey(&mut self, desc: &PreyDesc) -> EntityId {
        let id = self.next_id();
        self.prey.push(TrackedPrey {
            id,
            name: desc.name.clone(),
            weight: desc.weight,
            distance: desc.distance,
        });
        info!(id = %id, name = desc.name, weight = desc.weight, "prey entered the area");
        id
    }

    /// Register a resource entity and return its assigned ID.
    pub fn register_resource(&mut self, desc: &ResourceDesc) -> EntityId {
        let id = self.next_id();
        self.resources.push(TrackedResource {
            id,
            x: desc.x,
            y: desc.y,
            volume: desc.volume,
        });
        info!(id = %id, x = desc.x, y = desc.y, volume = desc.volume, "resource spawned");
        id
    }

    /// Update a tracked prey's distance to the predator.
    ///
    /// Returns `false` when the prey is unknown or already consumed.
    pub fn update_distance(&mut self, id: EntityId, distance: u32) -> bool {
        match self.prey.iter_mut().find(|p| p.id == id) {
            Some(prey) => {
                debug!(id = %id, distance, "prey distance updated");
                prey.distance = distance;
                true
            }
            None => false,
        }
    }

    /// Whether a prey entity is still tracked.
    pub fn is_prey_alive(&self, id: EntityId) -> bool {
        self.prey.iter().any(|p| p.id == id)
    }

    /// Whether a resource entity is still tracked.
    pub fn is_resource_alive(&self, id: EntityId) -> bool {
        self.resources.iter().any(|r| r.id == id)
    }

    /// Run one simulation tick: move the predator, then evaluate the
    /// consumption rules against both collections.
    ///
    /// Consumption only happens while [`Satiety::Hungry`]; the scan stops
    /// the moment the weight threshold is reached and `became_full` is set
    /// so the service can run its cooldown.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> TickOutcome {
        self.position = (
            rng.random_range(self.rules.roam_min..=self.rules.roam_max),
            rng.random_range(self.rules.roam_min..=self.rules.roam_max),
        );
        debug!(x = self.position.0, y = self.position.1, weight = self.weight, "predator moved");

        let mut outcome = TickOutcome {
            position: self.position,
            ..TickOutcome::default()
        };
        if matches!(self.satiety, Satiety::Full) {
            return outcome;
        }

        self.scan_prey(&mut outcome);
        if !outcome.became_full {
            self.scan_resources(&mut outcome);
        }
        outcome
    }

    /// Scan prey from most recently added to oldest, consuming any within
    /// the consumption radius.
    fn scan_prey(&mut self, outcome: &mut TickOutcome) {
        let mut i = self.prey.len();
        while i > 0 {
            i = i.saturating_sub(1);
            let in_range = self
                .prey
                .get(i)
                .is_some_and(|p| p.distance <= self.rules.prey_radius);
            if !in_range {
                continue;
            }
            let prey = self.prey.remove(i);
            info!(id = %prey.id, name = prey.name, weight = prey.weight, "consuming prey");
            self.consume(prey.id, EntityKind::Prey, prey.weight, outcome);
            if outcome.became_full {
                return;
            }
        }
    }

    /// Scan resources from most recently added to oldest. A resource is
    /// near when either coordinate axis is within the radius -- an OR over
    /// the axes, not an AND.
    fn scan_resources(&mut self, outcome: &mut TickOutcome) {
        let (px, py) = self.position;
        let radius = u64::from(self.rules.resource_radius);
        let mut i = self.resources.len();
        while i > 0 {
            i = i.saturating_sub(1);
            let near = self.resources.get(i).is_some_and(|r| {
                axis_distance(px, r.x) <= radius || axis_distance(py, r.y) <= radius
            });
            if !near {
                continue;
            }
            let resource = self.resources.remove(i);
            info!(id = %resource.id, volume = resource.volume, "consuming resource");
            self.consume(resource.id, EntityKind::Resource, resource.volume, outcome);
            if outcome.became_full {
                return;
            }
        }
    }

    /// Account one consumption and flip to full the moment the weight
    /// threshold is reached or exceeded.
    fn consume(&mut self, id: EntityId, kind: EntityKind, weight: u32, outcome: &mut TickOutcome) {
        self.weight = self.weight.saturating_add(weight);
        outcome.consumed.push(ConsumedNotice {
            id,
            kind,
            weight,
            consumed_at: Utc::now(),
        });
        if self.weight >= self.rules.max_weight {
            self.satiety = Satiety::Full;
            outcome.became_full = true;
        }
    }

    /// Reset the predator's weight to exactly zero. Called by the service
    /// when it handles fullness.
    pub const fn reset_weight(&mut self) {
        self.weight = 0;
    }

    /// End the time-based cooldown: `Full -> Hungry`.
    pub const fn end_cooldown(&mut self) {
        self.satiety = Satiety::Hungry;
    }
}

/// Absolute distance between two coordinates on one axis, without overflow.
fn axis_distance(a: i32, b: i32) -> u64 {
    i64::from(a).saturating_sub(i64::from(b)).unsigned_abs()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn prey(name: &str, weight: u32, distance: u32) -> PreyDesc {
        PreyDesc {
            name: name.to_owned(),
            weight,
            distance,
        }
    }

    #[test]
    fn ids_are_strictly_increasing_across_collections() {
        let mut state = EcosystemState::new(WorldRules::default());
        let a = state.register_prey(&prey("a", 1, 1000));
        let b = state.register_resource(&ResourceDesc { x: 0, y: 0, volume: 1 });
        let c = state.register_prey(&prey("c", 1, 1000));
        assert!(a < b && b < c);
    }

    #[test]
    fn distant_prey_survives_a_tick() {
        let mut state = EcosystemState::new(WorldRules::default());
        let id = state.register_prey(&prey("far", 5, 1000));

        let outcome = state.advance(&mut rng());

        assert!(outcome.consumed.is_empty());
        assert!(state.is_prey_alive(id));
        assert_eq!(state.weight(), 0);
    }

    #[test]
    fn nearby_prey_is_consumed_on_the_next_tick() {
        let mut state = EcosystemState::new(WorldRules::default());
        let id = state.register_prey(&prey("near", 5, 1000));
        assert!(state.update_distance(id, 10));

        let outcome = state.advance(&mut rng());

        assert_eq!(outcome.consumed.len(), 1);
        assert_eq!(outcome.consumed.first().map(|n| n.id), Some(id));
        assert!(!state.is_prey_alive(id));
        assert_eq!(state.weight(), 5);
        assert!(!outcome.became_full);
    }

    #[test]
    fn crossing_the_threshold_sets_full_and_stops_the_scan() {
        let mut state = EcosystemState::new(WorldRules::default());
        state.weight = 28;
        let survivor = state.register_prey(&prey("spared", 2, 1));
        let eaten = state.register_prey(&prey("eaten", 5, 1));

        // Newest first: "eaten" is consumed, 28 + 5 = 33 >= 30, scan stops.
        let outcome = state.advance(&mut rng());

        assert!(outcome.became_full);
        assert_eq!(outcome.consumed.len(), 1);
        assert_eq!(outcome.consumed.first().map(|n| n.id), Some(eaten));
        assert!(state.is_prey_alive(survivor));
        assert_eq!(state.satiety(), Satiety::Full);

        // The service resets weight to zero when it handles fullness.
        state.reset_weight();
        assert_eq!(state.weight(), 0);

        // No consumption while full, even at weight zero.
        let during_cooldown = state.advance(&mut rng());
        assert!(during_cooldown.consumed.is_empty());
        assert!(state.is_prey_alive(survivor));

        // Cooldown ends: hungry again, consumption resumes.
        state.end_cooldown();
        let after = state.advance(&mut rng());
        assert_eq!(after.consumed.first().map(|n| n.id), Some(survivor));
    }

    #[test]
    fn weight_after_a_tick_is_the_sum_of_consumed_weights() {
        let mut state = EcosystemState::new(WorldRules::default());
        state.weight = 3;
        state.register_prey(&prey("a", 4, 1));
        state.register_prey(&prey("b", 6, 2));

        let outcome = state.advance(&mut rng());

        let consumed: u32 = outcome.consumed.iter().map(|n| n.weight).sum();
        assert_eq!(consumed, 10);
        assert_eq!(state.weight(), 13);
    }

    #[test]
    fn prey_are_scanned_newest_first() {
        let mut state = EcosystemState::new(WorldRules::default());
        let old = state.register_prey(&prey("old", 1, 1));
        let new = state.register_prey(&prey("new", 1, 1));

        let outcome = state.advance(&mut rng());

        let order: Vec<EntityId> = outcome.consumed.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![new, old]);
    }

    #[test]
    fn resource_is_near_when_either_axis_is_within_radius() {
        let mut state = EcosystemState::new(WorldRules::default());
        state.position = (0, 0);
        // x matches, y is far away: still near (OR over the axes).
        let near = state.register_resource(&ResourceDesc { x: 3, y: 400, volume: 2 });
        // Both axes out of range.
        let far = state.register_resource(&ResourceDesc { x: 300, y: 400, volume: 2 });

        let mut outcome = TickOutcome::default();
        state.scan_resources(&mut outcome);

        assert!(!state.is_resource_alive(near));
        assert!(state.is_resource_alive(far));
        assert_eq!(state.weight(), 2);
    }

    #[test]
    fn update_distance_is_false_for_unknown_or_consumed_ids() {
        let mut state = EcosystemState::new(WorldRules::default());
        assert!(!state.update_distance(EntityId(99), 5));

        let id = state.register_prey(&prey("doomed", 2, 1));
        state.advance(&mut rng());
        assert!(!state.is_prey_alive(id));
        assert!(!state.update_distance(id, 5));
    }

    #[test]
    fn consumed_ids_never_come_back() {
        let mut state = EcosystemState::new(WorldRules::default());
        let id = state.register_prey(&prey("once", 2, 1));
        state.advance(&mut rng());
        assert!(!state.is_prey_alive(id));

        // New registrations receive fresh IDs, never the retired one.
        let next = state.register_prey(&prey("again", 2, 1000));
        assert!(next > id);
        assert!(!state.is_prey_alive(id));
    }

    #[test]
    fn predator_roams_within_bounds() {
        let rules = WorldRules::default();
        let mut state = EcosystemState::new(rules);
        let mut r = rng();
        for _ in 0..50 {
            let outcome = state.advance(&mut r);
            let (x, y) = outcome.position;
            assert!(x >= rules.roam_min && x <= rules.roam_max);
            assert!(y >= rules.roam_min && y <= rules.roam_max);
        }
    }
}
