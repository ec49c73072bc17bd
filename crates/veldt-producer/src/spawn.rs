//! Random attributes for freshly registered entities.
//!
//! New prey are born far outside any plausible consumption radius; the
//! first distance the predator can act on arrives with the first update.
//! Resources are placed uniformly over the roaming square.

use rand::Rng;
use rand::seq::IndexedRandom;

use veldt_types::{PreyDesc, ResourceDesc};

/// Distance assigned at registration, safely out of reach.
pub const BIRTH_DISTANCE: u32 = 1000;

/// First names for newborn prey.
const FIRST_NAMES: &[&str] = &[
    "Alder", "Briar", "Clover", "Dewey", "Fennel", "Hazel", "Juniper", "Maple", "Nettle", "Olive",
    "Pippin", "Rowan", "Sorrel", "Thistle", "Willow", "Yarrow",
];

/// Last names for newborn prey.
const LAST_NAMES: &[&str] = &[
    "Burrows", "Fallow", "Greenfield", "Hollow", "Longears", "Meadows", "Thumper", "Warren",
];

/// A new prey with a random name and weight, born out of reach.
pub fn random_prey<R: Rng + ?Sized>(rng: &mut R) -> PreyDesc {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Clover");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Warren");
    PreyDesc {
        name: format!("{first} {last}"),
        weight: rng.random_range(0..10),
        distance: BIRTH_DISTANCE,
    }
}

/// A new resource with random coordinates and a non-zero volume.
pub fn random_resource<R: Rng + ?Sized>(rng: &mut R) -> ResourceDesc {
    ResourceDesc {
        x: rng.random_range(-50..50),
        y: rng.random_range(-50..50),
        volume: rng.random_range(1..10),
    }
}

/// A fresh roaming distance for a living prey.
pub fn random_distance<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(1..100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use veldt_types::Request;

    use super::*;

    #[test]
    fn prey_are_born_out_of_reach_and_valid() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let prey = random_prey(&mut rng);
            assert_eq!(prey.distance, BIRTH_DISTANCE);
            assert!(prey.weight < 10);
            Request::EnterArea(prey).validate().unwrap();
        }
    }

    #[test]
    fn resources_are_valid_and_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let resource = random_resource(&mut rng);
            assert!((-50..50).contains(&resource.x));
            assert!((-50..50).contains(&resource.y));
            assert!((1..10).contains(&resource.volume));
            Request::SpawnResource(resource).validate().unwrap();
        }
    }

    #[test]
    fn roaming_distances_are_never_zero() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let distance = random_distance(&mut rng);
            assert!((1..100).contains(&distance));
        }
    }
}
