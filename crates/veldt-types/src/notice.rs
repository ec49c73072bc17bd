//! Consumed-entity notices pushed by the simulation tick.
//!
//! When the predator consumes a tracked entity, the tick loop publishes a
//! [`ConsumedNotice`] on a per-entity subject. Producers await this notice
//! instead of polling an is-alive call on a fixed interval; the is-alive
//! operations remain available as a fallback probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Which collection a tracked entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A prey entity, consumed by distance.
    Prey,
    /// A resource entity, consumed by axis proximity.
    Resource,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Prey => f.write_str("prey"),
            Self::Resource => f.write_str("resource"),
        }
    }
}

/// Push notification that an entity was consumed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedNotice {
    /// The consumed entity. Its ID is permanently retired.
    pub id: EntityId,
    /// The collection the entity was removed from.
    pub kind: EntityKind,
    /// The weight that was added to the predator.
    pub weight: u32,
    /// When the consumption happened.
    pub consumed_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn notice_round_trips_through_json() {
        let notice = ConsumedNotice {
            id: EntityId(11),
            kind: EntityKind::Resource,
            weight: 4,
            consumed_at: Utc::now(),
        };
        let json = serde_json::to_vec(&notice).unwrap();
        let back: ConsumedNotice = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, notice);
    }

    #[test]
    fn kind_uses_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&EntityKind::Prey).unwrap(), "\"prey\"");
    }
}
