//! The exhaustive request handler over the shared world state.
//!
//! Every operation takes the single state lock for its full duration and
//! never suspends while holding it. Registration assigns the next
//! monotonic ID; update and membership operations answer `false` rather
//! than failing for unknown or already-consumed IDs, so the handler is
//! effectively infallible -- the [`HandlerError`] path exists for the
//! dispatcher seam, not for business outcomes.

use tracing::debug;

use veldt_rpc::{EcosystemHandler, HandlerError};
use veldt_types::{Flag, RegisteredId, Request, Response};
use veldt_world::SharedEcosystem;

/// Routes each typed request to the corresponding state operation.
#[derive(Debug, Clone)]
pub struct EcosystemService {
    shared: SharedEcosystem,
}

impl EcosystemService {
    /// Build the service over a shared world handle.
    pub const fn new(shared: SharedEcosystem) -> Self {
        Self { shared }
    }
}

impl EcosystemHandler for EcosystemService {
    fn handle(&self, request: Request) -> Result<Response, HandlerError> {
        Ok(match request {
            Request::EnterArea(prey) => {
                let id = self.shared.with(|state| state.register_prey(&prey));
                Response::EnterArea(RegisteredId { value: id })
            }
            Request::SpawnResource(resource) => {
                let id = self.shared.with(|state| state.register_resource(&resource));
                Response::SpawnResource(RegisteredId { value: id })
            }
            Request::UpdateDistance(update) => {
                let found = self
                    .shared
                    .with(|state| state.update_distance(update.id, update.distance));
                Response::UpdateDistance(Flag { value: found })
            }
            Request::IsPreyAlive(entity) => {
                let alive = self.shared.with(|state| state.is_prey_alive(entity.id));
                debug!(id = %entity.id, alive, "prey liveness probe");
                Response::IsPreyAlive(Flag { value: alive })
            }
            Request::IsResourceAlive(entity) => {
                let alive = self.shared.with(|state| state.is_resource_alive(entity.id));
                debug!(id = %entity.id, alive, "resource liveness probe");
                Response::IsResourceAlive(Flag { value: alive })
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use veldt_types::{DistanceUpdate, EntityId, EntityRef, PreyDesc, ResourceDesc};
    use veldt_world::{EcosystemState, WorldRules};

    use super::*;

    fn service() -> EcosystemService {
        EcosystemService::new(SharedEcosystem::new(EcosystemState::new(
            WorldRules::default(),
        )))
    }

    fn prey(name: &str) -> Request {
        Request::EnterArea(PreyDesc {
            name: name.to_owned(),
            weight: 4,
            distance: 1000,
        })
    }

    #[test]
    fn registration_returns_increasing_ids() {
        let service = service();
        let Ok(Response::EnterArea(first)) = service.handle(prey("a")) else {
            panic!("expected an EnterArea result");
        };
        let Ok(Response::SpawnResource(second)) =
            service.handle(Request::SpawnResource(ResourceDesc { x: 1, y: 1, volume: 2 }))
        else {
            panic!("expected a SpawnResource result");
        };
        assert!(second.value > first.value);
    }

    #[test]
    fn registered_prey_is_alive_and_updatable() {
        let service = service();
        let Ok(Response::EnterArea(registered)) = service.handle(prey("b")) else {
            panic!("expected an EnterArea result");
        };

        let alive = service.handle(Request::IsPreyAlive(EntityRef { id: registered.value }));
        assert!(matches!(
            alive,
            Ok(Response::IsPreyAlive(Flag { value: true }))
        ));

        let updated = service.handle(Request::UpdateDistance(DistanceUpdate {
            id: registered.value,
            distance: 12,
        }));
        assert!(matches!(
            updated,
            Ok(Response::UpdateDistance(Flag { value: true }))
        ));
    }

    #[test]
    fn unknown_ids_answer_false_not_error() {
        let service = service();
        let ghost = EntityId(404);

        assert!(matches!(
            service.handle(Request::IsPreyAlive(EntityRef { id: ghost })),
            Ok(Response::IsPreyAlive(Flag { value: false }))
        ));
        assert!(matches!(
            service.handle(Request::IsResourceAlive(EntityRef { id: ghost })),
            Ok(Response::IsResourceAlive(Flag { value: false }))
        ));
        assert!(matches!(
            service.handle(Request::UpdateDistance(DistanceUpdate {
                id: ghost,
                distance: 1
            })),
            Ok(Response::UpdateDistance(Flag { value: false }))
        ));
    }
}
