//! The prey lifecycle: register, roam, die, respawn.
//!
//! One prey lives at a time. While it lives, the producer reports a new
//! random distance on every update interval. Death normally arrives as a
//! pushed consumed notice on the prey's own subject; the periodic update
//! doubles as a fallback probe in case that notice is lost. After the
//! respawn delay a new prey is registered.

use futures::StreamExt as _;
use tracing::{error, info, warn};

use veldt_rpc::events::{decode_notice, subscribe_consumed};
use veldt_rpc::{EcosystemClient, Topology};
use veldt_types::{EntityId, PreyDesc};

use crate::config::ProducerConfig;
use crate::error::ProducerError;
use crate::spawn;
use crate::watch::{self, Departure};

/// Run the prey producer forever, reconnecting after transport failures.
pub async fn run(config: ProducerConfig) {
    loop {
        if let Err(err) = session(&config).await {
            error!(error = %err, "prey session failed, reconnecting");
        }
        tokio::time::sleep(config.retry_delay).await;
    }
}

/// One broker session: register and shepherd prey until something fails.
async fn session(config: &ProducerConfig) -> Result<(), ProducerError> {
    let mut client =
        EcosystemClient::connect(&config.broker_url, Topology::default(), config.client_config())
            .await?;
    info!(broker_url = config.broker_url, client_id = %client.client_id(), "prey producer connected");

    loop {
        let prey = spawn::random_prey(&mut rand::rng());
        let id = client.enter_area(&prey).await?;
        info!(id = %id, name = prey.name, weight = prey.weight, "prey entered the area");

        shepherd(&mut client, id, &prey, config).await?;

        tokio::time::sleep(config.respawn_delay).await;
    }
}

/// Keep one prey roaming until its consumed notice arrives.
async fn shepherd(
    client: &mut EcosystemClient,
    id: EntityId,
    prey: &PreyDesc,
    config: &ProducerConfig,
) -> Result<(), ProducerError> {
    let nats = client.binding().client();
    let mut notices = subscribe_consumed(&nats, client.binding().topology(), id).await?;

    // The notice subject is only known after registration, so an entity
    // eaten in that gap would never be announced to us. One liveness call
    // after subscribing closes the window.
    if !client.is_prey_alive(id).await? {
        info!(id = %id, name = prey.name, "prey was consumed before its first update");
        let _ = notices.unsubscribe().await;
        return Ok(());
    }

    // The update doubles as a liveness probe: a `false` answer means the
    // service dropped the prey without us seeing the notice.
    let departure = watch::await_departure(
        (&mut notices).map(|message| message.payload.to_vec()),
        config.update_interval,
        async || {
            let distance = spawn::random_distance(&mut rand::rng());
            let tracked = client.update_distance(id, distance).await?;
            if tracked {
                info!(id = %id, name = prey.name, distance = distance, "prey roamed");
            }
            Ok(tracked)
        },
    )
    .await;
    let _ = notices.unsubscribe().await;

    match departure? {
        Departure::Announced(payload) => match decode_notice(&payload) {
            Ok(notice) => {
                info!(id = %notice.id, name = prey.name, weight = notice.weight, "prey has been consumed");
            }
            Err(err) => {
                warn!(id = %id, error = %err, "undecodable consumed notice, treating prey as dead");
            }
        },
        Departure::Probed => {
            info!(id = %id, name = prey.name, "prey is no longer tracked");
        }
    }
    Ok(())
}
