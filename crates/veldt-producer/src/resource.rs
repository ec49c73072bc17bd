//! The resource lifecycle: register, wait, respawn.
//!
//! One resource exists at a time. Unlike prey it has nothing to report,
//! so the producer awaits the pushed consumed notice for its entity,
//! probing liveness on the update interval in case the notice is lost,
//! and registers a replacement after the respawn delay.

use futures::StreamExt as _;
use tracing::{error, info, warn};

use veldt_rpc::events::{decode_notice, subscribe_consumed};
use veldt_rpc::{EcosystemClient, Topology};

use crate::config::ProducerConfig;
use crate::error::ProducerError;
use crate::spawn;
use crate::watch::{self, Departure};

/// Run the resource producer forever, reconnecting after transport failures.
pub async fn run(config: ProducerConfig) {
    loop {
        if let Err(err) = session(&config).await {
            error!(error = %err, "resource session failed, reconnecting");
        }
        tokio::time::sleep(config.retry_delay).await;
    }
}

/// One broker session: register resources and await their consumption.
async fn session(config: &ProducerConfig) -> Result<(), ProducerError> {
    let mut client =
        EcosystemClient::connect(&config.broker_url, Topology::default(), config.client_config())
            .await?;
    info!(broker_url = config.broker_url, client_id = %client.client_id(), "resource producer connected");

    loop {
        let resource = spawn::random_resource(&mut rand::rng());
        let id = client.spawn_resource(&resource).await?;
        info!(
            id = %id,
            x = resource.x,
            y = resource.y,
            volume = resource.volume,
            "resource placed"
        );

        let nats = client.binding().client();
        let mut notices = subscribe_consumed(&nats, client.binding().topology(), id).await?;

        // Close the registration-to-subscription gap with one liveness call.
        if client.is_resource_alive(id).await? {
            let departure = watch::await_departure(
                (&mut notices).map(|message| message.payload.to_vec()),
                config.update_interval,
                async || Ok(client.is_resource_alive(id).await?),
            )
            .await;
            match departure? {
                Departure::Announced(payload) => match decode_notice(&payload) {
                    Ok(notice) => {
                        info!(id = %notice.id, weight = notice.weight, "resource has been consumed");
                    }
                    Err(err) => {
                        warn!(id = %id, error = %err, "undecodable consumed notice, treating resource as gone");
                    }
                },
                Departure::Probed => {
                    info!(id = %id, "resource is gone without an announcement");
                }
            }
        } else {
            info!(id = %id, "resource was consumed before we could watch it");
        }
        let _ = notices.unsubscribe().await;

        tokio::time::sleep(config.respawn_delay).await;
    }
}
