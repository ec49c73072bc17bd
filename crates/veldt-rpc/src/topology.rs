//! Subject addressing for the Veldt broker namespace.
//!
//! The topology mirrors a classic direct-exchange layout on NATS subjects:
//!
//! - one well-known request subject, consumed through a **queue group** so
//!   any number of service instances share the stream without duplicate
//!   delivery (the durable, non-exclusive request queue);
//! - one exclusive reply subject per client instance, named after the
//!   client's ID (the per-client reply queue, bound under its own name);
//! - one subject per tracked entity for consumed-entity notices.
//!
//! Correlation tokens and reply addresses travel as message headers, not
//! in the envelope body.

use veldt_types::{ClientId, EntityId};

/// Header carrying the correlation token pairing a request to its reply.
pub const CORRELATION_HEADER: &str = "correlation-id";

/// Header carrying the reply subject of the originating client.
pub const REPLY_TO_HEADER: &str = "reply-to";

/// The subject layout one deployment runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Well-known subject all calls are published to.
    pub request_subject: String,
    /// Queue group shared by service instances consuming the requests.
    pub queue_group: String,
    /// Prefix for per-client reply subjects.
    pub reply_prefix: String,
    /// Prefix for simulation event subjects.
    pub events_prefix: String,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            request_subject: "veldt.requests".to_owned(),
            queue_group: "veldt.service".to_owned(),
            reply_prefix: "veldt.reply".to_owned(),
            events_prefix: "veldt.events".to_owned(),
        }
    }
}

impl Topology {
    /// The exclusive reply subject for one client instance.
    pub fn reply_subject(&self, client_id: ClientId) -> String {
        format!("{}.{client_id}", self.reply_prefix)
    }

    /// The subject a consumed-entity notice for `id` is published on.
    pub fn consumed_subject(&self, id: EntityId) -> String {
        format!("{}.consumed.{id}", self.events_prefix)
    }
}
