use serde::{Deserialize, Serialize};

use crate::domain::value_objects::egress::EgressInfo;

pub const EGRESS_STARTED: &str = "egress_started";
pub const EGRESS_FINISHED: &str = "egress_finished";

/// Lifecycle event delivered by the recording service:
/// `{ "type": "egress_started" | "egress_finished", "egressInfo": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EgressWebhookEvent {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "egressInfo")]
    pub egress_info: Option<EgressInfo>,
}
