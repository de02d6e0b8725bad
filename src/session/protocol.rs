use serde::Serialize;

use crate::state::StateSnapshot;

/// Server → observer frames.
///
/// Exactly one `INITIAL_STATE` per connection, then `STATE_UPDATE` per tick
/// and after each processed command. `ERROR` only answers malformed frames.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "INITIAL_STATE")]
    InitialState { data: StateSnapshot },
    #[serde(rename = "STATE_UPDATE")]
    StateUpdate { data: StateSnapshot },
    #[serde(rename = "ERROR")]
    Error { error: String },
}
