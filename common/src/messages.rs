use crate::turning_point::{MoveError, Snapshot};
use serde::{Deserialize, Serialize};

// Text frame clients may send to keep the connection alive
pub const PING: &str = "ping";

pub const MALFORMED_INTENT: &str = "MalformedIntent";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    // Sent once, first, to a viewer that has just attached
    Init { data: Snapshot },
    // Sent to every viewer after each accepted move
    Update { data: Snapshot },
    // Sent only to the viewer whose intent was turned away
    Invalid { code: String, message: String },
}

impl Response {
    pub fn rejected(err: MoveError) -> Self {
        Response::Invalid {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn malformed() -> Self {
        Response::Invalid {
            code: MALFORMED_INTENT.to_string(),
            message: "Move intent could not be read".to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
