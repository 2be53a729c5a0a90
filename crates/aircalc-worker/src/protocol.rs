//! Messages exchanged with the turn worker.
//!
//! Plain serializable records so the same shapes can cross a process or
//! thread boundary unchanged.

use aircalc_core::turn::{TurnParams, TurnPath};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Monotonically increasing per client
    pub request_id: u64,
    pub params: TurnParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub request_id: u64,
    pub completed_at: DateTime<Utc>,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseBody {
    /// Integration finished
    Success { path: TurnPath },
    /// Parameters were rejected by the integrator
    Failure { error: String },
    /// The integration task itself died
    Crashed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_body_is_tagged() {
        let response = TurnResponse {
            request_id: 7,
            completed_at: Utc::now(),
            body: ResponseBody::Failure {
                error: "Time step must be positive".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["request_id"], 7);
        assert_eq!(json["body"]["type"], "failure");
        assert_eq!(json["body"]["error"], "Time step must be positive");

        let back: TurnResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
