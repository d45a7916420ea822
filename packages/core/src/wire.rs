//! Wire-format types and constants for the resolution endpoint.

use serde::{Deserialize, Serialize};

/// Header identifying atlas clients on outbound fetches.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// The value sent in [`CLIENT_ID_HEADER`].
pub const CLIENT_ID: &str = "raml-to-api-client";

/// The JSON body returned for every resolution failure.
///
/// ```json
/// {"error":true,"message":"API file not specified."}
/// ```
///
/// `error` is always `true`; it exists so page code can tell a failure body
/// apart from a resolved structure with a single field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}
