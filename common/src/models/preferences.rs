use serde::{Deserialize, Serialize};

/// User selections persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub fiat: String,
    pub crypto: String,
    pub auto_apply: bool,
}
