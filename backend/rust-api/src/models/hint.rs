use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HintResponse {
    pub status: String,
    pub hint_message: String,
}
