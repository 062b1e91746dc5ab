use super::MsgError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of one request, produced exactly once per request. The two
/// variants serialize to mutually exclusive wire shapes, `{"status":
/// "success"}` or `{"error": "...", "exit_code": N}`, so a reply can never
/// carry both a status and an error.
#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reply {
    Success(SuccessArgs),
    Failure(FailureArgs),
}

impl Reply {
    pub fn success() -> Self {
        Self::Success(SuccessArgs::default())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(FailureArgs {
            error: error.into(),
            exit_code: None,
        })
    }

    /// Failure originating from a subprocess rather than from validation
    pub fn failure_with_exit_code(
        error: impl Into<String>,
        exit_code: i64,
    ) -> Self {
        Self::Failure(FailureArgs {
            error: error.into(),
            exit_code: Some(exit_code),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, MsgError> {
        serde_json::to_vec(self).map_err(MsgError::EncodeMsg)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, MsgError> {
        serde_json::from_slice(slice).map_err(MsgError::DecodeMsg)
    }
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct SuccessArgs {
    pub status: Status,
}

#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
}

impl Default for Status {
    fn default() -> Self {
        Self::Success
    }
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct FailureArgs {
    pub error: String,

    /// Exit status of the privileged subprocess; absent when the failure
    /// came from validation and nothing was ever spawned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
}
