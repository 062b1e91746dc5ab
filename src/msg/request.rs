use super::MsgError;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of commands the helper honors, tagged on the wire by the
/// `command` field with the remaining fields flat beside it. Anything a peer
/// names outside this set is answered with an "Unknown command" reply and
/// never dispatched.
#[derive(JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Mount a device, optionally at an explicit mountpoint with an explicit
    /// filesystem type
    Mount(MountArgs),

    /// Unmount a target path, forcibly if asked
    Unmount(UnmountArgs),

    /// One of the named file manipulations (copy, move, delete, mkdir)
    FileOperation(FileOperationArgs),

    /// Run an arbitrary program with an argument vector
    Execute(ExecuteArgs),
}

impl Request {
    pub fn to_vec(&self) -> Result<Vec<u8>, MsgError> {
        serde_json::to_vec(self).map_err(MsgError::EncodeMsg)
    }
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct MountArgs {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mountpoint: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub filesystem: Option<String>,
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct UnmountArgs {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub force: bool,
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct FileOperationArgs {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination: Option<String>,
}

#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct ExecuteArgs {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cmd: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub args: Vec<String>,
}

/// A field of the wrong JSON type reads as absent, the same view a typed
/// dictionary accessor would give
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|x| match x {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(serde_json::Value::Bool(true))))
}

fn lenient_string_list<'de, D>(
    deserializer: D,
) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|x| serde_json::from_value::<Vec<String>>(x).ok())
        .unwrap_or_default())
}
