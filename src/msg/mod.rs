pub mod reply;
pub mod request;

use privd_derive::Error;
use request::Request;
use serde::Deserialize;

#[derive(Debug, Error)]
pub enum MsgError {
    EncodeMsg(serde_json::Error),
    DecodeMsg(serde_json::Error),
}

/// One inbound frame, classified ahead of dispatch. Distinguishing these
/// cases here keeps the dispatcher a pure routing step that maps each case
/// to exactly one reply without re-probing the raw frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// Well-formed request naming a recognized command
    Request(Request),

    /// Request-shaped object with no usable `command` string
    MissingCommand,

    /// Request-shaped object naming a command outside the closed set
    UnknownCommand(String),
}

impl Inbound {
    /// Classifies a raw frame, or None when the frame is not the object
    /// shape requests use. Such frames produce no reply at all; a client
    /// must cover that path with a timeout.
    pub fn classify(frame: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(frame).ok()?;
        let fields = value.as_object()?;

        let command = match fields.get("command") {
            Some(serde_json::Value::String(x)) => x.clone(),
            // A non-string command reads the same as an absent one
            Some(_) | None => return Some(Self::MissingCommand),
        };

        // Field-level decoding is lenient, so the only way a recognized
        // command fails to deserialize is an unrecognized tag
        match Request::deserialize(&value) {
            Ok(request) => Some(Self::Request(request)),
            Err(_) => Some(Self::UnknownCommand(command)),
        }
    }
}
