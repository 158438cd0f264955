//! Network command ingress and state reporting.
//!
//! Commands arrive as compact JSON frames on the device's base topic and
//! reports go out on the companion state topic. A frame targets one channel
//! with either an absolute value or a relative step, or asks for the current
//! state with `get`. Malformed payloads are rejected and logged, never
//! crashing the loop; range validation happens later in the value store.
//!
//! Frame examples:
//!
//! ```json
//! {"channel": "intensity", "set": 20}
//! {"channel": "temperature", "step": -1}
//! {"get": true}
//! ```

use core::fmt::Write;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::store::{ControlId, OutOfRange};

/// Longest accepted/produced JSON payload.
pub const PAYLOAD_CAPACITY: usize = 128;

/// Raw inbound frame, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct CommandFrame<'a> {
    channel: Option<&'a str>,
    set: Option<i16>,
    step: Option<i16>,
    get: Option<bool>,
}

/// A validated command ready for the controller loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Replace a channel value. Range-checked by the store on apply.
    Set { channel: ControlId, value: i16 },
    /// Step a channel value, saturating at the bounds.
    Step { channel: ControlId, delta: i16 },
    /// Publish the current state on the response topic.
    Get,
}

/// Why an inbound payload was rejected before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Payload is not a valid frame.
    Malformed,
    /// `channel` names neither `intensity` nor `temperature`.
    UnknownChannel,
    /// Frame carries no complete action: no `set`, `step` or `get`, or a
    /// `set`/`step` without a channel.
    NoAction,
    /// `set` and `step` in one frame, or an action alongside `get`.
    AmbiguousAction,
}

/// Parse and validate one inbound payload.
pub fn parse(payload: &[u8]) -> Result<Command, ParseError> {
    let (frame, _) = serde_json_core::de::from_slice::<CommandFrame>(payload)
        .map_err(|_| ParseError::Malformed)?;

    if frame.get == Some(true) {
        if frame.set.is_some() || frame.step.is_some() {
            return Err(ParseError::AmbiguousAction);
        }
        return Ok(Command::Get);
    }

    let channel = match frame.channel {
        Some(name) => ControlId::parse_from_str(name).ok_or(ParseError::UnknownChannel)?,
        None => return Err(ParseError::NoAction),
    };
    match (frame.set, frame.step) {
        (Some(value), None) => Ok(Command::Set { channel, value }),
        (None, Some(delta)) => Ok(Command::Step { channel, delta }),
        (Some(_), Some(_)) => Err(ParseError::AmbiguousAction),
        (None, None) => Err(ParseError::NoAction),
    }
}

/// Snapshot of both channels, published on change and in reply to `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateReport {
    pub intensity: i16,
    pub temperature: i16,
}

/// Outbound message for the network shell to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    State(StateReport),
    /// Explicit acknowledgment of a rejected `set`.
    Rejected(OutOfRange),
    /// Explicit acknowledgment of an unparseable payload.
    Malformed,
}

#[derive(Serialize)]
struct RejectedAck<'a> {
    error: &'a str,
    channel: &'a str,
    value: i16,
    max: i16,
}

#[derive(Serialize)]
struct MalformedAck<'a> {
    error: &'a str,
}

/// Encode one report as a JSON payload.
pub fn encode(report: &Report) -> Result<String<PAYLOAD_CAPACITY>, serde_json_core::ser::Error> {
    match report {
        Report::State(state) => serde_json_core::ser::to_string(state),
        Report::Rejected(rejected) => serde_json_core::ser::to_string(&RejectedAck {
            error: "out_of_range",
            channel: rejected.channel.as_str(),
            value: rejected.value,
            max: rejected.max,
        }),
        Report::Malformed => serde_json_core::ser::to_string(&MalformedAck {
            error: "malformed",
        }),
    }
}

/// Topic pair derived from the configured base topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Commands in, e.g. `panneau_led/1`.
    pub command: String<80>,
    /// Reports and acks out, e.g. `panneau_led/1/state`.
    pub state: String<80>,
}

impl Topics {
    pub fn new(base_topic: &str) -> Self {
        let mut command = String::new();
        let mut state = String::new();
        let _ = write!(command, "{base_topic}");
        let _ = write!(state, "{base_topic}/state");
        Self { command, state }
    }
}
