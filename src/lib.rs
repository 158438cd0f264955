#![no_std]

//! Control core of a dual rotary-encoder warm/cold LED panel.
//!
//! Hardware is reached only through `embedded-hal` and `embedded-storage`
//! traits and every timestamp is passed in by the caller, so the whole crate
//! runs unmodified on the target and in host tests.

pub mod channel;
pub mod command;
pub mod config;
pub mod controller;
pub mod encoder;
pub mod output;
pub mod persist;
pub mod store;

pub use channel::{Channel, QueueFull, Receiver, Sender};
pub use command::{Command, ParseError, Report, StateReport, Topics};
pub use config::{ControlConfig, DeviceConfig, MqttConfig, StorageLayout, WifiConfig};
pub use controller::{
    CommandChannel, CommandReceiver, CommandSender, Controller, Phase, ReportChannel,
    ReportReceiver, ReportSender, TickResult,
};
pub use encoder::{EncoderPair, QuadratureDecoder, decode_step};
pub use output::{BlendFn, DriveLevels, MixInput, OutputStage, cross_fade};
pub use persist::{PersistenceService, SchemaError};
pub use store::{ControlId, OutOfRange, ValueStore};

pub use embassy_time::{Duration, Instant};
