//! Input configuration entities.
//!
//! # Responsibility
//! - Describe the hardware and software context raw sensor samples came from.
//!
//! # Invariants
//! - `InputContext` links one environment to one sensor context.
//! - A `SensorContext` owns at least one channel grouping when produced by
//!   this crate; documents from other writers may carry none.
//! - Channel order inside a grouping is the sample column order.

use crate::model::id::Identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operating system / application environment the ink was captured in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: Identifier,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Physical pointer technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputProviderKind {
    Pen,
    Touch,
    Mouse,
    Controller,
}

/// Source of pointer events (a pen, a finger, a mouse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputProvider {
    pub id: Identifier,
    pub kind: InputProviderKind,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Digitizer or device that produced sensor samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDevice {
    pub id: Identifier,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Binds an environment to the sensor layout used while capturing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputContext {
    pub id: Identifier,
    pub environment_id: Identifier,
    pub sensor_context_id: Identifier,
}

/// Measurement unit of one sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorMetric {
    Length,
    Time,
    Force,
    Angle,
    Normalized,
}

/// One sampled axis (X, Y, pressure, tilt...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorChannel {
    pub id: Identifier,
    /// Axis URI, e.g. `will://input/3.0/channel/Pressure`.
    pub type_uri: String,
    pub metric: SensorMetric,
    #[serde(default)]
    pub resolution: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub precision: u32,
}

/// Ordered channel grouping captured by one device through one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorChannelsContext {
    pub id: Identifier,
    pub input_device_id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_provider_id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate_hint: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
    pub channels: Vec<SensorChannel>,
}

/// All channel groupings available to an input context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorContext {
    pub id: Identifier,
    pub channels_contexts: Vec<SensorChannelsContext>,
}

impl SensorContext {
    /// Channels of the first grouping, or empty when there is none.
    pub fn primary_channels(&self) -> &[SensorChannel] {
        self.channels_contexts
            .first()
            .map(|group| group.channels.as_slice())
            .unwrap_or(&[])
    }
}
