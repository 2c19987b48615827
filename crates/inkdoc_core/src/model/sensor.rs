//! Raw sensor samples recorded while a stroke was drawn.

use crate::model::id::{Identifier, SensorDataId};
use serde::{Deserialize, Serialize};

/// Visibility of a sensor data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkState {
    #[default]
    Plane,
    Hovering,
    InVolume,
    VolumeHovering,
}

/// Samples of one sensor channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub sensor_channel_id: Identifier,
    pub values: Vec<f64>,
}

/// One block of raw input samples, shared by every stroke cut from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub id: SensorDataId,
    pub input_context_id: Identifier,
    #[serde(default)]
    pub state: InkState,
    /// Capture start, epoch milliseconds.
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default)]
    pub channels: Vec<ChannelData>,
}

impl SensorData {
    pub fn new(input_context_id: Identifier) -> Self {
        Self {
            id: Identifier::new(),
            input_context_id,
            state: InkState::default(),
            timestamp_ms: 0,
            channels: Vec::new(),
        }
    }

    /// Samples for `channel_id`, if recorded.
    pub fn channel(&self, channel_id: Identifier) -> Option<&ChannelData> {
        self.channels
            .iter()
            .find(|data| data.sensor_channel_id == channel_id)
    }
}
