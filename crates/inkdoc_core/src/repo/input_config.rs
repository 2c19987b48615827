//! Input configuration side-tables.
//!
//! # Responsibility
//! - Group the five input repositories of a document.
//! - Walk input context -> sensor context -> channel list.
//! - Merge definitions from a previously loaded document without duplication.

use crate::model::id::Identifier;
use crate::model::input::{
    Environment, InputContext, InputDevice, InputProvider, SensorChannel, SensorContext,
};
use crate::repo::repository::Repository;
use serde::{Deserialize, Serialize};

/// Input repositories of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfiguration {
    #[serde(default)]
    pub environments: Repository<Environment>,
    #[serde(default)]
    pub input_providers: Repository<InputProvider>,
    #[serde(default)]
    pub input_devices: Repository<InputDevice>,
    #[serde(default)]
    pub input_contexts: Repository<InputContext>,
    #[serde(default)]
    pub sensor_contexts: Repository<SensorContext>,
}

/// Entries inserted by one merge, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeCounts {
    pub environments: usize,
    pub input_providers: usize,
    pub input_devices: usize,
    pub input_contexts: usize,
    pub sensor_contexts: usize,
}

impl MergeCounts {
    pub fn total(&self) -> usize {
        self.environments
            + self.input_providers
            + self.input_devices
            + self.input_contexts
            + self.sensor_contexts
    }
}

/// First missing link when resolving a channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookupMiss {
    InputContext(Identifier),
    SensorContext(Identifier),
}

impl InputConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_environment(&self, id: Identifier) -> Option<&Environment> {
        self.environments.get(&id)
    }

    pub fn get_input_provider(&self, id: Identifier) -> Option<&InputProvider> {
        self.input_providers.get(&id)
    }

    pub fn get_input_device(&self, id: Identifier) -> Option<&InputDevice> {
        self.input_devices.get(&id)
    }

    pub fn get_input_context(&self, id: Identifier) -> Option<&InputContext> {
        self.input_contexts.get(&id)
    }

    pub fn get_sensor_context(&self, id: Identifier) -> Option<&SensorContext> {
        self.sensor_contexts.get(&id)
    }

    /// Adds every entity of `other` whose id is absent here.
    pub fn merge_missing(&mut self, other: &Self) -> MergeCounts {
        MergeCounts {
            environments: self.environments.merge_missing(&other.environments),
            input_providers: self.input_providers.merge_missing(&other.input_providers),
            input_devices: self.input_devices.merge_missing(&other.input_devices),
            input_contexts: self.input_contexts.merge_missing(&other.input_contexts),
            sensor_contexts: self.sensor_contexts.merge_missing(&other.sensor_contexts),
        }
    }

    /// Channel list of the first grouping of the input context's sensor
    /// context. A context without groupings yields an empty list.
    pub fn channels_for_input_context(
        &self,
        input_context_id: Identifier,
    ) -> Result<&[SensorChannel], ChannelLookupMiss> {
        let input_context = self
            .get_input_context(input_context_id)
            .ok_or(ChannelLookupMiss::InputContext(input_context_id))?;
        let sensor_context = self
            .get_sensor_context(input_context.sensor_context_id)
            .ok_or(ChannelLookupMiss::SensorContext(
                input_context.sensor_context_id,
            ))?;
        Ok(sensor_context.primary_channels())
    }

    pub fn entity_count(&self) -> usize {
        self.environments.len()
            + self.input_providers.len()
            + self.input_devices.len()
            + self.input_contexts.len()
            + self.sensor_contexts.len()
    }
}
