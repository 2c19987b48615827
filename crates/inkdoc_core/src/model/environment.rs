//! Live input environment of the running application.
//!
//! Strokes drawn in the current session carry sensor data whose input
//! context belongs to this environment. The encoder registers it in a saved
//! document only when such sensor data is written; a later launch builds a
//! new environment with new ids and relies on the merge base for old ones.

use crate::model::id::Identifier;
use crate::model::input::{
    Environment, InputContext, InputDevice, InputProvider, InputProviderKind, SensorChannel,
    SensorChannelsContext, SensorContext,
};
use crate::repo::input_config::{InputConfiguration, MergeCounts};
use std::collections::BTreeMap;

/// One consistent set of input entities describing the capturing device.
#[derive(Debug, Clone, PartialEq)]
pub struct InkEnvironment {
    pub environment: Environment,
    pub provider: InputProvider,
    pub device: InputDevice,
    pub sensor_context: SensorContext,
    pub input_context: InputContext,
}

impl InkEnvironment {
    /// Builds linked entities for one provider sampling `channels`.
    pub fn new(
        provider_kind: InputProviderKind,
        environment_properties: BTreeMap<String, String>,
        device_properties: BTreeMap<String, String>,
        channels: Vec<SensorChannel>,
    ) -> Self {
        let environment = Environment {
            id: Identifier::new(),
            properties: environment_properties,
        };
        let provider = InputProvider {
            id: Identifier::new(),
            kind: provider_kind,
            properties: BTreeMap::new(),
        };
        let device = InputDevice {
            id: Identifier::new(),
            properties: device_properties,
        };
        let sensor_context = SensorContext {
            id: Identifier::new(),
            channels_contexts: vec![SensorChannelsContext {
                id: Identifier::new(),
                input_device_id: device.id,
                input_provider_id: Some(provider.id),
                sampling_rate_hint: None,
                latency_ms: None,
                channels,
            }],
        };
        let input_context = InputContext {
            id: Identifier::new(),
            environment_id: environment.id,
            sensor_context_id: sensor_context.id,
        };
        Self {
            environment,
            provider,
            device,
            sensor_context,
            input_context,
        }
    }

    /// Input context id to stamp on sensor data captured here.
    pub fn input_context_id(&self) -> Identifier {
        self.input_context.id
    }

    /// Channels sampled by this environment.
    pub fn channels(&self) -> &[SensorChannel] {
        self.sensor_context.primary_channels()
    }

    /// Adds each entity to `config` unless its id is already present.
    pub fn register_in(&self, config: &mut InputConfiguration) -> MergeCounts {
        MergeCounts {
            environments: usize::from(config.environments.add(self.environment.clone())),
            input_providers: usize::from(config.input_providers.add(self.provider.clone())),
            input_devices: usize::from(config.input_devices.add(self.device.clone())),
            input_contexts: usize::from(config.input_contexts.add(self.input_context.clone())),
            sensor_contexts: usize::from(config.sensor_contexts.add(self.sensor_context.clone())),
        }
    }
}
