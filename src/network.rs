use tracing::debug;

use crate::core::errors::BuildResult;
use crate::core::inventory::NetworkPlanner;
use crate::core::options::CloneOptions;
use crate::core::types::{
    DeviceChange, DeviceChanges, DeviceOperation, SourceVm, DEFAULT_ADAPTER_TYPE,
};

/// Puts the clone's first NIC on the requested port group, adding a NIC when
/// the source has none.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortgroupNetworkPlanner;

impl NetworkPlanner for PortgroupNetworkPlanner {
    fn compute_device_changes(
        &self,
        template: &SourceVm,
        options: &CloneOptions,
    ) -> BuildResult<DeviceChanges> {
        let Some(network) = options.network_name.as_deref() else {
            return Ok(DeviceChanges::default());
        };

        match template.nics.first() {
            Some(nic) => {
                debug!(nic = %nic.label, from = %nic.network, to = network, "rebinding nic");
                Ok(DeviceChanges {
                    additions: Vec::new(),
                    changes: vec![DeviceChange {
                        operation: DeviceOperation::Edit,
                        key: nic.key,
                        adapter_type: nic.adapter_type.clone(),
                        network: network.to_string(),
                    }],
                })
            }
            None => {
                debug!(network, "source has no nic, adding one");
                Ok(DeviceChanges {
                    additions: vec![DeviceChange {
                        operation: DeviceOperation::Add,
                        key: -1,
                        adapter_type: DEFAULT_ADAPTER_TYPE.to_string(),
                        network: network.to_string(),
                    }],
                    changes: Vec::new(),
                })
            }
        }
    }
}
