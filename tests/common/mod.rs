// Hand-written collaborators shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use vsphere_clone_builder::core::errors::{BuildError, BuildResult, ObjectKind};
use vsphere_clone_builder::core::inventory::{Inventory, NetworkPlanner};
use vsphere_clone_builder::core::options::CloneOptions;
use vsphere_clone_builder::core::types::{
    Datastore, DeviceChange, DeviceChanges, DeviceOperation, Host, NamedCustomizationSpec,
    ResourcePool, SourceVm,
};

/// Knows one host, `pool-A`, `ds1` and the `linux-default` spec; counts
/// delta disk requests.
#[derive(Default)]
pub struct MockInventory {
    pub delta_disks: AtomicUsize,
}

impl MockInventory {
    pub fn delta_disk_calls(&self) -> usize {
        self.delta_disks.load(Ordering::SeqCst)
    }
}

impl Inventory for MockInventory {
    fn find_host(&self, name: &str) -> BuildResult<Host> {
        match name {
            "esx01" => Ok(Host {
                moref: "host-10".into(),
                name: name.into(),
                root_pool: ResourcePool {
                    moref: "resgroup-8".into(),
                    name: "Resources".into(),
                },
            }),
            _ => Err(BuildError::not_found(ObjectKind::Host, name)),
        }
    }

    fn find_resource_pool(&self, name: &str) -> BuildResult<ResourcePool> {
        match name {
            "pool-A" => Ok(ResourcePool {
                moref: "resgroup-20".into(),
                name: name.into(),
            }),
            _ => Err(BuildError::not_found(ObjectKind::ResourcePool, name)),
        }
    }

    fn find_datastore(&self, name: &str) -> BuildResult<Datastore> {
        match name {
            "ds1" => Ok(Datastore {
                moref: "datastore-11".into(),
                name: name.into(),
            }),
            _ => Err(BuildError::not_found(ObjectKind::Datastore, name)),
        }
    }

    fn find_customization_spec(&self, name: &str) -> BuildResult<NamedCustomizationSpec> {
        match name {
            "linux-default" => Ok(NamedCustomizationSpec {
                name: name.into(),
                description: Some("stock linux spec".into()),
            }),
            _ => Err(BuildError::not_found(ObjectKind::CustomizationSpec, name)),
        }
    }

    fn create_delta_disk(&self, _vm: &SourceVm) -> BuildResult<()> {
        self.delta_disks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Always adds a single NIC on the requested network.
pub struct FixedNetworkPlanner;

impl NetworkPlanner for FixedNetworkPlanner {
    fn compute_device_changes(
        &self,
        _template: &SourceVm,
        options: &CloneOptions,
    ) -> BuildResult<DeviceChanges> {
        Ok(DeviceChanges {
            additions: vec![DeviceChange {
                operation: DeviceOperation::Add,
                key: -1,
                adapter_type: "vmxnet3".into(),
                network: options.network_name.clone().unwrap_or_default(),
            }],
            changes: Vec::new(),
        })
    }
}

pub fn linux_template() -> SourceVm {
    SourceVm {
        moref: "vm-42".into(),
        name: "linux-tpl".into(),
        is_template: true,
        guest_id: "otherLinux64Guest".into(),
        nics: Vec::new(),
    }
}

pub fn linux_vm() -> SourceVm {
    SourceVm {
        moref: "vm-43".into(),
        name: "linux-vm".into(),
        is_template: false,
        guest_id: "otherLinux64Guest".into(),
        nics: Vec::new(),
    }
}

pub fn windows_template() -> SourceVm {
    SourceVm {
        moref: "vm-50".into(),
        name: "win-tpl".into(),
        is_template: true,
        guest_id: "windows9Server64Guest".into(),
        nics: Vec::new(),
    }
}

pub fn options(raw: &str) -> CloneOptions {
    toml::from_str(raw).expect("test options parse")
}
