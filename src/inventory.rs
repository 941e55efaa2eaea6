use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::core::errors::{BuildError, BuildResult, ObjectKind};
use crate::core::inventory::Inventory;
use crate::core::types::{Datastore, Host, NamedCustomizationSpec, ResourcePool, SourceVm};

#[derive(Debug, Deserialize)]
struct HostEntry {
    name: String,
    moref: String,
    root_pool: String,
}

/// Inventory snapshot read from a TOML file, for dry-run builds.
///
/// Delta disk creation is only recorded. Preparing the same source twice is a
/// no-op.
#[derive(Debug, Default, Deserialize)]
pub struct StaticInventory {
    #[serde(default)]
    hosts: Vec<HostEntry>,
    #[serde(default)]
    resource_pools: Vec<ResourcePool>,
    #[serde(default)]
    datastores: Vec<Datastore>,
    #[serde(default)]
    customization_specs: Vec<NamedCustomizationSpec>,
    #[serde(default)]
    vms: Vec<SourceVm>,
    #[serde(skip)]
    prepared: Mutex<BTreeSet<String>>,
}

impl StaticInventory {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading inventory from {}", path.display()))?;
        let inventory = Self::from_toml(&raw)
            .with_context(|| format!("parsing inventory {}", path.display()))?;
        info!(
            hosts = inventory.hosts.len(),
            pools = inventory.resource_pools.len(),
            vms = inventory.vms.len(),
            "loaded inventory from {}",
            path.display()
        );
        Ok(inventory)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn find_vm(&self, name: &str) -> BuildResult<SourceVm> {
        self.vms
            .iter()
            .find(|vm| vm.name == name)
            .cloned()
            .ok_or_else(|| BuildError::not_found(ObjectKind::VirtualMachine, name))
    }

    /// Sources that have had a delta disk created, by moref.
    pub fn prepared_sources(&self) -> Vec<String> {
        match self.prepared.lock() {
            Ok(prepared) => prepared.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn pool_by_moref(&self, moref: &str) -> BuildResult<ResourcePool> {
        self.resource_pools
            .iter()
            .find(|pool| pool.moref == moref)
            .cloned()
            .ok_or_else(|| BuildError::not_found(ObjectKind::ResourcePool, moref))
    }
}

impl Inventory for StaticInventory {
    fn find_host(&self, name: &str) -> BuildResult<Host> {
        let entry = self
            .hosts
            .iter()
            .find(|host| host.name == name)
            .ok_or_else(|| BuildError::not_found(ObjectKind::Host, name))?;
        Ok(Host {
            moref: entry.moref.clone(),
            name: entry.name.clone(),
            root_pool: self.pool_by_moref(&entry.root_pool)?,
        })
    }

    fn find_resource_pool(&self, name: &str) -> BuildResult<ResourcePool> {
        self.resource_pools
            .iter()
            .find(|pool| pool.name == name)
            .cloned()
            .ok_or_else(|| BuildError::not_found(ObjectKind::ResourcePool, name))
    }

    fn find_datastore(&self, name: &str) -> BuildResult<Datastore> {
        self.datastores
            .iter()
            .find(|ds| ds.name == name)
            .cloned()
            .ok_or_else(|| BuildError::not_found(ObjectKind::Datastore, name))
    }

    fn find_customization_spec(&self, name: &str) -> BuildResult<NamedCustomizationSpec> {
        self.customization_specs
            .iter()
            .find(|spec| spec.name == name)
            .cloned()
            .ok_or_else(|| BuildError::not_found(ObjectKind::CustomizationSpec, name))
    }

    fn create_delta_disk(&self, vm: &SourceVm) -> BuildResult<()> {
        if !self.vms.iter().any(|known| known.moref == vm.moref) {
            return Err(BuildError::not_found(ObjectKind::VirtualMachine, &vm.name));
        }
        let mut prepared = self
            .prepared
            .lock()
            .map_err(|_| BuildError::Inventory("delta disk registry poisoned".to_string()))?;
        if prepared.insert(vm.moref.clone()) {
            info!(vm = %vm.name, "delta disk created");
        } else {
            debug!(vm = %vm.name, "delta disk already prepared");
        }
        Ok(())
    }
}
