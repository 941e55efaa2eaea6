use crate::core::errors::BuildResult;
use crate::core::options::CloneOptions;
use crate::core::types::{
    Datastore, DeviceChanges, Host, NamedCustomizationSpec, ResourcePool, SourceVm,
};

/// Name-to-handle resolution against the platform inventory, plus the one
/// mutation the builder needs. Lookups fail with `BuildError::NotFound`.
pub trait Inventory {
    fn find_host(&self, name: &str) -> BuildResult<Host>;

    fn find_resource_pool(&self, name: &str) -> BuildResult<ResourcePool>;

    fn find_datastore(&self, name: &str) -> BuildResult<Datastore>;

    fn find_customization_spec(&self, name: &str) -> BuildResult<NamedCustomizationSpec>;

    /// Prepares the source VM's disks for a linked clone. This mutates the
    /// platform and is not rolled back if the build later fails.
    fn create_delta_disk(&self, vm: &SourceVm) -> BuildResult<()>;
}

/// Computes NIC additions and edits for the clone.
pub trait NetworkPlanner {
    fn compute_device_changes(
        &self,
        template: &SourceVm,
        options: &CloneOptions,
    ) -> BuildResult<DeviceChanges>;
}
