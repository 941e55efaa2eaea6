use tracing::info;

use crate::core::customization::CustomizationPlanner;
use crate::core::errors::BuildResult;
use crate::core::inventory::{Inventory, NetworkPlanner};
use crate::core::options::CloneOptions;
use crate::core::progress::ProgressSink;
use crate::core::relocation::RelocationPlanner;
use crate::core::types::{CloneRequest, ConfigOverrides, SourceVm};

/// Assembles a complete clone request from a source VM and the caller's options.
///
/// Holds only borrowed collaborators and no per-build state; one builder can
/// serve any number of builds.
pub struct CloneSpecBuilder<'a> {
    inventory: &'a dyn Inventory,
    network: &'a dyn NetworkPlanner,
    progress: &'a dyn ProgressSink,
    admin_password_override: Option<&'a str>,
}

impl<'a> CloneSpecBuilder<'a> {
    pub fn new(
        inventory: &'a dyn Inventory,
        network: &'a dyn NetworkPlanner,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            inventory,
            network,
            progress,
            admin_password_override: None,
        }
    }

    /// Domain admin password from the environment; wins over the one in the options.
    pub fn with_domain_admin_password(mut self, password: Option<&'a str>) -> Self {
        self.admin_password_override = password;
        self
    }

    /// Placement is resolved before customization, so placement errors are
    /// reported first. A linked-clone delta disk created during placement is
    /// left in place if customization then fails.
    pub fn build(
        &self,
        template: &SourceVm,
        target_name: &str,
        options: &CloneOptions,
    ) -> BuildResult<CloneRequest> {
        info!(template = %template.name, target = target_name, "building clone request");

        let device_changes = match options.network_name {
            Some(_) => self
                .network
                .compute_device_changes(template, options)?
                .into_ordered(),
            None => Vec::new(),
        };

        let config = ConfigOverrides {
            annotation: options.annotation.clone(),
            num_cpus: options.num_cpus,
            memory_mb: options.memory_mb,
            device_changes,
        };

        let placement = RelocationPlanner::new(self.inventory, self.progress).plan(template, options)?;

        let customization =
            CustomizationPlanner::new(self.inventory, self.progress, self.admin_password_override)
                .plan(template, target_name, options)?;

        Ok(CloneRequest {
            placement,
            power_on: false,
            template: false,
            config,
            customization,
        })
    }
}
