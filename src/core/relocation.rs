use tracing::{debug, warn};

use crate::core::errors::{BuildError, BuildResult};
use crate::core::inventory::Inventory;
use crate::core::options::CloneOptions;
use crate::core::progress::ProgressSink;
use crate::core::types::{DiskMoveMode, RelocationPlan, SourceVm};

pub const POOL_REQUIRED: &str = "host or resource_pool required for template clone";
pub const LINKED_CLONE_IGNORED: &str = "linked clone ignored for template source";

/// Decides host, pool, datastore and disk backing for the new VM.
pub struct RelocationPlanner<'a> {
    inventory: &'a dyn Inventory,
    progress: &'a dyn ProgressSink,
}

impl<'a> RelocationPlanner<'a> {
    pub fn new(inventory: &'a dyn Inventory, progress: &'a dyn ProgressSink) -> Self {
        Self {
            inventory,
            progress,
        }
    }

    pub fn plan(&self, template: &SourceVm, options: &CloneOptions) -> BuildResult<RelocationPlan> {
        let host = options
            .host
            .as_deref()
            .map(|name| self.inventory.find_host(name))
            .transpose()?;

        let pool = match (options.resource_pool.as_deref(), &host) {
            (Some(name), _) => Some(self.inventory.find_resource_pool(name)?),
            // templates can only land in the host's root pool
            (None, Some(host)) if template.is_template => Some(host.root_pool.clone()),
            (None, None) if template.is_template => {
                return Err(BuildError::validation(POOL_REQUIRED));
            }
            (None, _) => None,
        };

        let disk_move_mode = if !options.use_linked_clone {
            DiskMoveMode::None
        } else if template.is_template {
            warn!(template = %template.name, "{}", LINKED_CLONE_IGNORED);
            self.progress.report(LINKED_CLONE_IGNORED);
            DiskMoveMode::None
        } else {
            debug!(source = %template.name, "creating delta disk for linked clone");
            self.inventory.create_delta_disk(template)?;
            DiskMoveMode::MoveChildMostDiskBacking
        };

        let datastore = match options.datastore.as_deref() {
            Some(name) if !name.is_empty() => Some(self.inventory.find_datastore(name)?),
            _ => None,
        };

        Ok(RelocationPlan {
            host,
            pool,
            datastore,
            disk_move_mode,
        })
    }
}
