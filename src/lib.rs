pub mod cli;
pub mod config;
pub mod core;
pub mod inventory;
pub mod network;

// Re-exports
pub use crate::core::{
    BuildError, BuildResult, CloneOptions, CloneRequest, CloneSpecBuilder, Inventory,
    NetworkPlanner, ProgressSink, SourceVm,
};
pub use inventory::StaticInventory;
pub use network::PortgroupNetworkPlanner;
