pub mod clone_spec;
pub mod customization;
pub mod errors;
pub mod hostname;
pub mod identity;
pub mod inventory;
pub mod options;
pub mod progress;
pub mod relocation;
pub mod types;

pub use clone_spec::CloneSpecBuilder;
pub use errors::{BuildError, BuildResult, ObjectKind};
pub use inventory::{Inventory, NetworkPlanner};
pub use options::{CloneOptions, CustomizationSpecRef, StructuredSpec};
pub use progress::{ProgressSink, RecordingSink, TracingSink};
pub use types::{CloneRequest, SourceVm};
