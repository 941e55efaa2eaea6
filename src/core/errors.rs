use std::fmt;
use thiserror::Error;

/// Kind of platform object an inventory lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Host,
    ResourcePool,
    Datastore,
    CustomizationSpec,
    VirtualMachine,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Host => write!(f, "host"),
            ObjectKind::ResourcePool => write!(f, "resource pool"),
            ObjectKind::Datastore => write!(f, "datastore"),
            ObjectKind::CustomizationSpec => write!(f, "customization spec"),
            ObjectKind::VirtualMachine => write!(f, "virtual machine"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {name}")]
    NotFound {
        kind: ObjectKind,
        name: String,
    },

    #[error("Inventory error: {0}")]
    Inventory(String),
}

impl BuildError {
    pub fn validation(message: impl Into<String>) -> Self {
        BuildError::Validation(message.into())
    }

    pub fn not_found(kind: ObjectKind, name: impl Into<String>) -> Self {
        BuildError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BuildError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BuildError::NotFound { .. })
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
