pub mod authoring;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod matcher;
pub mod model;
pub mod retry;
pub mod scoring;
pub mod search;
pub mod store;
pub mod test_utils;

pub use error::{Result, RmError};
pub use matcher::RoleMatcher;
pub use model::{AuthoredRole, HierarchyLevel, JobDescription, Role, RoleMatch};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
