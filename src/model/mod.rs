//! Domain value objects for the matching and authoring core.
//!
//! `JobDescription` and `RoleMatch` are transient, owned by the calling
//! request. `Role` is owned by the persistence boundary; everything here
//! references it by value.

pub mod job;
pub mod role;

pub use job::{HierarchyLevel, JobDescription};
pub use role::{AiEnhancements, AuthoredRole, Role, RoleMatch};
