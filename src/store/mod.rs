//! Persistence boundary for role records.
//!
//! The production store is owned by an external collaborator; this
//! crate consumes its contract through [`RoleStore`] and ships a SQLite
//! adapter for local use and round-trip verification.

pub mod sqlite;

use crate::error::Result;
use crate::model::Role;

pub use sqlite::SqliteRoleStore;

/// CRUD contract for role records, including the industry join.
///
/// Roles are never hard-deleted; [`deactivate`](Self::deactivate) flips
/// the active flag so existing references keep resolving.
pub trait RoleStore: Send + Sync {
    /// Persist a new role. The role's industry must already be known to
    /// the store (see [`upsert_industry`](Self::upsert_industry)).
    fn insert(&self, role: &Role) -> Result<()>;

    /// Fetch a role by id with its industry name joined in.
    fn fetch(&self, id: &str) -> Result<Option<Role>>;

    /// All active roles, industry-joined, in creation order.
    fn fetch_all_active(&self) -> Result<Vec<Role>>;

    /// Mark a role inactive.
    fn deactivate(&self, id: &str) -> Result<()>;

    /// Create or rename an industry.
    fn upsert_industry(&self, id: &str, name: &str) -> Result<()>;

    /// Resolve an industry name by id.
    fn industry_name(&self, id: &str) -> Result<Option<String>>;
}
