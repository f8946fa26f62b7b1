//! SQLite adapter for the role store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::{Result, RmError};
use crate::model::{HierarchyLevel, Role};
use crate::store::RoleStore;

/// SQLite-backed [`RoleStore`]. The connection sits behind a mutex so
/// the store can be shared by reference across request threads.
pub struct SqliteRoleStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteRoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRoleStore").finish_non_exhaustive()
    }
}

impl SqliteRoleStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn bootstrap(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS industries (
                id   TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS roles (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                industry_id     TEXT NOT NULL REFERENCES industries(id),
                hierarchy_level TEXT NOT NULL,
                search_keywords TEXT NOT NULL,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_roles_active ON roles(is_active);",
        )?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock means a panic mid-statement; propagating the
        // panic is the only sound option.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

const ROLE_COLUMNS: &str = "r.id, r.title, r.description, r.industry_id, i.name, \
     r.hierarchy_level, r.search_keywords, r.is_active, r.created_at";

fn map_role(row: &Row<'_>) -> rusqlite::Result<RoleRow> {
    Ok(RoleRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        industry_id: row.get(3)?,
        industry_name: row.get(4)?,
        hierarchy_level: row.get(5)?,
        search_keywords: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
    })
}

struct RoleRow {
    id: String,
    title: String,
    description: String,
    industry_id: String,
    industry_name: String,
    hierarchy_level: String,
    search_keywords: String,
    is_active: bool,
    created_at: String,
}

impl RoleRow {
    fn into_role(self) -> Result<Role> {
        let level: HierarchyLevel = self.hierarchy_level.parse()?;
        let keywords: Vec<String> = serde_json::from_str(&self.search_keywords)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|err| {
                RmError::Config(format!("invalid created_at for role {}: {err}", self.id))
            })?
            .with_timezone(&Utc);

        Ok(Role {
            id: self.id,
            title: self.title,
            description: self.description,
            industry_id: self.industry_id,
            industry_name: self.industry_name,
            level,
            search_keywords: keywords,
            is_active: self.is_active,
            created_at,
        })
    }
}

impl RoleStore for SqliteRoleStore {
    fn insert(&self, role: &Role) -> Result<()> {
        let keywords = serde_json::to_string(&role.search_keywords)?;
        let conn = self.lock();

        let known: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM industries WHERE id = ?1",
                params![role.industry_id],
                |row| row.get(0),
            )?;
        if !known {
            return Err(RmError::Validation(format!(
                "unknown industry id: {}",
                role.industry_id
            )));
        }

        conn.execute(
            "INSERT INTO roles (id, title, description, industry_id, hierarchy_level,
                                search_keywords, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                role.id,
                role.title,
                role.description,
                role.industry_id,
                role.level.to_string(),
                keywords,
                role.is_active,
                role.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Option<Role>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles r JOIN industries i ON i.id = r.industry_id
             WHERE r.id = ?1"
        ))?;

        let mut rows = stmt.query_map(params![id], map_role)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_role()?)),
            None => Ok(None),
        }
    }

    fn fetch_all_active(&self) -> Result<Vec<Role>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles r JOIN industries i ON i.id = r.industry_id
             WHERE r.is_active = 1 ORDER BY r.created_at, r.id"
        ))?;

        let rows = stmt.query_map([], map_role)?;
        let mut roles = Vec::new();
        for row in rows {
            roles.push(row?.into_role()?);
        }
        Ok(roles)
    }

    fn deactivate(&self, id: &str) -> Result<()> {
        let changed = self.lock().execute(
            "UPDATE roles SET is_active = 0 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(RmError::RoleNotFound(id.to_string()));
        }
        Ok(())
    }

    fn upsert_industry(&self, id: &str, name: &str) -> Result<()> {
        self.lock().execute(
            "INSERT INTO industries (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![id, name],
        )?;
        Ok(())
    }

    fn industry_name(&self, id: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT name FROM industries WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
