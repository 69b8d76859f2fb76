//! Project repository.
//!
//! Projects are a thin parent table so sub-project foreign keys resolve.

use super::{RepoError, RepoResult};
use crate::model::project::Project;
use crate::model::validation::{require_text, NAME_MAX_CHARS};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension};

pub trait ProjectRepository {
    /// Inserts the project or renames it when the id already exists.
    fn ensure_project(&self, id: EntityId, name: &str) -> RepoResult<Project>;
    fn get_project(&self, id: EntityId) -> RepoResult<Option<Project>>;
}

pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn ensure_project(&self, id: EntityId, name: &str) -> RepoResult<Project> {
        if id <= 0 {
            return Err(RepoError::InvalidData(format!(
                "project id must be positive, got {id}"
            )));
        }
        require_text("name", name, NAME_MAX_CHARS)?;

        self.conn.execute(
            "INSERT INTO projects (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name;",
            params![id, name],
        )?;

        self.get_project(id)?.ok_or(RepoError::NotFound(id))
    }

    fn get_project(&self, id: EntityId) -> RepoResult<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM projects WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Project {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(project)
    }
}
