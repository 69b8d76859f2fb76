//! Sub-project repository contract and SQLite implementation.
//!
//! # Invariants
//! - `code` uniqueness is enforced by the `sub_projects.code` UNIQUE index.
//! - `import` writes all records or none (single transaction).

use super::{constraint_violation, ListQuery, RepoError, RepoResult};
use crate::import::{ImportOutcome, ImportStore};
use crate::model::sub_project::SubProject;
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUB_PROJECT_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    code,
    name,
    description,
    created_at
FROM sub_projects";

const SUB_PROJECT_INSERT_SQL: &str = "INSERT INTO sub_projects (
    project_id,
    code,
    name,
    description
) VALUES (?1, ?2, ?3, ?4);";

/// Repository interface for sub-project CRUD and bulk import.
pub trait SubProjectRepository: ImportStore<SubProject> {
    fn create(&self, sub_project: &SubProject) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Option<SubProject>>;
    fn list(&self, query: &ListQuery) -> RepoResult<Vec<SubProject>>;
    fn update(&self, sub_project: &SubProject) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed sub-project repository.
pub struct SqliteSubProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SubProjectRepository for SqliteSubProjectRepository<'_> {
    fn create(&self, sub_project: &SubProject) -> RepoResult<EntityId> {
        sub_project.validate()?;

        self.conn.execute(
            SUB_PROJECT_INSERT_SQL,
            params![
                sub_project.project_id,
                sub_project.code.as_str(),
                sub_project.name.as_str(),
                sub_project.description.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<SubProject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUB_PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_sub_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn list(&self, query: &ListQuery) -> RepoResult<Vec<SubProject>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUB_PROJECT_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![
            i64::from(query.effective_take()),
            i64::from(query.skip)
        ])?;
        collect_rows(&mut rows)
    }

    fn update(&self, sub_project: &SubProject) -> RepoResult<()> {
        sub_project.validate()?;

        let changed = self.conn.execute(
            "UPDATE sub_projects
             SET
                project_id = ?1,
                code = ?2,
                name = ?3,
                description = ?4
             WHERE id = ?5;",
            params![
                sub_project.project_id,
                sub_project.code.as_str(),
                sub_project.name.as_str(),
                sub_project.description.as_deref(),
                sub_project.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(sub_project.id));
        }
        Ok(())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sub_projects WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

impl ImportStore<SubProject> for SqliteSubProjectRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<SubProject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUB_PROJECT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_rows(&mut rows)
    }

    fn import(&self, entities: &[SubProject]) -> RepoResult<ImportOutcome> {
        if entities.is_empty() {
            return Ok(ImportOutcome::empty_batch());
        }
        if let Some(rejected) =
            ImportOutcome::first_invalid("sub-project", entities, SubProject::validate)
        {
            return Ok(rejected);
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut find_code = tx.prepare("SELECT id FROM sub_projects WHERE code = ?1;")?;
            let mut insert = tx.prepare(SUB_PROJECT_INSERT_SQL)?;
            for sub_project in entities {
                let taken: Option<EntityId> = find_code
                    .query_row([sub_project.code.as_str()], |row| row.get(0))
                    .optional()?;
                if let Some(id) = taken {
                    return Ok(ImportOutcome::conflicts(&[id]));
                }

                let inserted = insert.execute(params![
                    sub_project.project_id,
                    sub_project.code.as_str(),
                    sub_project.name.as_str(),
                    sub_project.description.as_deref(),
                ]);
                if let Err(err) = inserted {
                    return match constraint_violation(&err) {
                        Some(message) => Ok(ImportOutcome::bad_request(message)),
                        None => Err(err.into()),
                    };
                }
            }
        }
        tx.commit()?;

        Ok(ImportOutcome::imported(entities.len()))
    }
}

fn collect_rows(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<SubProject>> {
    let mut sub_projects = Vec::new();
    while let Some(row) = rows.next()? {
        sub_projects.push(parse_sub_project_row(row)?);
    }
    Ok(sub_projects)
}

fn parse_sub_project_row(row: &Row<'_>) -> RepoResult<SubProject> {
    let sub_project = SubProject {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    };
    sub_project.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "sub_projects row {} failed validation: {err}",
            sub_project.id
        ))
    })?;
    Ok(sub_project)
}
