//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - `code` uniqueness is enforced by the `tasks.code` UNIQUE index.
//! - Status is persisted as snake_case text.
//! - `import` writes all records or none (single transaction).

use super::{constraint_violation, ListQuery, RepoError, RepoResult};
use crate::import::{ImportOutcome, ImportStore};
use crate::model::task::{Task, TaskStatus};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row, Rows};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    sub_project_id,
    code,
    name,
    description,
    status,
    estimate_hours,
    created_at
FROM tasks";

const TASK_INSERT_SQL: &str = "INSERT INTO tasks (
    sub_project_id,
    code,
    name,
    description,
    status,
    estimate_hours
) VALUES (?1, ?2, ?3, ?4, ?5, ?6);";

/// Repository interface for task CRUD and bulk import.
pub trait TaskRepository: ImportStore<Task> {
    fn create(&self, task: &Task) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Option<Task>>;
    fn list(&self, query: &ListQuery) -> RepoResult<Vec<Task>>;
    /// Lists tasks of one sub-project, same paging rules as `list`.
    fn list_by_sub_project(
        &self,
        sub_project_id: EntityId,
        query: &ListQuery,
    ) -> RepoResult<Vec<Task>>;
    fn update(&self, task: &Task) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, task: &Task) -> RepoResult<EntityId> {
        task.validate()?;

        self.conn.execute(
            TASK_INSERT_SQL,
            params![
                task.sub_project_id,
                task.code.as_str(),
                task.name.as_str(),
                task.description.as_deref(),
                task.status.as_db_str(),
                task.estimate_hours,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list(&self, query: &ListQuery) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![
            i64::from(query.effective_take()),
            i64::from(query.skip)
        ])?;
        collect_rows(&mut rows)
    }

    fn list_by_sub_project(
        &self,
        sub_project_id: EntityId,
        query: &ListQuery,
    ) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE sub_project_id = ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            sub_project_id,
            i64::from(query.effective_take()),
            i64::from(query.skip)
        ])?;
        collect_rows(&mut rows)
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                sub_project_id = ?1,
                code = ?2,
                name = ?3,
                description = ?4,
                status = ?5,
                estimate_hours = ?6
             WHERE id = ?7;",
            params![
                task.sub_project_id,
                task.code.as_str(),
                task.name.as_str(),
                task.description.as_deref(),
                task.status.as_db_str(),
                task.estimate_hours,
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }
        Ok(())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

impl ImportStore<Task> for SqliteTaskRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_rows(&mut rows)
    }

    fn import(&self, entities: &[Task]) -> RepoResult<ImportOutcome> {
        if entities.is_empty() {
            return Ok(ImportOutcome::empty_batch());
        }
        if let Some(rejected) = ImportOutcome::first_invalid("task", entities, Task::validate) {
            return Ok(rejected);
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut find_code = tx.prepare("SELECT id FROM tasks WHERE code = ?1;")?;
            let mut insert = tx.prepare(TASK_INSERT_SQL)?;
            for task in entities {
                let taken: Option<EntityId> = find_code
                    .query_row([task.code.as_str()], |row| row.get(0))
                    .optional()?;
                if let Some(id) = taken {
                    return Ok(ImportOutcome::conflicts(&[id]));
                }

                if let Err(err) = insert.execute(params![
                    task.sub_project_id,
                    task.code.as_str(),
                    task.name.as_str(),
                    task.description.as_deref(),
                    task.status.as_db_str(),
                    task.estimate_hours,
                ]) {
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

fn collect_rows(rows: &mut Rows<'_>) -> RepoResult<Vec<Task>> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse_db_str(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let task = Task {
        id: row.get("id")?,
        sub_project_id: row.get("sub_project_id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status,
        estimate_hours: row.get("estimate_hours")?,
        created_at: row.get("created_at")?,
    };
    task.validate().map_err(|err| {
        RepoError::InvalidData(format!("tasks row {} failed validation: {err}", task.id))
    })?;
    Ok(task)
}
