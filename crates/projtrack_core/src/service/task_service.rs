//! Task use-case service.

use super::{normalize_optional_text, normalize_text, ServiceError, ServiceResult};
use crate::import::{ImportOutcome, ImportReconciler};
use crate::model::task::{Task, TaskStatus};
use crate::model::EntityId;
use crate::repo::task_repo::TaskRepository;
use crate::repo::ListQuery;
use log::info;

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, task: &Task) -> ServiceResult<Task> {
        let normalized = normalize(task);
        normalized.validate()?;
        let id = self.repo.create(&normalized)?;
        info!("event=task_create module=service status=ok id={id}");
        self.repo.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Option<Task>> {
        Ok(self.repo.get(id)?)
    }

    pub fn list(&self, query: &ListQuery) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list(query)?)
    }

    pub fn list_by_sub_project(
        &self,
        sub_project_id: EntityId,
        query: &ListQuery,
    ) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_by_sub_project(sub_project_id, query)?)
    }

    pub fn update(&self, task: &Task) -> ServiceResult<Task> {
        let normalized = normalize(task);
        normalized.validate()?;
        self.repo.update(&normalized)?;
        self.repo
            .get(normalized.id)?
            .ok_or(ServiceError::NotFound(normalized.id))
    }

    /// Moves a task to `status`, keeping every other field.
    pub fn set_status(&self, id: EntityId, status: TaskStatus) -> ServiceResult<Task> {
        let mut task = self.repo.get(id)?.ok_or(ServiceError::NotFound(id))?;
        task.status = status;
        self.repo.update(&task)?;
        info!(
            "event=task_status module=service status=ok id={id} task_status={}",
            status.as_db_str()
        );
        Ok(task)
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.repo.delete(id)?;
        info!("event=task_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Imports a batch; `None` stands for a missing payload.
    pub fn import(&self, batch: Option<&[Task]>) -> ServiceResult<ImportOutcome> {
        let normalized = batch.map(|items| items.iter().map(normalize).collect::<Vec<_>>());
        if let Some(rejected) = normalized
            .as_deref()
            .and_then(|items| ImportOutcome::first_invalid("task", items, Task::validate))
        {
            info!("event=task_import module=service status=bad_request reason=validation");
            return Ok(rejected);
        }
        Ok(ImportReconciler::<Task, _>::new(&self.repo).import(normalized.as_deref())?)
    }
}

fn normalize(task: &Task) -> Task {
    Task {
        code: normalize_text(&task.code),
        name: normalize_text(&task.name),
        description: normalize_optional_text(task.description.as_deref()),
        ..task.clone()
    }
}
