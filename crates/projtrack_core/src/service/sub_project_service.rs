//! Sub-project use-case service.
//!
//! # Invariants
//! - Text fields are trimmed before validation and persistence.
//! - Imports always go through [`ImportReconciler`].

use super::{normalize_optional_text, normalize_text, ServiceError, ServiceResult};
use crate::import::{ImportOutcome, ImportReconciler};
use crate::model::sub_project::SubProject;
use crate::model::EntityId;
use crate::repo::sub_project_repo::SubProjectRepository;
use crate::repo::ListQuery;
use log::info;

pub struct SubProjectService<R: SubProjectRepository> {
    repo: R,
}

impl<R: SubProjectRepository> SubProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists one sub-project, returning the stored row.
    pub fn create(&self, sub_project: &SubProject) -> ServiceResult<SubProject> {
        let normalized = normalize(sub_project);
        normalized.validate()?;
        let id = self.repo.create(&normalized)?;
        info!("event=sub_project_create module=service status=ok id={id}");
        self.repo.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Option<SubProject>> {
        Ok(self.repo.get(id)?)
    }

    /// Lists sub-projects with skip/take paging.
    pub fn list(&self, query: &ListQuery) -> ServiceResult<Vec<SubProject>> {
        Ok(self.repo.list(query)?)
    }

    /// Replaces every business field of the sub-project with `id == sub_project.id`.
    pub fn update(&self, sub_project: &SubProject) -> ServiceResult<SubProject> {
        let normalized = normalize(sub_project);
        normalized.validate()?;
        self.repo.update(&normalized)?;
        self.repo
            .get(normalized.id)?
            .ok_or(ServiceError::NotFound(normalized.id))
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.repo.delete(id)?;
        info!("event=sub_project_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Imports a batch; `None` stands for a missing payload.
    ///
    /// Business rejections (invalid fields included) come back as `Ok(outcome)`
    /// with a non-Ok status.
    pub fn import(&self, batch: Option<&[SubProject]>) -> ServiceResult<ImportOutcome> {
        let normalized = batch.map(|items| items.iter().map(normalize).collect::<Vec<_>>());
        if let Some(rejected) = normalized.as_deref().and_then(|items| {
            ImportOutcome::first_invalid("sub-project", items, SubProject::validate)
        }) {
            info!("event=sub_project_import module=service status=bad_request reason=validation");
            return Ok(rejected);
        }
        let reconciler = ImportReconciler::<SubProject, _>::new(&self.repo);
        Ok(reconciler.import(normalized.as_deref())?)
    }
}

fn normalize(sub_project: &SubProject) -> SubProject {
    SubProject {
        id: sub_project.id,
        project_id: sub_project.project_id,
        code: normalize_text(&sub_project.code),
        name: normalize_text(&sub_project.name),
        description: normalize_optional_text(sub_project.description.as_deref()),
        created_at: sub_project.created_at,
    }
}
