//! Core domain logic for projtrack.
//! This crate owns the business invariants for projects, sub-projects and tasks.

pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use import::{ImportError, ImportOutcome, ImportReconciler, ImportStatus, ImportStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::importable::Importable;
pub use model::project::Project;
pub use model::sub_project::SubProject;
pub use model::task::{Task, TaskStatus};
pub use model::validation::EntityValidationError;
pub use model::EntityId;
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::sub_project_repo::{SqliteSubProjectRepository, SubProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::sub_project_service::SubProjectService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
