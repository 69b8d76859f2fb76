use crate::args::{Cli, Command};
use projtrack_core::db::open_db;
use projtrack_core::{
    ImportOutcome, ImportStatus, ListQuery, ProjectRepository, SqliteProjectRepository,
    SqliteSubProjectRepository, SqliteTaskRepository, SubProject, SubProjectService, Task,
    TaskService,
};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

pub const EXIT_FAILURE: u8 = 1;
const EXIT_BAD_REQUEST: u8 = 2;
const EXIT_CONFLICT: u8 = 3;

type CommandResult = Result<ExitCode, Box<dyn Error>>;

pub fn run(cli: &Cli) -> CommandResult {
    if let Command::Ping = cli.command {
        println!("projtrack_core ping={}", projtrack_core::ping());
        println!("projtrack_core version={}", projtrack_core::core_version());
        return Ok(ExitCode::SUCCESS);
    }

    let conn = open_db(&cli.db)?;
    match &cli.command {
        Command::Ping => Ok(ExitCode::SUCCESS),
        Command::ProjectAdd { id, name } => {
            let project = SqliteProjectRepository::new(&conn).ensure_project(*id, name)?;
            print_json(&project)
        }
        Command::ImportSubProjects { file } => {
            let batch: Option<Vec<SubProject>> = read_batch(file)?;
            let service = SubProjectService::new(SqliteSubProjectRepository::new(&conn));
            report(service.import(batch.as_deref())?)
        }
        Command::ImportTasks { file } => {
            let batch: Option<Vec<Task>> = read_batch(file)?;
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            report(service.import(batch.as_deref())?)
        }
        Command::ListSubProjects { skip, take } => {
            let service = SubProjectService::new(SqliteSubProjectRepository::new(&conn));
            let query = ListQuery { skip: *skip, take: *take };
            print_json(&service.list(&query)?)
        }
        Command::ListTasks {
            sub_project,
            skip,
            take,
        } => {
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            let query = ListQuery { skip: *skip, take: *take };
            let tasks = match sub_project {
                Some(sub_project_id) => service.list_by_sub_project(*sub_project_id, &query)?,
                None => service.list(&query)?,
            };
            print_json(&tasks)
        }
        Command::SetTaskStatus { id, status } => {
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            print_json(&service.set_status(*id, *status)?)
        }
        Command::DeleteSubProject { id } => {
            SubProjectService::new(SqliteSubProjectRepository::new(&conn)).delete(*id)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::DeleteTask { id } => {
            TaskService::new(SqliteTaskRepository::new(&conn)).delete(*id)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads a JSON array file; a literal `null` yields `None`.
fn read_batch<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    let batch = serde_json::from_str(&content)
        .map_err(|err| format!("invalid import file `{}`: {err}", path.display()))?;
    Ok(batch)
}

fn report(outcome: ImportOutcome) -> CommandResult {
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(ExitCode::from(exit_code(outcome.status)))
}

fn exit_code(status: ImportStatus) -> u8 {
    match status {
        ImportStatus::Ok => 0,
        ImportStatus::BadRequest => EXIT_BAD_REQUEST,
        ImportStatus::Conflict => EXIT_CONFLICT,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::{exit_code, read_batch};
    use projtrack_core::{ImportStatus, SubProject};
    use std::io::Write;

    #[test]
    fn exit_codes_distinguish_rejections() {
        assert_eq!(exit_code(ImportStatus::Ok), 0);
        assert_eq!(exit_code(ImportStatus::BadRequest), 2);
        assert_eq!(exit_code(ImportStatus::Conflict), 3);
    }

    #[test]
    fn null_file_reads_as_missing_batch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"null").unwrap();

        let batch: Option<Vec<SubProject>> = read_batch(file.path()).unwrap();
        assert!(batch.is_none());
    }

    #[test]
    fn array_file_reads_entities_with_default_identity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"project_id":1,"code":"SP-1","name":"Core"}]"#)
            .unwrap();

        let batch: Option<Vec<SubProject>> = read_batch(file.path()).unwrap();
        let batch = batch.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 0);
        assert_eq!(batch[0].code, "SP-1");
    }
}
