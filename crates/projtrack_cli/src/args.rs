use clap::{Parser, Subcommand};
use projtrack_core::TaskStatus;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "projtrack")]
#[command(about = "Project, sub-project and task tracking console", version)]
pub struct Cli {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "PROJTRACK_DB", default_value = "projtrack.sqlite3")]
    pub db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(
        long,
        env = "PROJTRACK_LOG_LEVEL",
        default_value_t = projtrack_core::default_log_level().to_string()
    )]
    pub log_level: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "PROJTRACK_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints core wiring info.
    Ping,
    /// Creates or renames a project.
    ProjectAdd { id: i64, name: String },
    /// Imports sub-projects from a JSON array file (`null` is rejected).
    ImportSubProjects { file: PathBuf },
    /// Imports tasks from a JSON array file (`null` is rejected).
    ImportTasks { file: PathBuf },
    ListSubProjects {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        take: Option<u32>,
    },
    ListTasks {
        /// Only tasks of this sub-project.
        #[arg(long)]
        sub_project: Option<i64>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        take: Option<u32>,
    },
    /// Moves a task to another status.
    SetTaskStatus {
        id: i64,
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },
    DeleteSubProject { id: i64 },
    DeleteTask { id: i64 },
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse_db_str(value.trim()).ok_or_else(|| format!("unknown task status `{value}`"))
}
