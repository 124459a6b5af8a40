use std::path::PathBuf;

use clap::Parser;
use config::{ConfigLayer, DatabaseLayer, GitLayer, JiraLayer, ServiceLayer};

/// Backend of the branch manager: tracks repositories and their feature
/// branches and links them to tickets.
#[derive(Debug, Parser)]
#[command(name = "branma", version)]
pub struct Cli {
    /// Path to the JSON configuration file [default: ./etc/config.json]
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Port the service listens to
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Directory holding the database file
    #[arg(short = 's', long = "storage")]
    pub storage: Option<PathBuf>,

    /// Directory of the schema scripts; accepted for compatibility only, migrations are built in
    #[arg(long = "schema")]
    pub schema: Option<PathBuf>,

    /// Revert the whole database schema before starting. All data is lost!
    #[arg(long)]
    pub reset: bool,

    /// Base URL of the git hosting service
    #[arg(long = "git-url")]
    pub git_url: Option<String>,

    /// Prefix of release branches
    #[arg(long = "git-release-branch-prefix")]
    pub git_release_branch_prefix: Option<String>,

    /// Base URL of the issue tracker
    #[arg(long = "jira-url")]
    pub jira_url: Option<String>,

    #[arg(long = "jira-username")]
    pub jira_username: Option<String>,

    #[arg(long = "jira-password", env = "BRANMA_JIRA_PASSWORD", hide_env_values = true)]
    pub jira_password: Option<String>,
}

impl Cli {
    /// Settings given on the command line, highest priority layer.
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            db: DatabaseLayer {
                storage_path: self.storage.clone(),
                schema_scripts_path: self.schema.clone(),
            },
            git: GitLayer {
                base_url: self.git_url.clone(),
                release_branch_prefix: self.git_release_branch_prefix.clone(),
            },
            jira: JiraLayer {
                base_url: self.jira_url.clone(),
                username: self.jira_username.clone(),
                password: self.jira_password.clone(),
            },
            service: ServiceLayer { port: self.port },
        }
    }
}
