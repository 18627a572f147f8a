use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use todo_client::config::{self, ClientConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-cli")]
#[command(version, about = "Manage todos on a remote todo service", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the todo collection
    #[arg(long, env = "TODO_API_URL", default_value = config::DEFAULT_TODO_BASE_URL, global = true)]
    pub todo_url: String,

    /// Base URL of the user collection
    #[arg(long, env = "USER_API_URL", default_value = config::DEFAULT_USER_BASE_URL, global = true)]
    pub user_url: String,

    /// Local storage file holding the default user
    #[arg(long, env = "TODO_STORAGE_PATH", global = true)]
    pub storage: Option<PathBuf>,

    /// Request timeout in seconds; unset uses the HTTP client's default
    #[arg(long, env = "TODO_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            todo_base_url: self.todo_url.clone(),
            user_base_url: self.user_url.clone(),
            storage_path: self
                .storage
                .clone()
                .unwrap_or_else(config::default_storage_path),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Look up a user by username and remember it as the default user
    Login { username: String },
    /// Print the remembered default user
    Whoami,
    /// List todos
    List {
        /// Only todos owned by the default user
        #[arg(long)]
        mine: bool,
    },
    /// Show one todo
    Show { id: u64 },
    /// Create a todo
    Add(AddArgs),
    /// Mark a todo complete
    Done { id: u64 },
    /// Mark a todo not complete
    Undo { id: u64 },
    /// Delete a todo
    Delete { id: u64 },
    /// List registered users
    Users,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub complete: bool,

    /// Owner; defaults to the remembered default user
    #[arg(long)]
    pub user: Option<String>,
}
