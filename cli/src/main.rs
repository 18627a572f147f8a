mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use todo_client::{
    default_actor, resolve_default_actor, ClientConfig, CreateTodo, LocalStore, Todo, TodoService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{AddArgs, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.connection.to_config();
    tracing::debug!(?config, "resolved configuration");
    let (todos, users) = config.services()?;

    match cli.command {
        Command::Login { username } => {
            let mut store = login_store(&config);
            let user_id = resolve_default_actor(&users, &mut store, &username).await?;
            println!("default user: {username} ({user_id})");
        }
        Command::Whoami => {
            let store = open_store(&config)?;
            match default_actor(&store) {
                Some(user_id) => println!("{user_id}"),
                None => bail!("no default user; run `todo-cli login <username>`"),
            }
        }
        Command::List { mine } => {
            if mine {
                let store = open_store(&config)?;
                let user_id = require_actor(&store)?;
                print_todos(&todos.list_by_user(user_id).await?);
            } else {
                print_todos(&todos.list().await?);
            }
        }
        Command::Show { id } => {
            let todo = todos.get(id).await?;
            print_todo(&todo);
            if let Some(description) = &todo.description {
                println!("    {description}");
            }
        }
        Command::Add(args) => {
            let store = open_store(&config)?;
            let input = create_input(args, &store)?;
            let created = todos.create(&input).await?;
            println!("created #{}", created.id);
            refresh(&todos).await?;
        }
        Command::Done { id } => set_complete(&todos, id, true).await?,
        Command::Undo { id } => set_complete(&todos, id, false).await?,
        Command::Delete { id } => {
            todos.delete(id).await?;
            println!("deleted #{id}");
            refresh(&todos).await?;
        }
        Command::Users => {
            for user in users.list().await? {
                println!("{}  {}", user.id, user.username);
            }
        }
    }
    Ok(())
}

fn open_store(config: &ClientConfig) -> Result<LocalStore> {
    config
        .open_store()
        .with_context(|| format!("opening {}", config.storage_path.display()))
}

/// `login` is how a broken store gets repaired, so an unreadable file is
/// replaced rather than fatal.
fn login_store(config: &ClientConfig) -> LocalStore {
    config.open_store().unwrap_or_else(|e| {
        tracing::warn!(
            path = %config.storage_path.display(),
            error = %e,
            "local store unreadable, starting from an empty one"
        );
        LocalStore::empty(&config.storage_path)
    })
}

fn require_actor(store: &LocalStore) -> Result<&str> {
    default_actor(store).context("no default user; run `todo-cli login <username>` or pass --user")
}

/// Collect the create form. Title is the only required field.
fn create_input(args: AddArgs, store: &LocalStore) -> Result<CreateTodo> {
    let user_id = match args.user {
        Some(user) => user,
        None => require_actor(store)?.to_string(),
    };
    let input = CreateTodo::new(args.title, user_id)
        .with_description(args.description)
        .with_complete(args.complete);
    input.validate()?;
    Ok(input)
}

async fn set_complete(todos: &TodoService, id: u64, complete: bool) -> Result<()> {
    let todo = todos.get(id).await?;
    todos.set_complete(&todo, complete).await?;
    refresh(todos).await
}

/// Writes are followed by a fresh list; nothing is patched locally.
async fn refresh(todos: &TodoService) -> Result<()> {
    print_todos(&todos.list().await?);
    Ok(())
}

fn print_todos(todos: &[Todo]) {
    if todos.is_empty() {
        println!("no todos");
    }
    for todo in todos {
        print_todo(todo);
    }
}

fn print_todo(todo: &Todo) {
    let mark = if todo.complete { "x" } else { " " };
    println!("[{mark}] #{:<4} {}", todo.id, todo.title);
}
