//! Pomoflow CLI - a Pomodoro technique productivity tool
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break
//! plus a remote task list and a productivity dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomoflow::api::{NewTask, TasksClient};
use pomoflow::auth::{AuthClient, SessionStore, SignUpOutcome};
use pomoflow::cli::{Cli, Commands, Display, IpcClient, TaskCommands};
use pomoflow::daemon;
use pomoflow::notify::ConsoleNotifier;
use pomoflow::stats::DashboardStats;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match &cli.command {
        Some(Commands::Start) => {
            let client = ipc_client(&cli)?;
            let response = client.start().await?;
            Display::show_start_success(&response);
        }
        Some(Commands::Pause) => {
            let client = ipc_client(&cli)?;
            let response = client.pause().await?;
            Display::show_pause_success(&response);
        }
        Some(Commands::Switch { mode }) => {
            let client = ipc_client(&cli)?;
            let response = client.switch((*mode).into()).await?;
            Display::show_switch_success(&response);
        }
        Some(Commands::Status) => {
            let client = ipc_client(&cli)?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Settings(args)) => {
            let params = args.to_params();
            if params.is_empty() {
                anyhow::bail!("No settings provided. See 'pomoflow settings --help'");
            }
            let client = ipc_client(&cli)?;
            let response = client.configure(params).await?;
            Display::show_settings_success(&response);
        }
        Some(Commands::Task { command }) => {
            execute_task(&cli, command.clone()).await?;
        }
        Some(Commands::Login(args)) => {
            let auth = AuthClient::new(&cli.auth_url, &cli.auth_key)?;
            let session = auth.sign_in(&args.email, &args.password).await?;
            SessionStore::new()?.save(&session)?;
            Display::show_login_success(&session);
        }
        Some(Commands::Signup(args)) => {
            let auth = AuthClient::new(&cli.auth_url, &cli.auth_key)?;
            let outcome = auth
                .sign_up(&args.email, &args.password, args.name.as_deref())
                .await?;
            match outcome {
                SignUpOutcome::SignedIn(session) => {
                    SessionStore::new()?.save(&session)?;
                    Display::show_signup_success(&session);
                }
                SignUpOutcome::ConfirmationPending => {
                    Display::show_signup_pending();
                }
            }
        }
        Some(Commands::Logout) => {
            let existed = SessionStore::new()?.clear()?;
            Display::show_logout(existed);
        }
        Some(Commands::Stats) => {
            Display::show_stats(&DashboardStats::placeholder());
        }
        Some(Commands::Daemon) => {
            let socket_path = resolve_socket_path(&cli)?;
            daemon::run(&socket_path, Arc::new(ConsoleNotifier::new())).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(*shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Executes a task list command against the remote API.
async fn execute_task(cli: &Cli, command: TaskCommands) -> Result<()> {
    let session = SessionStore::new()?
        .load()?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run 'pomoflow login' first"))?;
    let client = TasksClient::new(&cli.api_url, &session.access_token)?;

    match command {
        TaskCommands::Add(args) => {
            let new_task = NewTask::new(args.title)
                .with_target_pomodoros(args.pomodoros)
                .with_tags(args.tags);
            let task = client.create(&new_task).await?;
            Display::show_task_added(&task);
        }
        TaskCommands::List => {
            let tasks = client.list().await?;
            Display::show_tasks(&tasks);
        }
        TaskCommands::Done { id } => {
            let task = client.toggle_complete(&id).await?;
            Display::show_task_toggled(&task);
        }
        TaskCommands::Rm { id } => {
            client.delete(&id).await?;
            Display::show_task_deleted(&id);
        }
    }

    Ok(())
}

/// Creates an IPC client honoring the socket override.
fn ipc_client(cli: &Cli) -> Result<IpcClient> {
    match &cli.socket {
        Some(path) => Ok(IpcClient::with_socket_path(path.clone())),
        None => IpcClient::new(),
    }
}

/// Resolves the daemon socket path.
fn resolve_socket_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.socket {
        Some(path) => Ok(path.clone()),
        None => daemon::ipc::default_socket_path(),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
