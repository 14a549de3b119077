//! taskchat CLI: chat with the todo assistant backend from the terminal

use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use taskchat_engine::{
    default_state_dir, ChatSession, ClientConfig, HttpBackend, LocalStore, Message, SessionId,
    CONFIG_FILE,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal client for the AI todo assistant
#[derive(Parser)]
#[command(name = "taskchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.json)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding config.json, local_state.json and the log file
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Output the reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the backend health endpoint
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the persisted session identity
    Session,

    /// Create the state directory and a default config
    Init,
}

/// Log file written while the TUI owns the terminal.
const LOG_FILE: &str = "taskchat.log";

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let state_dir = match cli.state_dir.map_or_else(default_state_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => fail(&e),
    };

    init_logging(&state_dir, matches!(command, Commands::Tui));

    let mut config = match ClientConfig::load_or_default(&state_dir) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match command {
        Commands::Tui => cmd_tui(&config, &state_dir),
        Commands::Send { message, json } => cmd_send(&config, &state_dir, &message, json),
        Commands::Health { json } => cmd_health(&config, json),
        Commands::Session => cmd_session(&state_dir),
        Commands::Init => cmd_init(&config, &state_dir),
    }
}

/// Print an error and exit with status 1.
fn fail(error: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` selects the filter (default `warn`). The TUI logs to a file in
/// the state directory so output does not corrupt the screen.
fn init_logging(state_dir: &Path, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        let file = std::fs::create_dir_all(state_dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(state_dir.join(LOG_FILE))
        });
        if let Ok(file) = file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn new_runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(&format!("failed to create tokio runtime: {e}")),
    }
}

fn load_session(state_dir: &Path) -> SessionId {
    LocalStore::open(state_dir)
        .and_then(|store| SessionId::load_or_create(&store))
        .unwrap_or_else(|e| fail(&e))
}

fn cmd_tui(config: &ClientConfig, state_dir: &Path) {
    let session_id = load_session(state_dir);
    let rt = new_runtime();
    if let Err(e) = rt.block_on(taskchat_tui::run_tui(config, session_id)) {
        fail(&e);
    }
}

fn cmd_send(config: &ClientConfig, state_dir: &Path, message: &str, json: bool) {
    let session_id = load_session(state_dir);
    let backend = HttpBackend::new(config).unwrap_or_else(|e| fail(&e));
    let mut chat = ChatSession::new(session_id, config.conversation_id);

    let rt = new_runtime();
    let reply = rt
        .block_on(chat.send(&backend, message, config.base_url()))
        .unwrap_or_else(|e| fail(&e));

    if json {
        match serde_json::to_string_pretty(&reply) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&e),
        }
    } else {
        print_reply(&reply);
    }

    if reply.is_transport_error() {
        std::process::exit(1);
    }
}

fn print_reply(reply: &Message) {
    println!("{}", reply.text);

    let summaries = reply.tool_summaries();
    if !reply.tool_calls.is_empty() {
        println!("\n🛠️ Actions:");
        for summary in &summaries {
            println!("  {summary}");
        }
    }

    if !reply.suggested_actions.is_empty() {
        println!("\n💡 Try:");
        for action in &reply.suggested_actions {
            println!("  {action}");
        }
    }
}

fn cmd_health(config: &ClientConfig, json: bool) {
    let backend = HttpBackend::new(config).unwrap_or_else(|e| fail(&e));
    let rt = new_runtime();
    let report = rt
        .block_on(backend.health())
        .unwrap_or_else(|e| fail(&format!("{}: {e}", backend.base_url())));

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&e),
        }
    } else {
        println!("Backend: {}", backend.base_url());
        println!("  Status:   {}", report.status);
        for (label, value) in [
            ("Service", &report.service),
            ("Version", &report.version),
            ("AI", &report.ai_provider),
            ("Database", &report.database),
            ("Uptime", &report.uptime),
        ] {
            if !value.is_empty() {
                println!("  {label:<9} {value}");
            }
        }
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
}

fn cmd_session(state_dir: &Path) {
    println!("{}", load_session(state_dir));
}

fn cmd_init(config: &ClientConfig, state_dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(state_dir) {
        fail(&format!("failed to create {}: {e}", state_dir.display()));
    }

    let config_path = state_dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        match config.save(&config_path) {
            Ok(()) => println!("Created {}", config_path.display()),
            Err(e) => fail(&e),
        }
    }

    let session_id = load_session(state_dir);
    info!(user_id = %session_id, "initialized state directory");
    println!("Session: {session_id}");
    println!("Backend: {}", config.base_url());
}
