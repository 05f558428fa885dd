//! kassist CLI: Command-line interface for the knowledge assistant chat client

use clap::{Parser, Subcommand, ValueEnum};
use kassist_engine::{AgentTransport, ChatMode, Config, Conversation, HttpTransport};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Chat with a remote knowledge agent from the terminal
#[derive(Parser)]
#[command(name = "kassist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(long, global = true, default_value = kassist_engine::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Agent endpoint URL
    #[arg(long, global = true, env = "KASSIST_ENDPOINT")]
    endpoint: Option<String>,

    /// Agent id used in chat mode
    #[arg(long, global = true)]
    agent_id: Option<String>,

    /// Agent id used in history mode (enables the mode toggle)
    #[arg(long, global = true)]
    history_agent_id: Option<String>,

    /// User id sent with every request
    #[arg(long, global = true)]
    user_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send a single message in a fresh session and print the reply
    Ask {
        /// Message to send
        message: String,

        /// Agent mode to use
        #[arg(long, value_enum, default_value_t = ModeArg::Chat)]
        mode: ModeArg,

        /// Print the session transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the config file with defaults (and any overrides)
    Init,

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Chat,
    History,
}

impl From<ModeArg> for ChatMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Chat => ChatMode::Chat,
            ModeArg::History => ChatMode::History,
        }
    }
}

const LOG_PATH: &str = ".kassist/kassist.log";

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging(Path::new(LOG_PATH));
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(kassist_tui::run_tui(config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask {
            message,
            mode,
            json,
        }) => {
            init_stderr_logging();
            cmd_ask(config, &message, mode.into(), json);
        }
        Some(Commands::Init) => {
            cmd_init(&config, &cli.config);
        }
        Some(Commands::Config) => {
            cmd_config(&config);
        }
    }
}

/// Load the config file (defaults when missing) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, kassist_engine::ConfigError> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if let Some(agent_id) = &cli.agent_id {
        config.agents.chat.clone_from(agent_id);
    }
    if let Some(history) = &cli.history_agent_id {
        config.agents.history = Some(history.clone());
    }
    if let Some(user_id) = &cli.user_id {
        config.user_id.clone_from(user_id);
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to a file. Logging stays off if it
/// cannot be opened.
fn init_file_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn cmd_ask(config: Config, message: &str, mode: ChatMode, json: bool) {
    let transport = match HttpTransport::from_config(&config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut conversation = Conversation::new(config);
    if !conversation.set_mode(mode) {
        eprintln!("Error: {} mode has no agent configured", mode.display_name());
        std::process::exit(1);
    }

    let Some(request) = conversation.begin_turn(message) else {
        eprintln!("Error: message is empty");
        std::process::exit(1);
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let outcome = rt.block_on(transport.send(&request));
    let failed = match &outcome {
        Ok(_) => false,
        Err(e) => {
            eprintln!("Error: {e}");
            true
        }
    };

    let reply = conversation
        .finish_turn(outcome)
        .map(|m| m.content().to_string())
        .unwrap_or_default();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(conversation.session()).expect("failed to serialize")
        );
    } else {
        println!("{reply}");
    }

    if failed {
        std::process::exit(1);
    }
}

fn cmd_init(config: &Config, path: &Path) {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    if let Err(e) = config.save(path) {
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }

    println!("Created {}", path.display());
    println!("  endpoint: {}", config.endpoint);
    println!("  chat agent: {}", config.agents.chat);
    match &config.agents.history {
        Some(history) => println!("  history agent: {history}"),
        None => println!("  history agent: (none, chat mode only)"),
    }
}

fn cmd_config(config: &Config) {
    println!(
        "{}",
        serde_json::to_string_pretty(config).expect("failed to serialize")
    );
}
