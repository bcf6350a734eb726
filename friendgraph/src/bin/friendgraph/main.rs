mod commands;
mod examples;
mod help;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{FromArgMatches, Parser, Subcommand};

use friendgraph::{
    FriendgraphConfig, GraphError, GraphStore, ImageStore, SocialNetwork, StoreBackend, config::CONFIG_FILE_NAME,
};

use commands::{
    account::{LoginArgs, RegisterArgs, handle_login, handle_register, handle_show_user},
    content::{PostCommands, handle_post_commands, handle_timeline},
    profile::{ProfileCommands, handle_profile_commands},
    social::{FriendCommands, handle_friend_commands},
    tour::handle_tour,
};
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "friendgraph")]
#[command(version)]
#[command(
    about = "Friends, posts and timelines over Redis",
    long_about = r#"Command line client for the friendgraph social core:

• Accounts with Argon2id-hashed passwords
• Friend requests that are sent, accepted or declined atomically
• Posts with threaded replies, likes and cascading deletes
• A timeline of your own and your friends' posts

Commands that act for a user take --as <USER_ID>.
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Act as this user
    #[arg(long = "as", global = true, value_name = "USER_ID")]
    actor: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses argv against the themed command; clap prints help, version and
    /// usage errors itself and exits.
    fn parse_themed() -> Self {
        let matches = help::command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register(RegisterArgs),

    /// Check an email and password
    Login(LoginArgs),

    /// Show a user
    User { user_id: String },

    /// Send, answer and inspect friend requests
    #[command(subcommand)]
    Friend(FriendCommands),

    /// Write, like, list and delete posts
    #[command(subcommand)]
    Post(PostCommands),

    /// Your posts and your friends' posts, newest first
    Timeline,

    /// Show and edit profiles
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Walk through the whole feature set on a throwaway in-memory network
    Tour,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse_themed();
    let output = OutputManager::new(GlobalOptions {
        no_color: cli.no_color,
        ..Default::default()
    });

    if let Err(err) = execute(cli).await {
        let mut lines = error_report(&err).into_iter();
        if let Some(headline) = lines.next() {
            output.error(&headline);
        }
        for line in lines {
            eprintln!("{line}");
        }
        std::process::exit(1);
    }
}

/// Lines printed for a failed command.
///
/// Mistakes the user can fix (bad input, unknown ids, wrong password) show
/// only the library message; validation failures list every issue. Anything
/// else keeps the context chain and points at the log.
fn error_report(err: &anyhow::Error) -> Vec<String> {
    match err.downcast_ref::<GraphError>() {
        Some(GraphError::Validation(validation)) => std::iter::once("Please fix the following:".to_string())
            .chain(
                validation
                    .issues
                    .iter()
                    .map(|issue| format!("  {} {}: {}", theme::BULLET, issue.field, issue.message)),
            )
            .collect(),
        Some(graph_err) if graph_err.is_user_facing() => vec![graph_err.to_string()],
        _ => vec![
            format!("Error: {err:#}"),
            "Run with RUST_LOG=friendgraph=debug for details.".to_string(),
        ],
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    let output = OutputManager::new(global_options);

    let config = FriendgraphConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let actor = cli.actor.as_deref();

    if let Commands::Tour = cli.command {
        return handle_tour(&config, &output).await;
    }

    match config.store.backend {
        StoreBackend::Memory => {
            output.warning("Using the in-memory store; nothing is kept after this command exits");
            let network = SocialNetwork::in_memory(&config);
            dispatch(cli.command, actor, &network, &output).await
        }
        StoreBackend::Redis => {
            let url = config.redis_url()?;
            output.verbose(&format!(
                "Connecting to Redis under {}:{}",
                config.store.prefix, config.store.service
            ));
            let network = SocialNetwork::connect(&url, &config)
                .await
                .context("failed to connect to Redis")?;
            dispatch(cli.command, actor, &network, &output).await
        }
    }
}

async fn dispatch<S, M>(
    command: Commands,
    actor: Option<&str>,
    network: &SocialNetwork<S, M>,
    output: &OutputManager,
) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    match command {
        Commands::Register(args) => handle_register(args, network, output).await,
        Commands::Login(args) => handle_login(args, network, output).await,
        Commands::User { user_id } => handle_show_user(&user_id, network, output).await,
        Commands::Friend(command) => handle_friend_commands(command, actor, network, output).await,
        Commands::Post(command) => handle_post_commands(command, actor, network, output).await,
        Commands::Timeline => handle_timeline(actor, network, output).await,
        Commands::Profile(command) => handle_profile_commands(command, actor, network, output).await,
        // runs on its own network before any store is opened
        Commands::Tour => Ok(()),
    }
}
