/// itired - terminal player for the itired music platform
use clap::{Parser, Subcommand};
use itired_cli::{format_ms, CliConfig, CliError, Command, Session};
use itired_client::{ClientConfig, ItiredClient, DEFAULT_HISTORY_PAGE_SIZE};
use itired_playback::TrackRef;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "itired")]
#[command(about = "Terminal player for the itired music platform", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Platform base URL (overrides server.url)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Session cookie of a logged-in browser session
    #[arg(long, global = true, env = "ITIRED_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Player state file (overrides storage.store_path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Offline catalogue file (overrides storage.catalog_path)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Ignore any configured server
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive player shell (default)
    Shell,
    /// Run shell commands in order, then exit
    Exec {
        /// One shell command per argument, e.g. "play yandex_1" "tick 30"
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Check platform health
    Health,
    /// Resolve a track without playing it
    Resolve {
        /// Track as <service>_<id>
        track: String,
    },
    /// Show the server-side listening history
    History {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_HISTORY_PAGE_SIZE)]
        per_page: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the shell output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "itired=info,itired_cli=info,itired_playback=info,itired_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell(&config).await?,
        Commands::Exec { commands } => exec(&config, &commands).await?,
        Commands::Health => health(&config).await?,
        Commands::Resolve { track } => resolve(&config, &track).await?,
        Commands::History { page, per_page } => history(&config, page, per_page).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = CliConfig::load(cli.config.as_deref())?;

    if let Some(ref url) = cli.server {
        config.server.url = Some(url.clone());
    }
    if let Some(ref session) = cli.session {
        config.server.session_cookie = Some(session.clone());
    }
    if let Some(ref store) = cli.store {
        config.storage.store_path = store.clone();
    }
    if let Some(ref catalog) = cli.catalog {
        config.storage.catalog_path = Some(catalog.clone());
    }
    if cli.offline {
        config.server.url = None;
    }

    config.validate()?;
    Ok(config)
}

fn client(config: &CliConfig) -> anyhow::Result<ItiredClient> {
    let url = config.server.url.clone().ok_or(CliError::Offline)?;
    Ok(ItiredClient::new(ClientConfig {
        url,
        session_cookie: config.server.session_cookie.clone(),
    })?)
}

async fn shell(config: &CliConfig) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("itired shell, type 'help' for commands");
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        if run_line(&mut session, &line).await {
            break;
        }
        prompt()?;
    }

    session.dispose();
    Ok(())
}

async fn exec(config: &CliConfig, commands: &[String]) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;

    for line in commands {
        if run_line(&mut session, line).await {
            break;
        }
    }

    session.dispose();
    Ok(())
}

/// Run one input line; true when the shell should exit
async fn run_line(session: &mut Session, line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return false;
        }
    };

    match session.execute(command).await {
        Ok(reply) => {
            for line in &reply.lines {
                println!("{}", line);
            }
            reply.quit
        }
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    }
}

fn prompt() -> anyhow::Result<()> {
    print!("itired> ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn health(config: &CliConfig) -> anyhow::Result<()> {
    let status = client(config)?.health().await?;

    println!("Status:   {}", status.status);
    if let Some(database) = &status.database {
        println!("Database: {}", database);
    }
    if let Some(error) = &status.error {
        println!("Error:    {}", error);
    }

    if !status.is_healthy() {
        anyhow::bail!("platform is not healthy");
    }
    Ok(())
}

async fn resolve(config: &CliConfig, track: &str) -> anyhow::Result<()> {
    let reference = TrackRef::parse(track)
        .ok_or_else(|| CliError::Command(format!("expected <service>_<id>, got '{}'", track)))?;

    let response = client(config)?
        .resolve_track(&reference.service, &reference.track_id)
        .await?;

    println!("Title:    {}", response.title);
    println!("Artists:  {}", response.artists.join(", "));
    println!("Duration: {}", format_ms(response.duration));
    println!("URL:      {}", response.url.as_deref().unwrap_or("(none)"));
    Ok(())
}

async fn history(config: &CliConfig, page: u32, per_page: u32) -> anyhow::Result<()> {
    let client = client(config)?;
    let history = client.catalog().history(page, per_page).await?;

    println!(
        "Page {} of {} ({} plays)",
        history.current_page, history.pages, history.total
    );
    for entry in history.history {
        let played_at = entry
            .played_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:16}  {} - {}",
            played_at,
            entry.track_data.artists.join(", "),
            entry.track_data.title.as_deref().unwrap_or(&entry.track_id)
        );
    }
    Ok(())
}
