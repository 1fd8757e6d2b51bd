use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use switchboard_server::RelayConfig;
use switchboard_server::config::LogFormat;

const DEFAULT_CONFIG_PATH: &str = "switchboard.toml";
const CONFIG_ENV: &str = "SWITCHBOARD_CONFIG";

#[derive(Parser)]
#[command(name = "switchboard", version, about = "WebRTC signaling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay.
    Serve(Overrides),
    /// Print the effective configuration as TOML.
    Config(Overrides),
}

#[derive(Args, Default)]
struct Overrides {
    /// TOML config file. Falls back to $SWITCHBOARD_CONFIG, then ./switchboard.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    max_connections: Option<usize>,

    /// EnvFilter directive, e.g. `debug` or `switchboard_server=trace`.
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Overrides {
    /// Explicit paths must exist; the implicit default may be absent.
    fn config_source(&self, env_path: Option<PathBuf>) -> (PathBuf, bool) {
        match (&self.config, env_path) {
            (Some(path), _) => (path.clone(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        }
    }

    fn apply(self, config: &mut RelayConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(max) = self.max_connections {
            config.limits.max_connections = max;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format.into();
        }
    }

    fn resolve(self) -> Result<RelayConfig> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let (path, required) = self.config_source(env_path);
        let mut config = RelayConfig::load(&path, required)?;
        self.apply(&mut config);
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Serve(overrides) => {
            let config = overrides.resolve()?;
            switchboard_server::init_tracing(&config.logging)?;

            println!("{}", "📡 Starting switchboard signaling relay...".green().bold());
            println!(
                "   🔌 WebSocket: ws://{}:{}/ws",
                config.server.host, config.server.port
            );
            println!(
                "   📊 Stats:     http://{}:{}/admin/stats",
                config.server.host, config.server.port
            );
            println!(
                "   👥 Capacity:  {} connections",
                config.limits.max_connections.to_string().cyan()
            );

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                max_connections = config.limits.max_connections,
                "Relay initialising"
            );
            switchboard_server::run(config).await
        }
        Commands::Config(overrides) => {
            let config = overrides.resolve()?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
