mod engines;
mod tui;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use dockui_core::config::{ConfigError, DockuiConfig, LogLevel};
use dockui_core::keymap::Keymap;
use dockui_core::memory::MemoryClient;
use dockui_core::{ClientError, ContainerClient, Dispatcher};

#[derive(Parser, Debug)]
#[command(name = "dockui")]
#[command(about = "Terminal dashboard for Docker images, containers, volumes and networks", long_about = None)]
struct Cli {
    /// Config file (otherwise discovered from DOCKUI_CONFIG or the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a seeded in-memory engine instead of Docker
    #[arg(long)]
    demo: bool,

    /// Where to write the log (default: dockui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Off => LogLevel::Off,
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let (config_path, config) = match load_config(&cli) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&cli, &config);
    match &config_path {
        Some(path) => log::info!("dockui starting with config {}", path.display()),
        None => log::info!("dockui starting with default config"),
    }

    let bindings = match config.bindings() {
        Ok(bindings) => bindings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let mut keymap = Keymap::with_defaults();
    keymap.apply(&bindings);

    let client = match connect(&cli, &config).await {
        Ok(client) => client,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tui::run(Dispatcher::new(keymap, client)).await
}

/// `--config` wins; otherwise search. No file anywhere means defaults.
fn load_config(cli: &Cli) -> Result<(Option<PathBuf>, DockuiConfig), ConfigError> {
    if let Some(path) = &cli.config {
        return Ok((Some(path.clone()), DockuiConfig::load(path)?));
    }
    let cwd = std::env::current_dir()?;
    match DockuiConfig::discover(&cwd) {
        Ok((path, config)) => Ok((Some(path), config)),
        Err(ConfigError::NotFound { .. }) => Ok((None, DockuiConfig::default())),
        Err(e) => Err(e),
    }
}

fn log_target(cli: &Cli, config: &DockuiConfig) -> (PathBuf, LevelFilter) {
    let file = cli
        .log_file
        .clone()
        .or_else(|| config.log.file.clone())
        .unwrap_or_else(|| PathBuf::from("dockui.log"));
    let level = cli
        .log_level
        .map(LogLevel::from)
        .or(config.log.level)
        .unwrap_or_default();
    (file, level.to_level_filter())
}

// The terminal belongs to the dashboard, so logs only go to a file.
fn init_logging(cli: &Cli, config: &DockuiConfig) {
    let (path, level) = log_target(cli, config);
    if level == LevelFilter::Off {
        return;
    }

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

async fn connect(cli: &Cli, config: &DockuiConfig) -> Result<Arc<dyn ContainerClient>, ClientError> {
    if cli.demo {
        log::info!("using in-memory demo engine");
        return Ok(Arc::new(MemoryClient::seeded()));
    }
    connect_docker(config).await
}

#[cfg(feature = "docker")]
async fn connect_docker(config: &DockuiConfig) -> Result<Arc<dyn ContainerClient>, ClientError> {
    let client = engines::DockerClient::connect(&config.docker).await?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "docker"))]
async fn connect_docker(_config: &DockuiConfig) -> Result<Arc<dyn ContainerClient>, ClientError> {
    Err(ClientError::Connection {
        message: "built without the `docker` feature; run with --demo or rebuild with --features docker"
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "dockui",
            "--demo",
            "--config",
            "/etc/dockui.yaml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.demo);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/dockui.yaml")));
        assert_eq!(cli.log_level, Some(CliLogLevel::Debug));
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["dockui", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_log_target_precedence() {
        let config = DockuiConfig::from_str("log:\n  file: /var/log/dockui.log\n  level: warn\n")
            .unwrap();

        let cli = Cli::try_parse_from(["dockui"]).unwrap();
        assert_eq!(
            log_target(&cli, &config),
            (PathBuf::from("/var/log/dockui.log"), LevelFilter::Warn)
        );

        let cli =
            Cli::try_parse_from(["dockui", "--log-file", "here.log", "--log-level", "trace"])
                .unwrap();
        assert_eq!(
            log_target(&cli, &config),
            (PathBuf::from("here.log"), LevelFilter::Trace)
        );

        let cli = Cli::try_parse_from(["dockui"]).unwrap();
        assert_eq!(
            log_target(&cli, &DockuiConfig::default()),
            (PathBuf::from("dockui.log"), LevelFilter::Info)
        );
    }

    #[tokio::test]
    async fn test_demo_uses_memory_client() {
        let cli = Cli::try_parse_from(["dockui", "--demo"]).unwrap();
        let client = connect(&cli, &DockuiConfig::default()).await.unwrap();
        assert_eq!(client.name(), "memory");
        assert_eq!(client.list_images().await.unwrap().len(), 3);
    }
}
