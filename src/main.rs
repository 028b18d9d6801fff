//! eventguard: weather risk assessment for outdoor events
//!
//! `eventguard serve` runs the HTTP API (`POST /event-forecast`).
//! `eventguard assess <request.json>` assesses one request and prints the
//! response as pretty JSON, which is handy during development.
//!
//! Both query the live Open-Meteo API unless `--replay <recording.json>` is
//! given, in which case a recorded forecast is served instead.

use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use eventguard_service::config::{self, AppConfig};
use eventguard_service::ingest::ForecastSource;
use eventguard_service::ingest::open_meteo::OpenMeteoClient;
use eventguard_service::ingest::replay::ForecastReplay;
use eventguard_service::logging::{self, Component};
use eventguard_service::request::EventForecastRequest;
use eventguard_service::server;
use eventguard_service::service::EventForecastService;

#[derive(Parser)]
#[command(name = "eventguard")]
#[command(about = "Weather risk assessment for scheduled outdoor events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind; overrides `listen_addr` from the config
        #[arg(long)]
        addr: Option<SocketAddr>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Assess a single request read from a JSON file
    Assess {
        /// Path to an EventForecastRequest JSON file
        request: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Replay a recorded forecast instead of calling Open-Meteo
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Shift the recording forward by this many days
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, requires = "replay")]
    days_offset: i64,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logging::init_logger("info", logging::json_requested());
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Serve { addr, source } => {
            let addr = match addr {
                Some(addr) => addr,
                None => config.service.listen_addr.parse()?,
            };
            match source.replay {
                Some(path) => {
                    log_replay(&path, source.days_offset);
                    serve(ForecastReplay::new(path, source.days_offset), config, addr)
                }
                None => {
                    let client = OpenMeteoClient::from_settings(&config.service)?;
                    serve(client, config, addr)
                }
            }
        }
        Commands::Assess { request, source } => {
            let text = std::fs::read_to_string(&request)?;
            let request: EventForecastRequest = serde_json::from_str(&text)?;
            match source.replay {
                Some(path) => {
                    log_replay(&path, source.days_offset);
                    assess(ForecastReplay::new(path, source.days_offset), config, &request)
                }
                None => {
                    let client = OpenMeteoClient::from_settings(&config.service)?;
                    assess(client, config, &request)
                }
            }
        }
    }
}

fn log_replay(path: &std::path::Path, days_offset: i64) {
    logging::info(
        Component::System,
        None,
        &format!("Replaying {} (offset {} days)", path.display(), days_offset),
    );
}

fn assess<S: ForecastSource>(
    source: S,
    config: AppConfig,
    request: &EventForecastRequest,
) -> Result<(), Box<dyn Error>> {
    let service = EventForecastService::new(source, config);
    let response = service.assess(request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// The forecast client is built before the runtime starts; assessments run
/// on the runtime's blocking pool.
fn serve<S>(source: S, config: AppConfig, addr: SocketAddr) -> Result<(), Box<dyn Error>>
where
    S: ForecastSource + Send + Sync + 'static,
{
    let service = Arc::new(EventForecastService::new(source, config));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(addr, service))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_with_replay_parses() {
        let cli = Cli::try_parse_from([
            "eventguard",
            "assess",
            "request.json",
            "--replay",
            "recording.json",
            "--days-offset",
            "-2",
        ])
        .expect("arguments should parse");
        match cli.command {
            Commands::Assess { request, source } => {
                assert_eq!(request, PathBuf::from("request.json"));
                assert_eq!(source.replay, Some(PathBuf::from("recording.json")));
                assert_eq!(source.days_offset, -2);
            }
            Commands::Serve { .. } => panic!("expected assess"),
        }
    }

    #[test]
    fn test_days_offset_requires_replay() {
        let result = Cli::try_parse_from(["eventguard", "assess", "request.json", "--days-offset", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_address_is_validated() {
        assert!(Cli::try_parse_from(["eventguard", "serve", "--addr", "not-an-address"]).is_err());
        let cli = Cli::try_parse_from(["eventguard", "serve", "--addr", "127.0.0.1:9000"])
            .expect("address should parse");
        assert!(matches!(cli.command, Commands::Serve { addr: Some(_), .. }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
