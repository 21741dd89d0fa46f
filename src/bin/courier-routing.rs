use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{arg, ArgMatches, Command};
use log::info;

use courier_routing::api::{ApiResponse, RouteService};
use courier_routing::config::OptimizerConfig;
use courier_routing::logging::{self, LogFormat};
use courier_routing::optimizer::RouteOptimizer;
use courier_routing::{Error, Result};

fn cli() -> Command {
    Command::new("courier-routing")
        .about("Plans courier delivery routes")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .arg(
            arg!(--config <PATH> "JSON optimizer config file")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"log-level" <LEVEL> "off, error, warn, info, debug or trace")
                .global(true)
                .default_value("info")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(arg!(--"pretty-logs" "Include the target module in log lines").global(true))
        .subcommand(
            Command::new("optimize")
                .about("Optimizes routes for an optimize-routes request")
                .arg(
                    arg!([INPUT] "Request file; reads stdin when omitted")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("eta")
                .about("Computes ETAs for a calculate-eta request")
                .arg(
                    arg!([INPUT] "Request file; reads stdin when omitted")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("health").about("Prints service identity"))
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| Error::invalid_argument(format!("cannot read {}: {e}", p.display()))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::invalid_argument(format!("cannot read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ApiResponse> {
    let format = if matches.get_flag("pretty-logs") {
        LogFormat::Pretty
    } else {
        LogFormat::Compact
    };
    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    logging::init_logger(logging::parse_level(level)?, format, true)?;

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => OptimizerConfig::from_path(path)?,
        None => OptimizerConfig::default(),
    };
    info!("config: {config:?}");
    let service = RouteService::new(RouteOptimizer::new(config)?);

    let response = match matches.subcommand() {
        Some(("optimize", sub)) => {
            service.handle_optimize_routes(&read_input(sub.get_one::<PathBuf>("INPUT"))?)
        }
        Some(("eta", sub)) => service.handle_calculate_eta(&read_input(sub.get_one::<PathBuf>("INPUT"))?),
        Some(("health", _)) => service.health(),
        _ => return Err(Error::invalid_argument("unknown command")),
    };
    Ok(response)
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(response) => {
            match serde_json::to_string_pretty(&response.body) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
