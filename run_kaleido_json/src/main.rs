use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use kaleido_json::{
    failure, handle_request, health,
    serde_json::{self, Value},
    JsonSer, KaleidoscopeRequest,
};

/// Exit status when the request itself is at fault.
const CLIENT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "run_kaleido_json")]
#[command(about = "Images formed by two mirrors meeting at an angle", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single request
    Compute {
        /// JSON request file, read from stdin if absent or `-`
        #[arg(
            value_hint = clap::ValueHint::FilePath,
            conflicts_with_all = ["theta", "radius", "angle"],
        )]
        file: Option<PathBuf>,

        /// Angle between the mirrors, in degrees
        #[arg(long, allow_negative_numbers = true)]
        theta: Option<f64>,

        /// Distance between the object and the mirrors' vertex
        #[arg(long, allow_negative_numbers = true)]
        radius: Option<f64>,

        /// Angle between the object and the first mirror, in degrees
        #[arg(long, allow_negative_numbers = true)]
        angle: Option<f64>,
    },

    /// Solve every request of a JSON array, as written by `gen_rand_scene`
    Batch {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the liveness payload
    Health,
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let mut text = String::new();

    match file {
        Some(path) if path != Path::new("-") => {
            text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
        }
    }

    Ok(text)
}

fn emit(json: &Value, pretty: bool) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    if pretty {
        serde_json::to_writer_pretty(&mut out, json)?;
    } else {
        serde_json::to_writer(&mut out, json)?;
    }

    writeln!(out)?;
    Ok(())
}

fn compute(json: &Value, pretty: bool) -> anyhow::Result<ExitCode> {
    match handle_request(json) {
        Ok(response) => {
            emit(&response, pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            emit(&failure, pretty)?;
            Ok(ExitCode::from(CLIENT_ERROR))
        }
    }
}

fn batch(json: &Value, pretty: bool) -> anyhow::Result<ExitCode> {
    let Some(requests) = json.as_array() else {
        emit(&failure(&"batch input must be a JSON array"), pretty)?;
        return Ok(ExitCode::from(CLIENT_ERROR));
    };

    log::info!("solving {} requests", requests.len());

    let responses = requests
        .iter()
        .map(|request| handle_request(request).unwrap_or_else(|failure| failure))
        .collect();

    emit(&Value::Array(responses), pretty)?;
    Ok(ExitCode::SUCCESS)
}

/// Parses `text`, reporting a client error on malformed JSON.
fn parse(text: &str, pretty: bool) -> anyhow::Result<Result<Value, ExitCode>> {
    match serde_json::from_str(text) {
        Ok(json) => Ok(Ok(json)),
        Err(e) => {
            log::warn!("malformed request: {e}");
            emit(&failure(&e), pretty)?;
            Ok(Err(ExitCode::from(CLIENT_ERROR)))
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let pretty = cli.pretty;

    match cli.command {
        Commands::Health => {
            emit(&health(), pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compute {
            file,
            theta,
            radius,
            angle,
        } => {
            if theta.is_some() || radius.is_some() || angle.is_some() {
                let defaults = KaleidoscopeRequest::default();
                let request = KaleidoscopeRequest::try_new(
                    theta.unwrap_or(defaults.theta),
                    radius.unwrap_or(defaults.radius),
                    angle.unwrap_or(defaults.angle),
                );

                return match request {
                    Ok(request) => {
                        emit(&request.respond().to_json(), pretty)?;
                        Ok(ExitCode::SUCCESS)
                    }
                    Err(e) => {
                        log::warn!("rejected request: {e}");
                        emit(&failure(&e), pretty)?;
                        Ok(ExitCode::from(CLIENT_ERROR))
                    }
                };
            }

            match parse(&read_input(file.as_deref())?, pretty)? {
                Ok(json) => compute(&json, pretty),
                Err(code) => Ok(code),
            }
        }
        Commands::Batch { file } => match parse(&read_input(Some(&file))?, pretty)? {
            Ok(json) => batch(&json, pretty),
            Err(code) => Ok(code),
        },
    }
}
