use clap::Parser;
use std::path::PathBuf;

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw(RawOutputMode),
}

#[derive(Debug, Clone, Copy)]
enum RawOutputMode {
    /// Child process owns the terminal; exit code is passed through.
    Passthrough,
    PlainText,
}

mod commands;
mod output;

use commands::{deploy_path, lock, log_command, run, version};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "deploy-tools")]
#[command(version = VERSION)]
#[command(about = "Helpers for release deployments")]
struct Cli {
    /// Load settings from this JSON file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the timestamped directory for a new deployment
    #[command(name = "make_deploy_path", visible_alias = "make-deploy-path")]
    MakeDeployPath,
    /// Read the version of an extracted release
    DeploymentVersion(version::DeploymentVersionArgs),
    /// Check whether an upgrade path is supported
    CheckUpgrade(version::CheckUpgradeArgs),
    /// Wait for and take the deployment lock
    Lock(lock::LockArgs),
    /// Release the deployment lock
    Unlock,
    /// Run a command with tracing and failure diagnostics
    Run(run::RunArgs),
    /// Append a management command to an audit log
    LogCommand(log_command::LogCommandArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::MakeDeployPath => ResponseMode::Raw(RawOutputMode::PlainText),
        Commands::Run(_) => ResponseMode::Raw(RawOutputMode::Passthrough),
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match deploy_tools::defaults::load_config_from(path) {
            Ok(config) => config,
            Err(err) => {
                let exit_code = output::exit_code_for_error(&err);
                let _ = output::print_result::<serde_json::Value>(Err(err));
                return std::process::ExitCode::from(exit_code_to_u8(exit_code));
            }
        },
        None => deploy_tools::defaults::load_config(),
    };
    let global = GlobalArgs { config };

    match response_mode(&cli.command) {
        ResponseMode::Raw(RawOutputMode::PlainText) => {
            match deploy_path::run(&global) {
                Ok(path) => {
                    println!("{}", path.display());
                    std::process::ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    let exit_code = output::exit_code_for_error(&err);
                    std::process::ExitCode::from(exit_code_to_u8(exit_code))
                }
            }
        }
        ResponseMode::Raw(RawOutputMode::Passthrough) => {
            let exit_code = commands::run_passthrough(cli.command, &global);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            let _ = output::print_json_result(json_result);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
