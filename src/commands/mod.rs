use deploy_tools::DeployConfig;

pub type CmdResult<T> = deploy_tools::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub config: DeployConfig,
}

pub mod deploy_path;
pub mod lock;
pub mod log_command;
pub mod run;
pub mod version;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (deploy_tools::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::DeploymentVersion(args) => {
            crate::output::map_cmd_result_to_json(version::run_deployment_version(args, global))
        }
        crate::Commands::CheckUpgrade(args) => {
            crate::output::map_cmd_result_to_json(version::run_check_upgrade(args, global))
        }
        crate::Commands::Lock(args) => dispatch!(args, global, lock),
        crate::Commands::Unlock => {
            crate::output::map_cmd_result_to_json(lock::run_unlock(global))
        }
        crate::Commands::LogCommand(args) => dispatch!(args, global, log_command),

        // Raw output modes
        crate::Commands::MakeDeployPath | crate::Commands::Run(_) => {
            let err = deploy_tools::Error::validation_invalid_argument(
                "output_mode",
                "Command uses raw output mode",
                None,
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}

/// Commands whose output belongs to a child process. Errors are reported on
/// stderr and mapped to an exit code.
pub(crate) fn run_passthrough(command: crate::Commands, global: &GlobalArgs) -> i32 {
    let result = match command {
        crate::Commands::Run(args) => run::run(args, global),
        _ => Err(deploy_tools::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support passthrough output",
            None,
        )),
    };

    match result {
        Ok(((), exit_code)) => exit_code,
        Err(err) => {
            eprintln!("Error: {}", err);
            crate::output::exit_code_for_error(&err)
        }
    }
}
