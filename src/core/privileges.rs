//! Permanent switch to the deploy account.

use nix::unistd::{self, Gid, Uid, User};
use std::env;
use std::io;

use crate::defaults::{self, DeployConfig};
use crate::error::{Error, Result};
use crate::paths;

/// Passwd entry fields needed for the switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: Uid,
    pub gid: Gid,
    pub home: String,
}

/// Look up an account in the system account database.
pub fn lookup_account(name: &str) -> Result<Account> {
    if name.contains('\0') {
        return Err(Error::validation_invalid_argument(
            "user",
            "User name contains a NUL byte",
            Some(name.to_string()),
        ));
    }

    let user = User::from_name(name)
        .map_err(|errno| {
            Error::internal_io(
                io::Error::from(errno).to_string(),
                Some(format!("look up user {}", name)),
            )
        })?
        .ok_or_else(|| Error::account_not_found(name))?;

    Ok(Account {
        name: user.name,
        uid: user.uid,
        gid: user.gid,
        home: user.dir.to_string_lossy().into_owned(),
    })
}

/// Drop to the configured deploy account (`zulip` unless the config file says otherwise).
pub fn su_to_zulip() -> Result<()> {
    su_to_user(&defaults::load_config())
}

/// Switch gid then uid to the configured deploy user and point `HOME` at the
/// parent of the deployments root. Irreversible for the rest of the process.
pub fn su_to_user(config: &DeployConfig) -> Result<()> {
    let account = lookup_account(&config.deploy_user)?;

    unistd::setgid(account.gid).map_err(|errno| {
        Error::privilege_drop_failed(&account.name, "setgid", io::Error::from(errno))
    })?;
    unistd::setuid(account.uid).map_err(|errno| {
        Error::privilege_drop_failed(&account.name, "setuid", io::Error::from(errno))
    })?;

    env::set_var("HOME", paths::deploy_home(config));
    crate::log_status!("privileges", "Now running as {}", account.name);
    Ok(())
}
