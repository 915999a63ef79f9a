//! Username and namespace helpers used to name local environs.

use std::env;

use crate::Error;
use crate::Result;

/// Returns the original username if sudo was used, read from the process
/// environment.
pub fn resolve_sudo(username: &str) -> String {
    resolve_sudo_with(username, |key| env::var(key).unwrap_or_default())
}

pub(crate) fn resolve_sudo_with<F>(
    username: &str,
    getenv: F,
) -> String
where
    F: Fn(&str) -> String,
{
    if username != "root" {
        return username.to_string();
    }
    // sudo was probably used, look up the invoking user
    match getenv("SUDO_USER") {
        original if !original.is_empty() => original,
        _ => username.to_string(),
    }
}

/// Username from the `USER` environment variable
pub fn env_username() -> Result<String> {
    Ok(env::var("USER").unwrap_or_default())
}

/// Username of the OS user owning the current process
pub fn os_username() -> Result<String> {
    Ok(whoami::fallible::username()?)
}

/// Tries each username source in order.
///
/// An error from any source is returned immediately. An empty name means the
/// source did not know the username and the next one is tried. The first
/// name found is passed through `resolve_sudo`, if given.
pub fn resolve_username(
    resolve_sudo: Option<&dyn Fn(&str) -> String>,
    sources: &[&dyn Fn() -> Result<String>],
) -> Result<String> {
    for source in sources {
        let username = source()?;
        if username.is_empty() {
            continue;
        }
        if let Some(resolve) = resolve_sudo {
            let original = resolve(&username);
            if !original.is_empty() {
                return Ok(original);
            }
        }
        return Ok(username);
    }
    Err(Error::NotFound("username".to_string()))
}

/// Namespace name for the given username and environ name
pub fn namespace(
    username: &str,
    env_name: &str,
) -> String {
    format!("{}-{}", username, env_name)
}

/// Current username on the local host, from `USER` and then the OS
pub fn local_username() -> Result<String> {
    local_username_from(&[&env_username, &os_username])
}

pub(crate) fn local_username_from(sources: &[&dyn Fn() -> Result<String>]) -> Result<String> {
    resolve_username(Some(&resolve_sudo), sources).map_err(|e| match e {
        Error::NotFound(what) => Error::NotFound(format!("{} of the current process", what)),
        e => e,
    })
}

/// Namespace for the given environ name, based on the local user
pub fn local_namespace(env_name: &str) -> Result<String> {
    let username = local_username()?;
    Ok(namespace(&username, env_name))
}
