//! Configuration loading and resolution.

use std::path::PathBuf;

/// Env var naming the configuration root.
pub const OUTPUT_DIR_ENV: &str = "LDPROXY_CFG_DIR";

/// Env var holding the database password.
pub const PASSWORD_ENV: &str = "LDPROXY_DB_PASSWORD";

const DEFAULT_OUTPUT_DIR: &str = "ldproxy-cfg";

/// Resolve the directory the documents are written under.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(OUTPUT_DIR_ENV) {
        return PathBuf::from(env_path);
    }

    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Pick the database password: the env var wins over the connection URL.
pub fn resolve_password(from_url: &str) -> String {
    choose_password(from_url, std::env::var(PASSWORD_ENV).ok())
}

fn choose_password(from_url: &str, from_env: Option<String>) -> String {
    match from_env {
        Some(password) if !password.is_empty() => password,
        _ => from_url.to_string(),
    }
}

/// Split a comma-separated flag value, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
