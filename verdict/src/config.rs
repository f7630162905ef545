//! Output-path option handling.
//!
//! The verdict path accepts environment variables (`$VAR`, `${VAR}`) and a
//! leading `~`, matching common shell conventions. Unset variables are left
//! verbatim.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Expand environment variables and `~` in the raw option value, then
/// absolutize against the current directory.
pub fn expand_json_path(raw: &str) -> Result<PathBuf> {
    let expanded = expand_env_vars(raw, &|name| env::var(name).ok());
    let expanded = expand_home(&expanded, dirs::home_dir().as_deref());
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().context("resolve current dir")?;
    Ok(cwd.join(path))
}

fn expand_env_vars(raw: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, token_len) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 3),
                None => {
                    out.push('$');
                    rest = after;
                    continue;
                }
            }
        } else {
            let end = after
                .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
                .unwrap_or(after.len());
            (&after[..end], end + 1)
        };
        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[pos..pos + token_len]),
        }
        rest = &rest[pos + token_len..];
    }
    out.push_str(rest);
    out
}

fn expand_home(raw: &str, home: Option<&Path>) -> String {
    if raw == "~"
        && let Some(home) = home
    {
        return home.display().to_string();
    }
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = home
    {
        return home.join(rest).display().to_string();
    }
    raw.to_string()
}
