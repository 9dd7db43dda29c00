//! Input validation for paths, host names, and the single POSIX shell-quoting
//! helper every executor goes through before building a remote command line.

use crate::error::ScoutError;

/// Rejects path traversal and embedded NULs, then normalizes `//` and `./`.
///
/// Empty paths and `~/`-prefixed paths are allowed (resolved remotely by the
/// target shell, not locally).
pub fn validate_path(path: &str) -> Result<String, ScoutError> {
    if path.contains('\0') {
        return Err(ScoutError::Validation("path contains a NUL byte".to_string()));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(ScoutError::Validation(format!(
            "path traversal is not allowed: {path}"
        )));
    }

    if path.is_empty() {
        return Ok(path.to_string());
    }

    let leading_slash = path.starts_with('/');
    let mut normalized: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            other => normalized.push(other),
        }
    }

    let joined = normalized.join("/");
    Ok(if leading_slash {
        format!("/{joined}")
    } else {
        joined
    })
}

/// Rejects empty, overlong, or shell-metacharacter-bearing host names.
/// Dots and colons pass through (FQDNs, IPv6 literals).
pub fn validate_host(host: &str) -> Result<(), ScoutError> {
    if host.is_empty() {
        return Err(ScoutError::Validation("host name must not be empty".to_string()));
    }
    if host.len() > 253 {
        return Err(ScoutError::Validation(format!(
            "host name exceeds 253 bytes: {host}"
        )));
    }
    const DISALLOWED: &[char] = &[';', '|', '&', '$', '`', '/', '\\', '\n', '\r', '\0', ' '];
    if host.chars().any(|c| DISALLOWED.contains(&c)) {
        return Err(ScoutError::Validation(format!(
            "host name contains a disallowed character: {host}"
        )));
    }
    Ok(())
}

/// Single-quotes `arg` for inclusion in a remote POSIX shell command line,
/// escaping any embedded single quotes via the `'\''` idiom. This is the
/// only place in the crate that produces shell-quoted text.
pub fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~' | ':'))
    {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('\'');
    for c in arg.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}
