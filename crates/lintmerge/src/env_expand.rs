//! Environment variable expansion for configuration files.
//!
//! Config text is expanded before it is parsed as TOML:
//!
//! - `${VAR}` is replaced with the value of `VAR`; an unset variable is an error
//! - `${VAR:-default}` falls back to `default` when `VAR` is unset or empty
//!
//! A `$` not followed by `{` is left alone, so PHP variables in tool arguments
//! survive untouched.

use std::borrow::Cow;

use anyhow::{Result, bail};

/// Expands every `${...}` reference in `text`.
///
/// Returns the input unchanged (borrowed) when it contains no references.
pub fn expand_env_vars(text: &str) -> Result<Cow<'_, str>> {
    let Some(first) = text.find("${") else {
        return Ok(Cow::Borrowed(text));
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut rest = &text[first..];

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let body_start = start + 2;
        let Some(len) = rest[body_start..].find('}') else {
            let preview: String = rest[body_start..].chars().take(20).collect();
            bail!("Unclosed environment variable reference: ${{{preview}...");
        };
        let body = &rest[body_start..body_start + len];
        out.push_str(&expand_reference(body)?);
        rest = &rest[body_start + len + 1..];
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}

/// Expands the text between `${` and `}`.
fn expand_reference(body: &str) -> Result<String> {
    match body.split_once(":-") {
        Some((name, default)) => {
            check_name(name)?;
            Ok(std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string()))
        }
        None => {
            check_name(body)?;
            match std::env::var(body) {
                Ok(v) => Ok(v),
                Err(_) => bail!(
                    "Environment variable '{body}' is not set. \
                     Use ${{{body}:-default}} to provide a fallback."
                ),
            }
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        bail!("Empty environment variable name in ${{}}");
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        bail!("Invalid environment variable name '{name}': must start with a letter or underscore");
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        bail!("Invalid environment variable name '{name}': contains invalid character '{bad}'");
    }
    Ok(())
}
