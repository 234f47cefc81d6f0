//! Environment references in config strings.
//!
//! Only the braced forms are recognised, `${VAR}` and `${VAR:-default}`.
//! A bare `$` is literal so that URLs and paths containing one pass through.

use std::convert::Infallible;

use crate::ConfigError;

/// Expand braced environment references in `value`, reading the process
/// environment. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |var| std::env::var(var).ok())
}

fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(close) = rest[start..].find('}').map(|i| start + i) else {
            break;
        };
        let reference = &rest[start..=close];
        let inner = &reference[2..reference.len() - 1];

        if !inner.contains(":-") && lookup(inner).is_none() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{inner}}} not set"),
            });
        }

        let expanded =
            shellexpand::env_with_context(reference, |var| Ok::<_, Infallible>(lookup(var)))
                .map_err(|e| ConfigError::EnvVar {
                    field: field.to_owned(),
                    message: e.to_string(),
                })?;

        out.push_str(&rest[..start]);
        out.push_str(&expanded);
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
