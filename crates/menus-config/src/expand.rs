//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `$VAR`, `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key and is only used for error reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
