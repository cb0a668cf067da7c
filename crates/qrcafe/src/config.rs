//! CLI configuration: thin wrapper around `qrcafe_config`.
//!
//! Re-exports the shared types and adds resolution that layers `GlobalOpts`
//! flag overrides (--api-url, --user-id, --token, ...) on top of a profile.

use secrecy::SecretString;

use qrcafe_core::CoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use qrcafe_config::{Config, config_path, load_config_or_default, store_api_token};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `CoreConfig` from the config file, the active profile, and CLI
/// overrides. Flags win over profile values.
pub fn resolve_core_config(global: &GlobalOpts) -> Result<CoreConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut core = if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref url) = global.api_url {
            profile.api_url.clone_from(url);
        }
        qrcafe_config::profile_to_core_config(&profile, &profile_name, &cfg.defaults)?
    } else if global.profile.is_some() {
        let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
        names.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        });
    } else {
        let raw = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let mut core = CoreConfig::new(parse_api_url(raw)?);
        core.timeout = Some(qrcafe_config::parse_duration(
            "timeout",
            &cfg.defaults.timeout,
        )?);
        core
    };

    apply_overrides(&mut core, global)?;
    Ok(core)
}

fn apply_overrides(core: &mut CoreConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(user_id) = global.user_id {
        core.user_id = Some(user_id);
    }
    if let Some(ref token) = global.token {
        core.api_token = Some(SecretString::from(token.clone()));
    }
    if let Some(ref url) = global.cache_url {
        core.cache_url = Some(url.clone()).filter(|u| !u.trim().is_empty());
    }
    if let Some(ref raw) = global.timeout {
        core.timeout = Some(qrcafe_config::parse_duration("timeout", raw)?);
    }
    Ok(())
}

fn parse_api_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
