//! Config subcommand handlers.

use std::fmt::Write as _;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Copy of `cfg` with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-shaped view of the config for table output.
fn format_config(cfg: &Config, active: &str) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out, "# active profile: {active}");
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = \"{}\"", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(user_id) = p.user_id {
            let _ = writeln!(out, "user_id = {user_id}");
        }
        if let Some(ref token) = p.api_token {
            let _ = writeln!(out, "api_token = \"{token}\"");
        }
        if let Some(ref env) = p.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
        if let Some(ref url) = p.cache_url {
            let _ = writeln!(out, "cache_url = \"{url}\"");
        }
        for (key, value) in [
            ("timeout", &p.timeout),
            ("stale_time", &p.stale_time),
            ("gc_time", &p.gc_time),
        ] {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let active = config::active_profile_name(global, &cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| format_config(c, &active),
                |_| active.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let token = rpassword::prompt_password(format!("API token for '{name}': "))?;
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "api_token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            config::store_api_token(&name, token)?;
            output::print_status(
                &format!("API token for '{name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrcafe_config::Profile;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://api.qrcafe.test/api".into(),
                user_id: Some(5),
                api_token: Some("s3cret".into()),
                stale_time: Some("90s".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_plaintext_tokens() {
        let out = format_config(&redacted(&sample()), "default");
        assert!(!out.contains("s3cret"));
        assert!(out.contains("api_token = \"****\""));
        assert!(out.contains("user_id = 5"));
        assert!(out.contains("stale_time = \"90s\""));
    }

    #[test]
    fn redaction_leaves_absent_tokens_absent() {
        let mut cfg = sample();
        if let Some(p) = cfg.profiles.get_mut("default") {
            p.api_token = None;
        }
        assert!(!format_config(&redacted(&cfg), "default").contains("api_token"));
    }
}
