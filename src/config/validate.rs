use anyhow::{Result, bail};

use super::{AppConfig, defaults::MIN_ADMIN_PASSWORD_LEN};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_secs == 0 {
            errors.push("auth.access_ttl_secs must be > 0".to_string());
        }

        if auth.refresh_ttl_days <= 0 {
            errors.push("auth.refresh_ttl_days must be > 0".to_string());
        }

        match (auth.admin_email.as_deref(), auth.admin_password.as_deref()) {
            (Some(email), Some(password)) => {
                if email.trim().is_empty() {
                    errors.push("auth.admin_email must not be empty".to_string());
                }
                if password.len() < MIN_ADMIN_PASSWORD_LEN {
                    errors.push(format!(
                        "auth.admin_password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
                    ));
                }
            }
            (None, None) => {}
            _ => errors.push(
                "auth.admin_email and auth.admin_password must be set together".to_string(),
            ),
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
