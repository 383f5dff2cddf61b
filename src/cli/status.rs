//! Quick status overview command.
//!
//! Local only: reads the binding, session and key file without touching
//! the network.

use chrono::Utc;

use crate::cli::output;
use crate::core::config::{ProjectBinding, Session, Settings};
use crate::core::keys::KeyFile;
use crate::error::Result;

/// Show binding, session and key status.
pub fn execute() -> Result<()> {
    let settings = Settings::from_env()?;
    let root = std::env::current_dir()?;

    output::section("envv status");

    match ProjectBinding::load_from(&root) {
        Ok(binding) => {
            let org = binding
                .organization_name
                .clone()
                .unwrap_or_else(|| binding.organization_id.clone());
            let project = binding
                .project_name
                .clone()
                .unwrap_or_else(|| binding.project_id.clone());
            output::kv("organization", org);
            output::kv("project", project);
            output::kv("environment", binding.default_environment);
        }
        Err(_) => output::kv("project", "not initialized"),
    }

    match Session::load(&settings.credentials_path()) {
        Ok(session) if session.is_expired_at(Utc::now()) => {
            output::kv("session", format!("{} (expired)", session.email));
        }
        Ok(session) => output::kv("session", &session.email),
        Err(_) => output::kv("session", "not logged in"),
    }

    let keys = KeyFile::new(&settings.key_file);
    match keys.public_key() {
        Ok(key) => output::kv("age key", output::short_key(&key)),
        Err(_) => output::kv("age key", "none"),
    }
    output::kv("engine", settings.engine);
    output::kv("api", &settings.api_url);

    Ok(())
}
