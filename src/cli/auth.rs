//! Account and session commands.

use std::io::{self, IsTerminal};

use dialoguer::Password;
use tracing::{info, warn};

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::api::Client;
use crate::core::config::{Session, Settings};
use crate::core::keys::KeyFile;
use crate::error::{Result, ValidationError};

/// Read a password from the flag/env, a pipe, or a hidden prompt.
fn read_password(given: Option<String>, confirm: bool) -> Result<String> {
    let password = match given {
        Some(p) => p,
        None if !io::stdin().is_terminal() => {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
        None => {
            let mut prompt = Password::new().with_prompt("Password");
            if confirm {
                prompt = prompt.with_confirmation("Confirm password", "passwords don't match");
            }
            prompt.interact()?
        }
    };

    if password.is_empty() {
        return Err(ValidationError::MissingValue("password").into());
    }
    Ok(password)
}

/// Create an account. Generates an age key first if none exists.
pub fn register(email: &str, name: &str, password: Option<String>) -> Result<()> {
    let settings = Settings::from_env()?;
    let keys = KeyFile::new(&settings.key_file);

    let public_key = if keys.exists() {
        keys.public_key()?
    } else {
        let key = keys.generate()?;
        output::success(&format!(
            "generated age key at {}",
            output::path(&keys.path().display().to_string())
        ));
        key
    };

    let password = read_password(password, true)?;
    let client = Client::anonymous(&settings)?;
    let response = client.register(email, &password, name, &public_key)?;

    let session = response.into_session();
    session.save(&settings.credentials_path())?;
    info!(user = %session.user_id, "registered");

    output::success(&format!("registered {}", session.email));
    output::kv("public key", output::short_key(&public_key));
    Ok(())
}

pub fn login(email: &str, password: Option<String>) -> Result<()> {
    let settings = Settings::from_env()?;
    let password = read_password(password, false)?;

    let client = Client::anonymous(&settings)?;
    let response = client.login(email, &password)?;

    let local_key = KeyFile::new(&settings.key_file).public_key().ok();
    let registered_key = response.user.age_public_key.clone();

    let session = response.into_session();
    session.save(&settings.credentials_path())?;
    info!(user = %session.user_id, "logged in");

    output::success(&format!("logged in as {}", session.email));
    match (local_key, registered_key.filter(|k| !k.is_empty())) {
        (None, _) => output::warn(&format!(
            "no local age key at {}; you won't be able to decrypt",
            settings.key_file.display()
        )),
        (Some(local), Some(registered)) if local != registered => output::warn(
            "local age key differs from the one registered with your account",
        ),
        _ => {}
    }
    Ok(())
}

/// End the session. The local credentials are removed even if the server
/// call fails.
pub fn logout() -> Result<()> {
    let settings = Settings::from_env()?;
    let path = settings.credentials_path();

    match Session::load(&path) {
        Ok(session) => {
            let client = Client::authenticated(&settings, &session)?;
            if let Err(e) = client.logout() {
                warn!(error = %e, "server-side logout failed");
            }
            Session::clear(&path)?;
            output::success("logged out");
        }
        Err(_) => output::dimmed("not logged in"),
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    let ctx = Context::authenticated()?;
    let user = ctx.client.me()?;

    output::kv("email", &user.email);
    if !user.name.is_empty() {
        output::kv("name", &user.name);
    }
    output::kv("user id", &user.id);
    match user.age_public_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => output::kv("public key", output::short_key(key)),
        None => output::kv("public key", "none registered"),
    }
    if !ctx.session.expires_at.is_empty() {
        output::kv("expires", &ctx.session.expires_at);
    }
    Ok(())
}
