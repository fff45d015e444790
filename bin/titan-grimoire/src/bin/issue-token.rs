//! Mints a session token for a user id, signed with `SESSION_SALT`.
//!
//! Usage: `issue-token <user-id>`

use anyhow::{bail, Context};
use secrecy::ExposeSecret;
use tg_auth_simple::SimpleSessionProvider;
use tg_core::UserId;
use titan_grimoire::config::AppConfig;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let user = std::env::args()
        .nth(1)
        .filter(|id| !id.trim().is_empty())
        .context("usage: issue-token <user-id>")?;

    let config = AppConfig::from_env()?;
    let Some(salt) = config.session_salt else {
        bail!("SESSION_SALT must be set, otherwise the server cannot verify the token");
    };

    let sessions = SimpleSessionProvider::new(salt.expose_secret());
    println!("{}", sessions.issue_token(&UserId::new(user.trim()))?);
    Ok(())
}
