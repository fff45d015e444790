//! # Titan Grimoire Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use secrecy::ExposeSecret;
use tg_actions::Actions;
use tg_api::handlers::AppState;
use tg_api::middleware::{cors_policy, security_headers, standard_middleware};
use tg_core::diagnostics;

use titan_grimoire::config::AppConfig;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use tg_db_sqlite::SqliteGameRepo;

#[cfg(feature = "auth-simple")]
use tg_auth_simple::SimpleSessionProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "auth-simple")))]
compile_error!("titan-grimoire needs the `db-sqlite` and `auth-simple` plugins");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Report on credentials before anything touches them
    diagnostics::inspect_process().log();

    let config = AppConfig::from_env()?;

    // 2. Initialize Database Implementation
    let repo = Arc::new(SqliteGameRepo::new(&config.database_url).await?);

    // 3. Initialize Session Implementation
    let sessions = match &config.session_salt {
        Some(salt) => SimpleSessionProvider::new(salt.expose_secret()),
        None => {
            log::warn!("SESSION_SALT is not set; session tokens will not survive a restart");
            SimpleSessionProvider::random()?
        }
    };

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState {
        actions: Actions::new(repo.clone(), repo),
        sessions: Arc::new(sessions),
    });

    log::info!(
        "🚀 Titan Grimoire starting on http://{}:{}",
        config.bind_addr,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(security_headers())
            .wrap(cors_policy())
            .wrap(standard_middleware())
            .configure(tg_api::configure_routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
