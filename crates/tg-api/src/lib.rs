//! # tg-api
//!
//! The web routing and orchestration layer for Titan Grimoire.

pub mod handlers;
pub mod middleware;

use actix_web::{error, web, HttpResponse};
use tg_core::{ActionResult, ActionState};

/// Configures the routes for the game API.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("")
                .route("/titans", web::get().to(handlers::list_titans))
                .route("/titans", web::post().to(handlers::create_titan))
                .route("/titans/{id}", web::put().to(handlers::update_titan))
                .route("/titans/{id}", web::delete().to(handlers::delete_titan))
                .route("/titans/{id}/emotes", web::get().to(handlers::list_battle_emotes))
                .route("/titans/{id}/emotes", web::post().to(handlers::create_battle_emote))
                .route("/emotes/{id}", web::delete().to(handlers::delete_battle_emote)),
        );
}

/// Undecodable bodies still answer with an `ActionState`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {err}");
        let body = failure_body("Invalid request body");
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let body = failure_body("Invalid identifier");
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

fn failure_body(message: &str) -> ActionState<()> {
    ActionResult::<()>::failure(message).into()
}
