//! # tg-api Handlers
//!
//! This module coordinates the flow between HTTP requests and server actions.
//! Every handler answers with a JSON `ActionState`, never a bare error page.

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use tg_actions::{Actions, CreateBattleEmoteInput, CreateTitanInput, UpdateTitanInput};
use tg_core::{ActionResult, ActionState, RequestContext, SessionProvider};
use uuid::Uuid;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub actions: Actions,
    pub sessions: Arc<dyn SessionProvider>,
}

/// Resolves the `Authorization: Bearer <token>` header into an explicit context.
async fn request_context(data: &AppState, req: &HttpRequest) -> RequestContext {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    RequestContext::from_token(data.sessions.as_ref(), token).await
}

/// Serializes an action outcome at the HTTP boundary.
pub fn respond<T: Serialize>(result: ActionResult<T>) -> HttpResponse {
    let status = match &result {
        ActionResult::Success(_) => StatusCode::OK,
        ActionResult::FieldFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ActionResult::Failure(_) => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status).json(ActionState::from(result))
}

/// Lists the caller's titans (GET /titans)
pub async fn list_titans(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(data.actions.list_titans(&ctx).await)
}

/// Creates a titan (POST /titans)
pub async fn create_titan(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateTitanInput>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(data.actions.create_titan(&ctx, body.into_inner()).await)
}

/// Replaces a titan's name and description (PUT /titans/{id})
pub async fn update_titan(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTitanInput>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(
        data.actions
            .update_titan(&ctx, path.into_inner(), body.into_inner())
            .await,
    )
}

/// DELETE /titans/{id}
pub async fn delete_titan(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(data.actions.delete_titan(&ctx, path.into_inner()).await)
}

/// GET /titans/{id}/emotes
pub async fn list_battle_emotes(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(data.actions.list_battle_emotes(&ctx, path.into_inner()).await)
}

/// POST /titans/{id}/emotes
pub async fn create_battle_emote(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<CreateBattleEmoteInput>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(
        data.actions
            .create_battle_emote(&ctx, path.into_inner(), body.into_inner())
            .await,
    )
}

/// DELETE /emotes/{id}
pub async fn delete_battle_emote(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let ctx = request_context(&data, &req).await;
    respond(data.actions.delete_battle_emote(&ctx, path.into_inner()).await)
}

/// Liveness probe for load balancers.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use tg_auth_simple::SimpleSessionProvider;
    use tg_core::UserId;
    use tg_db_sqlite::SqliteGameRepo;

    use super::*;
    use crate::configure_routes;

    async fn state() -> (web::Data<AppState>, String) {
        let repo = Arc::new(SqliteGameRepo::new("sqlite::memory:").await.unwrap());
        let sessions = SimpleSessionProvider::new("test-salt");
        let token = sessions.issue_token(&UserId::new("user_1")).unwrap();
        let state = web::Data::new(AppState {
            actions: Actions::new(repo.clone(), repo),
            sessions: Arc::new(sessions),
        });
        (state, token)
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn anonymous_create_reports_not_authenticated() {
        let (state, _) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/titans")
            .set_json(json!({ "name": "Ignis" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not authenticated" }));
    }

    #[actix_web::test]
    async fn empty_name_reports_field_errors() {
        let (state, token) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/titans")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "fieldErrors": { "name": ["Name is required"] } }));
    }

    #[actix_web::test]
    async fn titan_and_emote_lifecycle() {
        let (state, token) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        // 1. Create
        let req = test::TestRequest::post()
            .uri("/titans")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Ignis", "description": "Born of the forge" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let titan_id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["ownerId"], "user_1");
        assert!(body.get("error").is_none());

        // 2. Add an emote
        let req = test::TestRequest::post()
            .uri(&format!("/titans/{titan_id}/emotes"))
            .insert_header(bearer(&token))
            .set_json(json!({ "phrase": "Burn!" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // 3. List emotes
        let req = test::TestRequest::get()
            .uri(&format!("/titans/{titan_id}/emotes"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["phrase"], "Burn!");

        // 4. Rename
        let req = test::TestRequest::put()
            .uri(&format!("/titans/{titan_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Ignis Prime" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Ignis Prime");
        assert!(body["data"].get("description").map_or(true, Value::is_null));

        // 5. Delete
        let req = test::TestRequest::delete()
            .uri(&format!("/titans/{titan_id}"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "data": titan_id }));

        // 6. Gone
        let req = test::TestRequest::get()
            .uri("/titans")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "data": [] }));
    }

    #[actix_web::test]
    async fn malformed_body_is_a_general_failure() {
        let (state, token) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/titans")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Invalid request body" }));
    }

    #[actix_web::test]
    async fn bad_identifier_is_a_general_failure() {
        let (state, token) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::delete()
            .uri("/titans/not-a-uuid")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Invalid identifier" }));
    }

    #[actix_web::test]
    async fn health_is_public() {
        let (state, _) = state().await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
