use std::sync::Arc;

use actix_web::{post, web, Error, Scope};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::error::StoreError;
use crate::models::Account;
use crate::types::{AccountResponse, GetAccountRequest, LoginRequest, SignupRequest};
use crate::AppState;

pub fn routes() -> Scope {
    web::scope("/user")
        .service(signup)
        .service(create)
        .service(login)
        .service(get_account)
}

#[post("/signup")]
async fn signup(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<SignupRequest>,
) -> Result<web::Json<AccountResponse>, Error> {
    info!("/user/signup userId={}", request.user_id);
    create_account(&app_state.pool, request).await
}

/// Thin alias for signup kept for older clients that still post to /create.
#[post("/create")]
async fn create(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<SignupRequest>,
) -> Result<web::Json<AccountResponse>, Error> {
    info!("/user/create userId={}", request.user_id);
    create_account(&app_state.pool, request).await
}

async fn create_account(
    pool: &SqlitePool,
    request: SignupRequest,
) -> Result<web::Json<AccountResponse>, Error> {
    let password = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|e| {
        error!("Failed to hash password: {e}");
        actix_web::error::ErrorInternalServerError("internal error")
    })?;

    let account = Account {
        user_id: request.user_id,
        email: request.email,
        password,
        first_name: request.first_name,
        last_name: request.last_name,
        created_at: request.created_at.unwrap_or_else(Utc::now),
    };

    match Account::create(pool, &account).await {
        Ok(account) => Ok(web::Json(account.into())),
        Err(StoreError::Conflict) => Err(actix_web::error::ErrorConflict("account already exists")),
        Err(e) => {
            error!("Failed to create account userId={}: {e}", account.user_id);
            Err(actix_web::error::ErrorInternalServerError("internal error"))
        }
    }
}

/// Verifies the submitted password against the stored hash. Unknown email and
/// wrong password produce the same 401 so callers cannot probe for accounts.
#[post("/login")]
async fn login(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<LoginRequest>,
) -> Result<web::Json<AccountResponse>, Error> {
    info!("/user/login email={}", request.email);
    let account = Account::find_by_email(&app_state.pool, &request.email)
        .await
        .map_err(|e| {
            error!("Failed to look up account by email: {e}");
            actix_web::error::ErrorInternalServerError("internal error")
        })?;

    let Some(account) = account else {
        return Err(actix_web::error::ErrorUnauthorized("invalid credentials"));
    };

    if !bcrypt::verify(&request.password, &account.password).unwrap_or(false) {
        return Err(actix_web::error::ErrorUnauthorized("invalid credentials"));
    }

    Ok(web::Json(account.into()))
}

#[post("/get")]
async fn get_account(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<GetAccountRequest>,
) -> Result<web::Json<AccountResponse>, Error> {
    info!("/user/get userId={}", request.user_id);
    match Account::find_by_user_id(&app_state.pool, &request.user_id).await {
        Ok(Some(account)) => Ok(web::Json(account.into())),
        Ok(None) => Err(actix_web::error::ErrorNotFound("account not found")),
        Err(e) => {
            error!("Failed to fetch account userId={}: {e}", request.user_id);
            Err(actix_web::error::ErrorInternalServerError("internal error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use actix_web::{test, App};
    use serde_json::json;

    async fn test_state() -> web::Data<Arc<AppState>> {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);

        let pool = db::init_pool(&url).unwrap();
        db::MIGRATOR.run(&pool).await.unwrap();
        web::Data::new(Arc::new(AppState { pool }))
    }

    fn signup_json(user_id: &str, email: &str) -> serde_json::Value {
        json!({
            "userId": user_id,
            "email": email,
            "password": "hunter22",
            "firstName": "Ada",
            "lastName": "Lovelace"
        })
    }

    #[actix_web::test]
    async fn test_signup_returns_account_without_password() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).service(routes())).await;

        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u1", "ada@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["email"], "ada@example.com");
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn test_duplicate_signup_is_conflict() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).service(routes())).await;

        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u1", "ada@example.com"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        // Same email, different userId
        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u2", "ada@example.com"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        // Same userId, different email
        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u1", "other@example.com"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        // The second account was never created
        let req = test::TestRequest::post()
            .uri("/user/get")
            .set_json(json!({ "userId": "u2" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_login_success_and_rejections() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).service(routes())).await;

        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u1", "ada@example.com"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({ "email": "ada@example.com", "password": "hunter22" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], "u1");
        assert!(body.get("password").is_none());

        // Wrong password and unknown email must be indistinguishable
        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
            .to_request();
        let wrong_password = test::call_service(&app, req).await;
        assert_eq!(wrong_password.status(), 401);
        let wrong_password_body = test::read_body(wrong_password).await;

        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({ "email": "ghost@example.com", "password": "hunter22" }))
            .to_request();
        let unknown_email = test::call_service(&app, req).await;
        assert_eq!(unknown_email.status(), 401);
        assert_eq!(test::read_body(unknown_email).await, wrong_password_body);
    }

    #[actix_web::test]
    async fn test_create_is_signup_alias() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).service(routes())).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(signup_json("u1", "ada@example.com"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({ "email": "ada@example.com", "password": "hunter22" }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    #[actix_web::test]
    async fn test_get_account_strips_hash_and_404s_unknown() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).service(routes())).await;

        let req = test::TestRequest::post()
            .uri("/user/signup")
            .set_json(signup_json("u1", "ada@example.com"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/user/get")
            .set_json(json!({ "userId": "u1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["firstName"], "Ada");
        assert!(body.get("password").is_none());

        let req = test::TestRequest::post()
            .uri("/user/get")
            .set_json(json!({ "userId": "ghost" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }
}
