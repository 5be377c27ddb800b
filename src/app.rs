/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (順序はここで決める)
 * - axum::serve() で起動
 */
use std::panic;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, HttpConfig},
    middleware,
    repos::user_repo::{NewUser, UserRepo},
    services::auth::{build_auth_service, password, types::UserType},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,terminal_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Handler panics are contained by middleware::panic; this only makes
        // sure they also show up in the structured log.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook();

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let users = Arc::new(UserRepo::new());
    let auth = build_auth_service(config, users.clone())
        .await
        .context("identity cache unavailable")?;
    let state = AppState::new(auth, users, config.reject_code);

    seed_admin(&state, config)?;

    Ok(state)
}

// The in-process user store starts empty; an admin account is needed to create others.
fn seed_admin(state: &AppState, config: &Config) -> Result<()> {
    let hash = password::hash_password(&config.admin_password)
        .map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;

    let admin = state.users.create(NewUser {
        username: &config.admin_username,
        nickname: "Administrator",
        password_hash: hash,
        user_type: UserType::Admin,
    })?;
    tracing::info!(user_id = %admin.id, username = %admin.username, "admin account seeded");

    Ok(())
}

/// Route table wrapped in the middleware chain, outermost first:
/// CORS → request-id/trace/timeout → panic containment → error normalization
/// → body limit → authentication gate → handler.
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    with_middleware(api::routes(&http.static_dir), state, http)
}

fn with_middleware(routes: Router<AppState>, state: AppState, http: &HttpConfig) -> Router {
    let router = routes.fallback(api::handlers::fallback);

    let router = middleware::auth::access::apply(router, state.clone());
    let router = middleware::http::limit_body(router);
    let router = middleware::normalize::apply(router);
    let router = router.with_state(state);

    let router = middleware::panic::apply(router);
    let router = middleware::http::apply(router, http.request_timeout);
    middleware::cors::apply(router)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        routing::get,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::envelope::read_body;
    use crate::repos::record_repo::Record;
    use crate::services::auth::AuthService;
    use crate::services::auth::types::User;
    use crate::services::cache::MemoryIdentityCache;

    const REJECT_CODE: i32 = 401;

    struct Harness {
        state: AppState,
        app: Router,
    }

    fn http_config() -> HttpConfig {
        HttpConfig {
            static_dir: std::env::temp_dir().join("terminal-gateway-missing-static"),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn harness_state() -> AppState {
        let users = Arc::new(UserRepo::new());
        let auth = Arc::new(AuthService::new(
            Arc::new(MemoryIdentityCache::new()),
            users.clone(),
            Duration::from_secs(60),
            Duration::from_secs(600),
        ));
        AppState::new(auth, users, REJECT_CODE)
    }

    fn harness() -> Harness {
        let state = harness_state();
        let app = build_router(state.clone(), &http_config());
        Harness { state, app }
    }

    impl Harness {
        fn user(&self, username: &str, password: &str, user_type: UserType) -> User {
            self.state
                .users
                .create(NewUser {
                    username,
                    nickname: username,
                    password_hash: password::hash_password(password).unwrap(),
                    user_type,
                })
                .unwrap()
        }

        async fn token_for(&self, user: &User) -> String {
            self.state.auth.issue(user.clone(), false).await.unwrap().token
        }

        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let response = self.app.clone().oneshot(req).await.unwrap();
            let status = response.status();
            (status, read_body(response).await)
        }
    }

    fn request(
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("X-Auth-Token", token);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn seed_asset(state: &AppState, id: &str, owner: &str) {
        state.assets.insert(Record::new(
            id,
            "web-01",
            owner,
            json!({"ip": "127.0.0.1", "port": 22, "tags": "prod, web"})
                .as_object()
                .cloned()
                .unwrap(),
        ));
    }

    #[tokio::test]
    async fn tunnel_is_public_and_reaches_its_handler() {
        let h = harness();
        let (status, body) = h.send(request(Method::GET, "/tunnel", None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 501);
        assert_eq!(body["message"], "tunnel transport is not available");
    }

    #[tokio::test]
    async fn protected_route_with_unknown_token_is_rejected() {
        let h = harness();
        let (status, body) = h
            .send(request(Method::GET, "/users/paging", Some("bogus"), None))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], REJECT_CODE);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn rejected_request_never_runs_the_handler() {
        let h = harness();
        let (_, body) = h
            .send(request(
                Method::POST,
                "/user-groups",
                None,
                Some(json!({"name": "ops"})),
            ))
            .await;

        assert_eq!(body["code"], REJECT_CODE);
        assert!(h.state.groups.list().is_empty());
    }

    #[tokio::test]
    async fn unknown_path_without_token_is_rejected_first() {
        let h = harness();
        let (_, body) = h.send(request(Method::GET, "/nope", None, None)).await;
        assert_eq!(body["code"], REJECT_CODE);
    }

    #[tokio::test]
    async fn unknown_path_with_token_is_not_found() {
        let h = harness();
        let user = h.user("alice", "password1", UserType::Standard);
        let token = h.token_for(&user).await;

        let (_, body) = h.send(request(Method::GET, "/nope", Some(&token), None)).await;
        assert_eq!(body, json!({"code": -1, "message": "route not found"}));
    }

    #[tokio::test]
    async fn query_token_is_accepted() {
        let h = harness();
        let user = h.user("alice", "password1", UserType::Standard);
        let token = h.token_for(&user).await;

        let (_, body) = h
            .send(request(Method::GET, &format!("/info?X-Auth-Token={token}"), None, None))
            .await;
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["enableTotp"], false);
    }

    #[tokio::test]
    async fn header_token_wins_over_query_token() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let bob = h.user("bob", "password2", UserType::Standard);
        let alice_token = h.token_for(&alice).await;
        let bob_token = h.token_for(&bob).await;

        let (_, body) = h
            .send(request(
                Method::GET,
                &format!("/info?X-Auth-Token={bob_token}"),
                Some(&alice_token),
                None,
            ))
            .await;
        assert_eq!(body["data"]["username"], "alice");
    }

    #[tokio::test]
    async fn admin_deletes_foreign_asset() {
        let h = harness();
        let owner = h.user("alice", "password1", UserType::Standard);
        let admin = h.user("root", "password0", UserType::Admin);
        seed_asset(&h.state, "42", &owner.id);
        let token = h.token_for(&admin).await;

        let (_, body) = h
            .send(request(Method::DELETE, "/assets/42", Some(&token), None))
            .await;
        assert_eq!(body, json!({"code": 1, "message": "success", "data": null}));
        assert!(h.state.assets.get("42").is_none());
    }

    #[tokio::test]
    async fn standard_user_cannot_delete_foreign_asset() {
        let h = harness();
        let owner = h.user("alice", "password1", UserType::Standard);
        let other = h.user("bob", "password2", UserType::Standard);
        seed_asset(&h.state, "42", &owner.id);
        let token = h.token_for(&other).await;

        let (status, body) = h
            .send(request(Method::DELETE, "/assets/42", Some(&token), None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"code": 403, "message": "permission denied"}));
        assert!(h.state.assets.get("42").is_some());
    }

    #[tokio::test]
    async fn owner_deletes_own_asset() {
        let h = harness();
        let owner = h.user("alice", "password1", UserType::Standard);
        seed_asset(&h.state, "42", &owner.id);
        let token = h.token_for(&owner).await;

        let (_, body) = h
            .send(request(Method::DELETE, "/assets/42", Some(&token), None))
            .await;
        assert_eq!(body["code"], 1);
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let h = harness();
        let admin = h.user("root", "password0", UserType::Admin);
        let token = h.token_for(&admin).await;

        let (_, body) = h
            .send(request(Method::DELETE, "/assets/404", Some(&token), None))
            .await;
        assert_eq!(body, json!({"code": -1, "message": "asset not found"}));
    }

    #[tokio::test]
    async fn created_asset_is_owned_by_caller_and_hidden_from_others() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let bob = h.user("bob", "password2", UserType::Standard);
        let alice_token = h.token_for(&alice).await;
        let bob_token = h.token_for(&bob).await;

        let (_, created) = h
            .send(request(
                Method::POST,
                "/assets",
                Some(&alice_token),
                Some(json!({"name": "db", "ip": "10.0.0.9", "port": 5432, "owner": "bob"})),
            ))
            .await;
        assert_eq!(created["code"], 1);
        assert_eq!(created["data"]["owner"], alice.id.as_str());

        let (_, listed) = h
            .send(request(Method::GET, "/assets/paging", Some(&bob_token), None))
            .await;
        assert_eq!(listed["data"]["total"], 0);

        let (_, listed) = h
            .send(request(Method::GET, "/assets/paging", Some(&alice_token), None))
            .await;
        assert_eq!(listed["data"]["total"], 1);
    }

    #[tokio::test]
    async fn shared_asset_becomes_visible_but_not_writable() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let bob = h.user("bob", "password2", UserType::Standard);
        let admin = h.user("root", "password0", UserType::Admin);
        seed_asset(&h.state, "42", &alice.id);
        let admin_token = h.token_for(&admin).await;
        let bob_token = h.token_for(&bob).await;

        let (_, body) = h
            .send(request(
                Method::POST,
                "/resources/add",
                Some(&admin_token),
                Some(json!({"userId": bob.id, "resourceIds": ["42"]})),
            ))
            .await;
        assert_eq!(body["code"], 1);

        let (_, got) = h
            .send(request(Method::GET, "/assets/42", Some(&bob_token), None))
            .await;
        assert_eq!(got["data"]["id"], "42");

        let (_, tags) = h.send(request(Method::GET, "/tags", Some(&bob_token), None)).await;
        assert_eq!(tags["data"], json!(["prod", "web"]));

        let (_, updated) = h
            .send(request(
                Method::PUT,
                "/assets/42",
                Some(&bob_token),
                Some(json!({"name": "hijacked"})),
            ))
            .await;
        assert_eq!(updated["code"], 403);
    }

    #[tokio::test]
    async fn credential_listing_hides_secrets() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let token = h.token_for(&alice).await;

        let (_, created) = h
            .send(request(
                Method::POST,
                "/credentials",
                Some(&token),
                Some(json!({"name": "root", "username": "root", "password": "hunter2"})),
            ))
            .await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (_, all) = h.send(request(Method::GET, "/credentials", Some(&token), None)).await;
        assert!(all["data"][0].get("password").is_none());
        assert_eq!(all["data"][0]["username"], "root");

        let (_, one) = h
            .send(request(Method::GET, &format!("/credentials/{id}"), Some(&token), None))
            .await;
        assert_eq!(one["data"]["password"], "hunter2");
    }

    #[tokio::test]
    async fn login_issues_a_working_token_and_logout_revokes_it() {
        let h = harness();
        h.user("alice", "password1", UserType::Standard);

        let (_, login) = h
            .send(request(
                Method::POST,
                "/login",
                None,
                Some(json!({"username": "alice", "password": "password1"})),
            ))
            .await;
        assert_eq!(login["code"], 1);
        let token = login["data"].as_str().unwrap().to_string();

        let (_, info) = h.send(request(Method::GET, "/info", Some(&token), None)).await;
        assert_eq!(info["code"], 1);

        let (_, out) = h.send(request(Method::POST, "/logout", Some(&token), None)).await;
        assert_eq!(out["code"], 1);

        let (_, info) = h.send(request(Method::GET, "/info", Some(&token), None)).await;
        assert_eq!(info["code"], REJECT_CODE);
    }

    #[tokio::test]
    async fn wrong_password_is_a_fail_envelope() {
        let h = harness();
        h.user("alice", "password1", UserType::Standard);

        let (status, body) = h
            .send(request(
                Method::POST,
                "/login",
                None,
                Some(json!({"username": "alice", "password": "nope"})),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], account_codes::LOGIN_FAILED);
    }

    #[tokio::test]
    async fn totp_account_needs_second_factor() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let secret = crate::services::auth::totp::base32_encode(b"12345678901234567890");
        h.state.users.set_pending_totp(&alice.id, secret).unwrap();
        h.state.users.activate_pending_totp(&alice.id).unwrap();

        let (_, body) = h
            .send(request(
                Method::POST,
                "/login",
                None,
                Some(json!({"username": "alice", "password": "password1"})),
            ))
            .await;
        assert_eq!(body["code"], account_codes::TOTP_REQUIRED);

        let (_, body) = h
            .send(request(
                Method::POST,
                "/loginWithTotp",
                None,
                Some(json!({"username": "alice", "password": "password1", "totp": "000000x"})),
            ))
            .await;
        assert_eq!(body["code"], account_codes::INVALID_TOTP);
    }

    #[tokio::test]
    async fn standard_user_cannot_manage_users() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let token = h.token_for(&alice).await;

        let (_, body) = h
            .send(request(Method::GET, "/users/paging", Some(&token), None))
            .await;
        assert_eq!(body["code"], 403);
    }

    #[tokio::test]
    async fn malformed_json_is_normalized() {
        let h = harness();
        let admin = h.user("root", "password0", UserType::Admin);
        let token = h.token_for(&admin).await;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header("X-Auth-Token", &token)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = h.send(req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn wrong_method_is_normalized() {
        let h = harness();
        let admin = h.user("root", "password0", UserType::Admin);
        let token = h.token_for(&admin).await;

        let (status, body) = h.send(request(Method::PATCH, "/info", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 405);
    }

    #[tokio::test]
    async fn missing_static_file_is_not_found_envelope() {
        let h = harness();
        let (status, body) = h.send(request(Method::GET, "/favicon.ico", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], -1);
    }

    #[tokio::test]
    async fn tunnel_checks_session_ownership_when_named() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let bob = h.user("bob", "password2", UserType::Standard);
        let session = h.state.sessions.create(&alice.id, "a1", 80, 24);
        let bob_token = h.token_for(&bob).await;

        let (_, body) = h
            .send(request(
                Method::GET,
                &format!("/tunnel?sessionId={}&X-Auth-Token={bob_token}", session.id),
                None,
                None,
            ))
            .await;
        assert_eq!(body["code"], 403);
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        seed_asset(&h.state, "a1", &alice.id);
        let token = h.token_for(&alice).await;

        let (_, created) = h
            .send(request(
                Method::POST,
                "/sessions",
                Some(&token),
                Some(json!({"assetId": "a1"})),
            ))
            .await;
        assert_eq!(created["data"]["status"], "connecting");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (_, connected) = h
            .send(request(Method::POST, &format!("/sessions/{id}/content"), Some(&token), None))
            .await;
        assert_eq!(connected["data"]["status"], "connected");

        let (_, counter) = h
            .send(request(Method::GET, "/overview/counter", Some(&token), None))
            .await;
        assert_eq!(counter["data"]["onlineSession"], 1);
        assert_eq!(counter["data"]["asset"], 1);

        let (_, ls) = h
            .send(request(Method::GET, &format!("/sessions/{id}/ls"), Some(&token), None))
            .await;
        assert_eq!(ls["code"], 501);

        let (_, resized) = h
            .send(request(
                Method::POST,
                &format!("/sessions/{id}/resize?width=120&height=40"),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(resized["data"]["width"], 120);
    }

    #[tokio::test]
    async fn cors_headers_on_public_and_preflight() {
        let h = harness();
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/assets")
            .header("origin", "https://console.example")
            .header("access-control-request-method", "DELETE")
            .body(Body::empty())
            .unwrap();
        let response = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let methods = response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .to_string();
        for m in ["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"] {
            assert!(methods.contains(m), "{methods}");
        }

        let req = Request::builder()
            .uri("/tunnel")
            .header("origin", "https://console.example")
            .body(Body::empty())
            .unwrap();
        let response = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn panicking_handler_is_contained_by_the_full_chain() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let h = harness();
        let alice = h.user("alice", "password1", UserType::Standard);
        let token = h.token_for(&alice).await;

        let routes = api::routes(&http_config().static_dir).route("/boom", get(boom));
        let app = with_middleware(routes, h.state.clone(), &http_config());

        let req = Request::builder()
            .uri("/boom")
            .header("origin", "https://console.example")
            .header("X-Auth-Token", &token)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            read_body(response).await,
            json!({"code": 500, "message": "internal server error"})
        );
    }

    #[tokio::test]
    async fn demoted_admin_loses_admin_routes_at_once() {
        let h = harness();
        let root = h.user("root", "password0", UserType::Admin);
        let eve = h.user("eve", "password1", UserType::Admin);
        let root_token = h.token_for(&root).await;
        let eve_token = h.token_for(&eve).await;

        let (_, before) = h
            .send(request(Method::GET, "/users/paging", Some(&eve_token), None))
            .await;
        assert_eq!(before["code"], 1);

        let (_, demoted) = h
            .send(request(
                Method::PUT,
                &format!("/users/{}", eve.id),
                Some(&root_token),
                Some(json!({"type": "user"})),
            ))
            .await;
        assert_eq!(demoted["code"], 1);

        let (_, after) = h
            .send(request(Method::GET, "/users/paging", Some(&eve_token), None))
            .await;
        assert_eq!(after["code"], 403);
    }

    #[tokio::test]
    async fn deleted_user_token_stops_working() {
        let h = harness();
        let root = h.user("root", "password0", UserType::Admin);
        let eve = h.user("eve", "password1", UserType::Standard);
        let root_token = h.token_for(&root).await;
        let eve_token = h.token_for(&eve).await;

        let (_, deleted) = h
            .send(request(
                Method::DELETE,
                &format!("/users/{}", eve.id),
                Some(&root_token),
                None,
            ))
            .await;
        assert_eq!(deleted["code"], 1);

        let (_, created) = h
            .send(request(
                Method::POST,
                "/assets",
                Some(&eve_token),
                Some(json!({"name": "orphan", "ip": "10.0.0.1", "port": 22})),
            ))
            .await;
        assert_eq!(created["code"], REJECT_CODE);
        assert!(h.state.assets.list_where(|_| true).is_empty());
    }

    mod account_codes {
        use crate::api::handlers::account;

        pub const LOGIN_FAILED: i32 = account::LOGIN_FAILED_CODE;
        pub const TOTP_REQUIRED: i32 = account::TOTP_REQUIRED_CODE;
        pub const INVALID_TOTP: i32 = account::INVALID_TOTP_CODE;
    }
}
