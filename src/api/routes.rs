/*
 * Responsibility
 * - URL 構造を定義 (static table, nothing is registered after start-up)
 * - public: static bundle, /login, /loginWithTotp, /tunnel, /ssh
 * - everything else is protected; the gate is applied in app.rs
 */
use std::path::Path;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::handlers::{
    account, assets, overview, properties,
    records::{self, AssetKind, CommandKind, CredentialKind},
    resources, sessions, transport, user_groups, users,
};
use crate::state::AppState;

pub fn routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .merge(public_routes(static_dir))
        .merge(account_routes())
        .merge(user_routes())
        .merge(user_group_routes())
        .merge(asset_routes())
        .merge(command_routes())
        .merge(credential_routes())
        .merge(session_routes())
        .merge(resource_routes())
        .merge(misc_routes())
}

fn public_routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/logo.svg", ServeFile::new(static_dir.join("logo.svg")))
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/static", ServeDir::new(static_dir.join("static")))
        .route("/login", post(account::login))
        .route("/loginWithTotp", post(account::login_with_totp))
        .route("/tunnel", get(transport::tunnel))
        .route("/ssh", get(transport::ssh))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(account::logout))
        .route("/change-password", post(account::change_password))
        .route("/reset-totp", post(account::reset_totp))
        .route("/confirm-totp", post(account::confirm_totp))
        .route("/info", get(account::info))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/paging", get(users::paging_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

fn user_group_routes() -> Router<AppState> {
    Router::new()
        .route("/user-groups", post(user_groups::create_group))
        .route("/user-groups/paging", get(user_groups::paging_groups))
        .route(
            "/user-groups/{id}",
            get(user_groups::get_group)
                .put(user_groups::update_group)
                .delete(user_groups::delete_group),
        )
}

fn asset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/assets",
            get(records::all::<AssetKind>).post(records::create::<AssetKind>),
        )
        .route("/assets/paging", get(records::paging::<AssetKind>))
        .route("/assets/{id}/tcping", post(assets::tcping))
        .route(
            "/assets/{id}",
            get(records::get::<AssetKind>)
                .put(records::update::<AssetKind>)
                .delete(records::delete::<AssetKind>),
        )
        .route(
            "/assets/{id}/change-owner",
            post(records::change_owner::<AssetKind>),
        )
        .route("/tags", get(assets::tags))
}

fn command_routes() -> Router<AppState> {
    Router::new()
        .route("/commands", post(records::create::<CommandKind>))
        .route("/commands/paging", get(records::paging::<CommandKind>))
        .route(
            "/commands/{id}",
            get(records::get::<CommandKind>)
                .put(records::update::<CommandKind>)
                .delete(records::delete::<CommandKind>),
        )
        .route(
            "/commands/{id}/change-owner",
            post(records::change_owner::<CommandKind>),
        )
}

fn credential_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/credentials",
            get(records::all::<CredentialKind>).post(records::create::<CredentialKind>),
        )
        .route(
            "/credentials/paging",
            get(records::paging::<CredentialKind>),
        )
        .route(
            "/credentials/{id}",
            get(records::get::<CredentialKind>)
                .put(records::update::<CredentialKind>)
                .delete(records::delete::<CredentialKind>),
        )
        .route(
            "/credentials/{id}/change-owner",
            post(records::change_owner::<CredentialKind>),
        )
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/paging", get(sessions::paging_sessions))
        .route("/sessions/{id}/content", post(sessions::connect_session))
        .route(
            "/sessions/{id}/discontent",
            post(sessions::disconnect_session),
        )
        .route("/sessions/{id}/resize", post(sessions::resize_session))
        .route("/sessions/{id}/upload", post(sessions::file_operation))
        .route("/sessions/{id}/download", get(sessions::file_operation))
        .route("/sessions/{id}/ls", get(sessions::file_operation))
        .route("/sessions/{id}/mkdir", post(sessions::file_operation))
        .route("/sessions/{id}/rmdir", delete(sessions::file_operation))
        .route("/sessions/{id}/rm", delete(sessions::file_operation))
        .route("/sessions/{id}/recording", get(sessions::recording))
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources/{id}/assign",
            get(resources::get_assign).post(resources::overwrite_assign),
        )
        .route("/resources/remove", post(resources::remove_by_user))
        .route("/resources/add", post(resources::add_by_user))
}

fn misc_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/properties",
            get(properties::get_properties).put(properties::update_properties),
        )
        .route("/overview/counter", get(overview::counter))
        .route("/overview/sessions", get(overview::sessions))
}
