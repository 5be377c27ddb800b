/*
 * Responsibility
 * - middlware の公開インターフェース
 * - each module exposes `apply(router, ..)` and is wired up in app.rs
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod normalize;
pub mod panic;
