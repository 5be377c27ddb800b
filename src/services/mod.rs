/*
 * Responsibility
 * - identity cache backends and the authentication/authorization services
 */
pub mod auth;
pub mod cache;
