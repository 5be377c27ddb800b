/*
 * Responsibility
 * - HTTP surface: route table, handlers, extractors, DTOs, response envelope
 */
pub mod dto;
pub mod envelope;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
