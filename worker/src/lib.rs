pub mod agent;
pub mod axum_http;
pub mod config;
pub mod egress_listener;
