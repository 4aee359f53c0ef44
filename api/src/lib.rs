// Library exports for the binary and the HTTP tests

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;
