//! # RotaCode API
//!
//! actix-web surface of the RotaCode service: the verify endpoint, admin
//! provisioning and the health probe, plus the startup wiring that builds the
//! file-backed stores and the email notifier from configuration.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
