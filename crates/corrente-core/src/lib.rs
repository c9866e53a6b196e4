//! Core Corrente library (config, API client, services, session, registration).

pub mod api;
pub mod config;
pub mod files;
pub mod listing;
pub mod logging;
pub mod proof;
pub mod registration;
pub mod services;
pub mod session;
