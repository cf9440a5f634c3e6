pub mod app;
pub mod app_state;
pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod i18n;
pub mod middleware;
pub mod modules;
pub mod site;
pub mod storage;
pub mod telemetry;
