//! orderhub-hex: orders backend core (application service + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use orderhub_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
