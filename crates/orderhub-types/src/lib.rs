//! orderhub-types: domain model and store port for the orders backend.

pub mod domain;
pub mod ports;
