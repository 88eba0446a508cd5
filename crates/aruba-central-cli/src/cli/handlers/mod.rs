//! Command handlers for the Aruba Central CLI

pub mod auth;
pub mod check;
pub mod collectd;
pub mod config;
pub mod rename;
