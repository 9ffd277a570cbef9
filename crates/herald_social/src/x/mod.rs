//! X (formerly Twitter) API v2 integration.

mod client;
mod models;

pub use client::XClient;
