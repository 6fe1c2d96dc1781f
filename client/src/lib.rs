//! HTTP backend for the map core.
//!
//! [`api::HttpProjectApi`] implements [`mapcore::api::ProjectApi`] over
//! `reqwest`, adding the bearer token and classifying failures.
//! [`config::ClientConfig`] reads its settings from the environment.

pub mod api;
pub mod config;
