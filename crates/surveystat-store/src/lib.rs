//! surveystat-store: survey repository implementations.
//!
//! Implements the `SurveyRepository` trait for in-memory data, JSON datasets
//! on disk, and PostgREST-compatible remote stores, plus the configuration
//! that selects between them.

pub mod config;
pub mod error;
pub mod json;
pub mod memory;
pub mod rest;

pub use config::{create_repository, load_config, StoreConfig, SurveystatConfig};
pub use error::StoreError;
