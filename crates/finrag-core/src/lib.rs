//! Configuration loading and construction of the ingestion pipeline.

pub mod bootstrap;
pub mod config;
