//! Incremental price-history synchronization.
//!
//! This crate owns everything between the provider seam and the SQLite
//! store: the canonical [`models::PriceRecord`], the schema-normalizing
//! [`transform::transform`], the keyed-upsert [`store::PriceStore`], and the
//! watermark-driven [`ingest::run_ingestion`] pass that ties them together.

pub mod db;
pub mod ingest;
pub mod models;
pub mod schema;
pub mod store;
pub mod transform;
