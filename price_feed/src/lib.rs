//! Market-data fetch adapter for the price pipeline.
//!
//! This crate owns the provider seam: the [`providers::MarketDataProvider`]
//! trait plus a concrete REST implementation for Yahoo Finance's chart API,
//! and the provider-native [`models::raw_frame::RawFrame`] that downstream
//! normalization consumes.

pub mod models;
pub mod providers;
