//! Small cross-cutting helpers shared by the pipeline crates.

pub mod env;
