//! evergreen-matrix: the Evergreen build-variant matrix as data.
//!
//! Each [`variant::Variant`] pairs a host pool and toolchain with the tasks
//! it runs. [`matrix::all_variants`] holds the curated table, [`mobile`]
//! computes the iOS/Android cross-compilation expansions, and [`render`]
//! writes the resulting `buildvariants` document as YAML or JSON for the
//! orchestrator to consume.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod document;
pub mod logging;
pub mod matrix;
pub mod mobile;
pub mod render;
pub mod variant;
