//! Production build for folio sites.
//!
//! Copies public assets, compiles the site stylesheet and records build
//! metadata in an output directory ready to be served.

pub mod assets;
pub mod builder;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildInfo, BuildResult, StaticBuilder};
