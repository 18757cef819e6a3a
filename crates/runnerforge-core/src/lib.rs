//! runnerforge core domain model
//!
//! This crate holds the fixed image-type table, the `all` meta-target
//! expansion and the tag construction rules shared by every entry point.
//! It performs no I/O.

pub mod error;
pub mod image;
pub mod tag;

pub use error::{CoreError, Result};
pub use image::{ALL_EXPANSION, BuildRecipe, ImageType, NON_META, Resolution, resolve};
