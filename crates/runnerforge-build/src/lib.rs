//! runnerforge build orchestration
//!
//! This crate provides the shared orchestration library used by both the
//! standard `forge build` entry point and the bake entry point: Dockerfile
//! resolution, docker command assembly and execution, registry login,
//! image pushing and the build record consumed by `forge push-all`.

pub mod auth;
pub mod bake;
pub mod builder;
pub mod command;
pub mod error;
pub mod pusher;
pub mod record;
pub mod resolver;

pub use auth::RegistryAuth;
pub use bake::{BakeRunner, DEFAULT_BAKE_FILE};
pub use builder::{BuildPlan, ImageBuilder, SequenceFailure, build_sequence};
pub use command::{DockerCommand, shell_quote};
pub use error::{BuildError, BuildResult};
pub use pusher::ImagePusher;
pub use record::{BuildRecord, DEFAULT_RECORD_FILE};
pub use resolver::{BuildResolver, ResolvedBuild};
