use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dockerfile not found: {0}")]
    DockerfileMissing(PathBuf),

    #[error("build context directory not found: {0}")]
    ContextNotFound(PathBuf),

    #[error("bake file not found: {0}")]
    BakeFileMissing(PathBuf),

    #[error(
        "multi-platform build ({platforms}) requires --push: a multi-platform image cannot be loaded into the local daemon"
    )]
    MultiPlatformLoad { platforms: String },

    #[error("multi-platform build ({platforms}) requires buildx (remove --no-buildx)")]
    BuildxRequired { platforms: String },

    #[error("invalid build configuration: {0}")]
    InvalidConfig(String),

    #[error("docker build failed for '{image}' ({status})")]
    BuildFailed { image: String, status: ExitStatus },

    #[error("docker buildx bake failed ({status})")]
    BakeFailed { status: ExitStatus },

    #[error("registry login failed for {registry}: {message}")]
    AuthFailed { registry: String, message: String },

    #[error("docker push failed for '{tag}' ({status})")]
    PushFailed { tag: String, status: ExitStatus },

    #[error("failed to run '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::DockerfileMissing(path) => {
                format!(
                    "Dockerfileが見つかりません: {}\n\
                     \n\
                     解決方法:\n\
                     1. プロジェクトルートで実行しているか確認してください\n\
                     2. -C <dir> でプロジェクトルートを指定できます",
                    path.display()
                )
            }
            BuildError::MultiPlatformLoad { platforms } => {
                format!(
                    "マルチプラットフォームビルド ({}) には --push が必要です。\n\
                     複数アーキテクチャのイメージはローカルデーモンに --load できません。",
                    platforms
                )
            }
            BuildError::BuildxRequired { platforms } => {
                format!(
                    "マルチプラットフォームビルド ({}) には buildx が必要です。\n\
                     --no-buildx を外して再実行してください。",
                    platforms
                )
            }
            BuildError::BuildFailed { image, status } => {
                format!(
                    "イメージ '{}' のビルドに失敗しました ({})\n\
                     Dockerfileの内容とビルドログを確認してください。",
                    image, status
                )
            }
            BuildError::AuthFailed { registry, message } => {
                format!(
                    "レジストリ {} へのログインに失敗しました: {}\n\
                     REGISTRY_USERNAME / REGISTRY_PASSWORD を確認してください。",
                    registry, message
                )
            }
            BuildError::CommandSpawn { command, source } => {
                format!(
                    "'{}' を起動できませんでした: {}\n\
                     docker がインストールされ PATH にあるか確認してください。",
                    command, source
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
