use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("プラットフォーム指定が空です: '{0}'\n例: --platforms linux/amd64,linux/arm64")]
    EmptyPlatformList(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
