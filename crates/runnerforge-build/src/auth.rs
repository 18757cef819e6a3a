//! レジストリ認証処理
//!
//! 環境変数の認証情報で docker login を実行する。認証情報が無い場合は
//! 警告だけ出して続行する。docker config.json 側の既存ログインで
//! プッシュできるケースを壊さないため、ここでは失敗させず、プッシュの
//! 失敗は外部ツール側に委ねる。

use std::collections::HashMap;
use std::path::PathBuf;

use base64::Engine;
use colored::Colorize;
use runnerforge_config::{BuildConfig, RegistryCredentials};
use serde::Deserialize;

use crate::command::DockerCommand;
use crate::error::{BuildError, BuildResult};

/// Docker config.json の構造（必要な部分のみ）
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DockerConfig {
    /// 認証情報 (レジストリ -> AuthEntry)
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
    /// credential helper 名 (例: "osxkeychain", "desktop")
    #[serde(default)]
    creds_store: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthEntry {
    /// Base64エンコードされた "username:password"
    auth: Option<String>,
}

/// レジストリ認証を管理
#[derive(Debug)]
pub struct RegistryAuth {
    config_path: PathBuf,
}

impl Default for RegistryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryAuth {
    /// 新しい RegistryAuth を作成
    ///
    /// デフォルトで ~/.docker/config.json を使用（DOCKER_CONFIG で上書き可）
    pub fn new() -> Self {
        let config_path = std::env::var("DOCKER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|h| h.join(".docker"))
                    .unwrap_or_else(|| PathBuf::from(".docker"))
            })
            .join("config.json");

        Self { config_path }
    }

    /// 指定したパスの config.json を使用
    pub fn with_config_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// docker login コマンドを組み立てる
    ///
    /// パスワードは --password-stdin 経由で渡し、argv には載せない。
    pub fn login_command(registry: &str, credentials: &RegistryCredentials) -> DockerCommand {
        DockerCommand::new("docker")
            .arg("login")
            .arg(registry)
            .arg("-u")
            .arg(credentials.username.clone())
            .arg("--password-stdin")
            .stdin_payload(credentials.password.clone())
    }

    /// プッシュに先立つログイン処理
    ///
    /// 認証情報あり: docker login を実行し、失敗は AuthFailed で中断。
    /// 認証情報なし: 警告して続行（login は呼ばない）。
    pub async fn ensure_login(&self, config: &BuildConfig) -> BuildResult<()> {
        let registry = &config.registry;

        let Some(credentials) = &config.credentials else {
            println!(
                "  {} REGISTRY_USERNAME / REGISTRY_PASSWORD が未設定のため docker login をスキップします",
                "⚠".yellow()
            );
            if self.has_ambient_credentials(registry) {
                println!(
                    "    {} に既存の認証情報があるため、プッシュはそのまま成功する可能性があります",
                    self.config_path.display().to_string().cyan()
                );
            } else {
                println!("    プライベートレジストリへのプッシュは失敗する可能性があります");
            }
            return Ok(());
        };

        let command = Self::login_command(registry, credentials);
        if config.dry_run {
            println!("{} {}", "[dry-run]".yellow(), command.render());
            return Ok(());
        }

        println!("  {} {} にログイン中...", "→".blue(), registry.cyan());
        let status = command.run().await?;
        if !status.success() {
            return Err(BuildError::AuthFailed {
                registry: registry.clone(),
                message: format!("docker login exited with {}", status),
            });
        }
        println!("  {} ログイン完了", "✓".green());
        Ok(())
    }

    /// config.json に当該レジストリの認証エントリがあるか
    fn has_ambient_credentials(&self, registry: &str) -> bool {
        let Ok(content) = std::fs::read_to_string(&self.config_path) else {
            tracing::debug!("docker config.json not found at {:?}", self.config_path);
            return false;
        };
        let Ok(config) = serde_json::from_str::<DockerConfig>(&content) else {
            return false;
        };

        if let Some(entry) = config.auths.get(registry)
            && let Some(auth) = &entry.auth
        {
            // auth フィールドは base64("username:password")
            let decoded = base64::engine::general_purpose::STANDARD.decode(auth);
            return matches!(decoded, Ok(bytes) if !bytes.is_empty());
        }

        // credential helper が設定されていれば、そちらで解決される見込み
        config.creds_store.is_some()
    }
}
