//! runnerforge の設定管理
//!
//! 設定は起動時に一度だけ (ハードコードされたデフォルト ← 環境変数 ←
//! CLIフラグ) の優先順位で解決され、以降は BuildConfig として関数に
//! 引き回される。コードの途中で環境変数を読みに行くことはない。

pub mod error;

pub use error::{ConfigError, Result};

use std::collections::HashMap;
use std::fmt;

/// デフォルトのレジストリ
pub const DEFAULT_REGISTRY: &str = "ghcr.io";
/// デフォルトの組織名
pub const DEFAULT_ORG: &str = "chronista-club";
/// デフォルトのバージョンタグ
pub const DEFAULT_VERSION: &str = "latest";
/// デフォルトのビルドプラットフォーム
pub const DEFAULT_PLATFORM: &str = "linux/amd64";

/// レジストリ認証情報（REGISTRY_USERNAME / REGISTRY_PASSWORD）
#[derive(Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegistryCredentials {
    // パスワードをログに出さない
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// CLIフラグからの上書き値
///
/// None は「フラグ未指定」を意味し、環境変数とデフォルトに委ねる。
/// boolフラグは指定時のみ効く（シェル版と同じく、フラグで off に
/// 戻すことはできない）。
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub registry: Option<String>,
    pub org: Option<String>,
    pub version: Option<String>,
    pub tag: Option<String>,
    pub platforms: Option<String>,
    pub push: bool,
    pub no_cache: bool,
    pub cache_from: bool,
    pub dry_run: bool,
    pub no_buildx: bool,
}

/// ビルドオーケストレーター全体の設定
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub registry: String,
    pub org: String,
    pub version: String,
    /// カスタムタグ。指定時は -latest コンパニオンを抑制する
    pub tag_override: Option<String>,
    pub platforms: Vec<String>,
    pub push: bool,
    pub use_cache: bool,
    pub cache_from_registry: bool,
    pub dry_run: bool,
    pub use_buildx: bool,
    pub credentials: Option<RegistryCredentials>,
}

impl BuildConfig {
    /// プロセス環境から設定を解決する
    pub fn resolve(overrides: &CliOverrides) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_env_map(overrides, &env)
    }

    /// 環境変数マップを明示して設定を解決する
    ///
    /// マージ処理を純粋に保ち、テストからプロセス環境に触れずに
    /// 検証できるようにするための分離。
    pub fn from_env_map(overrides: &CliOverrides, env: &HashMap<String, String>) -> Result<Self> {
        let registry = overrides
            .registry
            .clone()
            .or_else(|| non_empty(env.get("REGISTRY")))
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string());
        let org = overrides
            .org
            .clone()
            .or_else(|| non_empty(env.get("ORG")))
            .unwrap_or_else(|| DEFAULT_ORG.to_string());
        let version = overrides
            .version
            .clone()
            .or_else(|| non_empty(env.get("VERSION")))
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let raw_platforms = overrides
            .platforms
            .clone()
            .or_else(|| non_empty(env.get("PLATFORMS")));
        let platforms = match raw_platforms {
            Some(raw) => {
                let parsed = parse_platforms(&raw);
                if parsed.is_empty() {
                    return Err(ConfigError::EmptyPlatformList(raw));
                }
                parsed
            }
            None => vec![DEFAULT_PLATFORM.to_string()],
        };

        let push = overrides.push || env_bool(env, "PUSH_TO_REGISTRY", false);
        let use_cache = if overrides.no_cache {
            false
        } else {
            env_bool(env, "USE_CACHE", true)
        };
        let cache_from_registry = overrides.cache_from || env_bool(env, "CACHE_FROM_REGISTRY", false);
        let dry_run = overrides.dry_run || env_bool(env, "DRY_RUN", false);
        let use_buildx = if overrides.no_buildx {
            false
        } else {
            env_bool(env, "USE_BUILDX", true)
        };

        let credentials = match (
            non_empty(env.get("REGISTRY_USERNAME")),
            non_empty(env.get("REGISTRY_PASSWORD")),
        ) {
            (Some(username), Some(password)) => Some(RegistryCredentials { username, password }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "REGISTRY_USERNAME と REGISTRY_PASSWORD は両方の設定が必要です。認証情報なしとして扱います"
                );
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            registry,
            org,
            version,
            tag_override: overrides.tag.clone(),
            platforms,
            push,
            use_cache,
            cache_from_registry,
            dry_run,
            use_buildx,
            credentials,
        })
    }

    /// 複数プラットフォームが要求されているか
    pub fn is_multi_platform(&self) -> bool {
        self.platforms.len() > 1
    }

    /// --platform に渡すカンマ区切り文字列
    pub fn platform_list(&self) -> String {
        self.platforms.join(",")
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 真偽値環境変数の解釈
///
/// 1/true/yes/on → true、0/false/no/off → false。それ以外は警告して
/// デフォルトに倒す（シェル版の寛容さに合わせる）。
fn env_bool(env: &HashMap<String, String>, key: &str, default: bool) -> bool {
    let Some(raw) = env.get(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        "" => default,
        other => {
            tracing::warn!(
                "環境変数 {} の値 '{}' を解釈できません。デフォルト ({}) を使用します",
                key,
                other,
                default
            );
            default
        }
    }
}

/// カンマ区切りのプラットフォーム指定をパースする
///
/// 空要素は捨て、順序を保ったまま重複を除く。
pub fn parse_platforms(raw: &str) -> Vec<String> {
    let mut platforms: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() || platforms.iter().any(|p| p == part) {
            continue;
        }
        platforms.push(part.to_string());
    }
    platforms
}
