use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use runnerforge_build::{BuildRecord, DEFAULT_RECORD_FILE, ImagePusher, RegistryAuth};
use runnerforge_config::{BuildConfig, CliOverrides};

use crate::docker;

/// forge push-all の引数
#[derive(Debug, Args)]
pub struct PushAllArgs {
    /// プロジェクトルート（デフォルト: カレントディレクトリ）
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
    /// コマンドを表示するだけで実行しない
    #[arg(long)]
    pub dry_run: bool,
    /// レジストリURL（例: ghcr.io）
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,
    /// 組織名
    #[arg(long, value_name = "NAME")]
    pub org: Option<String>,
    /// ビルド記録ファイルのパス
    #[arg(long, value_name = "FILE")]
    pub record_file: Option<PathBuf>,
}

pub async fn handle(args: PushAllArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        registry: args.registry,
        org: args.org,
        dry_run: args.dry_run,
        push: true,
        ..Default::default()
    };
    let config = BuildConfig::resolve(&overrides)?;

    let project_root = match args.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let record_path = args
        .record_file
        .unwrap_or_else(|| project_root.join(DEFAULT_RECORD_FILE));

    if !record_path.exists() {
        anyhow::bail!(
            "ビルド記録が見つかりません: {}\n先に forge build を実行してください",
            record_path.display()
        );
    }

    let record = BuildRecord::open(record_path);
    let tags = record.load()?;
    if tags.is_empty() {
        println!("{}", "プッシュ対象のイメージがありません".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("📤 {} 個のイメージをプッシュします", tags.len())
            .blue()
            .bold()
    );
    for tag in &tags {
        println!("  • {}", tag.cyan());
    }
    println!();

    let auth = RegistryAuth::new();
    auth.ensure_login(&config)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if !config.dry_run {
        docker::preflight().await?;
    }

    let pusher = ImagePusher::new(config.dry_run);
    pusher
        .push_all(&tags)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    // 全件プッシュできたら記録を片付ける（dry-run では残す）
    if config.dry_run {
        println!();
        println!(
            "{}",
            "✓ dry-run が完了しました（外部コマンドは実行していません）"
                .green()
                .bold()
        );
    } else {
        record.clear()?;
        println!();
        println!("{}", "✓ すべてのイメージをプッシュしました！".green().bold());
    }

    Ok(())
}
