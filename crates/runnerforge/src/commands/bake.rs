use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use runnerforge_build::{BakeRunner, RegistryAuth};
use runnerforge_config::{BuildConfig, CliOverrides};

use crate::docker;

/// forge bake の引数
#[derive(Debug, Args)]
pub struct BakeArgs {
    /// bake ターゲット（省略時は default グループ）
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
    /// プロジェクトルート（デフォルト: カレントディレクトリ）
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
    /// コマンドを表示するだけで実行しない
    #[arg(long)]
    pub dry_run: bool,
    /// レイヤーキャッシュを使用しない
    #[arg(long)]
    pub no_cache: bool,
    /// ビルド後にレジストリへプッシュ
    #[arg(long)]
    pub push: bool,
}

pub async fn handle(args: BakeArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        dry_run: args.dry_run,
        no_cache: args.no_cache,
        push: args.push,
        ..Default::default()
    };
    let config = BuildConfig::resolve(&overrides)?;

    let project_root = match args.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let targets = if args.targets.is_empty() {
        vec!["default".to_string()]
    } else {
        args.targets
    };

    println!("{}", "bake でビルドします".green());
    println!("ターゲット: {}", targets.join(", ").cyan());
    if config.dry_run {
        println!(
            "{}",
            "dry-run モード: コマンドを表示するだけで実行しません".yellow()
        );
    }
    println!();

    // プッシュ時はビルド開始前にログインを済ませる
    if config.push {
        RegistryAuth::new()
            .ensure_login(&config)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    if !config.dry_run {
        docker::preflight().await?;
    }

    let runner = BakeRunner::new(&config, project_root);
    runner
        .run(&targets)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!();
    if config.dry_run {
        println!(
            "{}",
            "✓ dry-run が完了しました（外部コマンドは実行していません）"
                .green()
                .bold()
        );
    } else {
        println!("{}", "✓ bake が完了しました！".green().bold());
    }

    Ok(())
}
