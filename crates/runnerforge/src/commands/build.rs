use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use runnerforge_build::{
    BuildRecord, BuildResolver, DEFAULT_RECORD_FILE, ImageBuilder, ImagePusher, RegistryAuth,
    build_sequence,
};
use runnerforge_config::{BuildConfig, CliOverrides};
use runnerforge_core::{ImageType, Resolution};

use crate::docker;

/// forge build の引数
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// イメージタイプ（base, cpp, ... または all）
    #[arg(required = true, value_name = "IMAGE_TYPE")]
    pub image_types: Vec<String>,
    /// プロジェクトルート（デフォルト: カレントディレクトリ）
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
    /// コマンドを表示するだけで実行しない
    #[arg(long)]
    pub dry_run: bool,
    /// レイヤーキャッシュを使用しない
    #[arg(long)]
    pub no_cache: bool,
    /// レジストリの latest イメージをキャッシュ元に使う
    #[arg(long)]
    pub cache_from: bool,
    /// ビルド後にレジストリへプッシュ
    #[arg(long)]
    pub push: bool,
    /// buildx を使わず素の docker build でビルド
    #[arg(long)]
    pub no_buildx: bool,
    /// ターゲットプラットフォーム（カンマ区切り。例: linux/amd64,linux/arm64）
    #[arg(long, value_name = "LIST")]
    pub platforms: Option<String>,
    /// バージョンタグ
    #[arg(long, value_name = "TAG")]
    pub version: Option<String>,
    /// レジストリURL（例: ghcr.io）
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,
    /// 組織名
    #[arg(long, value_name = "NAME")]
    pub org: Option<String>,
    /// カスタムタグ（指定時は -latest コンパニオンを抑制）
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,
    /// ビルド記録ファイルのパス
    #[arg(long, value_name = "FILE")]
    pub record_file: Option<PathBuf>,
}

/// 位置引数のイメージタイプ名を解決・展開する
///
/// all は他のどの処理よりも先に展開し、順序を保って重複を除く。
fn expand_image_types(names: &[String]) -> anyhow::Result<Vec<ImageType>> {
    let mut images: Vec<ImageType> = Vec::new();
    for name in names {
        let expanded = match runnerforge_core::resolve(name)? {
            Resolution::Recipe(recipe) => vec![recipe.image],
            Resolution::Composite(list) => list,
        };
        for image in expanded {
            if !images.contains(&image) {
                images.push(image);
            }
        }
    }
    Ok(images)
}

pub async fn handle(args: BuildArgs) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        registry: args.registry,
        org: args.org,
        version: args.version,
        tag: args.tag,
        platforms: args.platforms,
        push: args.push,
        no_cache: args.no_cache,
        cache_from: args.cache_from,
        dry_run: args.dry_run,
        no_buildx: args.no_buildx,
    };
    let config = BuildConfig::resolve(&overrides)?;

    let project_root = match args.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    // 対象イメージの展開（不明な名前はここで拒否される）
    let images = expand_image_types(&args.image_types)?;

    if config.tag_override.is_some() && images.len() > 1 {
        anyhow::bail!(
            "--tag は単一のイメージタイプにのみ指定できます（{}個が対象になっています）",
            images.len()
        );
    }

    println!("{}", "ランナーイメージをビルドします".green());
    println!("レジストリ: {}", config.registry.cyan());
    println!("組織: {}", config.org.cyan());
    println!("バージョン: {}", config.version.cyan());
    println!("プラットフォーム: {}", config.platform_list().cyan());
    if config.dry_run {
        println!(
            "{}",
            "dry-run モード: コマンドを表示するだけで実行しません".yellow()
        );
    }
    println!();
    println!(
        "{}",
        format!("ビルド対象イメージ ({} 個):", images.len()).bold()
    );
    for image in &images {
        println!("  • {}", image.to_string().cyan());
    }
    println!();

    // プッシュ時はビルド開始前にログインを済ませる（失敗を早く知るため）
    let auth = RegistryAuth::new();
    if config.push {
        auth.ensure_login(&config)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    // dry-run では Docker デーモンにも接続しない
    if !config.dry_run {
        docker::preflight().await?;
    }

    let resolver = BuildResolver::new(project_root.clone());
    let builder = ImageBuilder::new(&config, resolver);

    // ビルド記録（dry-run では一切書かない）
    let record_path = args
        .record_file
        .unwrap_or_else(|| project_root.join(DEFAULT_RECORD_FILE));
    let record = if config.dry_run {
        None
    } else {
        Some(BuildRecord::create(record_path)?)
    };

    let built = build_sequence(&images, |image| {
        let builder = &builder;
        let record = record.as_ref();
        async move {
            println!("{}", format!("🔨 {} をビルド中...", image).green().bold());
            let tags = builder.build(image).await?;
            if let Some(record) = record {
                for tag in &tags {
                    record.append(tag)?;
                }
            }
            Ok(tags)
        }
    })
    .await
    .map_err(|failure| {
        eprintln!("  {} {}", "✗".red().bold(), failure.error.user_message());
        anyhow::anyhow!("イメージ '{}' のビルドに失敗しました", failure.image)
    })?;

    // buildx の --push 経路はビルド時にプッシュ済み
    let already_pushed = config.push && config.use_buildx;
    if config.push && !already_pushed {
        println!();
        println!("{}", "📤 イメージをプッシュ中...".blue().bold());
        let pusher = ImagePusher::new(config.dry_run);
        pusher
            .push_all(&built)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    println!();
    if config.dry_run {
        println!(
            "{}",
            "✓ dry-run が完了しました（外部コマンドは実行していません）"
                .green()
                .bold()
        );
    } else if config.push {
        println!(
            "{}",
            "✓ すべてのイメージがビルド＆プッシュされました！".green().bold()
        );
    } else {
        println!("{}", "✓ すべてのイメージがビルドされました！".green().bold());
    }

    println!();
    println!("{}", "結果サマリー:".bold());
    for tag in &built {
        println!("  {} {}", "✓".green(), tag.cyan());
    }

    Ok(())
}
