//! イメージビルドの実行
//!
//! docker / docker buildx の呼び出しを組み立てて順番に実行する。
//! マルチプラットフォーム要求は buildx + --push の経路に限定され、
//! --load への黙ったフォールバックは行わない。

use std::fmt;
use std::future::Future;

use colored::Colorize;
use runnerforge_config::BuildConfig;
use runnerforge_core::{ImageType, tag};

use crate::command::DockerCommand;
use crate::error::{BuildError, BuildResult};
use crate::resolver::{BuildResolver, ResolvedBuild};

/// 一つのイメージに対するビルド計画
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub image: ImageType,
    pub tags: Vec<String>,
    pub command: DockerCommand,
}

pub struct ImageBuilder<'a> {
    config: &'a BuildConfig,
    resolver: BuildResolver,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(config: &'a BuildConfig, resolver: BuildResolver) -> Self {
        Self { config, resolver }
    }

    /// ビルドコマンドを組み立てる（実行はしない）
    pub fn plan(&self, image: ImageType) -> BuildResult<BuildPlan> {
        let resolved = self.resolver.resolve(image)?;
        let tags = tag::image_tags(
            &self.config.registry,
            &self.config.org,
            image,
            &self.config.version,
            self.config.tag_override.as_deref(),
        );
        let command = self.assemble(&resolved, &tags)?;
        Ok(BuildPlan {
            image,
            tags,
            command,
        })
    }

    /// ビルド方式の決定
    ///
    /// - 複数プラットフォーム: buildx + --push のみ許可
    /// - buildx 有効: 単一プラットフォームは --load、push 時は --push
    /// - buildx 無効: 素の docker build（push は後段の docker push）
    fn assemble(&self, resolved: &ResolvedBuild, tags: &[String]) -> BuildResult<DockerCommand> {
        let config = self.config;

        if config.is_multi_platform() {
            if !config.use_buildx {
                return Err(BuildError::BuildxRequired {
                    platforms: config.platform_list(),
                });
            }
            if !config.push {
                return Err(BuildError::MultiPlatformLoad {
                    platforms: config.platform_list(),
                });
            }
        }

        let mut command = if config.use_buildx {
            DockerCommand::new("docker")
                .arg("buildx")
                .arg("build")
                .arg("--platform")
                .arg(config.platform_list())
        } else {
            DockerCommand::new("docker").arg("build")
        };

        command = command
            .arg("-f")
            .arg(resolved.dockerfile.display().to_string());
        for tag in tags {
            command = command.arg("-t").arg(tag.clone());
        }

        if !config.use_cache {
            command = command.arg("--no-cache");
        }
        if config.cache_from_registry {
            let cache_ref = tag::cache_ref(&config.registry, &config.org, resolved.image);
            if config.use_buildx {
                command = command
                    .arg("--cache-from")
                    .arg(format!("type=registry,ref={}", cache_ref));
            } else {
                command = command.arg("--cache-from").arg(cache_ref);
            }
        }

        if config.use_buildx {
            if config.push {
                command = command.arg("--push");
            } else {
                command = command.arg("--load");
            }
        }

        command = command.arg(resolved.context.display().to_string());
        Ok(command)
    }

    /// 一つのイメージをビルドする
    ///
    /// 成功時は付与したタグ一式を返す。dry-run では実行せず、実行される
    /// はずのコマンドを表示するだけ。
    pub async fn build(&self, image: ImageType) -> BuildResult<Vec<String>> {
        let plan = self.plan(image)?;

        if self.config.dry_run {
            println!("{} {}", "[dry-run]".yellow(), plan.command.render());
            return Ok(plan.tags);
        }

        println!("  {} {}", "→".blue(), plan.command.render());
        let status = plan.command.run().await?;
        if !status.success() {
            return Err(BuildError::BuildFailed {
                image: image.to_string(),
                status,
            });
        }

        println!("  {} ビルド完了", "✓".green());
        Ok(plan.tags)
    }
}

/// 順次ビルドの失敗
///
/// どのイメージ種別で停止したかを保持する。以降のイメージには
/// 着手していない。
#[derive(Debug)]
pub struct SequenceFailure {
    pub image: ImageType,
    pub error: BuildError,
}

impl fmt::Display for SequenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "イメージ '{}' のビルドに失敗しました: {}",
            self.image, self.error
        )
    }
}

impl std::error::Error for SequenceFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// 展開済みのイメージ列を順番にビルドする
///
/// 一つの外部ビルドが完了してから次に着手する。最初の失敗で打ち切り、
/// 残りのイメージは試行しない。
pub async fn build_sequence<F, Fut>(
    images: &[ImageType],
    mut build_one: F,
) -> std::result::Result<Vec<String>, SequenceFailure>
where
    F: FnMut(ImageType) -> Fut,
    Fut: Future<Output = BuildResult<Vec<String>>>,
{
    let mut tags = Vec::new();
    for image in images {
        match build_one(*image).await {
            Ok(mut built) => tags.append(&mut built),
            Err(error) => {
                return Err(SequenceFailure {
                    image: *image,
                    error,
                });
            }
        }
    }
    Ok(tags)
}
