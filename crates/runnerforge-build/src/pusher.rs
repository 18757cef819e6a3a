//! イメージプッシュ処理
//!
//! ビルド済みのタグを docker push でレジストリに送る。buildx の --push
//! 経路ではビルド時にプッシュ済みのため、ここは素の docker build 経路と
//! push-all エントリポイントから使われる。

use colored::Colorize;

use crate::command::DockerCommand;
use crate::error::{BuildError, BuildResult};

/// イメージプッシュを実行するハンドラ
pub struct ImagePusher {
    dry_run: bool,
}

impl ImagePusher {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// docker push コマンドを組み立てる
    pub fn push_command(tag: &str) -> DockerCommand {
        DockerCommand::new("docker").arg("push").arg(tag)
    }

    /// 一つのタグをプッシュする
    pub async fn push(&self, tag: &str) -> BuildResult<()> {
        let command = Self::push_command(tag);

        if self.dry_run {
            println!("{} {}", "[dry-run]".yellow(), command.render());
            return Ok(());
        }

        println!("  {} {}", "↑".blue(), tag.cyan());
        let status = command.run().await?;
        if !status.success() {
            return Err(BuildError::PushFailed {
                tag: tag.to_string(),
                status,
            });
        }
        println!("  {} プッシュ完了", "✓".green());
        Ok(())
    }

    /// タグ列を順番にプッシュする
    ///
    /// 最初の失敗で打ち切る。
    pub async fn push_all(&self, tags: &[String]) -> BuildResult<()> {
        for tag in tags {
            self.push(tag).await?;
        }
        Ok(())
    }
}
