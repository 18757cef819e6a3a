//! bake エントリポイント
//!
//! docker buildx bake に REGISTRY / ORG / VERSION を環境変数として渡して
//! 実行する。どのターゲットがどの Dockerfile を使うかは bake ファイル
//! (docker-bake.hcl) 側が宣言しており、ここでは関知しない。

use std::path::PathBuf;

use colored::Colorize;
use runnerforge_config::BuildConfig;

use crate::command::DockerCommand;
use crate::error::{BuildError, BuildResult};

/// bake ファイルのデフォルト名（プロジェクトルート直下）
pub const DEFAULT_BAKE_FILE: &str = "docker-bake.hcl";

pub struct BakeRunner<'a> {
    config: &'a BuildConfig,
    project_root: PathBuf,
}

impl<'a> BakeRunner<'a> {
    pub fn new(config: &'a BuildConfig, project_root: PathBuf) -> Self {
        Self {
            config,
            project_root,
        }
    }

    /// bake コマンドを組み立てる（実行はしない）
    pub fn plan(&self, targets: &[String]) -> BuildResult<DockerCommand> {
        let bake_file = self.project_root.join(DEFAULT_BAKE_FILE);
        if !bake_file.exists() {
            return Err(BuildError::BakeFileMissing(bake_file));
        }

        let mut command = DockerCommand::new("docker")
            .env("REGISTRY", &self.config.registry)
            .env("ORG", &self.config.org)
            .env("VERSION", &self.config.version)
            .arg("buildx")
            .arg("bake")
            .arg("--file")
            .arg(bake_file.display().to_string());

        if !self.config.use_cache {
            command = command.arg("--no-cache");
        }
        if self.config.push {
            command = command.arg("--push");
        }
        for target in targets {
            command = command.arg(target.clone());
        }
        Ok(command)
    }

    /// bake を実行する
    pub async fn run(&self, targets: &[String]) -> BuildResult<()> {
        let command = self.plan(targets)?;

        if self.config.dry_run {
            println!("{} {}", "[dry-run]".yellow(), command.render());
            return Ok(());
        }

        println!("  {} {}", "→".blue(), command.render());
        let status = command.run().await?;
        if !status.success() {
            return Err(BuildError::BakeFailed { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runnerforge_config::{BuildConfig, CliOverrides};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn test_config() -> BuildConfig {
        BuildConfig::from_env_map(&CliOverrides::default(), &HashMap::new()).unwrap()
    }

    #[test]
    fn test_plan_renders_env_prefix() {
        let temp_dir = tempdir().unwrap();
        let bake_file = temp_dir.path().join(DEFAULT_BAKE_FILE);
        fs::write(&bake_file, "group \"default\" {}\n").unwrap();

        let config = test_config();
        let runner = BakeRunner::new(&config, temp_dir.path().to_path_buf());
        let rendered = runner.plan(&["default".to_string()]).unwrap().render();

        assert_eq!(
            rendered,
            format!(
                "REGISTRY=ghcr.io ORG=chronista-club VERSION=latest \
                 docker buildx bake --file {} default",
                bake_file.display()
            )
        );
    }

    #[test]
    fn test_plan_push_and_no_cache() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(DEFAULT_BAKE_FILE), "\n").unwrap();

        let mut config = test_config();
        config.push = true;
        config.use_cache = false;

        let runner = BakeRunner::new(&config, temp_dir.path().to_path_buf());
        let rendered = runner.plan(&[]).unwrap().render();

        assert!(rendered.contains("--no-cache"));
        assert!(rendered.contains("--push"));
    }

    #[test]
    fn test_plan_missing_bake_file() {
        let temp_dir = tempdir().unwrap();
        let config = test_config();
        let runner = BakeRunner::new(&config, temp_dir.path().to_path_buf());

        let err = runner.plan(&[]).unwrap_err();
        assert!(matches!(err, BuildError::BakeFileMissing(_)));
    }
}
