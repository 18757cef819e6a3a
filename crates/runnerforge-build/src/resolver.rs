//! イメージ種別からビルド入力への解決

use std::path::{Path, PathBuf};

use runnerforge_core::ImageType;

use crate::error::{BuildError, BuildResult};

/// イメージ種別をプロジェクトルート上の実パスに解決する
pub struct BuildResolver {
    project_root: PathBuf,
}

/// 解決済みのビルド入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuild {
    pub image: ImageType,
    pub dockerfile: PathBuf,
    pub context: PathBuf,
}

impl BuildResolver {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// レシピの Dockerfile とコンテキストを検証付きで解決する
    ///
    /// メタターゲットは展開してから渡すこと。Dockerfile の不在は
    /// ここで検出し、外部ツールの起動前に失敗させる。
    pub fn resolve(&self, image: ImageType) -> BuildResult<ResolvedBuild> {
        let recipe = image.recipe().ok_or_else(|| {
            BuildError::InvalidConfig(format!(
                "メタターゲット '{}' は展開してから解決してください",
                image
            ))
        })?;

        let dockerfile = self.project_root.join(recipe.dockerfile);
        if !dockerfile.exists() {
            return Err(BuildError::DockerfileMissing(dockerfile));
        }

        let context = if recipe.context == "." {
            self.project_root.clone()
        } else {
            self.project_root.join(recipe.context)
        };
        if !context.is_dir() {
            return Err(BuildError::ContextNotFound(context));
        }

        tracing::debug!("resolved {} -> {}", image, dockerfile.display());
        Ok(ResolvedBuild {
            image,
            dockerfile,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_dockerfile(root: &Path, image: ImageType) {
        let path = root.join(image.recipe().unwrap().dockerfile);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "FROM alpine\n").unwrap();
    }

    #[test]
    fn test_resolve_existing_dockerfile() {
        let temp_dir = tempdir().unwrap();
        write_dockerfile(temp_dir.path(), ImageType::Cpp);

        let resolver = BuildResolver::new(temp_dir.path().to_path_buf());
        let resolved = resolver.resolve(ImageType::Cpp).unwrap();

        assert_eq!(resolved.image, ImageType::Cpp);
        assert_eq!(
            resolved.dockerfile,
            temp_dir.path().join("dockerfiles/Dockerfile.cpp")
        );
        assert_eq!(resolved.context, temp_dir.path());
    }

    #[test]
    fn test_resolve_missing_dockerfile() {
        let temp_dir = tempdir().unwrap();
        let resolver = BuildResolver::new(temp_dir.path().to_path_buf());

        let err = resolver.resolve(ImageType::Cpp).unwrap_err();
        assert!(matches!(err, BuildError::DockerfileMissing(_)));
    }

    #[test]
    fn test_resolve_meta_target_rejected() {
        let temp_dir = tempdir().unwrap();
        let resolver = BuildResolver::new(temp_dir.path().to_path_buf());

        let err = resolver.resolve(ImageType::All).unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }
}
