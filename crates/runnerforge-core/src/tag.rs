//! イメージタグの構築
//!
//! タグは常に (レシピ + オプション) から導出される純粋な値で、
//! 単独では保存しない。

use crate::image::ImageType;

/// 常に更新されるコンパニオンタグのバージョン
pub const LATEST: &str = "latest";

/// プライマリタグを構築する
///
/// 形式: `<registry>/<org>/gh-runner:<type>-<version>`。
/// builder のみ `<registry>/<org>/gh-builder:<version>`（タイプ接頭辞なし）。
pub fn primary_tag(registry: &str, org: &str, image: ImageType, version: &str) -> String {
    format!(
        "{}/{}/{}:{}",
        registry,
        org,
        image.repository(),
        tag_suffix(image, version)
    )
}

fn tag_suffix(image: ImageType, version: &str) -> String {
    match image {
        ImageType::Builder => version.to_string(),
        other => format!("{}-{}", other.as_str(), version),
    }
}

/// ビルドに付与するタグ一式を構築する
///
/// カスタムタグ指定時はそのタグのみ（-latest コンパニオンは抑制）。
/// 未指定時はバージョンタグに加えて -latest コンパニオンを付与する。
/// 両者が一致する場合（version = "latest"）は一つに畳む。
pub fn image_tags(
    registry: &str,
    org: &str,
    image: ImageType,
    version: &str,
    tag_override: Option<&str>,
) -> Vec<String> {
    if let Some(custom) = tag_override {
        return vec![format!(
            "{}/{}/{}:{}",
            registry,
            org,
            image.repository(),
            custom
        )];
    }

    let versioned = primary_tag(registry, org, image, version);
    let latest = primary_tag(registry, org, image, LATEST);
    if versioned == latest {
        vec![versioned]
    } else {
        vec![versioned, latest]
    }
}

/// キャッシュ参照に使う latest タグ
pub fn cache_ref(registry: &str, org: &str, image: ImageType) -> String {
    primary_tag(registry, org, image, LATEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_tag() {
        assert_eq!(
            primary_tag("ghcr.io", "acme", ImageType::Cpp, "1.0.0"),
            "ghcr.io/acme/gh-runner:cpp-1.0.0"
        );
    }

    #[test]
    fn test_primary_tag_builder() {
        // builder はタイプ接頭辞なしで gh-builder リポジトリを使う
        assert_eq!(
            primary_tag("ghcr.io", "acme", ImageType::Builder, "1.0.0"),
            "ghcr.io/acme/gh-builder:1.0.0"
        );
    }

    #[test]
    fn test_image_tags_with_companion() {
        let tags = image_tags("ghcr.io", "acme", ImageType::Cpp, "1.0.0", None);
        assert_eq!(
            tags,
            vec![
                "ghcr.io/acme/gh-runner:cpp-1.0.0".to_string(),
                "ghcr.io/acme/gh-runner:cpp-latest".to_string(),
            ]
        );
    }

    #[test]
    fn test_image_tags_custom_override_single() {
        // カスタムタグは -latest コンパニオンを抑制する
        let tags = image_tags("ghcr.io", "acme", ImageType::Cpp, "1.0.0", Some("nightly"));
        assert_eq!(tags, vec!["ghcr.io/acme/gh-runner:nightly".to_string()]);
    }

    #[test]
    fn test_image_tags_latest_version_collapses() {
        let tags = image_tags("ghcr.io", "acme", ImageType::Cpp, "latest", None);
        assert_eq!(tags, vec!["ghcr.io/acme/gh-runner:cpp-latest".to_string()]);
    }

    #[test]
    fn test_image_tags_builder() {
        let tags = image_tags("ghcr.io", "acme", ImageType::Builder, "0.5.0", None);
        assert_eq!(
            tags,
            vec![
                "ghcr.io/acme/gh-builder:0.5.0".to_string(),
                "ghcr.io/acme/gh-builder:latest".to_string(),
            ]
        );
    }

    #[test]
    fn test_tag_construction_pure() {
        // 同じ入力は常に同じ出力
        let first = image_tags("ghcr.io", "acme", ImageType::Web, "2.1.0", None);
        let second = image_tags("ghcr.io", "acme", ImageType::Web, "2.1.0", None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_ref() {
        assert_eq!(
            cache_ref("ghcr.io", "acme", ImageType::Python),
            "ghcr.io/acme/gh-runner:python-latest"
        );
    }
}
