use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// ビルド対象のイメージ種別
///
/// コンパイル時に固定された閉じた集合。`all` のみが複合メタターゲットで、
/// 固定順序の13イメージに展開される。それ以外は dockerfiles/ 以下の
/// ちょうど一つの Dockerfile に対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Base,
    Cpp,
    Python,
    Nodejs,
    Go,
    Flutter,
    Flet,
    CppOnly,
    PythonOnly,
    Web,
    FlutterOnly,
    FletOnly,
    FullStack,
    Builder,
    All,
}

/// `all` の展開順序
///
/// base を先頭に、言語パック、複合イメージの順。builder は含まれず、
/// 明示的に指定された場合のみビルドされる。
pub const ALL_EXPANSION: [ImageType; 13] = [
    ImageType::Base,
    ImageType::Cpp,
    ImageType::Python,
    ImageType::Nodejs,
    ImageType::Go,
    ImageType::Flutter,
    ImageType::Flet,
    ImageType::CppOnly,
    ImageType::PythonOnly,
    ImageType::Web,
    ImageType::FlutterOnly,
    ImageType::FletOnly,
    ImageType::FullStack,
];

/// メタターゲットを除く全イメージ種別
pub const NON_META: [ImageType; 14] = [
    ImageType::Base,
    ImageType::Cpp,
    ImageType::Python,
    ImageType::Nodejs,
    ImageType::Go,
    ImageType::Flutter,
    ImageType::Flet,
    ImageType::CppOnly,
    ImageType::PythonOnly,
    ImageType::Web,
    ImageType::FlutterOnly,
    ImageType::FletOnly,
    ImageType::FullStack,
    ImageType::Builder,
];

/// 単一イメージのビルドレシピ
///
/// パスはプロジェクトルートからの相対。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRecipe {
    pub image: ImageType,
    pub dockerfile: &'static str,
    pub context: &'static str,
}

/// イメージ種別名の解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 単一イメージのレシピ
    Recipe(BuildRecipe),
    /// メタターゲットの展開結果
    Composite(Vec<ImageType>),
}

/// イメージ種別名を解決する
///
/// 不明な名前は UnknownImageType で拒否する（副作用なし）。`all` は
/// 他のどの処理よりも先に展開され、単一レシピとしては扱わない。
pub fn resolve(name: &str) -> Result<Resolution> {
    let image: ImageType = name.parse()?;
    Ok(match image.recipe() {
        Some(recipe) => Resolution::Recipe(recipe),
        None => Resolution::Composite(image.expand()),
    })
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Base => "base",
            ImageType::Cpp => "cpp",
            ImageType::Python => "python",
            ImageType::Nodejs => "nodejs",
            ImageType::Go => "go",
            ImageType::Flutter => "flutter",
            ImageType::Flet => "flet",
            ImageType::CppOnly => "cpp-only",
            ImageType::PythonOnly => "python-only",
            ImageType::Web => "web",
            ImageType::FlutterOnly => "flutter-only",
            ImageType::FletOnly => "flet-only",
            ImageType::FullStack => "full-stack",
            ImageType::Builder => "builder",
            ImageType::All => "all",
        }
    }

    /// 複合メタターゲットかどうか
    pub fn is_meta(&self) -> bool {
        matches!(self, ImageType::All)
    }

    /// メタターゲットを展開する
    ///
    /// `all` は固定の13イメージに、それ以外は自分自身のみになる。
    pub fn expand(&self) -> Vec<ImageType> {
        match self {
            ImageType::All => ALL_EXPANSION.to_vec(),
            other => vec![*other],
        }
    }

    /// 対応するビルドレシピ
    ///
    /// メタターゲットにはレシピがなく None を返す。
    pub fn recipe(&self) -> Option<BuildRecipe> {
        let dockerfile = match self {
            ImageType::All => return None,
            ImageType::Base => "dockerfiles/Dockerfile.base",
            ImageType::Cpp => "dockerfiles/Dockerfile.cpp",
            ImageType::Python => "dockerfiles/Dockerfile.python",
            ImageType::Nodejs => "dockerfiles/Dockerfile.nodejs",
            ImageType::Go => "dockerfiles/Dockerfile.go",
            ImageType::Flutter => "dockerfiles/Dockerfile.flutter",
            ImageType::Flet => "dockerfiles/Dockerfile.flet",
            ImageType::CppOnly => "dockerfiles/Dockerfile.cpp-only",
            ImageType::PythonOnly => "dockerfiles/Dockerfile.python-only",
            ImageType::Web => "dockerfiles/Dockerfile.web",
            ImageType::FlutterOnly => "dockerfiles/Dockerfile.flutter-only",
            ImageType::FletOnly => "dockerfiles/Dockerfile.flet-only",
            ImageType::FullStack => "dockerfiles/Dockerfile.full-stack",
            ImageType::Builder => "dockerfiles/Dockerfile.builder",
        };
        // コンテキストは常にプロジェクトルート（共有スクリプトを COPY するため）
        Some(BuildRecipe {
            image: *self,
            dockerfile,
            context: ".",
        })
    }

    /// プッシュ先リポジトリのベース名
    ///
    /// builder のみ gh-builder、それ以外はすべて gh-runner。
    pub fn repository(&self) -> &'static str {
        match self {
            ImageType::Builder => "gh-builder",
            _ => "gh-runner",
        }
    }
}

impl FromStr for ImageType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "base" => ImageType::Base,
            "cpp" => ImageType::Cpp,
            "python" => ImageType::Python,
            "nodejs" => ImageType::Nodejs,
            "go" => ImageType::Go,
            "flutter" => ImageType::Flutter,
            "flet" => ImageType::Flet,
            "cpp-only" => ImageType::CppOnly,
            "python-only" => ImageType::PythonOnly,
            "web" => ImageType::Web,
            "flutter-only" => ImageType::FlutterOnly,
            "flet-only" => ImageType::FletOnly,
            "full-stack" => ImageType::FullStack,
            "builder" => ImageType::Builder,
            "all" => ImageType::All,
            _ => return Err(CoreError::UnknownImageType(s.to_string())),
        })
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
