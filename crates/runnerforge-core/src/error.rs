use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "不明なイメージタイプです: {0}\n利用可能なイメージタイプ: base, cpp, python, nodejs, go, flutter, flet, cpp-only, python-only, web, flutter-only, flet-only, full-stack, builder, all"
    )]
    UnknownImageType(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
