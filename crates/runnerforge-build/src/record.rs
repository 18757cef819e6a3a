//! ビルド記録ファイル
//!
//! ビルドに成功したタグを1行1タグで追記する（ヘッダーなし）。ビルド実行と
//! push-all は別プロセスのため、ファイルで受け渡す。同時書き込みは想定
//! しない（ビルドは厳密に逐次実行される）。

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::BuildResult;

/// ビルド記録ファイルのデフォルト名（プロジェクトルート直下）
pub const DEFAULT_RECORD_FILE: &str = "built-images.txt";

pub struct BuildRecord {
    path: PathBuf,
}

impl BuildRecord {
    /// 記録ファイルを空の状態で作り直す
    ///
    /// ビルド実行の開始時に呼ぶ。前回の実行の記録は引き継がない。
    pub fn create(path: PathBuf) -> BuildResult<Self> {
        File::create(&path)?;
        Ok(Self { path })
    }

    /// 既存の記録ファイルを開く（push-all 用）
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// タグを追記する
    pub fn append(&self, tag: &str) -> BuildResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", tag)?;
        Ok(())
    }

    /// 記録済みタグを読み込む
    pub fn load(&self) -> BuildResult<Vec<String>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut tags = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                tags.push(trimmed.to_string());
            }
        }
        Ok(tags)
    }

    /// 記録ファイルを削除する（push-all 成功後）
    pub fn clear(&self) -> BuildResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
