//! 外部 docker コマンドの組み立てと実行
//!
//! dry-run とログ出力のために、実行前のコマンドを決定的なシェル風
//! 文字列として描画できる。描画は実行と同じ引数列から導出されるため、
//! dry-run の出力は実際に実行されるコマンドと常に一致する。

use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{BuildError, BuildResult};

/// 組み立て済みの外部コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin_payload: Option<String>,
}

impl DockerCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin_payload: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// 子プロセスの環境変数を設定する
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// 標準入力に書き込むデータを設定する
    ///
    /// render には含まれない。パスワード等を argv に出さないための経路。
    pub fn stdin_payload(mut self, payload: impl Into<String>) -> Self {
        self.stdin_payload = Some(payload.into());
        self
    }

    /// 実行されるコマンドのシェル風表現
    ///
    /// 環境変数は VAR=value の前置きとして描画する。
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for (key, value) in &self.envs {
            parts.push(format!("{}={}", key, shell_quote(value)));
        }
        parts.push(self.program.clone());
        parts.extend(self.args.iter().map(|arg| shell_quote(arg)));
        parts.join(" ")
    }

    /// コマンドを実行し、終了ステータスを返す
    ///
    /// 標準出力・標準エラーは親プロセスに流す（docker の出力を
    /// そのまま見せる）。
    pub async fn run(&self) -> BuildResult<ExitStatus> {
        tracing::debug!("executing: {}", self.render());

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }

        if let Some(payload) = &self.stdin_payload {
            command.stdin(Stdio::piped());
            let mut child = command.spawn().map_err(|e| BuildError::CommandSpawn {
                command: self.program.clone(),
                source: e,
            })?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(payload.as_bytes()).await?;
                // stdin を閉じないと --password-stdin が EOF を待ち続ける
            }
            Ok(child.wait().await?)
        } else {
            let status = command.status().await.map_err(|e| BuildError::CommandSpawn {
                command: self.program.clone(),
                source: e,
            })?;
            Ok(status)
        }
    }
}

/// シェル用にクォートする
///
/// 空白や特殊文字を含む場合のみシングルクォートでラップする。
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
