use colored::Colorize;

/// Docker デーモンへの接続確認
///
/// ビルド自体は docker CLI に委ねるが、デーモンが起動していない場合に
/// 長いビルド準備の後ではなく先頭でわかりやすいエラーを出す。
pub async fn preflight() -> anyhow::Result<bollard::Docker> {
    match bollard::Docker::connect_with_local_defaults() {
        Ok(docker) => match docker.ping().await {
            Ok(_) => Ok(docker),
            Err(e) => Err(connection_error(e)),
        },
        Err(e) => Err(connection_error(e)),
    }
}

fn connection_error(e: bollard::errors::Error) -> anyhow::Error {
    eprintln!();
    eprintln!("{}", "✗ Docker接続エラー".red().bold());
    eprintln!();
    eprintln!("{}", "原因:".yellow());
    eprintln!("  {}", e);
    eprintln!();
    eprintln!("{}", "解決方法:".yellow());
    eprintln!("  • Dockerが起動しているか確認してください");
    eprintln!("  • docker ps コマンドが正常に動作するか確認してください");
    anyhow::anyhow!("Docker接続に失敗しました")
}
