mod commands;
mod docker;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "forge")]
#[command(
    about = "GitHub Actions ランナーイメージを、まとめてビルドする。",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// イメージをビルド
    Build(commands::build::BuildArgs),
    /// ビルド記録にあるイメージをまとめてプッシュ
    #[command(name = "push-all")]
    PushAll(commands::push::PushAllArgs),
    /// docker buildx bake でビルド
    Bake(commands::bake::BakeArgs),
    /// イメージタイプの一覧を表示
    List,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            commands::build::handle(args).await?;
        }
        Commands::PushAll(args) => {
            commands::push::handle(args).await?;
        }
        Commands::Bake(args) => {
            commands::bake::handle(args).await?;
        }
        Commands::List => {
            commands::list::handle();
        }
        Commands::Version => {
            println!("runnerforge {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
