use colored::Colorize;
use runnerforge_core::{ALL_EXPANSION, NON_META};

/// 利用可能なイメージタイプを表示
pub fn handle() {
    println!("{}", "利用可能なイメージタイプ:".bold());
    for image in NON_META {
        if let Some(recipe) = image.recipe() {
            println!("  {:<14} {}", image.to_string().cyan(), recipe.dockerfile);
        }
    }
    println!(
        "  {:<14} メタターゲット（{} イメージに展開）",
        "all".cyan(),
        ALL_EXPANSION.len()
    );
}
