use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// オーケストレーターが読む環境変数
const FORGE_ENV_VARS: [&str; 12] = [
    "REGISTRY",
    "ORG",
    "VERSION",
    "REGISTRY_USERNAME",
    "REGISTRY_PASSWORD",
    "PLATFORMS",
    "DRY_RUN",
    "USE_CACHE",
    "CACHE_FROM_REGISTRY",
    "PUSH_TO_REGISTRY",
    "USE_BUILDX",
    "DOCKER_CONFIG",
];

/// テスト環境の環境変数に影響されないコマンドを作る
fn forge() -> Command {
    let mut cmd = Command::cargo_bin("forge").unwrap();
    for var in FORGE_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// 指定イメージタイプの Dockerfile を持つプロジェクトを作る
fn project_with_dockerfiles(types: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let dockerfiles = dir.path().join("dockerfiles");
    fs::create_dir_all(&dockerfiles).unwrap();
    for image_type in types {
        fs::write(
            dockerfiles.join(format!("Dockerfile.{}", image_type)),
            "FROM alpine\n",
        )
        .unwrap();
    }
    dir
}

const ALL_TYPES: [&str; 13] = [
    "base",
    "cpp",
    "python",
    "nodejs",
    "go",
    "flutter",
    "flet",
    "cpp-only",
    "python-only",
    "web",
    "flutter-only",
    "flet-only",
    "full-stack",
];

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    forge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("push-all"))
        .stdout(predicate::str::contains("bake"))
        .stdout(predicate::str::contains("list"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    forge()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("runnerforge"));
}

/// buildコマンドのヘルプにスペック通りのフラグが並ぶことを確認
#[test]
fn test_build_help() {
    forge()
        .arg("build")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--no-cache"))
        .stdout(predicate::str::contains("--cache-from"))
        .stdout(predicate::str::contains("--push"))
        .stdout(predicate::str::contains("--no-buildx"))
        .stdout(predicate::str::contains("--platforms"))
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--org"))
        .stdout(predicate::str::contains("--tag"));
}

/// 不明なイメージタイプは入力名入りのエラーで非ゼロ終了する
#[test]
fn test_unknown_image_type_named_in_error() {
    let project = project_with_dockerfiles(&[]);
    forge()
        .arg("build")
        .arg("bogus")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

/// dry-run は実行されるはずのコマンドラインを出力する
#[test]
fn test_build_dry_run_outputs_command_line() {
    let project = project_with_dockerfiles(&["cpp"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("--registry")
        .arg("ghcr.io")
        .arg("--org")
        .arg("acme")
        .arg("--version")
        .arg("1.0.0")
        .arg("-C")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docker buildx build"))
        .stdout(predicate::str::contains("--platform linux/amd64"))
        .stdout(predicate::str::contains("-t ghcr.io/acme/gh-runner:cpp-1.0.0"))
        .stdout(predicate::str::contains("-t ghcr.io/acme/gh-runner:cpp-latest"))
        .stdout(predicate::str::contains("--load"));
}

/// dry-run を2回実行すると出力はバイト単位で一致し、記録も残らない
#[test]
fn test_build_dry_run_is_repeatable_and_effect_free() {
    let project = project_with_dockerfiles(&["cpp", "python"]);

    let run = |project_path: &Path| {
        forge()
            .arg("build")
            .arg("cpp")
            .arg("python")
            .arg("--dry-run")
            .arg("-C")
            .arg(project_path)
            .output()
            .unwrap()
    };

    let first = run(project.path());
    let second = run(project.path());

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    // ビルド記録ファイルは作られない
    assert!(!project.path().join("built-images.txt").exists());
}

/// all は13イメージに展開され、base が先頭になる
#[test]
fn test_build_all_expands_in_order() {
    let project = project_with_dockerfiles(&ALL_TYPES);
    let output = forge()
        .arg("build")
        .arg("all")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let build_lines: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("docker buildx build"))
        .collect();
    assert_eq!(build_lines.len(), 13);
    assert!(build_lines[0].contains("Dockerfile.base"));
    // 言語パックは full-stack より先にビルドされる
    let pos = |needle: &str| {
        build_lines
            .iter()
            .position(|line| line.contains(needle))
            .unwrap()
    };
    assert!(pos("Dockerfile.cpp ") < pos("Dockerfile.full-stack"));
}

/// Dockerfile が無いイメージタイプは外部ツールの起動前に失敗する
#[test]
fn test_build_missing_dockerfile() {
    let project = project_with_dockerfiles(&[]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile"))
        .stderr(predicate::str::contains("cpp"));
}

/// マルチプラットフォームは --push なしでは即時に失敗する
#[test]
fn test_multi_platform_requires_push() {
    let project = project_with_dockerfiles(&["cpp"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("--platforms")
        .arg("linux/amd64,linux/arm64")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--push"));
}

/// マルチプラットフォーム + --push は --push 付きの buildx コマンドになる
#[test]
fn test_multi_platform_push_dry_run() {
    let project = project_with_dockerfiles(&["base"]);
    forge()
        .arg("build")
        .arg("base")
        .arg("--dry-run")
        .arg("--push")
        .arg("--platforms")
        .arg("linux/amd64,linux/arm64")
        .arg("-C")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--platform linux/amd64,linux/arm64"))
        .stdout(predicate::str::contains("--push"));
}

/// --push + 認証情報なしは警告を出し、login を呼ばずに続行する
#[test]
fn test_push_without_credentials_warns_and_skips_login() {
    let project = project_with_dockerfiles(&["cpp"]);
    let empty_docker_config = tempfile::tempdir().unwrap();

    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("--push")
        .arg("-C")
        .arg(project.path())
        .env("DOCKER_CONFIG", empty_docker_config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docker login をスキップします"))
        .stdout(predicate::str::contains("docker login ghcr.io").not());
}

/// 認証情報ありの dry-run は login コマンドを表示する（パスワードは出さない）
#[test]
fn test_push_with_credentials_dry_run_renders_login() {
    let project = project_with_dockerfiles(&["cpp"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("--push")
        .arg("-C")
        .arg(project.path())
        .env("REGISTRY_USERNAME", "robot")
        .env("REGISTRY_PASSWORD", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "docker login ghcr.io -u robot --password-stdin",
        ))
        .stdout(predicate::str::contains("s3cret").not());
}

/// --tag は複数イメージタイプと併用できない
#[test]
fn test_tag_override_requires_single_image() {
    let project = project_with_dockerfiles(&["cpp", "python"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("python")
        .arg("--dry-run")
        .arg("--tag")
        .arg("nightly")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tag"));
}

/// 環境変数よりフラグが優先される
#[test]
fn test_flag_wins_over_env() {
    let project = project_with_dockerfiles(&["cpp"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("--dry-run")
        .arg("--org")
        .arg("from-flag")
        .arg("-C")
        .arg(project.path())
        .env("ORG", "from-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("gh-runner").and(predicate::str::contains("from-flag")))
        .stdout(predicate::str::contains("from-env/gh-runner").not());
}

/// DRY_RUN 環境変数でも dry-run になる
#[test]
fn test_dry_run_from_env() {
    let project = project_with_dockerfiles(&["cpp"]);
    forge()
        .arg("build")
        .arg("cpp")
        .arg("-C")
        .arg(project.path())
        .env("DRY_RUN", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"));
}

/// builder イメージは gh-builder リポジトリにタイプ接頭辞なしでタグ付けされる
#[test]
fn test_builder_uses_gh_builder_repository() {
    let project = project_with_dockerfiles(&["builder"]);
    forge()
        .arg("build")
        .arg("builder")
        .arg("--dry-run")
        .arg("--version")
        .arg("0.5.0")
        .arg("-C")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-t ghcr.io/chronista-club/gh-builder:0.5.0"))
        .stdout(predicate::str::contains("gh-builder:latest"));
}

/// list は全イメージタイプを表示する
#[test]
fn test_list_shows_image_types() {
    forge()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("base"))
        .stdout(predicate::str::contains("cpp-only"))
        .stdout(predicate::str::contains("builder"))
        .stdout(predicate::str::contains("all"));
}

/// push-all はビルド記録が無いとエラーになる
#[test]
fn test_push_all_without_record() {
    let project = project_with_dockerfiles(&[]);
    forge()
        .arg("push-all")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ビルド記録"));
}

/// push-all の dry-run は記録内の各タグの push コマンドを表示し、記録を残す
#[test]
fn test_push_all_dry_run() {
    let project = project_with_dockerfiles(&[]);
    let record_path = project.path().join("built-images.txt");
    fs::write(
        &record_path,
        "ghcr.io/acme/gh-runner:base-1.0.0\nghcr.io/acme/gh-runner:cpp-1.0.0\n",
    )
    .unwrap();
    let empty_docker_config = tempfile::tempdir().unwrap();

    forge()
        .arg("push-all")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .env("DOCKER_CONFIG", empty_docker_config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "docker push ghcr.io/acme/gh-runner:base-1.0.0",
        ))
        .stdout(predicate::str::contains(
            "docker push ghcr.io/acme/gh-runner:cpp-1.0.0",
        ));

    // dry-run では記録を消さない
    assert!(record_path.exists());
}

/// bake の dry-run は環境変数前置き付きの bake コマンドを表示する
#[test]
fn test_bake_dry_run() {
    let project = project_with_dockerfiles(&[]);
    fs::write(
        project.path().join("docker-bake.hcl"),
        "group \"default\" {}\n",
    )
    .unwrap();

    forge()
        .arg("bake")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docker buildx bake"))
        .stdout(predicate::str::contains("REGISTRY=ghcr.io"))
        .stdout(predicate::str::contains("VERSION=latest"))
        .stdout(predicate::str::contains("default"));
}

/// bake ファイルが無いと失敗する
#[test]
fn test_bake_missing_file() {
    let project = project_with_dockerfiles(&[]);
    forge()
        .arg("bake")
        .arg("--dry-run")
        .arg("-C")
        .arg(project.path())
        .assert()
        .failure();
}
