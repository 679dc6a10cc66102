use assert_cmd::Command;
use predicates::prelude::*;

fn installer(scratch: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("relkit-install").unwrap();
    cmd.env_remove("RELKIT_DEBUG")
        .env("RELKIT_TMPDIR", scratch)
        .env("RELKIT_DOWNLOAD_DIR", scratch)
        .env("RELKIT_INSTALL_DIR", scratch.join("bin"))
        .env("RELKIT_RELEASES_URL", "http://127.0.0.1:9/releases");
    cmd
}

fn is_empty_dir(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn install_help_exits_zero() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("-v"))
        .stdout(predicate::str::contains("-t"));
}

#[test]
fn install_unknown_flag_exits_one() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--frobnicate"));
}

#[test]
fn unsupported_architecture_exits_three() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["--host-os", "Linux", "--host-arch", "armv7"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("armv7"));
    assert!(is_empty_dir(scratch.path()));
}

#[test]
fn unsupported_os_exits_two() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["--host-os", "FreeBSD", "--host-arch", "x86_64"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FreeBSD"));
    assert!(is_empty_dir(scratch.path()));
}

#[test]
fn target_override_is_validated() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["-t", "linux-armv7"])
        .assert()
        .code(3);
}

#[test]
fn invalid_version_exits_one() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["-v", "1.2/3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("1.2/3"));
}

#[test]
fn release_version_flag_coexists_with_program_version() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    installer(scratch.path())
        .args(["-v", "v1.2.3", "--host-os", "FreeBSD", "--host-arch", "x86_64"])
        .assert()
        .code(2);
}

#[test]
fn verbose_with_quiet_is_a_usage_error() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["--verbose", "-q"])
        .assert()
        .code(1);
}

#[test]
fn invalid_base_url_exits_one() {
    let scratch = tempfile::tempdir().unwrap();
    installer(scratch.path())
        .args(["--base-url", "not a url"])
        .assert()
        .code(1);
}

#[test]
fn release_help_exits_zero() {
    Command::cargo_bin("relkit-release")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-push"));
}

#[test]
fn release_without_manifest_exits_99() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relkit-release")
        .unwrap()
        .arg("--manifest")
        .arg(dir.path().join("Cargo.toml"))
        .assert()
        .code(99)
        .stderr(predicate::str::contains("warning:"));
}

#[test]
fn release_outside_a_repository_exits_99() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("Cargo.toml");
    std::fs::write(&manifest, "[package]\nname = \"relkit\"\nversion = \"0.1.0\"\n").unwrap();

    Command::cargo_bin("relkit-release")
        .unwrap()
        .current_dir(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap())
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .code(99)
        .stdout(predicate::str::contains("Releasing relkit 0.1.0"));
}
