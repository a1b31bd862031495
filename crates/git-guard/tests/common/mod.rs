#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo::cargo_bin_cmd;

pub fn guard_cmd() -> assert_cmd::Command {
    cargo_bin_cmd!("git-guard")
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// `git init` on branch `main` with a local identity.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Guard Test"]);
    git(dir, &["config", "user.email", "guard@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

pub fn write(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

pub fn stage(dir: &Path, path: &str, content: &str) {
    write(dir, path, content);
    git(dir, &["add", path]);
}

/// Commits everything and returns the new HEAD.
pub fn commit_all(dir: &Path, message: &str) -> String {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--no-verify", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Points `origin/main` (and `origin/HEAD`) at `rev` without a real remote.
pub fn set_origin_main(dir: &Path, rev: &str) {
    git(dir, &["update-ref", "refs/remotes/origin/main", rev]);
    git(
        dir,
        &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/main"],
    );
}

/// Creates a file inside the clone's `.git/guard/` directory.
pub fn write_guard_file(dir: &Path, name: &str, content: &str) {
    let guard = dir.join(".git").join("guard");
    fs::create_dir_all(&guard).unwrap();
    fs::write(guard.join(name), content).unwrap();
}

pub fn pom(version: &str) -> String {
    format!(
        "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <groupId>com.example</groupId>\n  \
         <artifactId>demo</artifactId>\n  <version>{version}</version>\n</project>\n"
    )
}
