//! Shared fixture: real git repositories in temporary directories.
//!
//! Every git invocation runs with an isolated `HOME`, no system config, a
//! fixed identity, and an explicit author/committer/tagger date so tag
//! ordering never depends on the wall clock.

#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Base timestamp for fixture commits and tags.
pub const EPOCH: i64 = 1_700_000_000;

/// Test fixture that creates a real git repository.
pub struct TestRepo {
    dir: TempDir,
    home: TempDir,
    clock: Cell<i64>,
}

impl TestRepo {
    /// Create a repository on `main` without any commits.
    pub fn empty() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            home: TempDir::new().expect("failed to create temp home"),
            clock: Cell::new(EPOCH),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo
    }

    /// Create a repository with one commit, "initial", adding README.md.
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.write("README.md", "# Test Repo\n");
        repo.git(&["add", "README.md"]);
        repo.git(&["commit", "-q", "-m", "initial"]);
        repo
    }

    /// Get the path to the repository.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file in the working tree, creating parent directories.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        full
    }

    /// Make an empty commit, returning the new HEAD id.
    pub fn commit_empty(&self, message: &str) -> String {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
        self.head()
    }

    /// Write and commit a file, returning the new HEAD id.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        self.write(path, content);
        self.git(&["add", path]);
        self.git(&["commit", "-q", "-m", message]);
        self.head()
    }

    /// Lightweight tag on HEAD.
    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }

    /// Annotated tag on HEAD with the tagger date at `EPOCH + offset`.
    pub fn annotated_tag_at(&self, name: &str, offset: i64) {
        self.git_at(&["tag", "-a", name, "-m", name], EPOCH + offset);
    }

    /// Annotated tag on HEAD at the next fixture tick.
    pub fn annotated_tag(&self, name: &str) {
        self.git(&["tag", "-a", name, "-m", name]);
    }

    /// Full id of HEAD.
    pub fn head(&self) -> String {
        self.git_output(&["rev-parse", "HEAD"])
    }

    /// Run git at the next fixture tick.
    pub fn git(&self, args: &[&str]) {
        let now = self.clock.get() + 1;
        self.clock.set(now);
        self.git_at(args, now);
    }

    /// Run git with author, committer, and tagger dates pinned to `epoch`.
    pub fn git_at(&self, args: &[&str], epoch: i64) {
        let output = self
            .command(args, epoch)
            .output()
            .expect("git command failed");

        if !output.status.success() {
            panic!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    /// Run git and return trimmed stdout.
    pub fn git_output(&self, args: &[&str]) -> String {
        let output = self
            .command(args, self.clock.get())
            .output()
            .expect("git command failed");
        assert!(output.status.success(), "git {:?} failed", args);
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    fn command(&self, args: &[&str], epoch: i64) -> Command {
        let date = format!("{} +0000", epoch);
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(self.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Test User")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test User")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date);
        cmd
    }
}
