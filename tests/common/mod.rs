//! Common test utilities for agntx integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway project with its own home and cache directories
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root, used for the local scope
    pub path: PathBuf,
    /// Stands in for `~` (global scope)
    pub home: PathBuf,
    pub cache: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = dunce::canonicalize(temp.path()).expect("Failed to resolve temp directory");
        let path = root.join("project");
        let home = root.join("home");
        let cache = root.join("cache");
        for dir in [&path, &home, &cache] {
            std::fs::create_dir_all(dir).expect("Failed to create directory");
        }
        Self {
            temp,
            path,
            home,
            cache,
        }
    }

    /// The binary, isolated from the user's environment and run in the project
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("agntx").expect("Failed to find agntx binary");
        cmd.current_dir(&self.path)
            .env_remove("AGNTX_WORKSPACE")
            .env_remove("AGNTX_LOG")
            .env("AGNTX_HOME", &self.home)
            .env("AGNTX_CACHE_DIR", &self.cache)
            .env("AGNTX_CONFIG", self.home.join("no-config.yaml"));
        cmd
    }

    /// Write a file relative to the project root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file relative to the project root
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists relative to the project root
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create a source folder under `sources/<name>` with the given files
    pub fn create_source(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let root = self.path.join("sources").join(name);
        std::fs::create_dir_all(&root).expect("Failed to create source directory");
        for (rel, content) in files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().expect("no parent")).expect("mkdir");
            std::fs::write(&path, content).expect("Failed to write source file");
        }
        root
    }

    /// A source with one of each kind plus a `hooks` file group
    pub fn create_full_source(&self, name: &str) -> PathBuf {
        let reviewer = agent("reviewer", "Reviews code");
        self.create_source(name, &[
            ("agents/reviewer.md", reviewer.as_str()),
            ("skills/pdf/SKILL.md", "---\nname: pdf\ndescription: Work with PDFs\n---\nUse it.\n"),
            ("skills/pdf/scripts/extract.py", "print('pdf')\n"),
            ("commands/ship.md", "---\ndescription: Ship it\n---\nShip $ARGUMENTS\n"),
            ("hooks/pre-commit.sh", "#!/bin/sh\necho hook\n"),
        ])
    }

    /// Count the regular files under `.agents/backups`
    pub fn backup_count(&self) -> usize {
        let dir = self.path.join(".agents/backups");
        if !dir.exists() {
            return 0;
        }
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| !e.file_type().is_dir())
            .count()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Agent markdown with frontmatter
#[allow(dead_code)]
pub fn agent(name: &str, description: &str) -> String {
    format!("---\nname: {name}\ndescription: {description}\n---\n\nYou are {name}.\n")
}

/// Initialize a git repository at `dir` and commit everything in it
#[allow(dead_code)]
pub fn commit_all(dir: &Path, message: &str) -> String {
    let repo = match git2::Repository::open(dir) {
        Ok(repo) => repo,
        Err(_) => git2::Repository::init(dir).expect("Failed to init repository"),
    };
    let mut index = repo.index().expect("index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("add");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("tree");
    let sig = git2::Signature::now("Test", "test@test.com").expect("signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
        .to_string()
}

/// `file://` URL for a local repository
#[allow(dead_code)]
pub fn file_url(dir: &Path) -> String {
    format!("file://{}", dir.display().to_string().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
        assert!(workspace.home.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_full_source_layout() {
        let workspace = TestWorkspace::new();
        workspace.create_full_source("pack");

        assert!(workspace.file_exists("sources/pack/agents/reviewer.md"));
        assert!(workspace.file_exists("sources/pack/skills/pdf/SKILL.md"));
        assert!(workspace.file_exists("sources/pack/hooks/pre-commit.sh"));
        assert_eq!(workspace.backup_count(), 0);
    }
}
