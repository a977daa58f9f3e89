//! Git integration: which files to check, and their content.
//!
//! The staged change set comes from `git diff-index --cached -z`, parsed with
//! [`parse_change_records`]. Blob content is read from the object store with
//! `gix`, so the check sees exactly what will be committed regardless of the
//! state of the working tree.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::EolcheckError;
use crate::record::{parse_change_records, ChangeRecord, RecordFormat};
use crate::source::EolSource;
use crate::Result;

/// Object name of the empty tree, used as the base before the first commit.
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Mode of a submodule entry; its hash names a commit, not a blob.
const GITLINK_MODE: &str = "160000";

/// Mode of a symbolic link; its blob holds the link target.
const SYMLINK_MODE: &str = "120000";

/// A repository with a work tree.
pub struct GitRepo {
    repo: gix::Repository,
    work_dir: PathBuf,
}

impl GitRepo {
    /// Find the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = gix::discover(path.as_ref()).map_err(|e| {
            EolcheckError::GitError(format!("Failed to discover git repository: {}", e))
        })?;

        let work_dir = repo
            .work_dir()
            .ok_or_else(|| EolcheckError::GitError("Repository has no work directory".to_string()))?
            .to_path_buf();

        Ok(Self { repo, work_dir })
    }

    /// Root of the work tree
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// What the index is compared against: `HEAD`, or the empty tree when
    /// nothing has been committed yet.
    pub fn diff_base(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| EolcheckError::GitError(format!("Failed to read HEAD: {}", e)))?;

        if head.is_unborn() {
            Ok(EMPTY_TREE.to_string())
        } else {
            Ok("HEAD".to_string())
        }
    }

    /// All staged changes, as reported by `git diff-index --cached`.
    pub fn staged_changes(&self) -> Result<Vec<ChangeRecord>> {
        let base = self.diff_base()?;

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.work_dir)
            .args(["diff-index", "--cached", "-z", &base])
            .output()
            .map_err(|e| EolcheckError::GitError(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(EolcheckError::GitError(format!(
                "git diff-index failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let records = parse_change_records(&output.stdout, RecordFormat::Nul)?;
        tracing::debug!(base = %base, records = records.len(), "parsed staged changes");
        Ok(records)
    }

    /// The staged files whose new content should be checked.
    ///
    /// Only added, modified, copied, and renamed entries are kept; each is
    /// named by its destination path and read from its destination blob.
    pub fn staged_sources(&self) -> Result<Vec<BlobSource<'_>>> {
        let sources = self
            .staged_changes()?
            .into_iter()
            .filter(|r| {
                r.status.is_content_change()
                    && r.dst_mode != GITLINK_MODE
                    && r.dst_mode != SYMLINK_MODE
            })
            .map(|r| BlobSource {
                repo: &self.repo,
                name: r.path().to_string(),
                hash: r.dst_hash,
            })
            .collect();
        Ok(sources)
    }

    /// Every file in the tree of commit `rev`.
    pub fn commit_sources(&self, rev: &str) -> Result<Vec<BlobSource<'_>>> {
        let id = self
            .repo
            .rev_parse_single(rev.as_bytes())
            .map_err(|e| EolcheckError::GitError(format!("Failed to resolve '{}': {}", rev, e)))?
            .detach();

        let commit = self.repo.find_commit(id).map_err(|e| {
            EolcheckError::GitError(format!("Failed to find commit '{}': {}", rev, e))
        })?;

        let tree = commit
            .tree()
            .map_err(|e| EolcheckError::GitError(format!("Failed to get tree for '{}': {}", rev, e)))?;

        let mut sources = Vec::new();
        self.collect_tree_blobs(&tree, "", &mut sources)?;
        tracing::debug!(rev, files = sources.len(), "listed commit tree");
        Ok(sources)
    }

    /// Recursively collect all blob entries from a tree
    fn collect_tree_blobs<'repo>(
        &'repo self,
        tree: &gix::Tree<'_>,
        prefix: &str,
        sources: &mut Vec<BlobSource<'repo>>,
    ) -> Result<()> {
        for entry in tree.iter() {
            let entry = entry
                .map_err(|e| EolcheckError::GitError(format!("Failed to read tree entry: {}", e)))?;

            let name = format!("{}{}", prefix, entry.filename());

            if entry.mode().is_blob() {
                sources.push(BlobSource {
                    repo: &self.repo,
                    name,
                    hash: entry.oid().to_string(),
                });
            } else if entry.mode().is_tree() {
                let subtree = self
                    .repo
                    .find_object(entry.oid())
                    .map_err(|e| EolcheckError::GitError(format!("Failed to find tree: {}", e)))?
                    .try_into_tree()
                    .map_err(|_| EolcheckError::GitError("Object is not a tree".to_string()))?;
                self.collect_tree_blobs(&subtree, &format!("{}/", name), sources)?;
            }
        }
        Ok(())
    }
}

/// A file whose content is a blob in the repository object store.
#[derive(Clone)]
pub struct BlobSource<'repo> {
    repo: &'repo gix::Repository,
    name: String,
    hash: String,
}

impl BlobSource<'_> {
    fn read_blob(&self) -> std::result::Result<Vec<u8>, String> {
        let oid = gix::ObjectId::from_hex(self.hash.as_bytes())
            .map_err(|e| format!("invalid object id {}: {}", self.hash, e))?;

        let object = self
            .repo
            .find_object(oid)
            .map_err(|e| format!("failed to find object {}: {}", oid, e))?;

        let mut blob = object
            .try_into_blob()
            .map_err(|_| format!("object {} is not a blob", oid))?;

        Ok(std::mem::take(&mut blob.data))
    }
}

impl EolSource for BlobSource<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash(&self) -> &str {
        &self.hash
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let data = self.read_blob().map_err(|message| EolcheckError::Open {
            name: self.name.clone(),
            message,
        })?;
        Ok(Box::new(Cursor::new(data)))
    }
}

impl std::fmt::Debug for BlobSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobSource")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .finish()
    }
}
