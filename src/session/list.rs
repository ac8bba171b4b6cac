use std::collections::VecDeque;

use crate::{client::HdfsClient, error::HdfsResult, protocol::FileStatus, utils};

/// A remote file or directory together with its absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    path: String,
    status: FileStatus,
}

impl RemoteEntry {
    pub(crate) const fn new(path: String, status: FileStatus) -> Self {
        Self { path, status }
    }

    /// Absolute remote path of the entry
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file name for the file that this entry points at.
    #[must_use]
    pub fn file_name(&self) -> &str {
        utils::file_name(&self.path)
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.status.is_dir()
    }

    /// Returns the status reported by the client for this entry.
    #[must_use]
    pub const fn status(&self) -> &FileStatus {
        &self.status
    }

    #[must_use]
    pub fn into_parts(self) -> (String, FileStatus) {
        (self.path, self.status)
    }
}

/// One flat listing, with names rejoined onto `path`
async fn read_dir<H>(client: &H, path: &str) -> HdfsResult<VecDeque<RemoteEntry>>
where
    H: HdfsClient + ?Sized,
{
    debug!("list {path}");

    Ok(client
        .list(path)
        .await?
        .into_iter()
        .map(|(name, status)| {
            let path = if name.is_empty() {
                path.to_owned()
            } else {
                utils::join(path, &name)
            };
            RemoteEntry::new(path, status)
        })
        .collect())
}

/// Lists `path`, which must already be absolute.
///
/// Recursive listings replace every directory by its contents, depth first
/// and in the order the client enumerates them, so only non-directory
/// entries remain. An explicit stack keeps deep trees off the call stack.
pub(crate) async fn list_tree<H>(client: &H, path: &str, recursive: bool) -> HdfsResult<Vec<RemoteEntry>>
where
    H: HdfsClient + ?Sized,
{
    let top = read_dir(client, path).await?;
    if !recursive {
        return Ok(top.into());
    }

    let mut entries = Vec::new();
    let mut stack = vec![top];

    while let Some(level) = stack.last_mut() {
        match level.pop_front() {
            None => {
                let _ = stack.pop();
            }
            Some(entry) if entry.is_dir() => {
                let children = read_dir(client, entry.path()).await?;
                stack.push(children);
            }
            Some(entry) => entries.push(entry),
        }
    }

    Ok(entries)
}
