//! The HDFS client capability consumed by a [`Session`](crate::Session).
//!
//! The session never speaks WebHDFS itself. It talks to a [`Connector`] that
//! produces [`HdfsClient`] handles bound to an endpoint, a user and a root,
//! and every path it hands to a client is already absolute.

pub mod error;
pub mod memory;

use std::path::{Path, PathBuf};

pub use memory::{MemoryClient, MemoryFs};

use crate::protocol::{FilePermission, FileStatus};

pub type ClientResult<T> = Result<T, error::Error>;

/// Operations of an HDFS client handle. This is `async_trait`
#[async_trait]
pub trait HdfsClient: Send + Sync {
    /// Lists the direct children of a directory as `(name, status)` pairs.
    /// Names are relative to `path`.
    async fn list(&self, path: &str) -> ClientResult<Vec<(String, FileStatus)>>;

    /// Uploads a local file or directory and returns the remote path written.
    /// With `cleanup` set, partially uploaded files are removed on failure.
    async fn upload(
        &self,
        remote: &str,
        local: &Path,
        overwrite: bool,
        cleanup: bool,
    ) -> ClientResult<String>;

    /// Downloads a remote file or directory and returns the local path written.
    async fn download(&self, remote: &str, local: &Path, overwrite: bool)
        -> ClientResult<PathBuf>;

    /// Deletes a path. Returns `false` if nothing existed there.
    async fn delete(&self, path: &str, recursive: bool) -> ClientResult<bool>;

    /// Creates a directory together with any missing parents.
    async fn makedirs(&self, path: &str) -> ClientResult<()>;

    async fn set_permission(&self, path: &str, permission: FilePermission) -> ClientResult<()>;
}

/// Creates client handles. A new handle is requested on every connect and
/// every change of directory; old handles are simply dropped.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: HdfsClient;

    /// Establishes a handle for `endpoint` (`scheme://host:port`) acting as
    /// `user` with `root` as its working directory
    async fn connect(
        &self,
        endpoint: &str,
        user: Option<&str>,
        root: &str,
    ) -> ClientResult<Self::Client>;
}
