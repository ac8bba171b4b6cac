//! In-memory HDFS backend.
//!
//! [`MemoryFs`] keeps a shared tree of directories and files and hands out
//! [`MemoryClient`] handles that behave like a WebHDFS client against it:
//! missing paths raise `FileNotFoundException`, uploads create their parent
//! directories and deletes of absent paths report `false`.

use bytes::Bytes;
use std::{
    collections::BTreeMap,
    ops::Bound,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::Mutex;

use super::{error::Error, ClientResult, Connector, HdfsClient};
use crate::{
    protocol::{FilePermission, FileStatus, FileType},
    utils,
};

const DEFAULT_OWNER: &str = "hdfs";
const DEFAULT_GROUP: &str = "supergroup";
const BLOCK_SIZE: u64 = 128 * 1024 * 1024;

#[derive(Debug, Clone)]
struct Node {
    data: Option<Bytes>,
    owner: String,
    permission: FilePermission,
    modification_time: i64,
}

impl Node {
    fn dir(owner: &str) -> Self {
        Self {
            data: None,
            owner: owner.to_owned(),
            permission: FilePermission::DIR_DEFAULT,
            modification_time: utils::now_millis(),
        }
    }

    fn file(owner: &str, data: Bytes) -> Self {
        Self {
            data: Some(data),
            owner: owner.to_owned(),
            permission: FilePermission::FILE_DEFAULT,
            modification_time: utils::now_millis(),
        }
    }

    const fn is_dir(&self) -> bool {
        self.data.is_none()
    }

    fn status(&self, name: &str) -> FileStatus {
        let (file_type, length, replication, block_size) = match &self.data {
            None => (FileType::Directory, 0, 0, 0),
            Some(data) => (FileType::File, data.len() as u64, 1, BLOCK_SIZE),
        };

        FileStatus {
            path_suffix: name.to_owned(),
            file_type,
            length,
            owner: self.owner.clone(),
            group: DEFAULT_GROUP.to_owned(),
            permission: self.permission,
            modification_time: self.modification_time,
            access_time: self.modification_time,
            replication,
            block_size,
        }
    }
}

/// Absolute path to node. Every parent of a key is itself a directory key.
#[derive(Debug)]
struct Tree {
    nodes: BTreeMap<String, Node>,
}

fn child_prefix(path: &str) -> String {
    if path == "/" {
        path.to_owned()
    } else {
        format!("{path}/")
    }
}

fn parent(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(0) if path.len() > 1 => Some("/"),
        Some(0) | None => None,
        Some(index) => Some(&path[..index]),
    }
}

impl Tree {
    fn new() -> Self {
        let mut nodes = BTreeMap::new();
        let _ = nodes.insert("/".to_owned(), Node::dir(DEFAULT_OWNER));
        Self { nodes }
    }

    fn is_dir(&self, path: &str) -> bool {
        self.nodes.get(path).is_some_and(Node::is_dir)
    }

    /// Nodes strictly below `path` as `(relative name, node)`, in key order.
    /// The prefix key itself is excluded, which matters for `/`.
    fn below<'a>(&'a self, path: &str) -> impl Iterator<Item = (&'a str, &'a Node)> + 'a {
        let prefix = child_prefix(path);
        let start = prefix.len();

        self.nodes
            .range::<String, _>((Bound::Excluded(prefix.clone()), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(move |(key, node)| (&key[start..], node))
    }

    /// Keys strictly below `path`, in order
    fn descendants(&self, path: &str) -> Vec<String> {
        self.below(path)
            .map(|(name, _)| utils::join(path, name))
            .collect()
    }

    fn children(&self, path: &str) -> Vec<(String, FileStatus)> {
        self.below(path)
            .filter(|(name, _)| !name.contains('/'))
            .map(|(name, node)| (name.to_owned(), node.status(name)))
            .collect()
    }

    fn makedirs(&mut self, path: &str, owner: &str) -> ClientResult<()> {
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push('/');
            current.push_str(part);

            match self.nodes.get(&current) {
                Some(node) if node.is_dir() => (),
                Some(_) => {
                    return Err(Error::remote(
                        "ParentNotDirectoryException",
                        format!("{current} is not a directory"),
                    ))
                }
                None => {
                    let _ = self.nodes.insert(current.clone(), Node::dir(owner));
                }
            }
        }

        Ok(())
    }

    fn insert_file(
        &mut self,
        path: &str,
        data: Bytes,
        owner: &str,
        overwrite: bool,
    ) -> ClientResult<()> {
        match self.nodes.get(path) {
            Some(node) if node.is_dir() => {
                return Err(Error::remote(
                    "FileAlreadyExistsException",
                    format!("{path} is a directory"),
                ))
            }
            Some(_) if !overwrite => return Err(Error::already_exists(path)),
            _ => (),
        }

        if let Some(parent) = parent(path) {
            self.makedirs(parent, owner)?;
        }

        let _ = self.nodes.insert(path.to_owned(), Node::file(owner, data));
        Ok(())
    }

    fn remove(&mut self, path: &str, recursive: bool) -> ClientResult<bool> {
        if !self.nodes.contains_key(path) {
            return Ok(false);
        }

        if path == "/" {
            return Err(Error::remote("IOException", "Cannot delete the root directory"));
        }

        let descendants = self.descendants(path);
        if !descendants.is_empty() && !recursive {
            return Err(Error::remote(
                "PathIsNotEmptyDirectoryException",
                format!("{path} is non empty"),
            ));
        }

        for key in descendants {
            let _ = self.nodes.remove(&key);
        }
        let _ = self.nodes.remove(path);

        Ok(true)
    }

    /// The node at `path` followed by everything below it, as paths relative
    /// to `path` (empty for the node itself)
    fn snapshot(&self, path: &str) -> ClientResult<Vec<(String, Option<Bytes>)>> {
        let node = self.nodes.get(path).ok_or_else(|| Error::not_found(path))?;

        let mut entries = vec![(String::new(), node.data.clone())];
        entries.extend(
            self.below(path)
                .map(|(name, node)| (name.to_owned(), node.data.clone())),
        );

        Ok(entries)
    }
}

/// A shared in-memory HDFS namespace. Cloning shares the same tree.
#[derive(Debug, Clone)]
pub struct MemoryFs {
    tree: Arc<Mutex<Tree>>,
    connections: Arc<AtomicUsize>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Tree::new())),
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of client handles created so far
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Creates a directory and its parents
    pub async fn create_dir(&self, path: &str) -> ClientResult<()> {
        self.tree
            .lock()
            .await
            .makedirs(&utils::normalize(path), DEFAULT_OWNER)
    }

    /// Creates or replaces a file, creating its parents
    pub async fn create_file<D: Into<Bytes>>(&self, path: &str, data: D) -> ClientResult<()> {
        self.tree.lock().await.insert_file(
            &utils::normalize(path),
            data.into(),
            DEFAULT_OWNER,
            true,
        )
    }

    /// Contents of a file, `None` for directories and missing paths
    pub async fn read(&self, path: &str) -> Option<Bytes> {
        self.tree
            .lock()
            .await
            .nodes
            .get(&utils::normalize(path))
            .and_then(|node| node.data.clone())
    }

    pub async fn exists(&self, path: &str) -> bool {
        self.tree
            .lock()
            .await
            .nodes
            .contains_key(&utils::normalize(path))
    }

    pub async fn status(&self, path: &str) -> Option<FileStatus> {
        let path = utils::normalize(path);
        self.tree
            .lock()
            .await
            .nodes
            .get(&path)
            .map(|node| node.status(utils::file_name(&path)))
    }
}

#[async_trait]
impl Connector for MemoryFs {
    type Client = MemoryClient;

    async fn connect(
        &self,
        endpoint: &str,
        user: Option<&str>,
        root: &str,
    ) -> ClientResult<Self::Client> {
        let _ = self.connections.fetch_add(1, Ordering::SeqCst);
        debug!("memory client for {endpoint} at {root}");

        Ok(MemoryClient {
            tree: self.tree.clone(),
            endpoint: endpoint.to_owned(),
            user: user.map(str::to_owned),
            root: utils::normalize(root),
        })
    }
}

/// Client handle over a [`MemoryFs`]. Relative paths resolve against its root.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    tree: Arc<Mutex<Tree>>,
    endpoint: String,
    user: Option<String>,
    root: String,
}

fn local_name(local: &Path) -> ClientResult<String> {
    local
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::UnexpectedBehavior(format!("{} has no file name", local.display())))
}

impl MemoryClient {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn resolve(&self, path: &str) -> String {
        utils::join(&self.root, path)
    }

    fn owner(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    async fn upload_tree(
        &self,
        remote: &str,
        local: &Path,
        overwrite: bool,
        written: &mut Vec<String>,
    ) -> ClientResult<()> {
        let mut pending = vec![(remote.to_owned(), local.to_path_buf())];

        while let Some((remote, local)) = pending.pop() {
            if tokio::fs::metadata(&local).await?.is_dir() {
                {
                    let mut tree = self.tree.lock().await;
                    if !tree.nodes.contains_key(&remote) {
                        tree.makedirs(&remote, self.owner())?;
                        written.push(remote.clone());
                    }
                }

                let mut dir = tokio::fs::read_dir(&local).await?;
                while let Some(entry) = dir.next_entry().await? {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    pending.push((utils::join(&remote, &name), entry.path()));
                }
            } else {
                let data = tokio::fs::read(&local).await?;
                self.tree.lock().await.insert_file(
                    &remote,
                    Bytes::from(data),
                    self.owner(),
                    overwrite,
                )?;
                written.push(remote);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl HdfsClient for MemoryClient {
    async fn list(&self, path: &str) -> ClientResult<Vec<(String, FileStatus)>> {
        let path = self.resolve(path);
        let tree = self.tree.lock().await;

        match tree.nodes.get(&path) {
            None => Err(Error::not_found(&path)),
            Some(node) if !node.is_dir() => Err(Error::remote(
                "IOException",
                format!("{path} is not a directory"),
            )),
            Some(_) => Ok(tree.children(&path)),
        }
    }

    async fn upload(
        &self,
        remote: &str,
        local: &Path,
        overwrite: bool,
        cleanup: bool,
    ) -> ClientResult<String> {
        let mut remote = self.resolve(remote);
        if self.tree.lock().await.is_dir(&remote) {
            remote = utils::join(&remote, &local_name(local)?);
        }

        let mut written = Vec::new();
        if let Err(err) = self.upload_tree(&remote, local, overwrite, &mut written).await {
            if cleanup {
                let mut tree = self.tree.lock().await;
                for path in written.iter().rev() {
                    if let Err(cleanup_err) = tree.remove(path, true) {
                        warn!("failed to clean up {path}: {cleanup_err}");
                    }
                }
            }
            return Err(err);
        }

        Ok(remote)
    }

    async fn download(
        &self,
        remote: &str,
        local: &Path,
        overwrite: bool,
    ) -> ClientResult<PathBuf> {
        let remote = self.resolve(remote);
        let entries = self.tree.lock().await.snapshot(&remote)?;

        let local_is_dir = tokio::fs::metadata(local)
            .await
            .is_ok_and(|meta| meta.is_dir());
        let target = if local_is_dir {
            local.join(utils::file_name(&remote))
        } else {
            local.to_path_buf()
        };

        if !overwrite && tokio::fs::metadata(&target).await.is_ok() {
            return Err(Error::already_exists(&target.display().to_string()));
        }

        for (relative, data) in entries {
            let path = if relative.is_empty() {
                target.clone()
            } else {
                target.join(relative)
            };

            match data {
                None => tokio::fs::create_dir_all(&path).await?,
                Some(data) => tokio::fs::write(&path, &data).await?,
            }
        }

        Ok(target)
    }

    async fn delete(&self, path: &str, recursive: bool) -> ClientResult<bool> {
        let path = self.resolve(path);
        self.tree.lock().await.remove(&path, recursive)
    }

    async fn makedirs(&self, path: &str) -> ClientResult<()> {
        let path = self.resolve(path);
        self.tree.lock().await.makedirs(&path, self.owner())
    }

    async fn set_permission(&self, path: &str, permission: FilePermission) -> ClientResult<()> {
        let path = self.resolve(path);
        let mut tree = self.tree.lock().await;

        let node = tree
            .nodes
            .get_mut(&path)
            .ok_or_else(|| Error::not_found(&path))?;
        node.permission = permission;

        Ok(())
    }
}
