use glob::Pattern;
use std::path::{Path, PathBuf};

use super::{list, RemoteEntry, Session};
use crate::{
    client::{Connector, HdfsClient},
    error::{Error, HdfsResult},
    utils,
};

impl<C: Connector> Session<C> {
    /// Entries under the root whose absolute path matches the glob `pattern`.
    /// Relative patterns are anchored under the root.
    async fn matching(
        &self,
        client: &C::Client,
        pattern: &str,
        recursive: bool,
    ) -> HdfsResult<Vec<RemoteEntry>> {
        let anchored = utils::anchor_pattern(&self.root, pattern);
        let matcher = Pattern::new(&anchored).map_err(|err| Error::pattern(pattern, &err))?;

        let entries = list::list_tree(client, &self.root, recursive).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| matcher.matches(entry.path()))
            .collect())
    }

    /// Deletes every entry matching `pattern`, directories included.
    ///
    /// Every match is attempted even when an earlier one fails. Failures are
    /// logged as they happen and the first one is returned once all matches
    /// have been tried. On success the deleted paths are returned.
    pub async fn delete(&self, pattern: &str, recursive: bool) -> HdfsResult<Vec<String>> {
        let client = self.client()?;
        let matches = self.matching(client, pattern, recursive).await?;

        let mut deleted = Vec::with_capacity(matches.len());
        let mut first_error = None;

        for entry in matches {
            let (path, _) = entry.into_parts();
            debug!("delete {path}");

            match client.delete(&path, true).await {
                Ok(true) => deleted.push(path),
                Ok(false) => debug!("{path} was already gone"),
                Err(err) => {
                    warn!("failed to delete {path}: {err}");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(deleted),
        }
    }

    /// Downloads every entry matching `pattern` to `local_path`.
    ///
    /// A `local_path` ending with a separator is a directory and is created
    /// when missing. An empty `local_path` downloads into the configured
    /// download directory. Stops at the first failure.
    pub async fn download(
        &self,
        pattern: &str,
        local_path: &str,
        recursive: bool,
    ) -> HdfsResult<Vec<PathBuf>> {
        let client = self.client()?;
        let matches = self.matching(client, pattern, recursive).await?;
        if matches.is_empty() {
            debug!("nothing matches {pattern} under {}", self.root);
            return Ok(Vec::new());
        }

        let local = if local_path.is_empty() {
            self.config.download_dir.clone()
        } else {
            PathBuf::from(local_path)
        };

        if utils::has_trailing_separator(local_path) && tokio::fs::metadata(&local).await.is_err() {
            debug!("creating local directory {}", local.display());
            tokio::fs::create_dir_all(&local).await?;
        }

        let mut downloaded = Vec::with_capacity(matches.len());
        for entry in matches {
            debug!("download {} to {}", entry.path(), local.display());
            downloaded.push(client.download(entry.path(), &local, true).await?);
        }

        Ok(downloaded)
    }

    /// Uploads the local files matching `local_pattern`.
    ///
    /// Without `remote_path` each file lands in the root under its own name.
    /// A `remote_path` ending with a separator is a directory that keeps the
    /// local names, anything else is the exact remote file name. Existing
    /// remote files are overwritten. Stops at the first failure.
    pub async fn upload(
        &self,
        local_pattern: &str,
        remote_path: Option<&str>,
    ) -> HdfsResult<Vec<String>> {
        let client = self.client()?;
        let paths =
            glob::glob(local_pattern).map_err(|err| Error::pattern(local_pattern, &err))?;

        let mut uploaded = Vec::new();
        for local in paths {
            let local = local?;
            let remote = self.upload_target(&local, remote_path)?;

            debug!("upload {} to {remote}", local.display());
            uploaded.push(client.upload(&remote, &local, true, true).await?);
        }

        if uploaded.is_empty() {
            debug!("no local files match {local_pattern}");
        }

        Ok(uploaded)
    }

    fn upload_target(&self, local: &Path, remote_path: Option<&str>) -> HdfsResult<String> {
        let name = local
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::IO(format!("{} has no file name", local.display())))?;

        Ok(match remote_path.filter(|path| !path.is_empty()) {
            None => utils::join(&self.root, &name),
            Some(dir) if utils::has_trailing_separator(dir) => {
                utils::join(&self.resolve(dir), &name)
            }
            Some(file) => self.resolve(file),
        })
    }
}
