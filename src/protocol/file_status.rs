use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::utils;

/// Entry types reported in the `type` field of a WebHDFS `FileStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// Unix permission bits as carried by HDFS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilePermission(u16);

bitflags! {
    impl FilePermission: u16 {
        const STICKY = 0o1000;
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const OWNER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl FilePermission {
    /// Default for newly created directories
    pub const DIR_DEFAULT: Self = Self::from_bits_truncate(0o755);
    /// Default for newly created files
    pub const FILE_DEFAULT: Self = Self::from_bits_truncate(0o644);

    /// Parses an octal permission such as `755`, `0644` or `1777`
    pub fn from_octal(octal: &str) -> Option<Self> {
        let octal = octal.trim();
        if octal.is_empty() || octal.len() > 4 {
            return None;
        }

        u16::from_str_radix(octal, 8).ok().and_then(Self::from_bits)
    }

    /// Renders the permission the way WebHDFS expects it, e.g. `755`
    pub fn to_octal(self) -> String {
        format!("{:o}", self.bits())
    }
}

impl fmt::Display for FilePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_octal())
    }
}

impl Serialize for FilePermission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_octal())
    }
}

impl<'de> Deserialize<'de> for FilePermission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let octal = String::deserialize(deserializer)?;
        Self::from_octal(&octal)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid permission: {octal}")))
    }
}

/// Status of a remote entry, shaped after the WebHDFS `FileStatus` object.
///
/// Only `type` matters to the session, the rest is carried through for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    #[serde(default)]
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    pub permission: FilePermission,
    #[serde(default)]
    pub modification_time: i64,
    #[serde(default)]
    pub access_time: i64,
    #[serde(default)]
    pub replication: u16,
    #[serde(default)]
    pub block_size: u64,
}

impl FileStatus {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    /// Returns the size of the file
    pub const fn len(&self) -> u64 {
        self.length
    }

    /// Returns the last modification time
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        utils::from_millis(self.modification_time)
    }

    /// Returns the last access time
    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        utils::from_millis(self.access_time)
    }
}

#[cfg(test)]
mod test_file_status {
    use super::*;

    const LISTING: &str = r#"{
        "accessTime": 1320171722771,
        "blockSize": 33554432,
        "group": "supergroup",
        "length": 24930,
        "modificationTime": 1320171722771,
        "owner": "webuser",
        "pathSuffix": "a.patch",
        "permission": "644",
        "replication": 1,
        "type": "FILE"
    }"#;

    #[test]
    fn test_status_from_webhdfs_json() {
        let status: FileStatus = serde_json::from_str(LISTING).unwrap();

        assert_eq!(status.path_suffix, "a.patch");
        assert!(status.is_file());
        assert!(!status.is_dir());
        assert_eq!(status.len(), 24930);
        assert_eq!(status.permission, FilePermission::FILE_DEFAULT);
        assert_eq!(status.modified().unwrap().timestamp(), 1_320_171_722);
    }

    #[test]
    fn test_directory_status_with_missing_fields() {
        let status: FileStatus =
            serde_json::from_str(r#"{"type": "DIRECTORY", "permission": "1777"}"#).unwrap();

        assert!(status.is_dir());
        assert!(status.permission.contains(FilePermission::STICKY));
        assert_eq!(status.length, 0);
    }

    #[test]
    fn test_permission_octal() {
        assert_eq!(FilePermission::from_octal("755"), Some(FilePermission::DIR_DEFAULT));
        assert_eq!(FilePermission::from_octal("0644"), Some(FilePermission::FILE_DEFAULT));
        assert_eq!(FilePermission::from_octal("1777").unwrap().to_octal(), "1777");
        assert_eq!(FilePermission::from_octal("888"), None);
        assert_eq!(FilePermission::from_octal("7777"), None);
        assert_eq!(FilePermission::from_octal(""), None);
        assert_eq!(FilePermission::from_octal("rwxr-xr-x"), None);
    }

    #[test]
    fn test_permission_serialized_as_octal_string() {
        let json = serde_json::to_string(&FilePermission::DIR_DEFAULT).unwrap();
        assert_eq!(json, "\"755\"");
    }
}
