use std::{env, path::PathBuf};

/// Environment variable Hadoop uses for the simple-auth user name
pub const USER_ENV: &str = "HADOOP_USER_NAME";

/// Settings a [`Session`](crate::Session) starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// User for new connections until `set_connected_user` is called
    pub user: Option<String>,
    /// Local destination for downloads given an empty local path
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: None,
            download_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Defaults with the user taken from `HADOOP_USER_NAME` when set
    pub fn from_env() -> Self {
        Self {
            user: env::var(USER_ENV).ok().filter(|user| !user.is_empty()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_user<T: Into<String>>(mut self, user: T) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_download_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.download_dir = dir.into();
        self
    }
}
