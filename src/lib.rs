//! Path-scoped HDFS keywords for test suites.
//!
//! A [`Session`] keeps a current working root on a remote HDFS namespace and
//! exposes connect, change directory, list, upload, download, delete, mkdirs
//! and set permission as plain async methods. The actual transport is a
//! [`client::Connector`] supplied by the caller; [`client::MemoryFs`] is an
//! in-process implementation.
//!
//! ```
//! use hdfs_keywords::{client::MemoryFs, Config, Session};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), hdfs_keywords::Error> {
//! let fs = MemoryFs::new();
//! fs.create_file("/jenkins/work/a.sql", "select 1;").await?;
//!
//! let mut session = Session::with_config(fs, Config::default());
//! session.connect("http://node64:50070/jenkins").await?;
//! session.change_directory("work").await?;
//!
//! let entries = session.list("", false).await?;
//! assert_eq!(entries[0].path(), "/jenkins/work/a.sql");
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

/// Client capability and the in-memory backend
pub mod client;
mod config;
mod error;
/// WebHDFS status types
pub mod protocol;
mod session;
mod utils;

pub use config::{Config, USER_ENV};
pub use error::{Error, HdfsResult};
pub use session::{RemoteEntry, Session};
