mod file_status;

pub use self::file_status::{FilePermission, FileStatus, FileType};
