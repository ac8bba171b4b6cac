use chrono::{DateTime, Utc};

/// Converts the epoch milliseconds used by WebHDFS into a timestamp
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns `true` when the path names a directory by its trailing separator
pub fn has_trailing_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\')
}

/// Normalizes a remote path into an absolute POSIX path.
///
/// Backslashes become slashes, empty and `.` components are dropped and
/// `..` removes the previous component without climbing above `/`.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => (),
            ".." => {
                let _ = parts.pop();
            }
            part => parts.push(part),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Joins `path` onto `base`. An absolute `path` replaces `base` entirely.
pub fn join(base: &str, path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        normalize(&path)
    } else {
        normalize(&format!("{base}/{path}"))
    }
}

/// Last component of a remote path, empty for `/`
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
}

/// Anchors a glob pattern under `root` unless it is already absolute.
///
/// Components are resolved like [`join`] does: empty and `.` components are
/// dropped and `..` removes the previous one. Root components are escaped so
/// that their characters only match literally.
pub fn anchor_pattern(root: &str, pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    let mut parts: Vec<String> = if pattern.starts_with('/') {
        Vec::new()
    } else {
        root.split('/')
            .filter(|part| !part.is_empty())
            .map(glob::Pattern::escape)
            .collect()
    };

    for part in pattern.split('/') {
        match part {
            "" | "." => (),
            ".." => {
                let _ = parts.pop();
            }
            part => parts.push(part.to_owned()),
        }
    }

    format!("/{}", parts.join("/"))
}
