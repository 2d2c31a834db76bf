//! Synthetic action path construction.
//!
//! Joining follows POSIX path rules on plain strings: empty parts are
//! skipped, repeated separators collapse, `.` is dropped and `..` pops a
//! segment without climbing above `/`. No platform path handling.

/// `/<namespace>/<url path>/<action>`, normalized.
pub fn action_path(namespace: &str, url_path: &str, action: &str) -> String {
    join_posix(&["/", namespace, url_path, action])
}

/// Join parts with `/` and normalize the result.
pub fn join_posix(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    normalize_posix(&joined)
}

/// Normalize a `/`-separated path. A trailing separator is kept.
pub fn normalize_posix(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|last| *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            segment => stack.push(segment),
        }
    }

    let mut out = stack.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        return ".".to_string();
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}
