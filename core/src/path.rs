//! Lexical path joining for URL paths.
//!
//! Works on the percent-encoded form, so `%2F` is never treated as a
//! separator. Semantics follow slash-separated filesystem paths: empty and
//! `.` segments vanish, `..` removes the previous segment (and is dropped at
//! the root), and trailing slashes are removed.

/// Join `elems` with `/` and clean the result. Empty elements are ignored;
/// if every element is empty the result is empty.
pub fn join(elems: &[&str]) -> String {
    let parts: Vec<&str> = elems.iter().copied().filter(|e| !e.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Shortest path equivalent to `path` by purely lexical processing.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // Relative paths keep leading `..`; rooted ones cannot go above `/`.
                _ if !rooted => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
