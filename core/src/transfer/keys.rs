use std::path::{Component, Path, PathBuf};

/// Remote key for a file: the prefix joined with its relative path, always
/// using forward slashes.
pub fn object_key(prefix: &str, relative: &Path) -> String {
    let rel = relative.to_string_lossy().replace('\\', "/");
    format!("{prefix}{rel}")
}

/// Local destination of a remote key, or `None` for keys that carry no file
/// (directory markers, the bare prefix, or paths escaping `dest`).
pub fn local_path_for(dest: &Path, prefix: &str, key: &str) -> Option<PathBuf> {
    let relative = key.strip_prefix(prefix).unwrap_or(key).trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        return None;
    }
    let rel_path = Path::new(relative);
    if rel_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(dest.join(rel_path))
}

/// Media type from the file extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}
