//! Filesystem path completion.
//!
//! Lists the entries of the directory named by the token's directory part that
//! start with the remaining prefix (the equivalent of globbing `dir/prefix*`),
//! then renders each match in the style the user typed: `~/`, `./`, relative
//! or absolute. Directories get a trailing `/`, spaces are backslash-escaped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File extensions that make a bare token look like a path.
pub const COMMON_EXTENSIONS: &[&str] = &[
    "txt", "md", "rst", "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "csv", "tsv", "log",
    "xml", "html", "css", "js", "ts", "py", "rs", "go", "c", "h", "cpp", "java", "sh", "sql",
    "pdf", "png", "jpg", "jpeg", "gif", "svg", "zip", "tar", "gz",
];

/// Whether `token` looks like a filesystem path.
///
/// Absolute, home-relative (`~` / `~/`), dot-relative (`./`, `../`), anything
/// containing `/`, or a name ending in a common file extension.
pub fn looks_like_path(token: &str) -> bool {
    if token.starts_with('/')
        || token == "~"
        || token.starts_with("~/")
        || token.starts_with("./")
        || token.starts_with("../")
        || token.contains('/')
    {
        return true;
    }
    match token.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            COMMON_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

/// Complete `token` as a path, resolving relative paths against `cwd`.
///
/// Returns full replacement tokens, sorted and duplicate-free. Unreadable
/// directories yield no candidates.
pub fn complete_path(token: &str, cwd: &Path) -> Vec<String> {
    if token == "~" {
        return vec!["~/".to_string()];
    }

    let (typed_dir, raw_prefix) = match token.rfind('/') {
        Some(idx) => (&token[..=idx], &token[idx + 1..]),
        None => ("", token),
    };
    let prefix = unescape(raw_prefix);

    let search_dir = resolve_dir(&unescape(typed_dir), cwd);
    let Some(search_dir) = search_dir else {
        return Vec::new();
    };

    let entries = match std::fs::read_dir(&search_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("path completion: cannot read {}: {}", search_dir.display(), e);
            return Vec::new();
        }
    };

    let mut matches = BTreeSet::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "." || name == ".." || !name.starts_with(prefix.as_str()) {
            continue;
        }
        // Hidden entries only when asked for explicitly
        if name.starts_with('.') && !prefix.starts_with('.') {
            continue;
        }

        let mut rendered = format!("{}{}", typed_dir, escape(&name));
        if entry.path().is_dir() {
            rendered.push('/');
        }
        matches.insert(rendered);
    }

    matches.into_iter().collect()
}

/// Resolve the (unescaped) directory part of a token to a real directory.
fn resolve_dir(dir: &str, cwd: &Path) -> Option<PathBuf> {
    if dir.is_empty() {
        return Some(cwd.to_path_buf());
    }
    if let Some(rest) = dir.strip_prefix('~') {
        let home = dirs::home_dir()?;
        return Some(home.join(rest.trim_start_matches('/')));
    }
    let path = Path::new(dir);
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        Some(cwd.join(path))
    }
}

fn escape(name: &str) -> String {
    name.replace(' ', "\\ ")
}

fn unescape(text: &str) -> String {
    text.replace("\\ ", " ")
}
