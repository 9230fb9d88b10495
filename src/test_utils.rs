use std::fs;
use std::path::{Path, PathBuf};


/// Writes `contents` to `dir/name` and returns the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Reads a file's non-empty lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap()
        .lines()
        .filter(|ll| ! ll.trim().is_empty())
        .map(String::from)
        .collect()
}
