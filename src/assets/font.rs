use std::path::{Path, PathBuf};

use crate::{
    foundation::core::expand_home,
    foundation::error::{MsemError, MsemResult},
};

const MAX_SEARCH_DEPTH: usize = 4;

/// Finds font files by name the way desktop font lookups do: the path as given, then a list of
/// font directories searched a few levels deep.
#[derive(Clone, Debug, Default)]
pub struct FontLocator {
    search_dirs: Vec<PathBuf>,
}

impl FontLocator {
    /// Locator searching `first` (usually the config file's directory), then the user and system
    /// font directories.
    pub fn new(first: Option<&Path>) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(dir) = first {
            search_dirs.push(dir.to_path_buf());
            search_dirs.push(dir.join("fonts"));
        }
        search_dirs.extend(default_font_dirs());
        Self { search_dirs }
    }

    /// Locator searching only `dirs`.
    pub fn with_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            search_dirs: dirs.into_iter().collect(),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Resolve `font` (a path or a bare file name such as `Impact.ttf`).
    pub fn locate(&self, font: &str) -> MsemResult<PathBuf> {
        if font.trim().is_empty() {
            return Err(MsemError::config("font path is empty"));
        }

        let direct = expand_home(font);
        if direct.is_file() {
            return Ok(direct);
        }

        // Only bare names and relative paths are searched for.
        if !direct.is_absolute() {
            for dir in &self.search_dirs {
                let joined = dir.join(&direct);
                if joined.is_file() {
                    return Ok(joined);
                }
            }

            if let Some(file_name) = direct.file_name().and_then(|n| n.to_str()) {
                for dir in &self.search_dirs {
                    if let Some(found) = find_file_named(dir, file_name, MAX_SEARCH_DEPTH) {
                        return Ok(found);
                    }
                }
            }
        }

        Err(MsemError::config(format!(
            "font '{font}' not found (searched {} directories)",
            self.search_dirs.len()
        )))
    }
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(user) = directories::UserDirs::new() {
        if let Some(fonts) = user.font_dir() {
            dirs.push(fonts.to_path_buf());
        }
        dirs.push(user.home_dir().join(".fonts"));
    }
    if let Some(base) = directories::BaseDirs::new() {
        dirs.push(base.data_local_dir().join("fonts"));
    }
    for sys in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ] {
        dirs.push(PathBuf::from(sys));
    }
    dirs
}

fn find_file_named(dir: &Path, file_name: &str, depth: usize) -> Option<PathBuf> {
    let rd = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();

    for entry in rd.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(file_name));
        if matches {
            return Some(path);
        }
    }

    if depth == 0 {
        return None;
    }
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_file_named(sub, file_name, depth - 1))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
