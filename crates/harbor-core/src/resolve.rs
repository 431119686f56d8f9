//! Expansion of `--config` / `--secrets` specifiers into loadable sources.
//!
//! A specifier is `path` or `path:lookup_key`. Paths that do not exist are
//! skipped so optional overlays can be listed unconditionally. Directories
//! expand (non-recursively) to their `.yaml` / `.yml` files, which inherit the
//! directory's lookup key. Every source is yielded at most once per pass.

use crate::error::{HarborError, Result};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// A raw specifier split on its first `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: PathBuf,
    pub lookup_key: Option<String>,
}

impl PathSpec {
    pub fn parse(raw: &str) -> Self {
        let (path, lookup_key) = match raw.split_once(':') {
            Some((path, key)) => (path, Some(key)),
            None => (raw, None),
        };
        Self {
            path: PathBuf::from(path.trim()),
            lookup_key: lookup_key.filter(|k| !k.is_empty()).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    File,
    Directory,
}

/// A concrete file to load, plus the lookup key handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub path: PathBuf,
    pub lookup_key: Option<String>,
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lookup_key {
            Some(key) => write!(f, "{}:{}", self.path.display(), key),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// Classify a specifier. `Ok(None)` means the path does not exist.
pub fn classify(spec: &PathSpec) -> Result<Option<SpecKind>> {
    if spec.path.as_os_str().is_empty() || !spec.path.exists() {
        return Ok(None);
    }
    if spec.path.is_file() {
        Ok(Some(SpecKind::File))
    } else if spec.path.is_dir() {
        Ok(Some(SpecKind::Directory))
    } else {
        Err(HarborError::UnsupportedPath(spec.path.clone()))
    }
}

/// Lazily resolve `raw` specifiers in order.
pub fn resolve<I, S>(raw: I) -> Resolver
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Resolver {
        specs: raw.into_iter().map(|s| PathSpec::parse(s.as_ref())).collect(),
        pending: VecDeque::new(),
        seen: HashSet::new(),
    }
}

/// Iterator returned by [`resolve`]. Stops after the first error.
pub struct Resolver {
    specs: VecDeque<PathSpec>,
    pending: VecDeque<SourceId>,
    seen: HashSet<String>,
}

impl Resolver {
    fn expand(&mut self, spec: PathSpec) -> Result<()> {
        match classify(&spec)? {
            None => {}
            Some(SpecKind::File) => self.pending.push_back(SourceId {
                path: spec.path,
                lookup_key: spec.lookup_key,
            }),
            Some(SpecKind::Directory) => {
                for path in yaml_files_in(&spec.path)? {
                    self.pending.push_back(SourceId {
                        path,
                        lookup_key: spec.lookup_key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Iterator for Resolver {
    type Item = Result<SourceId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(id) = self.pending.pop_front() {
                if self.seen.insert(id.to_string()) {
                    return Some(Ok(id));
                }
            }
            let spec = self.specs.pop_front()?;
            if let Err(e) = self.expand(spec) {
                self.specs.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Immediate YAML files of `dir`, dotfiles excluded, sorted by name.
pub fn yaml_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_yaml = path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                YAML_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false);
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
