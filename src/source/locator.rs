use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;

use crate::config::Config;
use crate::reflect::{ClassIdentity, Runtime};

/// Where a source file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    /// Resource lookup on the classpath.
    Classpath,
    /// Recursive scan of the scan root.
    FileSystem,
}

/// A readable source file for a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub origin: SourceOrigin,
}

/// Conventional source path for a binary class name.
///
/// `com.acme.Outer$Inner` maps to `com/acme/Outer.java`. Returns `None` for
/// anonymous and local classes, which have no source file of their own.
#[must_use]
pub fn source_relative_path(class_name: &str) -> Option<String> {
    let mut segments = class_name.split('$');
    let top_level = segments.next().filter(|s| !s.is_empty())?;
    if segments.any(|s| s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit())) {
        return None;
    }
    Some(format!("{}.java", top_level.replace('.', "/")))
}

/// Finds the source file of a compiled class.
///
/// Lookup order: the runtime's resource lookup, then a recursive scan of the
/// scan root for a file whose path ends with the conventional relative path.
/// Absence is a normal outcome, never an error.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    scan_root: PathBuf,
    exclude_dirs: Vec<String>,
    respect_gitignore: bool,
    /// Maximum file size in bytes (0 = unlimited).
    max_file_size_bytes: u64,
}

impl SourceLocator {
    pub fn new(scan_root: impl Into<PathBuf>) -> Self {
        Self {
            scan_root: scan_root.into(),
            exclude_dirs: vec![".git".into()],
            respect_gitignore: false,
            max_file_size_bytes: 0,
        }
    }

    /// Locator using the project root and scan settings from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let scan = &config.settings.scan;
        Self {
            scan_root: config.project_root.clone(),
            exclude_dirs: scan.exclude_dirs.clone(),
            respect_gitignore: scan.respect_gitignore,
            max_file_size_bytes: u64::from(scan.max_file_size_mb) * 1024 * 1024,
        }
    }

    /// Locate the source for `class`: the first of [`Self::candidates`].
    pub fn locate<R: Runtime + ?Sized>(
        &self,
        runtime: &R,
        class: &ClassIdentity,
    ) -> Option<SourceLocation> {
        self.candidates(runtime, class).next()
    }

    /// Every file that may hold the source of `class`, best first: the
    /// classpath resource, then each scan match in walk order.
    ///
    /// The scan is lazy; later matches are only walked to when asked for.
    pub fn candidates<'a, R: Runtime + ?Sized>(
        &'a self,
        runtime: &R,
        class: &ClassIdentity,
    ) -> Box<dyn Iterator<Item = SourceLocation> + 'a> {
        if class.is_root() {
            return Box::new(std::iter::empty());
        }
        let Some(relative) = source_relative_path(&class.name) else {
            tracing::debug!(class = %class.name, "no conventional source path");
            return Box::new(std::iter::empty());
        };

        let resource = runtime
            .find_resource(class, &relative)
            .map(|path| SourceLocation {
                path,
                origin: SourceOrigin::Classpath,
            });
        let scanned = self
            .scan_matches(PathBuf::from(relative))
            .map(|path| SourceLocation {
                path,
                origin: SourceOrigin::FileSystem,
            });
        Box::new(resource.into_iter().chain(scanned))
    }

    /// First file under the scan root whose path ends with `relative`.
    #[must_use]
    pub fn scan_for(&self, relative: &Path) -> Option<PathBuf> {
        self.scan_matches(relative.to_path_buf()).next()
    }

    /// Files under the scan root whose path ends with `relative`, matched by
    /// whole components.
    ///
    /// Entries are visited in file-name order so the result is stable.
    pub fn scan_matches(&self, relative: PathBuf) -> impl Iterator<Item = PathBuf> + '_ {
        let walker = if self.scan_root.is_dir() {
            Some(self.walker())
        } else {
            tracing::debug!(root = %self.scan_root.display(), "scan root is not a directory");
            None
        };

        walker.into_iter().flatten().filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {e}");
                    return None;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return None;
            }
            let path = entry.path();
            if !path.ends_with(&relative) {
                return None;
            }
            if self.max_file_size_bytes > 0 {
                let too_large = path
                    .metadata()
                    .is_ok_and(|m| m.len() > self.max_file_size_bytes);
                if too_large {
                    tracing::debug!(path = %path.display(), "skipping oversized source");
                    return None;
                }
            }
            Some(entry.into_path())
        })
    }

    fn walker(&self) -> ignore::Walk {
        let excluded = self.exclude_dirs.clone();
        WalkBuilder::new(&self.scan_root)
            .standard_filters(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false) // Prevent symlink loops
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |e| {
                let is_dir = e.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && excluded.iter().any(|d| e.file_name() == d.as_str()))
            })
            .build()
    }
}
