//! Remote path helpers: root detection, parent computation and breadcrumbs.
//!
//! Remote paths are slash-separated strings; `""` and `"/"` both denote the
//! root. These helpers only ever drop or regroup segments that are already
//! present in a path, never invent new ones.

/// Canonical spelling of the root path.
pub const ROOT: &str = "/";

/// Check whether `path` denotes the root.
pub fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}

/// Non-empty segments of `path`, left to right.
pub fn segments(path: &str) -> impl Iterator<Item = &str> + Clone {
    path.split('/').filter(|s| !s.is_empty())
}

/// Parent of `path`, obtained by stripping its last non-empty segment.
///
/// Returns `None` for the root, which has no parent.
///
/// # Example
/// ```
/// use remotefm::fs::path::parent_path;
///
/// assert_eq!(parent_path("/a/b/"), Some("/a".to_string()));
/// assert_eq!(parent_path("/a"), Some("/".to_string()));
/// assert_eq!(parent_path("/"), None);
/// ```
pub fn parent_path(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = segments(path).collect();
    parts.pop()?;
    if parts.is_empty() {
        Some(ROOT.to_string())
    } else {
        Some(format!("/{}", parts.join("/")))
    }
}

/// One navigable component of the active path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Segment name as displayed
    pub name: String,
    /// Cumulative path up to and including this segment
    pub path: String,
}

/// Lazy iterator over the breadcrumbs of a path.
///
/// The iterator borrows the path and derives every crumb on demand; calling
/// [`breadcrumbs`] again on the same path yields the same sequence.
#[derive(Debug, Clone)]
pub struct Breadcrumbs<'a> {
    rest: &'a str,
    prefix: String,
}

impl Iterator for Breadcrumbs<'_> {
    type Item = Breadcrumb;

    fn next(&mut self) -> Option<Breadcrumb> {
        let trimmed = self.rest.trim_start_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed.find('/').unwrap_or(trimmed.len());
        let (name, rest) = trimmed.split_at(end);
        self.rest = rest;

        self.prefix.push('/');
        self.prefix.push_str(name);
        Some(Breadcrumb {
            name: name.to_string(),
            path: self.prefix.clone(),
        })
    }
}

/// Breadcrumbs for `path`, left to right. The root yields none.
///
/// # Example
/// ```
/// use remotefm::fs::path::breadcrumbs;
///
/// let crumbs: Vec<_> = breadcrumbs("/a/b").map(|c| c.path).collect();
/// assert_eq!(crumbs, vec!["/a", "/a/b"]);
/// ```
pub fn breadcrumbs(path: &str) -> Breadcrumbs<'_> {
    Breadcrumbs {
        rest: path,
        prefix: String::new(),
    }
}

/// Path of `name` inside `dir`, used to identify a not-yet-existing target.
pub(crate) fn child_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    format!("{}/{}", dir, name.trim_start_matches('/'))
}
