//! Navigation surface: which route prefixes are public and which are guarded.

use tracing::debug;

use crate::authorize::RoutePolicy;
use crate::roles::Role;

/// Login entry point; every denial redirects here.
pub const LOGIN_ROUTE: &str = "/auth/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Guarded(RoutePolicy),
}

/// Prefix table mapping route areas to their access rule.
///
/// Prefixes match on whole path segments: `/admin` covers `/admin` and
/// `/admin/courses`, not `/administrator`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, RouteAccess)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The portal's route areas:
    ///
    /// | prefix     | access                         |
    /// |------------|--------------------------------|
    /// | `/auth`    | public                         |
    /// | `/admin`   | ADMIN                          |
    /// | `/trainer` | TRAINER (ADMIN implicitly)     |
    /// | `/student` | STUDENT (ADMIN implicitly)     |
    pub fn portal() -> Self {
        Self::new()
            .with("/auth", RouteAccess::Public)
            .with("/admin", RouteAccess::Guarded(RoutePolicy::new([Role::Admin])))
            .with("/trainer", RouteAccess::Guarded(RoutePolicy::new([Role::Trainer])))
            .with("/student", RouteAccess::Guarded(RoutePolicy::new([Role::Student])))
    }

    pub fn with(mut self, prefix: impl Into<String>, access: RouteAccess) -> Self {
        self.register(prefix, access);
        self
    }

    /// Register (or replace) the rule for a prefix.
    pub fn register(&mut self, prefix: impl Into<String>, access: RouteAccess) {
        let prefix = normalize_path(&prefix.into());
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            entry.1 = access;
        } else {
            self.entries.push((prefix, access));
        }
    }

    /// Rule for `path`, by longest matching prefix. `None` for unknown areas.
    pub fn resolve(&self, path: &str) -> Option<&RouteAccess> {
        let path = normalize_path(path);
        let found = self
            .entries
            .iter()
            .filter(|(prefix, _)| covers(prefix, &path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, access)| access);

        if found.is_none() {
            debug!(path = %path, "no route area matches");
        }
        found
    }
}

/// Canonical form of a navigation path.
///
/// Query and fragment are dropped, empty and `.` segments vanish, and `..`
/// removes the segment before it (never climbing above `/`). Percent-encoded
/// dots count as dots.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment.replace("%2e", ".").replace("%2E", ".").as_str() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

fn covers(prefix: &str, path: &str) -> bool {
    prefix == "/"
        || path == prefix
        || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}
