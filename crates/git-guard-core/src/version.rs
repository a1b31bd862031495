//! Manifest version extraction and comparison.
//!
//! The project version is read from a Maven `pom.xml`: the `<version>` that
//! is a direct child of `<project>`, or the `<parent>` version when the
//! project inherits it. Maven version strings are loose (`1.0-SNAPSHOT`,
//! `1.2.3.RELEASE`), so only the leading numeric components are kept and
//! anything after them is ignored.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::GuardError;

static XML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Element tags only; `<?xml ...?>`, `<!DOCTYPE>` and CDATA never match.
static XML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w.:-]*)[^>]*?(/?)>").expect("valid regex")
});

/// `major.minor[.patch]` at the start of a version, qualifier ignored.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?(\d+)\.(\d+)(?:\.(\d+))?(?:\D.*)?$").expect("valid regex")
});

/// A `major.minor.patch` version, ordered component by component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTriple {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTriple {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a Maven-style version, keeping only its numeric prefix.
    ///
    /// A missing patch component counts as `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use git_guard_core::version::VersionTriple;
    /// assert_eq!(VersionTriple::parse("1.2.3").unwrap(), VersionTriple::new(1, 2, 3));
    /// assert_eq!(VersionTriple::parse("1.0-SNAPSHOT").unwrap(), VersionTriple::new(1, 0, 0));
    /// assert_eq!(VersionTriple::parse("2.7.1.RELEASE").unwrap(), VersionTriple::new(2, 7, 1));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Manifest`] if `version` does not start with at
    /// least `major.minor`.
    pub fn parse(version: &str) -> Result<Self, GuardError> {
        let version = version.trim();
        let invalid = || GuardError::Manifest(format!("'{version}' is not a numeric version"));
        let caps = NUMERIC_PREFIX.captures(version).ok_or_else(invalid)?;
        let component = |i: usize| -> Result<u64, GuardError> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }

    /// Whether `self` is strictly newer than `baseline`.
    pub fn is_bump_over(&self, baseline: &VersionTriple) -> bool {
        self > baseline
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Finds the text of `<project><version>` and `<project><parent><version>`.
fn project_versions(xml: &str) -> (Option<&str>, Option<&str>) {
    let mut stack: Vec<&str> = Vec::new();
    let mut text_start = 0;
    let mut own = None;
    let mut inherited = None;

    for caps in XML_TAG.captures_iter(xml) {
        let (Some(tag), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            if name.as_str() == "version" {
                let value = xml[text_start..tag.start()].trim();
                match stack.as_slice() {
                    ["project", "version"] if own.is_none() => own = Some(value),
                    ["project", "parent", "version"] if inherited.is_none() => {
                        inherited = Some(value)
                    }
                    _ => {}
                }
            }
            stack.pop();
        } else if !self_closing {
            stack.push(name.as_str());
            text_start = tag.end();
        }
    }

    (own, inherited)
}

/// Extracts the project version from `pom.xml` content.
///
/// The project's own `<version>` wins; a project without one inherits the
/// `<parent>` version. Versions of dependencies, plugins and profiles are
/// never considered.
///
/// # Errors
///
/// Returns [`GuardError::Manifest`] when neither version is present or the
/// value is not numeric (for example an unresolved `${revision}`).
pub fn parse_manifest_version(content: &str) -> Result<VersionTriple, GuardError> {
    let xml = XML_COMMENT.replace_all(content, "");
    let (own, inherited) = project_versions(&xml);
    let raw = own
        .or(inherited)
        .ok_or_else(|| GuardError::Manifest("no project <version> element found".into()))?;
    VersionTriple::parse(raw)
}
