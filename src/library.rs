//! Detect-or-inject for the script libraries backing the jQuery and Sizzle dialects.

use crate::core::ScriptDriver;
use crate::errors::{require_non_empty, DialectError, Result};
use crate::utils::JavaScriptRunner;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Library {
    JQuery,
    Sizzle,
}

impl Library {
    pub fn name(&self) -> &'static str {
        match self {
            Library::JQuery => "jQuery",
            Library::Sizzle => "Sizzle",
        }
    }

    pub fn check_script(&self) -> String {
        check_function_script(self.name())
    }

    pub fn uri_for_version(&self, version: &str) -> String {
        match self {
            Library::JQuery => format!("https://code.jquery.com/jquery-{}.min.js", version),
            Library::Sizzle => format!(
                "https://cdnjs.cloudflare.com/ajax/libs/sizzle/{}/sizzle.min.js",
                version
            ),
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability check for a global function, e.g. `typeof window.jQuery === 'function'`.
pub(crate) fn check_function_script(function: &str) -> String {
    format!("return typeof window.{} === 'function';", function)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibrarySource {
    Version(String),
    Uri(String),
}

impl LibrarySource {
    pub fn version(version: impl Into<String>) -> Self {
        LibrarySource::Version(version.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        LibrarySource::Uri(uri.into())
    }

    /// Absolute script URI for `library`.
    pub fn resolve(&self, library: Library) -> Result<String> {
        let uri = match self {
            LibrarySource::Version(version) => {
                require_non_empty(version, "library version")?;
                library.uri_for_version(version.trim())
            }
            LibrarySource::Uri(uri) => {
                require_non_empty(uri, "library uri")?;
                uri.trim().to_string()
            }
        };
        url::Url::parse(&uri).map_err(|e| {
            DialectError::invalid_argument(format!("invalid {} uri '{}': {}", library, uri, e))
        })?;
        Ok(uri)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Injected,
}

/// What a dialect needs on the page before its scripts can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub check_script: String,
    /// Library to inject when the check fails; `None` when nothing can be injected.
    pub library: Option<Library>,
}

/// Ensures the requirement holds, injecting `uri` at most once.
///
/// A library that is already present, in whatever version, is left alone.
pub async fn bootstrap<D: ScriptDriver + ?Sized>(
    driver: &D,
    requirement: &Requirement,
    uri: Option<&str>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<BootstrapOutcome> {
    if JavaScriptRunner::check(driver, &requirement.check_script).await? {
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let uri = match uri {
        Some(uri) => uri,
        None => {
            warn!(library = %requirement.name, "capability missing and nothing to inject");
            return Err(DialectError::LibraryUnavailable {
                library: requirement.name.clone(),
                timeout: Duration::ZERO,
            });
        }
    };

    info!(library = %requirement.name, uri = uri, "injecting library");
    JavaScriptRunner::inject_script_tag(driver, uri).await?;

    let loaded = JavaScriptRunner::wait_for_condition(
        driver,
        &requirement.check_script,
        timeout,
        poll_interval,
    )
    .await?;

    if !loaded {
        warn!(library = %requirement.name, timeout = ?timeout, "library did not load in time");
        return Err(DialectError::LibraryUnavailable {
            library: requirement.name.clone(),
            timeout,
        });
    }

    info!(library = %requirement.name, "library loaded");
    Ok(BootstrapOutcome::Injected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_resolves_to_cdn() {
        assert_eq!(
            LibrarySource::version("3.7.1").resolve(Library::JQuery).unwrap(),
            "https://code.jquery.com/jquery-3.7.1.min.js"
        );
        assert_eq!(
            LibrarySource::version("2.3.10").resolve(Library::Sizzle).unwrap(),
            "https://cdnjs.cloudflare.com/ajax/libs/sizzle/2.3.10/sizzle.min.js"
        );
    }

    #[test]
    fn test_uri_is_validated() {
        assert_eq!(
            LibrarySource::uri("http://localhost/jq.js").resolve(Library::JQuery).unwrap(),
            "http://localhost/jq.js"
        );
        assert!(matches!(
            LibrarySource::uri("not a uri").resolve(Library::JQuery),
            Err(DialectError::InvalidArgument(_))
        ));
        assert!(LibrarySource::uri("  ").resolve(Library::Sizzle).is_err());
        assert!(LibrarySource::version("").resolve(Library::Sizzle).is_err());
    }

    #[test]
    fn test_check_scripts() {
        assert_eq!(
            Library::JQuery.check_script(),
            "return typeof window.jQuery === 'function';"
        );
        assert_eq!(
            Library::Sizzle.check_script(),
            "return typeof window.Sizzle === 'function';"
        );
    }
}
