use crate::domain::version::{
    validate_tag_format, Version, DEFAULT_PRERELEASE_TOKEN, DEFAULT_TAG_FORMAT,
    SEMVER_PATTERN, VERSION_PLACEHOLDER,
};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use tracing::debug;

/// Translates between release tags and versions for one tag format.
///
/// The tag format is inverted into a regex once, at construction:
/// every literal character is escaped and `{version}` becomes a named
/// capture group holding the SemVer grammar.
#[derive(Debug, Clone)]
pub struct VersionTranslator {
    tag_format: String,
    prerelease_token: String,
    add_partial_tags: bool,
    version_regex: Regex,
    partial_regex: Regex,
}

/// Build the anchored pattern recognizing `tag_format` with `version_pattern`
/// in place of the placeholder.
pub fn compile(tag_format: &str, version_pattern: &str) -> Result<Regex> {
    validate_tag_format(tag_format)?;

    let escaped = regex::escape(tag_format);
    let placeholder = regex::escape(VERSION_PLACEHOLDER);
    let pattern = escaped.replace(&placeholder, &format!("(?P<version>{})", version_pattern));

    Regex::new(&format!("^{}$", pattern))
        .map_err(|e| ReleaseError::tag_format(format!("'{}': {}", tag_format, e)))
}

impl VersionTranslator {
    pub fn new(
        tag_format: impl Into<String>,
        prerelease_token: impl Into<String>,
        add_partial_tags: bool,
    ) -> Result<Self> {
        let tag_format = tag_format.into();
        let prerelease_token = prerelease_token.into();

        let version_regex = compile(&tag_format, SEMVER_PATTERN)?;
        let partial_regex = compile(&tag_format, r"[0-9]+(?:\.[0-9]+)?")?;

        debug!(%tag_format, pattern = %version_regex, "compiled tag pattern");

        Ok(VersionTranslator {
            tag_format,
            prerelease_token,
            add_partial_tags,
            version_regex,
            partial_regex,
        })
    }

    pub fn tag_format(&self) -> &str {
        &self.tag_format
    }

    pub fn prerelease_token(&self) -> &str {
        &self.prerelease_token
    }

    pub fn add_partial_tags(&self) -> bool {
        self.add_partial_tags
    }

    /// Whether `tag` has the shape of a release tag, regardless of whether
    /// the embedded version satisfies the restricted prerelease grammar.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.version_regex.is_match(tag)
    }

    /// Whether `tag` is a moving major or major.minor pointer
    pub fn is_partial_tag(&self, tag: &str) -> bool {
        self.partial_regex.is_match(tag)
    }

    /// Recover the version from a release tag.
    ///
    /// Returns `None` when the tag does not follow the tag format, when it is
    /// a partial tag, or when the embedded version cannot be parsed.
    pub fn from_tag(&self, tag: &str) -> Option<Version> {
        if self.add_partial_tags && self.is_partial_tag(tag) {
            debug!(tag, "ignoring partial tag");
            return None;
        }

        let captures = self.version_regex.captures(tag)?;
        let version_str = captures.name("version")?.as_str();

        match self.from_string(version_str) {
            Ok(version) => Some(version),
            Err(e) => {
                debug!(tag, error = %e, "tag matches format but not the version grammar");
                None
            }
        }
    }

    /// Parse a bare version string with this translator's settings
    pub fn from_string(&self, version_str: &str) -> Result<Version> {
        Version::parse(version_str, &self.tag_format, &self.prerelease_token)
    }

    /// Render a version string as a tag without validating it
    pub fn str_to_tag(&self, version_str: &str) -> String {
        self.tag_format.replace(VERSION_PLACEHOLDER, version_str)
    }

    /// Moving major and minor tags to publish alongside `version`
    pub fn partial_tags(&self, version: &Version) -> Vec<String> {
        if !self.add_partial_tags || version.is_prerelease() {
            return Vec::new();
        }
        vec![version.as_major_tag(), version.as_minor_tag()]
    }
}

impl Default for VersionTranslator {
    fn default() -> Self {
        VersionTranslator::new(DEFAULT_TAG_FORMAT, DEFAULT_PRERELEASE_TOKEN, false)
            .expect("default tag format is valid")
    }
}
