use crate::domain::LevelBump;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Tag format used when none is configured
pub const DEFAULT_TAG_FORMAT: &str = "v{version}";

/// Prerelease token used when none is configured
pub const DEFAULT_PRERELEASE_TOKEN: &str = "rc";

/// Placeholder every tag format must contain exactly once
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Unanchored SemVer grammar, shared with the tag translator
pub(crate) const SEMVER_PATTERN: &str = r"[0-9]+\.[0-9]+\.[0-9]+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?";

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)(?:-(?P<prerelease>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    )
    .expect("Invalid regex")
});

static PRERELEASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)\.(?P<revision>0|[1-9][0-9]*)$")
        .expect("Invalid regex")
});

/// Immutable semantic version that remembers the tag format it is rendered with.
///
/// Equality and ordering ignore build metadata and the tag format. A final
/// version outranks any prerelease of the same `major.minor.patch`.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    prerelease_token: String,
    prerelease_revision: Option<u64>,
    build_metadata: String,
    tag_format: String,
}

/// Checks that a tag format carries exactly one `{version}` placeholder
pub fn validate_tag_format(tag_format: &str) -> Result<()> {
    match tag_format.matches(VERSION_PLACEHOLDER).count() {
        1 => Ok(()),
        0 => Err(ReleaseError::tag_format(format!(
            "'{}' must contain the placeholder {}",
            tag_format, VERSION_PLACEHOLDER
        ))),
        n => Err(ReleaseError::tag_format(format!(
            "'{}' contains {} placeholders; exactly one {} is supported",
            tag_format, n, VERSION_PLACEHOLDER
        ))),
    }
}

fn parse_component(value: &str, input: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| {
        ReleaseError::invalid_version(format!(
            "component '{}' of '{}' is out of range",
            value, input
        ))
    })
}

impl Version {
    /// Create a final version with the default tag format and prerelease token
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease_token: DEFAULT_PRERELEASE_TOKEN.to_string(),
            prerelease_revision: None,
            build_metadata: String::new(),
            tag_format: DEFAULT_TAG_FORMAT.to_string(),
        }
    }

    /// Parse `MAJOR.MINOR.PATCH[-TOKEN.REVISION][+BUILD]`.
    ///
    /// A prerelease token embedded in `input` always wins over
    /// `default_prerelease_token`, which is only kept for later calls to
    /// [`Version::to_prerelease`].
    pub fn parse(input: &str, tag_format: &str, default_prerelease_token: &str) -> Result<Self> {
        validate_tag_format(tag_format)?;

        let captures = VERSION_REGEX.captures(input).ok_or_else(|| {
            ReleaseError::invalid_version(format!(
                "'{}' is not a valid version (expected MAJOR.MINOR.PATCH[-TOKEN.REVISION][+BUILD])",
                input
            ))
        })?;

        let major = parse_component(&captures["major"], input)?;
        let minor = parse_component(&captures["minor"], input)?;
        let patch = parse_component(&captures["patch"], input)?;

        let (prerelease_token, prerelease_revision) = match captures.name("prerelease") {
            Some(prerelease) => {
                let parts = PRERELEASE_REGEX
                    .captures(prerelease.as_str())
                    .ok_or_else(|| {
                        ReleaseError::invalid_version(format!(
                            "prerelease '{}' of '{}' must have the shape <token>.<revision>, e.g. rc.1",
                            prerelease.as_str(),
                            input
                        ))
                    })?;
                (
                    parts["token"].to_string(),
                    Some(parse_component(&parts["revision"], input)?),
                )
            }
            None => (default_prerelease_token.to_string(), None),
        };

        Ok(Version {
            major,
            minor,
            patch,
            prerelease_token,
            prerelease_revision,
            build_metadata: captures
                .name("build")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            tag_format: tag_format.to_string(),
        })
    }

    /// Same version rendered with another tag format
    pub fn with_tag_format(&self, tag_format: &str) -> Result<Self> {
        validate_tag_format(tag_format)?;
        Ok(Version {
            tag_format: tag_format.to_string(),
            ..self.clone()
        })
    }

    /// Same version carrying the given build metadata
    pub fn with_build_metadata(&self, build_metadata: impl Into<String>) -> Self {
        Version {
            build_metadata: build_metadata.into(),
            ..self.clone()
        }
    }

    pub fn prerelease_token(&self) -> &str {
        &self.prerelease_token
    }

    pub fn prerelease_revision(&self) -> Option<u64> {
        self.prerelease_revision
    }

    pub fn build_metadata(&self) -> &str {
        &self.build_metadata
    }

    pub fn tag_format(&self) -> &str {
        &self.tag_format
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease_revision.is_some()
    }

    /// Compare against a version string parsed with this version's settings
    pub fn compare_str(&self, other: &str) -> Result<Ordering> {
        let other = Version::parse(other, &self.tag_format, &self.prerelease_token)?;
        Ok(self.cmp(&other))
    }

    fn rebuild(&self, major: u64, minor: u64, patch: u64, revision: Option<u64>) -> Version {
        let prerelease_token = if revision.is_some() && self.prerelease_token.is_empty() {
            DEFAULT_PRERELEASE_TOKEN.to_string()
        } else {
            self.prerelease_token.clone()
        };

        Version {
            major,
            minor,
            patch,
            prerelease_token,
            prerelease_revision: revision,
            build_metadata: String::new(),
            tag_format: self.tag_format.clone(),
        }
    }

    /// Apply a bump level, always dropping build metadata.
    ///
    /// Bumping a prerelease by `Patch`, `Minor` or `Major` yields a prerelease
    /// of the new target with revision 1; it does not finalize. A component
    /// already at `u64::MAX` stays there; use [`Version::checked_bump`] to
    /// detect that.
    pub fn bump(&self, level: LevelBump) -> Version {
        let seed = self.prerelease_revision.map(|_| 1);

        match level {
            LevelBump::Major => self.rebuild(self.major.saturating_add(1), 0, 0, seed),
            LevelBump::Minor => self.rebuild(self.major, self.minor.saturating_add(1), 0, seed),
            LevelBump::Patch => {
                self.rebuild(self.major, self.minor, self.patch.saturating_add(1), seed)
            }
            LevelBump::PrereleaseRevision => self.rebuild(
                self.major,
                self.minor,
                self.patch,
                Some(self.prerelease_revision.map_or(1, |r| r.saturating_add(1))),
            ),
            LevelBump::NoRelease => {
                self.rebuild(self.major, self.minor, self.patch, self.prerelease_revision)
            }
        }
    }

    /// Like [`Version::bump`], but fails when the bumped component would overflow
    pub fn checked_bump(&self, level: LevelBump) -> Result<Version> {
        let overflows = match level {
            LevelBump::Major => self.major == u64::MAX,
            LevelBump::Minor => self.minor == u64::MAX,
            LevelBump::Patch => self.patch == u64::MAX,
            LevelBump::PrereleaseRevision => self.prerelease_revision == Some(u64::MAX),
            LevelBump::NoRelease => false,
        };

        if overflows {
            return Err(ReleaseError::invalid_version(format!(
                "cannot apply a {} bump to {}: component out of range",
                level, self
            )));
        }
        Ok(self.bump(level))
    }

    /// Turn into a prerelease of the same `major.minor.patch`.
    ///
    /// `token` defaults to the current token, `revision` to the current
    /// revision or 1.
    pub fn to_prerelease(&self, token: Option<&str>, revision: Option<u64>) -> Version {
        let token = match token {
            Some(t) if !t.is_empty() => t.to_string(),
            _ if self.prerelease_token.is_empty() => DEFAULT_PRERELEASE_TOKEN.to_string(),
            _ => self.prerelease_token.clone(),
        };

        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            prerelease_token: token,
            prerelease_revision: Some(revision.or(self.prerelease_revision).unwrap_or(1)),
            build_metadata: String::new(),
            tag_format: self.tag_format.clone(),
        }
    }

    /// Strip the prerelease part
    pub fn finalize_version(&self) -> Version {
        self.rebuild(self.major, self.minor, self.patch, None)
    }

    /// Smallest bump level separating `self` from `other`
    pub fn difference(&self, other: &Version) -> LevelBump {
        if self.major != other.major {
            LevelBump::Major
        } else if self.minor != other.minor {
            LevelBump::Minor
        } else if self.patch != other.patch {
            LevelBump::Patch
        } else if self.is_prerelease() != other.is_prerelease() {
            let finalized = self
                .finalize_version()
                .difference(&other.finalize_version());
            finalized.max(LevelBump::PrereleaseRevision)
        } else if self.prerelease_revision != other.prerelease_revision {
            LevelBump::PrereleaseRevision
        } else {
            LevelBump::NoRelease
        }
    }

    pub fn as_tag(&self) -> String {
        self.tag_format
            .replace(VERSION_PLACEHOLDER, &self.to_string())
    }

    pub fn as_major_tag(&self) -> String {
        self.tag_format
            .replace(VERSION_PLACEHOLDER, &self.major.to_string())
    }

    pub fn as_minor_tag(&self) -> String {
        self.tag_format.replace(
            VERSION_PLACEHOLDER,
            &format!("{}.{}", self.major, self.minor),
        )
    }

    pub fn as_patch_tag(&self) -> String {
        self.tag_format.replace(
            VERSION_PLACEHOLDER,
            &format!("{}.{}.{}", self.major, self.minor, self.patch),
        )
    }

    fn token_segments(&self) -> Vec<&str> {
        self.prerelease_token.split('.').collect()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(revision) = self.prerelease_revision {
            write!(f, "-{}.{}", self.prerelease_token, revision)?;
        }
        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s, DEFAULT_TAG_FORMAT, DEFAULT_PRERELEASE_TOKEN)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.prerelease_revision, other.prerelease_revision) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => self
                    .token_segments()
                    .cmp(&other.token_segments())
                    .then(a.cmp(&b)),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        matches!(self.compare_str(other), Ok(Ordering::Equal))
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialOrd<str> for Version {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        self.compare_str(other).ok()
    }
}

impl PartialOrd<&str> for Version {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.compare_str(other).ok()
    }
}
