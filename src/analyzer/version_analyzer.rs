use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

use crate::analyzer::History;
use crate::boundary::BoundaryWarning;
use crate::domain::{
    BranchConfig, Commit, LevelBump, ParseError, ParseResult, ParsedCommit, Version,
    VersionTranslator,
};
use crate::error::{ReleaseError, Result};
use crate::parser::CommitParser;

static VERSION_LIKE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("Invalid regex"));

/// Release policy switches that apply whatever the branch
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePolicy {
    /// Allow a breaking change to bump the major version while it is 0
    pub major_on_zero: bool,
    /// Start the first release at 0.1.0 instead of 1.0.0
    pub allow_zero_version: bool,
    /// Release a patch even when no commit landed since the last tag
    pub patch_without_tag: bool,
    /// Abort on the first commit the grammar cannot classify
    pub strict: bool,
    /// Use this level instead of the one derived from commits
    pub forced_level: Option<LevelBump>,
    /// Produce a prerelease even on a release branch
    pub as_prerelease: bool,
    /// Build metadata appended to the computed version
    pub build_metadata: Option<String>,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        ReleasePolicy {
            major_on_zero: false,
            allow_zero_version: true,
            patch_without_tag: false,
            strict: false,
            forced_level: None,
            as_prerelease: false,
            build_metadata: None,
        }
    }
}

/// Final answer of a run
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// A release is due
    Release { version: Version, level: LevelBump },
    /// Nothing since the baseline warrants a release
    NoReleaseDue,
}

/// Everything a run found out, for the caller's collaborators
#[derive(Debug, Clone)]
pub struct NextVersion {
    pub decision: Decision,
    pub baseline: Option<Version>,
    pub baseline_tag: Option<String>,
    /// Classified unreleased commits, newest first
    pub commits: Vec<ParsedCommit>,
    /// Commits the grammar could not classify
    pub skipped: Vec<ParseError>,
    pub warnings: Vec<BoundaryWarning>,
}

impl NextVersion {
    pub fn version(&self) -> Option<&Version> {
        match &self.decision {
            Decision::Release { version, .. } => Some(version),
            Decision::NoReleaseDue => None,
        }
    }

    pub fn level(&self) -> LevelBump {
        match &self.decision {
            Decision::Release { level, .. } => *level,
            Decision::NoReleaseDue => LevelBump::NoRelease,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self.decision, Decision::Release { .. })
    }
}

/// Most recent release found in history
#[derive(Debug, Clone)]
struct Baseline {
    version: Version,
    tag: String,
    /// Newest final release among the baseline and its ancestors
    latest_final: Option<Version>,
}

/// Release tag on a commit that no other release tag sits above
struct Release<'h> {
    index: usize,
    version: Version,
    tag: &'h str,
}

/// What a walk over the history found
struct Scan<'h> {
    baseline: Option<Baseline>,
    /// Commits no release tag can reach, newest first
    unreleased: Vec<&'h Commit>,
}

/// Aggregate of the grammar over the unreleased commits
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub level: LevelBump,
    pub commits: Vec<ParsedCommit>,
    pub skipped: Vec<ParseError>,
}

/// Analyzes history to determine the next release version
pub struct VersionAnalyzer {
    translator: VersionTranslator,
    parser: Box<dyn CommitParser>,
    policy: ReleasePolicy,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(
        translator: VersionTranslator,
        parser: Box<dyn CommitParser>,
        policy: ReleasePolicy,
    ) -> Self {
        VersionAnalyzer {
            translator,
            parser,
            policy,
        }
    }

    pub fn translator(&self) -> &VersionTranslator {
        &self.translator
    }

    pub fn policy(&self) -> &ReleasePolicy {
        &self.policy
    }

    /// Compute the next version for `history` under the `branch` policy
    #[instrument(skip_all, fields(branch = %branch.name, commits = history.commits.len()))]
    pub fn next_version(&self, history: &History, branch: &BranchConfig) -> Result<NextVersion> {
        let mut warnings = Vec::new();
        let Scan {
            baseline,
            unreleased,
        } = self.scan(history, &mut warnings);
        debug!(count = unreleased.len(), "unreleased commits");

        let classification = self.classify(&unreleased, &mut warnings)?;

        let mut outcome = NextVersion {
            decision: Decision::NoReleaseDue,
            baseline: baseline.as_ref().map(|b| b.version.clone()),
            baseline_tag: baseline.as_ref().map(|b| b.tag.clone()),
            commits: classification.commits,
            skipped: classification.skipped,
            warnings,
        };

        let prerelease = branch.prerelease || self.policy.as_prerelease;

        let next = match &baseline {
            None => {
                if unreleased.is_empty() && self.policy.forced_level.is_none() {
                    None
                } else {
                    outcome.warnings.push(BoundaryWarning::NoPreviousRelease {
                        tag_format: self.translator.tag_format().to_string(),
                    });
                    Some(self.first_release(prerelease, branch)?)
                }
            }
            Some(found) => {
                let level = match self.policy.forced_level {
                    Some(forced) => forced,
                    None if unreleased.is_empty() => {
                        let head = history.head().map(|c| c.id.clone()).unwrap_or_default();
                        outcome.warnings.push(BoundaryWarning::NoNewCommits {
                            latest_tag: found.tag.clone(),
                            current_commit_hash: head,
                        });
                        if self.policy.patch_without_tag {
                            LevelBump::Patch
                        } else {
                            LevelBump::NoRelease
                        }
                    }
                    None => classification.level,
                };
                self.apply_policy(found, level, prerelease, branch)?
            }
        };

        for warning in &outcome.warnings {
            warn!("{}", warning);
        }

        if let Some((version, level)) = next {
            let version = self.skip_existing(history, version)?;
            let version = match &self.policy.build_metadata {
                Some(build) => version.with_build_metadata(build.as_str()),
                None => version,
            };
            info!(%version, %level, "next version");
            outcome.decision = Decision::Release { version, level };
        } else {
            info!("no release due");
        }

        Ok(outcome)
    }

    /// Walk the history newest first, separating released commits from the
    /// unreleased ones.
    ///
    /// A tagged commit is a release candidate only when no other release tag
    /// sits above it; the highest candidate becomes the baseline.
    fn scan<'h>(&self, history: &'h History, warnings: &mut Vec<BoundaryWarning>) -> Scan<'h> {
        let tags = history.tags_by_commit();
        let linked = history.has_topology();

        // Commits below some release tag
        let mut covered: HashSet<&str> = HashSet::new();
        let mut frontier: Vec<Release<'h>> = Vec::new();
        let mut finals: HashMap<&str, Version> = HashMap::new();
        let mut shadowed = Vec::new();

        for (index, commit) in history.commits.iter().enumerate() {
            let id = commit.id.as_str();
            let below_release = covered.contains(id);

            let versions: Vec<(Version, &'h str)> = match tags.get(id) {
                Some(names) => {
                    // Tags that can never become the baseline stay quiet
                    let sink = if below_release {
                        &mut shadowed
                    } else {
                        &mut *warnings
                    };
                    names
                        .iter()
                        .filter_map(|name| self.version_from_tag(name, sink).map(|v| (v, *name)))
                        .collect()
                }
                None => Vec::new(),
            };

            if below_release || !versions.is_empty() {
                if linked {
                    covered.extend(commit.parents.iter().map(String::as_str));
                } else if let Some(parent) = history.commits.get(index + 1) {
                    covered.insert(parent.id.as_str());
                }
            }

            if let Some(newest) = versions
                .iter()
                .map(|(v, _)| v)
                .filter(|v| !v.is_prerelease())
                .max()
            {
                finals.insert(id, newest.clone());
            }

            if below_release {
                continue;
            }
            if let Some((version, tag)) = versions.into_iter().max_by(|a, b| a.0.cmp(&b.0)) {
                debug!(%version, tag, commit = commit.short_id(), "release tag found");
                frontier.push(Release {
                    index,
                    version,
                    tag,
                });
            }
        }

        let released: HashSet<&str> = frontier
            .iter()
            .map(|r| history.commits[r.index].id.as_str())
            .collect();
        let unreleased = history
            .commits
            .iter()
            .filter(|c| !covered.contains(c.id.as_str()) && !released.contains(c.id.as_str()))
            .collect();

        // Highest version wins, the newer commit on a tie
        let baseline = frontier
            .into_iter()
            .max_by(|a, b| a.version.cmp(&b.version).then(b.index.cmp(&a.index)))
            .map(|release| {
                let ancestors = history.ancestors_of(&history.commits[release.index].id);
                let latest_final = finals
                    .iter()
                    .filter(|(id, _)| ancestors.contains(*id))
                    .map(|(_, v)| v)
                    .max()
                    .cloned();
                debug!(version = %release.version, tag = release.tag, "baseline found");
                Baseline {
                    version: release.version,
                    tag: release.tag.to_string(),
                    latest_final,
                }
            });

        Scan {
            baseline,
            unreleased,
        }
    }

    /// Move a prerelease past revisions that are already tagged. An already
    /// tagged final version is an error.
    fn skip_existing(&self, history: &History, version: Version) -> Result<Version> {
        let existing: Vec<Version> = history
            .tags
            .iter()
            .filter_map(|tag| self.translator.from_tag(&tag.name))
            .collect();

        let mut version = version;
        while existing.contains(&version) {
            if !version.is_prerelease() {
                return Err(ReleaseError::TagExists(version.as_tag()));
            }
            debug!(%version, "prerelease already tagged");
            version = version.checked_bump(LevelBump::PrereleaseRevision)?;
        }
        Ok(version)
    }

    fn version_from_tag(&self, tag: &str, warnings: &mut Vec<BoundaryWarning>) -> Option<Version> {
        if let Some(version) = self.translator.from_tag(tag) {
            return Some(version);
        }

        if self.translator.add_partial_tags() && self.translator.is_partial_tag(tag) {
            return None;
        }

        let reason = if self.translator.matches_tag(tag) {
            "prerelease must have the shape <token>.<revision>".to_string()
        } else if VERSION_LIKE_REGEX.is_match(tag) {
            format!(
                "does not match tag format '{}'",
                self.translator.tag_format()
            )
        } else {
            debug!(tag, "not a release tag");
            return None;
        };

        warnings.push(BoundaryWarning::UnparsableTag {
            tag: tag.to_string(),
            reason,
        });
        None
    }

    /// Run every commit through the grammar and keep the highest level
    pub fn classify(
        &self,
        commits: &[&Commit],
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<Classification> {
        let mut classification = Classification::default();

        for commit in commits {
            for result in self.parser.parse_all(commit) {
                match result {
                    ParseResult::Parsed(parsed) => {
                        debug!(
                            commit = parsed.commit.short_id(),
                            level = %parsed.bump,
                            category = %parsed.category,
                            "commit classified"
                        );
                        classification.level = classification.level.max(parsed.bump);
                        classification.commits.push(parsed);
                    }
                    ParseResult::Failed(err) => {
                        if self.policy.strict {
                            return Err(err.into());
                        }
                        warnings.push(BoundaryWarning::UnclassifiedCommit {
                            commit_hash: err.commit.id.clone(),
                            reason: err.reason.clone(),
                        });
                        classification.skipped.push(err);
                    }
                }
            }
        }

        Ok(classification)
    }

    fn first_release(&self, prerelease: bool, branch: &BranchConfig) -> Result<(Version, LevelBump)> {
        let zero = self.translator.from_string("0.0.0")?;
        let initial = match self.policy.forced_level {
            Some(LevelBump::Major) if self.policy.major_on_zero || !self.policy.allow_zero_version => {
                zero.checked_bump(LevelBump::Major)?
            }
            _ if !self.policy.allow_zero_version => zero.checked_bump(LevelBump::Major)?,
            _ => zero.checked_bump(LevelBump::Minor)?,
        };

        let level = initial.difference(&zero);
        let version = if prerelease {
            initial.to_prerelease(Some(&branch.prerelease_token), Some(1))
        } else {
            initial
        };
        Ok((version, level))
    }

    /// Turn the aggregate level into the next version under branch policy
    fn apply_policy(
        &self,
        baseline: &Baseline,
        level: LevelBump,
        prerelease: bool,
        branch: &BranchConfig,
    ) -> Result<Option<(Version, LevelBump)>> {
        let current = &baseline.version;

        let mut level = level;
        if level == LevelBump::NoRelease {
            return Ok(None);
        }
        if level == LevelBump::PrereleaseRevision && !current.is_prerelease() {
            level = LevelBump::Patch;
        }
        if level == LevelBump::Major && current.major == 0 && !self.policy.major_on_zero {
            debug!("major bump capped to minor while major version is 0");
            level = LevelBump::Minor;
        }

        let covered = current.is_prerelease()
            && prerelease_covers(current, baseline.latest_final.as_ref(), level);

        let next = if prerelease {
            if covered && current.prerelease_token() == branch.prerelease_token {
                current.checked_bump(LevelBump::PrereleaseRevision)?
            } else if covered {
                current.to_prerelease(Some(&branch.prerelease_token), Some(1))
            } else {
                current
                    .checked_bump(level)?
                    .to_prerelease(Some(&branch.prerelease_token), Some(1))
            }
        } else if covered {
            current.finalize_version()
        } else {
            current.finalize_version().checked_bump(level)?
        };

        Ok(Some((next, level)))
    }
}

/// Whether the prerelease `current` already targets a version at least as
/// high as `level` applied to the last final release.
fn prerelease_covers(current: &Version, latest_final: Option<&Version>, level: LevelBump) -> bool {
    let target = current.finalize_version();
    match latest_final {
        Some(released) => released.bump(level).finalize_version() <= target,
        None => match level {
            LevelBump::Major => target.minor == 0 && target.patch == 0,
            LevelBump::Minor => target.patch == 0,
            _ => true,
        },
    }
}
