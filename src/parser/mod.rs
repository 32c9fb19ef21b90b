//! Commit message grammars
//!
//! Every grammar implements [`CommitParser`] and turns one commit into a
//! [`ParseResult`]. The grammar is chosen once from configuration through
//! [`build_parser`] and used for the whole run.

pub mod conventional;
pub mod emoji;
pub mod monorepo;
pub mod scipy;
pub mod tag;
pub mod util;

pub use conventional::{ConventionalOptions, ConventionalParser};
pub use emoji::{EmojiOptions, EmojiParser};
pub use monorepo::{MonorepoOptions, MonorepoParser};
pub use scipy::ScipyParser;
pub use tag::{TagOptions, TagParser};

use crate::domain::{Commit, LevelBump, ParseResult};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trait for commit grammars
pub trait CommitParser: Send + Sync {
    /// Name used in configuration and logs
    fn name(&self) -> &'static str;

    /// Classify a single commit
    fn parse(&self, commit: &Commit) -> ParseResult;

    /// Classify a commit that may stand for several logical commits
    fn parse_all(&self, commit: &Commit) -> Vec<ParseResult> {
        vec![self.parse(commit)]
    }
}

/// Grammar selector as written in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    #[serde(alias = "angular")]
    Conventional,
    Emoji,
    Scipy,
    Tag,
}

impl ParserKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::Conventional => "conventional",
            ParserKind::Emoji => "emoji",
            ParserKind::Scipy => "scipy",
            ParserKind::Tag => "tag",
        }
    }
}

/// Options for the selected grammar; each grammar reads the keys it knows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserOptions {
    #[serde(default)]
    pub allowed_tags: Option<Vec<String>>,

    #[serde(default)]
    pub major_tags: Option<Vec<String>>,

    #[serde(default)]
    pub minor_tags: Option<Vec<String>>,

    #[serde(default)]
    pub patch_tags: Option<Vec<String>>,

    #[serde(default)]
    pub default_bump_level: Option<LevelBump>,

    #[serde(default)]
    pub minor_tag: Option<String>,

    #[serde(default)]
    pub fix_tag: Option<String>,
}

/// Build the configured grammar, wrapped in the monorepo decorator when
/// `monorepo` is given.
pub fn build_parser(
    kind: ParserKind,
    options: &ParserOptions,
    monorepo: Option<&MonorepoOptions>,
) -> Result<Box<dyn CommitParser>> {
    let parser: Box<dyn CommitParser> = match kind {
        ParserKind::Conventional => Box::new(ConventionalParser::with_options(
            ConventionalOptions::from_options(options),
        )),
        ParserKind::Emoji => Box::new(EmojiParser::with_options(EmojiOptions::from_options(
            options,
        ))),
        ParserKind::Scipy => Box::new(ScipyParser::new()),
        ParserKind::Tag => Box::new(TagParser::with_options(TagOptions::from_options(
            options,
        )?)),
    };

    debug!(parser = parser.name(), "commit parser selected");

    match monorepo {
        Some(scoped) if scoped.is_active() => {
            Ok(Box::new(MonorepoParser::new(parser, scoped.clone())))
        }
        _ => Ok(parser),
    }
}
