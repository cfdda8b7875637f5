//! Versioned actor taxonomy.
//!
//! The taxonomy is an ordered table of `(matcher, bucket)` rules loaded from
//! TOML. The built-in table is embedded via [`include_str!`]; a refresh that
//! needs different aliases points `taxonomy_path` at its own file instead of
//! editing literals in code.
//!
//! Matching runs against a key built by [`match_key`]: lowercased with runs
//! of whitespace collapsed to one space. Patterns are keyed the same way when
//! the table is compiled, so `exact` and `contains` rules are
//! case-insensitive. `regex` rules are compiled case-insensitive.

use std::path::Path;

use config::{Config, File, FileFormat};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::TaxonomyError;
use crate::types::ActorBucket;

const DEFAULT_TAXONOMY_SRC: &str = include_str!("taxonomy/default.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types, mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTaxonomy {
    #[serde(default)]
    version: String,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    kind: MatchKind,
    pattern: String,
    bucket: String,
}

// ---------------------------------------------------------------------------
// Compiled taxonomy
// ---------------------------------------------------------------------------

/// How a rule's pattern is compared with an actor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contains,
    Regex,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Contains => "contains",
            MatchKind::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Contains(String),
    Regex(Regex),
}

/// One compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: MatchKind,
    /// Pattern as written in the taxonomy file.
    pub pattern: String,
    pub bucket: ActorBucket,
    matcher: Matcher,
}

impl Rule {
    fn matches(&self, key: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(p) => key == p,
            Matcher::Contains(p) => key.contains(p.as_str()),
            Matcher::Regex(re) => re.is_match(key),
        }
    }

    /// `kind:pattern`, the rule's identity in audit output.
    pub fn describe(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.pattern)
    }
}

/// Result of classifying one actor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub bucket: ActorBucket,
    /// Index of the matching rule, `None` when the fallback applied.
    pub rule: Option<usize>,
}

impl Classification {
    pub const FALLBACK: Classification = Classification {
        bucket: ActorBucket::OtherArmedGroups,
        rule: None,
    };

    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

/// An ordered, versioned rule table. Evaluation is first-match-wins.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    version: String,
    rules: Vec<Rule>,
}

impl Taxonomy {
    /// The embedded table.
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_TAXONOMY_SRC).expect("built-in taxonomy must compile")
    }

    /// Load a taxonomy file from disk.
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let raw: RawTaxonomy = Config::builder()
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Self::compile(raw)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, TaxonomyError> {
        let raw: RawTaxonomy = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Self::compile(raw)
    }

    fn compile(raw: RawTaxonomy) -> Result<Self, TaxonomyError> {
        let version = raw.version.trim().to_string();
        if version.is_empty() {
            return Err(TaxonomyError::MissingVersion);
        }

        let rules = raw
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, r)| compile_rule(index, r))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { version, rules })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Bucket an actor name. Empty or whitespace-only names fall back.
    pub fn classify(&self, name: &str) -> Classification {
        let key = match_key(name);
        if key.is_empty() {
            return Classification::FALLBACK;
        }
        self.rules
            .iter()
            .position(|r| r.matches(&key))
            .map(|i| Classification {
                bucket: self.rules[i].bucket,
                rule: Some(i),
            })
            .unwrap_or(Classification::FALLBACK)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compile_rule(index: usize, raw: RawRule) -> Result<Rule, TaxonomyError> {
    let bucket = ActorBucket::from_label(&raw.bucket).ok_or_else(|| TaxonomyError::UnknownBucket {
        index,
        label: raw.bucket.clone(),
    })?;

    let key = match_key(&raw.pattern);
    if key.is_empty() {
        return Err(TaxonomyError::EmptyPattern { index });
    }

    let matcher = match raw.kind {
        MatchKind::Exact => Matcher::Exact(key),
        MatchKind::Contains => Matcher::Contains(key),
        MatchKind::Regex => RegexBuilder::new(raw.pattern.trim())
            .case_insensitive(true)
            .build()
            .map(Matcher::Regex)
            .map_err(|source| TaxonomyError::InvalidRegex {
                index,
                pattern: raw.pattern.clone(),
                source,
            })?,
    };

    Ok(Rule {
        kind: raw.kind,
        pattern: raw.pattern,
        bucket,
        matcher,
    })
}

/// Lowercase and collapse whitespace.
pub fn match_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
