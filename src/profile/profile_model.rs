use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FillError, Result};

// ============================================================================
// Declarative form profiles: rules are data, strategies are variants
// ============================================================================

/// How a question block receives a dictated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStrategy {
    /// First text-like control in the block
    Text,
    /// First/last sub-controls, or a single text control
    FullName,
    /// Area code + number sub-controls, or a single text control
    Phone,
    /// Street/city/state/zip (+ country select)
    Address,
    /// Native date input or month/day/year sub-controls
    Date,
    /// Whole value is one option to pick
    Choice,
    /// Value is a `,`/`;` separated list of options to pick
    MultiChoice,
}

/// One serializable rule: spoken keys matching `key_pattern` go to the first
/// question whose label contains `label_contains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub key_pattern: String,
    pub label_contains: String,
    pub strategy: ApplyStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    /// Regex tested against the page URL
    pub url_pattern: String,
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone)]
pub struct ProfileRule {
    pub key_pattern: Regex,
    pub label_contains: String,
    pub strategy: ApplyStrategy,
}

/// A compiled profile. Rule order matters: lookup is first match.
#[derive(Debug, Clone)]
pub struct FormProfile {
    pub name: String,
    url_pattern: Regex,
    pub rules: Vec<ProfileRule>,
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FillError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })
}

impl FormProfile {
    pub fn compile(spec: &ProfileSpec) -> Result<Self> {
        let rules = spec
            .rules
            .iter()
            .map(|r| {
                Ok(ProfileRule {
                    key_pattern: compile_pattern(&r.key_pattern)?,
                    label_contains: r.label_contains.clone(),
                    strategy: r.strategy,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: spec.name.clone(),
            url_pattern: compile_pattern(&spec.url_pattern)?,
            rules,
        })
    }

    /// Load and compile a profile from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let spec: ProfileSpec = serde_yaml::from_str(raw).map_err(|e| FillError::Yaml {
            context: "form profile".into(),
            source: e,
        })?;
        Self::compile(&spec)
    }

    /// Page-identity check selecting profile mode.
    pub fn matches_url(&self, url: &str) -> bool {
        self.url_pattern.is_match(url)
    }

    /// First rule whose key pattern matches the spoken key.
    pub fn rule_for(&self, spoken_key: &str) -> Option<&ProfileRule> {
        let key = spoken_key.trim();
        self.rules.iter().find(|r| r.key_pattern.is_match(key))
    }

    /// Serializable form of this profile.
    pub fn to_spec(&self) -> ProfileSpec {
        ProfileSpec {
            name: self.name.clone(),
            url_pattern: self.url_pattern.as_str().to_string(),
            rules: self
                .rules
                .iter()
                .map(|r| RuleSpec {
                    key_pattern: r.key_pattern.as_str().to_string(),
                    label_contains: r.label_contains.clone(),
                    strategy: r.strategy,
                })
                .collect(),
        }
    }
}
