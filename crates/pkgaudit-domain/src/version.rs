//! Version requirements for whitelisted packages.
//!
//! Three forms are accepted, split on the first `=`:
//! - `4.3.2`: the installed version must equal the string exactly
//! - `<=4.3.2`: installed must be loosely at most the given version
//! - `>=4.3.2`: installed must be loosely at least the given version
//!
//! Any other text before the `=` (including none) is an invalid modifier.
//!
//! OS package versions are not semver (`2.02-9.el7`, `1:4.3-3ubuntu1`), so ordering is
//! "loose": digit runs compare numerically, letter runs lexically, and every other
//! character only separates components.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Invalid modifier {modifier}")]
    InvalidModifier { modifier: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionConstraint {
    Exact(String),
    AtMost(String),
    AtLeast(String),
}

impl VersionConstraint {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let Some((modifier, version)) = text.split_once('=') else {
            return Ok(VersionConstraint::Exact(text.to_string()));
        };
        match modifier {
            "<" => Ok(VersionConstraint::AtMost(version.to_string())),
            ">" => Ok(VersionConstraint::AtLeast(version.to_string())),
            other => Err(VersionError::InvalidModifier {
                modifier: other.to_string(),
            }),
        }
    }

    /// Exact uses plain string equality; the ranges use loose ordering.
    pub fn is_satisfied_by(&self, installed: &str) -> bool {
        match self {
            VersionConstraint::Exact(v) => installed == v,
            VersionConstraint::AtMost(v) => loose_cmp(installed, v) != Ordering::Greater,
            VersionConstraint::AtLeast(v) => loose_cmp(installed, v) != Ordering::Less,
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionConstraint::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Exact(v) => f.write_str(v),
            VersionConstraint::AtMost(v) => write!(f, "<={v}"),
            VersionConstraint::AtLeast(v) => write!(f, ">={v}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Component<'a> {
    /// Digits with leading zeros stripped.
    Number(&'a str),
    Word(&'a str),
}

const ZERO: Component<'static> = Component::Number("");

impl Ord for Component<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => a.len().cmp(&b.len()).then(a.cmp(b)),
            (Component::Word(a), Component::Word(b)) => a.cmp(b),
            (Component::Number(_), Component::Word(_)) => Ordering::Less,
            (Component::Word(_), Component::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Component<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn components(version: &str) -> Vec<Component<'_>> {
    let mut out = Vec::new();
    let mut rest = version;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit() || c.is_alphabetic()) {
        rest = &rest[start..];
        let numeric = rest.starts_with(|c: char| c.is_ascii_digit());
        let end = rest
            .find(|c: char| {
                if numeric {
                    !c.is_ascii_digit()
                } else {
                    !c.is_alphabetic()
                }
            })
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        out.push(if numeric {
            Component::Number(run.trim_start_matches('0'))
        } else {
            Component::Word(run)
        });
        rest = tail;
    }

    out
}

/// Loose version ordering; the shorter side is padded with zero components.
pub fn loose_cmp(a: &str, b: &str) -> Ordering {
    let left = components(a);
    let right = components(b);
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(ZERO);
            let r = right.get(i).copied().unwrap_or(ZERO);
            l.cmp(&r)
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
