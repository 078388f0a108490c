//! Secure paths.
//!
//! A secure path addresses one scalar leaf of a document:
//!
//! ```text
//! db.password          mapping key, then mapping key
//! items[2].token       key, sequence index, key
//! [0].name             index into a root sequence
//! matrix[1][0]         consecutive indices
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::document::Node;
use crate::error::{ConfigError, PathError, PathErrors};

/// One step from a node to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A parsed, syntactically valid secure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurePath {
    raw: String,
    steps: Vec<Step>,
}

impl SecurePath {
    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for SecurePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SecurePath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |reason| ConfigError::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut steps = Vec::new();
        for (n, segment) in raw.split('.').enumerate() {
            let (name, mut indices) = match segment.find('[') {
                Some(open) => segment.split_at(open),
                None => (segment, ""),
            };

            if name.contains(']') {
                return Err(invalid("unexpected `]`"));
            }
            if name.is_empty() && (n > 0 || indices.is_empty()) {
                return Err(invalid("empty segment"));
            }
            if !name.is_empty() {
                steps.push(Step::Key(name.to_string()));
            }

            while !indices.is_empty() {
                let body = indices
                    .strip_prefix('[')
                    .ok_or_else(|| invalid("expected `[` after index"))?;
                let close = body.find(']').ok_or_else(|| invalid("unclosed `[`"))?;
                let digits = &body[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("index must be a non-negative integer"));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| invalid("index out of range"))?;
                steps.push(Step::Index(index));
                indices = &body[close + 1..];
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            steps,
        })
    }
}

/// Concrete address of a resolved leaf, usable to write it back in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(Vec<Step>);

impl Locator {
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Borrow the node this locator points at.
    pub fn get<'a>(&self, root: &'a Node) -> Option<&'a Node> {
        self.0.iter().try_fold(root, |node, step| match (node, step) {
            (Node::Mapping(m), Step::Key(k)) => m.get(k),
            (Node::Sequence(items), Step::Index(i)) => items.get(*i),
            _ => None,
        })
    }

    /// Mutably borrow the node this locator points at.
    pub fn get_mut<'a>(&self, root: &'a mut Node) -> Option<&'a mut Node> {
        self.0.iter().try_fold(root, |node, step| match (node, step) {
            (Node::Mapping(m), Step::Key(k)) => m.get_mut(k),
            (Node::Sequence(items), Step::Index(i)) => items.get_mut(*i),
            _ => None,
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, step) in self.0.iter().enumerate() {
            match step {
                Step::Key(_) if n > 0 => write!(f, ".{}", step)?,
                _ => write!(f, "{}", step)?,
            }
        }
        Ok(())
    }
}

/// A secure path that resolved to a scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub path: SecurePath,
    pub locator: Locator,
    /// Current text of the scalar.
    pub value: String,
}

/// Parse a list of path strings.
///
/// # Errors
///
/// Returns the first `ConfigError::InvalidPath`.
pub fn parse_all<S: AsRef<str>>(paths: &[S]) -> Result<Vec<SecurePath>, ConfigError> {
    paths.iter().map(|p| p.as_ref().parse()).collect()
}

/// Resolve every path against `root`.
///
/// All paths are attempted. Results keep declaration order, including
/// duplicates.
///
/// # Errors
///
/// Returns every failure together as `PathErrors`.
pub fn resolve(root: &Node, paths: &[SecurePath]) -> Result<Vec<Resolved>, PathErrors> {
    let mut resolved = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match resolve_one(root, path) {
            Ok(r) => resolved.push(r),
            Err(e) => {
                debug!(path = e.path(), "secure path did not resolve");
                errors.push(e);
            }
        }
    }

    debug!(
        resolved = resolved.len(),
        failed = errors.len(),
        "resolved secure paths"
    );

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(PathErrors(errors))
    }
}

fn resolve_one(root: &Node, path: &SecurePath) -> Result<Resolved, PathError> {
    let not_found = || PathError::NotFound {
        path: path.raw.clone(),
    };

    let mut node = root;
    for step in &path.steps {
        node = match (node, step) {
            (Node::Mapping(m), Step::Key(k)) => m.get(k).ok_or_else(not_found)?,
            (Node::Sequence(items), Step::Index(i)) => {
                items.get(*i).ok_or_else(|| PathError::IndexOutOfRange {
                    path: path.raw.clone(),
                    index: *i,
                    len: items.len(),
                })?
            }
            _ => return Err(not_found()),
        };
    }

    let value = node.scalar_text().ok_or_else(|| PathError::NotScalar {
        path: path.raw.clone(),
        kind: node.kind(),
    })?;

    Ok(Resolved {
        path: path.clone(),
        locator: Locator(path.steps.clone()),
        value,
    })
}
