//! Location of a failing sub-value inside the value that was checked.
//!
//! A [`PithPath`] is the sequence of steps from the root value (an argument
//! or a return value) down to the sub-value that broke its hint. It renders
//! in subscript notation, so `[0][2]` is "item 2 of item 0".

use smallvec::SmallVec;
use std::fmt;

/// One step from a container value to one of its parts.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// Positional item of a sequence or tuple.
    Index(usize),
    /// A mapping key itself (rendered repr of the key).
    Key(String),
    /// The value stored under a mapping key (rendered repr of the key).
    Value(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "[{index}]"),
            PathSegment::Key(key) => write!(f, "<key {key}>"),
            PathSegment::Value(key) => write!(f, "[{key}]"),
        }
    }
}

/// Path from a root value to a nested sub-value.
///
/// Most hints nest only a few levels deep, so segments are stored inline.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PithPath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl PithPath {
    /// The empty path, pointing at the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Check if this path points at the root value.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of steps below the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Descend one step.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Undo the last [`push`](Self::push).
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// The steps, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The innermost step, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl<const N: usize> From<[PathSegment; N]> for PithPath {
    fn from(segments: [PathSegment; N]) -> Self {
        PithPath {
            segments: segments.into_iter().collect(),
        }
    }
}

impl fmt::Display for PithPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
