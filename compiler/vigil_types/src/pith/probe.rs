//! Capability probes over piths.
//!
//! Validators never match on container variants directly: they ask whether
//! a pith has a length, iterate a sample of its items, or iterate a sample
//! of its entries. Instances backed by a builtin container answer through
//! their backing value.

use std::borrow::Cow;
use std::ops::Range;
use std::str::Chars;

use super::{Arity, Pith};

/// How many container items the hot path checks.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SampleStrategy {
    /// Only the first item.
    First,
    /// The first and the last item.
    #[default]
    FirstAndLast,
    /// The first `n` items.
    Leading(usize),
    /// Every item.
    Exhaustive,
}

impl SampleStrategy {
    /// Indices to visit in a container of `len` items.
    pub fn indices(self, len: usize) -> SampleIndices {
        let (front, tail) = match self {
            SampleStrategy::First => (0..len.min(1), None),
            SampleStrategy::FirstAndLast => (0..len.min(1), (len >= 2).then(|| len - 1)),
            SampleStrategy::Leading(n) => (0..len.min(n), None),
            SampleStrategy::Exhaustive => (0..len, None),
        };
        SampleIndices { front, tail }
    }
}

/// Allocation-free iterator over sampled indices, in ascending order.
#[derive(Clone, Debug)]
pub struct SampleIndices {
    front: Range<usize>,
    tail: Option<usize>,
}

impl Iterator for SampleIndices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.front.next().or_else(|| self.tail.take())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.front.len() + usize::from(self.tail.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for SampleIndices {}

impl Pith {
    /// The builtin container this pith answers probes through.
    fn container(&self) -> &Pith {
        match self {
            Pith::Instance(instance) => match &instance.backing {
                Some(backing) => backing.container(),
                None => self,
            },
            _ => self,
        }
    }

    /// Check if the pith has a length.
    pub fn supports_length(&self) -> bool {
        self.length().is_some()
    }

    /// Number of items, for piths that have a length.
    pub fn length(&self) -> Option<usize> {
        match self.container() {
            Pith::Str(s) => Some(s.chars().count()),
            Pith::Bytes(b) => Some(b.len()),
            Pith::List(items) | Pith::Tuple(items) | Pith::Set(items) => Some(items.len()),
            Pith::Dict(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Check if the pith maps keys to values.
    pub fn is_mapping_like(&self) -> bool {
        matches!(self.container(), Pith::Dict(_))
    }

    /// Item at `index`, as iteration would produce it.
    ///
    /// Strings yield one-character strings, bytes yield integers and
    /// mappings yield their keys.
    pub fn item_at(&self, index: usize) -> Option<Cow<'_, Pith>> {
        match self.container() {
            Pith::Str(s) => s
                .chars()
                .nth(index)
                .map(|c| Cow::Owned(Pith::string(c.to_string()))),
            Pith::Bytes(b) => b.get(index).map(|&byte| Cow::Owned(Pith::Int(i64::from(byte)))),
            Pith::List(items) | Pith::Tuple(items) | Pith::Set(items) => {
                items.get(index).map(Cow::Borrowed)
            }
            Pith::Dict(entries) => entries.get(index).map(|(key, _)| Cow::Borrowed(key)),
            _ => None,
        }
    }

    /// Iterate the sampled items with their indices.
    ///
    /// Yields nothing for piths without a length. Strings are walked once,
    /// not indexed per item.
    pub fn iterate_sample(
        &self,
        strategy: SampleStrategy,
    ) -> impl Iterator<Item = (usize, Cow<'_, Pith>)> + '_ {
        let container = self.container();
        let indices = strategy.indices(container.length().unwrap_or(0));
        let source = match container {
            Pith::Str(s) => Source::Chars {
                chars: s.chars(),
                next: 0,
            },
            _ => Source::Indexed(container),
        };
        SampleItems { indices, source }
    }

    /// Iterate the sampled entries of a mapping-like pith.
    ///
    /// Yields nothing for other piths.
    pub fn mapping_sample(
        &self,
        strategy: SampleStrategy,
    ) -> impl Iterator<Item = (usize, &Pith, &Pith)> + '_ {
        let entries: &[(Pith, Pith)] = match self.container() {
            Pith::Dict(entries) => entries,
            _ => &[],
        };
        strategy
            .indices(entries.len())
            .map(move |index| (index, &entries[index].0, &entries[index].1))
    }

    /// Arity of an invocable pith.
    pub fn invocable_arity(&self) -> Option<Arity> {
        match self {
            Pith::Callable(callable) => Some(callable.arity),
            Pith::Instance(instance) => instance.call_arity,
            _ => None,
        }
    }
}

/// Sampled items of one container.
struct SampleItems<'a> {
    indices: SampleIndices,
    source: Source<'a>,
}

enum Source<'a> {
    Indexed(&'a Pith),
    /// `next` is the index of the char `chars` yields next.
    Chars { chars: Chars<'a>, next: usize },
}

impl<'a> Iterator for SampleItems<'a> {
    type Item = (usize, Cow<'a, Pith>);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::Indexed(container) => {
                let container: &'a Pith = *container;
                loop {
                    let index = self.indices.next()?;
                    if let Some(item) = container.item_at(index) {
                        return Some((index, item));
                    }
                }
            }
            Source::Chars { chars, next } => {
                let index = self.indices.next()?;
                let c = chars.nth(index - *next)?;
                *next = index + 1;
                Some((index, Cow::Owned(Pith::string(c.to_string()))))
            }
        }
    }
}
