//! Raw hint representation stored in the `HintPool`.
//!
//! `HintData` is what a host hands to the checker: an expression tree whose
//! children are `HintId` handles. It is deliberately richer than
//! [`HintShape`](crate::HintShape): several spellings (`list[T]`, `set[T]`,
//! `tuple[T, ...]`) classify to the same shape.

use crate::{ClassId, HintId};
use std::fmt;

/// A concrete value admitted by a `Literal[...]` hint.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Str(Box<str>),
    Bytes(Box<[u8]>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => write!(f, "None"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Bytes(b) => write!(f, "b'{}'", String::from_utf8_lossy(b)),
        }
    }
}

/// Raw hint stored in the interner.
///
/// # Design
///
/// - Children are `HintId` handles, so structural equality is shallow
/// - Names (type variables, forward references) are owned strings; they are
///   short and compared rarely
/// - `Opaque` carries anything the host could not express; it classifies to
///   `Unsupported` instead of failing at construction
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum HintData {
    /// `Any`: accepts every value.
    Any,
    /// A class: accepts instances of it and of its subclasses.
    Class(ClassId),
    /// A class that forbids subclasses.
    Exact(ClassId),

    /// `A | B | ...` as written (not yet flattened).
    Union(Box<[HintId]>),

    /// `list[T]`
    List(HintId),
    /// `set[T]`
    Set(HintId),
    /// `Sequence[T]`, `Collection[T]`, `AbstractSet[T]`, ...
    Collection {
        /// Abstract or concrete container class.
        origin: ClassId,
        /// Item hint.
        elem: HintId,
    },
    /// `tuple[T, ...]`
    VarTuple(HintId),
    /// `tuple[A, B, C]`; empty means `tuple[()]`.
    Tuple(Box<[HintId]>),
    /// `dict[K, V]`
    Dict {
        /// Key hint.
        key: HintId,
        /// Value hint.
        value: HintId,
    },
    /// `Mapping[K, V]` and other mapping classes.
    Mapping {
        /// Mapping class.
        origin: ClassId,
        /// Key hint.
        key: HintId,
        /// Value hint.
        value: HintId,
    },
    /// An integrator generic subscripted with arguments, e.g. `Box[int]`.
    Generic {
        /// The generic class.
        origin: ClassId,
        /// Subscript arguments (recorded, not checked).
        args: Box<[HintId]>,
    },

    /// `T = TypeVar("T", bound=..., *constraints)`
    TypeVar {
        /// Variable name, used in diagnostics.
        name: Box<str>,
        /// Upper bound.
        bound: Option<HintId>,
        /// Allowed alternatives.
        constraints: Box<[HintId]>,
    },

    /// A hint referenced by name before it is defined, e.g. `"Node"`.
    ForwardRef(Box<str>),

    /// `Literal[v1, v2, ...]`
    Literal(Box<[Literal]>),

    /// `Callable[[P1, P2], R]`; `params: None` is `Callable[..., R]`.
    Callable {
        /// Parameter hints, if the arity is fixed.
        params: Option<Box<[HintId]>>,
        /// Return hint.
        ret: HintId,
    },

    /// Something the host could not express in this vocabulary.
    Opaque(Box<str>),
}

impl HintData {
    /// Iterate over the child hints of this hint, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = HintId> + '_ {
        const NONE: &[HintId] = &[];
        let (slice, pair): (&[HintId], [Option<HintId>; 2]) = match self {
            HintData::Any
            | HintData::Class(_)
            | HintData::Exact(_)
            | HintData::ForwardRef(_)
            | HintData::Literal(_)
            | HintData::Opaque(_) => (NONE, [None, None]),
            HintData::Union(members) | HintData::Tuple(members) => (&members[..], [None, None]),
            HintData::Generic { args, .. } => (&args[..], [None, None]),
            HintData::List(elem)
            | HintData::Set(elem)
            | HintData::VarTuple(elem)
            | HintData::Collection { elem, .. } => (NONE, [Some(*elem), None]),
            HintData::Dict { key, value } | HintData::Mapping { key, value, .. } => {
                (NONE, [Some(*key), Some(*value)])
            }
            HintData::TypeVar {
                bound, constraints, ..
            } => (&constraints[..], [*bound, None]),
            HintData::Callable { params, ret } => {
                (params.as_deref().unwrap_or(NONE), [Some(*ret), None])
            }
        };
        slice.iter().copied().chain(pair.into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_order() {
        let dict = HintData::Dict {
            key: HintId::STR,
            value: HintId::INT,
        };
        assert_eq!(dict.children().collect::<Vec<_>>(), [HintId::STR, HintId::INT]);

        let callable = HintData::Callable {
            params: Some(vec![HintId::INT, HintId::STR].into_boxed_slice()),
            ret: HintId::BOOL,
        };
        assert_eq!(
            callable.children().collect::<Vec<_>>(),
            [HintId::INT, HintId::STR, HintId::BOOL]
        );
    }

    #[test]
    fn test_leaf_has_no_children() {
        assert_eq!(HintData::Class(ClassId::INT).children().count(), 0);
        assert_eq!(HintData::ForwardRef("Node".into()).children().count(), 0);
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::Str("a".into()).to_string(), "'a'");
        assert_eq!(Literal::None.to_string(), "None");
    }

    #[test]
    fn test_hintdata_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(HintData::List(HintId::INT));
        set.insert(HintData::List(HintId::INT));
        set.insert(HintData::Set(HintId::INT));
        assert_eq!(set.len(), 2);
    }
}
