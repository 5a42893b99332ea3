//! Shape classification.
//!
//! `classify` maps an interned hint to exactly one [`HintShape`]. It is pure
//! and total: anything the checker cannot handle becomes
//! [`HintShape::Unsupported`] instead of an error, so classifying eagerly
//! never fails an unrelated signature. Forward references are left
//! unresolved; the validator compiler resolves them.

use smallvec::SmallVec;
use std::fmt;

use crate::{ClassId, HintData, HintId, HintPool, Literal};

/// Discriminant of a [`HintShape`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ShapeTag {
    Primitive,
    Union,
    Sequence,
    FixedTuple,
    Mapping,
    TypeVar,
    ForwardRef,
    Literal,
    Protocol,
    Unsupported,
}

impl ShapeTag {
    /// Get the tag name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeTag::Primitive => "primitive",
            ShapeTag::Union => "union",
            ShapeTag::Sequence => "sequence",
            ShapeTag::FixedTuple => "fixed tuple",
            ShapeTag::Mapping => "mapping",
            ShapeTag::TypeVar => "type variable",
            ShapeTag::ForwardRef => "forward reference",
            ShapeTag::Literal => "literal",
            ShapeTag::Protocol => "callable",
            ShapeTag::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of shapes a hint classifies to.
///
/// Child hints stay as `HintId`s; the compiler classifies them in turn.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum HintShape {
    /// Instance of `class`; subclasses are accepted unless `exact`.
    Primitive { class: ClassId, exact: bool },
    /// Flattened, deduplicated members in first-occurrence order (at least two).
    Union(Box<[HintId]>),
    /// A homogeneous container of class `origin` whose items match `elem`.
    Sequence { origin: ClassId, elem: HintId },
    /// A tuple of exactly these items; empty means the empty tuple.
    FixedTuple(Box<[HintId]>),
    /// A mapping of class `origin` from `key` to `value`.
    Mapping {
        origin: ClassId,
        key: HintId,
        value: HintId,
    },
    /// A type variable; accepts by bound or by any constraint.
    TypeVar {
        name: Box<str>,
        bound: Option<HintId>,
        constraints: Box<[HintId]>,
    },
    /// A named reference, resolved when compiled.
    ForwardRef { name: Box<str> },
    /// Equal to one of these values.
    Literal(Box<[Literal]>),
    /// Invocable; `params: None` accepts any arity.
    Protocol {
        params: Option<Box<[HintId]>>,
        ret: HintId,
    },
    /// Not something the checker understands.
    Unsupported(Box<str>),
}

impl HintShape {
    /// The shape accepting every value.
    pub const OBJECT: HintShape = HintShape::Primitive {
        class: ClassId::OBJECT,
        exact: false,
    };

    /// Get the discriminant.
    pub fn tag(&self) -> ShapeTag {
        match self {
            HintShape::Primitive { .. } => ShapeTag::Primitive,
            HintShape::Union(_) => ShapeTag::Union,
            HintShape::Sequence { .. } => ShapeTag::Sequence,
            HintShape::FixedTuple(_) => ShapeTag::FixedTuple,
            HintShape::Mapping { .. } => ShapeTag::Mapping,
            HintShape::TypeVar { .. } => ShapeTag::TypeVar,
            HintShape::ForwardRef { .. } => ShapeTag::ForwardRef,
            HintShape::Literal(_) => ShapeTag::Literal,
            HintShape::Protocol { .. } => ShapeTag::Protocol,
            HintShape::Unsupported(_) => ShapeTag::Unsupported,
        }
    }

    /// Check if this shape accepts every value.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            HintShape::Primitive {
                class: ClassId::OBJECT,
                exact: false
            }
        )
    }
}

/// Classify a hint into its shape.
pub fn classify(pool: &HintPool, hint: HintId) -> HintShape {
    let data = pool.lookup(hint);
    let classes = pool.classes();

    match data {
        HintData::Any => HintShape::OBJECT,
        HintData::Class(class) | HintData::Generic { origin: class, .. } => {
            if classes.contains(class) {
                HintShape::Primitive {
                    class,
                    exact: false,
                }
            } else {
                unknown_class(class)
            }
        }
        HintData::Exact(class) => {
            if classes.contains(class) {
                HintShape::Primitive { class, exact: true }
            } else {
                unknown_class(class)
            }
        }

        HintData::Union(members) => classify_union(pool, &members),

        HintData::List(elem) => HintShape::Sequence {
            origin: ClassId::LIST,
            elem,
        },
        HintData::Set(elem) => HintShape::Sequence {
            origin: ClassId::SET,
            elem,
        },
        HintData::VarTuple(elem) => HintShape::Sequence {
            origin: ClassId::TUPLE,
            elem,
        },
        HintData::Collection { origin, elem } => {
            if !classes.contains(origin) {
                unknown_class(origin)
            } else if !classes.is_subclass(origin, ClassId::COLLECTION)
                || classes.is_subclass(origin, ClassId::MAPPING)
            {
                HintShape::Unsupported(
                    format!("`{}` is not a single-item collection", classes.name(origin)).into(),
                )
            } else {
                HintShape::Sequence { origin, elem }
            }
        }
        HintData::Tuple(items) => HintShape::FixedTuple(items),
        HintData::Dict { key, value } => HintShape::Mapping {
            origin: ClassId::DICT,
            key,
            value,
        },
        HintData::Mapping { origin, key, value } => {
            if !classes.contains(origin) {
                unknown_class(origin)
            } else if !classes.is_subclass(origin, ClassId::MAPPING) {
                HintShape::Unsupported(
                    format!("`{}` is not a mapping", classes.name(origin)).into(),
                )
            } else {
                HintShape::Mapping { origin, key, value }
            }
        }

        HintData::TypeVar {
            name,
            bound,
            constraints,
        } => {
            if bound.is_some() && !constraints.is_empty() {
                HintShape::Unsupported(
                    format!("type variable `{name}` has both a bound and constraints").into(),
                )
            } else if constraints.len() == 1 {
                HintShape::Unsupported(
                    format!("type variable `{name}` has a single constraint").into(),
                )
            } else {
                HintShape::TypeVar {
                    name,
                    bound,
                    constraints,
                }
            }
        }
        HintData::ForwardRef(name) => HintShape::ForwardRef { name },
        HintData::Literal(values) => {
            if values.is_empty() {
                HintShape::Unsupported("empty `Literal[]`".into())
            } else {
                HintShape::Literal(values)
            }
        }
        HintData::Callable { params, ret } => HintShape::Protocol { params, ret },
        HintData::Opaque(description) => {
            HintShape::Unsupported(format!("`{description}` is not a supported hint").into())
        }
    }
}

fn unknown_class(class: ClassId) -> HintShape {
    HintShape::Unsupported(format!("class {} is not registered", class.raw()).into())
}

/// Flatten nested unions, drop duplicates and collapse degenerate cases.
fn classify_union(pool: &HintPool, members: &[HintId]) -> HintShape {
    let mut flat: SmallVec<[HintId; 8]> = SmallVec::new();
    let mut pending: SmallVec<[HintId; 8]> = members.iter().rev().copied().collect();

    while let Some(member) = pending.pop() {
        if pool.flags(member).is_ignorable() {
            return HintShape::OBJECT;
        }
        let nested = pool.with_data(member, |data| match data {
            HintData::Union(inner) => Some(inner.clone()),
            _ => None,
        });
        match nested {
            Some(inner) => pending.extend(inner.iter().rev().copied()),
            None => {
                if !flat.contains(&member) {
                    flat.push(member);
                }
            }
        }
    }

    match flat.as_slice() {
        [] => HintShape::Unsupported("empty union".into()),
        [single] => classify(pool, *single),
        _ => HintShape::Union(flat.into_iter().collect()),
    }
}
