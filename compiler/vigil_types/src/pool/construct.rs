//! Hint construction helpers for the `HintPool`.
//!
//! Provides ergonomic methods for building compound hints.

use crate::{ClassError, ClassId, HintData, HintId, HintPool, Literal};

impl HintPool {
    // === Class Hints ===

    /// Create a class hint admitting instances of `class` and its subclasses.
    pub fn class(&self, class: ClassId) -> HintId {
        self.intern(HintData::Class(class))
    }

    /// Create a class hint that rejects subclasses of `class`.
    pub fn exact(&self, class: ClassId) -> HintId {
        self.intern(HintData::Exact(class))
    }

    /// Register a new class and intern its class hint.
    pub fn define_class(&self, name: &str, bases: &[ClassId]) -> Result<(ClassId, HintId), ClassError> {
        let class = self.classes().define(name, bases)?;
        Ok((class, self.class(class)))
    }

    // === Unions ===

    /// Create a union `a | b | ...` exactly as written.
    ///
    /// Flattening and deduplication happen at classification, so the raw
    /// hint still formats the way the host spelled it.
    pub fn union(&self, members: &[HintId]) -> HintId {
        self.intern(HintData::Union(members.into()))
    }

    /// Create `T | None`.
    pub fn optional(&self, inner: HintId) -> HintId {
        self.union(&[inner, HintId::NONE])
    }

    // === Single-Item Containers ===

    /// Create `list[elem]`.
    pub fn list(&self, elem: HintId) -> HintId {
        self.intern(HintData::List(elem))
    }

    /// Create `set[elem]`.
    pub fn set(&self, elem: HintId) -> HintId {
        self.intern(HintData::Set(elem))
    }

    /// Create `Origin[elem]` for an abstract or concrete collection class.
    pub fn collection(&self, origin: ClassId, elem: HintId) -> HintId {
        self.intern(HintData::Collection { origin, elem })
    }

    /// Create `tuple[elem, ...]`.
    pub fn var_tuple(&self, elem: HintId) -> HintId {
        self.intern(HintData::VarTuple(elem))
    }

    /// Create a fixed-length `tuple[a, b, ...]`; empty is `tuple[()]`.
    pub fn tuple(&self, items: &[HintId]) -> HintId {
        self.intern(HintData::Tuple(items.into()))
    }

    // === Key-Value Containers ===

    /// Create `dict[key, value]`.
    pub fn dict(&self, key: HintId, value: HintId) -> HintId {
        self.intern(HintData::Dict { key, value })
    }

    /// Create `Origin[key, value]` for a mapping class.
    pub fn mapping(&self, origin: ClassId, key: HintId, value: HintId) -> HintId {
        self.intern(HintData::Mapping { origin, key, value })
    }

    // === Everything Else ===

    /// Create a subscripted integrator generic such as `Box[int]`.
    pub fn generic(&self, origin: ClassId, args: &[HintId]) -> HintId {
        self.intern(HintData::Generic {
            origin,
            args: args.into(),
        })
    }

    /// Create a type variable.
    pub fn type_var(&self, name: &str, bound: Option<HintId>, constraints: &[HintId]) -> HintId {
        self.intern(HintData::TypeVar {
            name: name.into(),
            bound,
            constraints: constraints.into(),
        })
    }

    /// Create a forward reference to a hint named `name`.
    pub fn forward_ref(&self, name: &str) -> HintId {
        self.intern(HintData::ForwardRef(name.into()))
    }

    /// Create `Literal[v1, v2, ...]`.
    pub fn literal(&self, values: impl IntoIterator<Item = Literal>) -> HintId {
        self.intern(HintData::Literal(values.into_iter().collect()))
    }

    /// Create `Callable[[params...], ret]`, or `Callable[..., ret]` when
    /// `params` is `None`.
    pub fn callable(&self, params: Option<&[HintId]>, ret: HintId) -> HintId {
        self.intern(HintData::Callable {
            params: params.map(Into::into),
            ret,
        })
    }

    /// Create a hint this vocabulary cannot express; `description` names it
    /// in diagnostics.
    pub fn opaque(&self, description: &str) -> HintId {
        self.intern(HintData::Opaque(description.into()))
    }
}
