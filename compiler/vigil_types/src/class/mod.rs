//! Class registry with precomputed ancestor sets.
//!
//! Primitive hints check membership in a class "honoring subtype rules".
//! Each registered class stores the full set of its ancestors (itself
//! included), computed once at definition time, so a subclass test is one
//! hash lookup under a read lock.

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::fmt;

use crate::ClassId;

/// Error when defining a class fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassError {
    /// A base class id was not issued by this registry.
    UnknownBase { base: ClassId },
    /// The class name is empty.
    EmptyName,
    /// Registry exceeded `u32::MAX` classes.
    Overflow,
}

impl fmt::Display for ClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassError::UnknownBase { base } => {
                write!(f, "base class {} is not registered", base.raw())
            }
            ClassError::EmptyName => write!(f, "class name must not be empty"),
            ClassError::Overflow => write!(f, "class registry exceeded u32::MAX classes"),
        }
    }
}

impl std::error::Error for ClassError {}

/// Metadata for one registered class.
struct ClassInfo {
    name: Box<str>,
    ancestors: FxHashSet<ClassId>,
    is_abstract: bool,
}

impl ClassInfo {
    fn new(id: ClassId, name: &str, bases: &[ClassId], is_abstract: bool) -> Self {
        let mut ancestors: FxHashSet<ClassId> = bases.iter().copied().collect();
        ancestors.insert(id);
        ancestors.insert(ClassId::OBJECT);
        ClassInfo {
            name: name.into(),
            ancestors,
            is_abstract,
        }
    }
}

/// Thread-safe registry of every class hints may refer to.
///
/// # Pre-registered Classes
/// Builtins occupy fixed ids (see [`ClassId`]); the abstract builtins
/// (`Sequence`, `Mapping`, ...) are ancestors of the matching concrete ones,
/// and `bool` is a subclass of `int`.
pub struct ClassRegistry {
    builtins: Vec<ClassInfo>,
    user: RwLock<Vec<ClassInfo>>,
}

impl ClassRegistry {
    /// Create a registry holding only the builtin classes.
    pub fn new() -> Self {
        use ClassId as C;

        let sequence = [C::SEQUENCE, C::COLLECTION];
        let table: [(ClassId, &str, &[ClassId], bool); ClassId::BUILTIN_COUNT as usize] = [
            (C::OBJECT, "object", &[], false),
            (C::NONE_TYPE, "NoneType", &[], false),
            (C::BOOL, "bool", &[C::INT], false),
            (C::INT, "int", &[], false),
            (C::FLOAT, "float", &[], false),
            (C::STR, "str", &sequence, false),
            (C::BYTES, "bytes", &sequence, false),
            (C::LIST, "list", &sequence, false),
            (C::TUPLE, "tuple", &sequence, false),
            (C::DICT, "dict", &[C::MAPPING, C::COLLECTION], false),
            (C::SET, "set", &[C::ABSTRACT_SET, C::COLLECTION], false),
            (C::FUNCTION, "function", &[C::CALLABLE], false),
            (C::SEQUENCE, "Sequence", &[C::COLLECTION], true),
            (C::MAPPING, "Mapping", &[C::COLLECTION], true),
            (C::ABSTRACT_SET, "AbstractSet", &[C::COLLECTION], true),
            (C::COLLECTION, "Collection", &[], true),
            (C::CALLABLE, "Callable", &[], true),
        ];

        let builtins = table
            .iter()
            .enumerate()
            .map(|(slot, (id, name, bases, is_abstract))| {
                debug_assert_eq!(id.raw() as usize, slot, "builtin table out of order");
                ClassInfo::new(*id, name, bases, *is_abstract)
            })
            .collect();

        ClassRegistry {
            builtins,
            user: RwLock::new(Vec::new()),
        }
    }

    /// Register an integrator class deriving from `bases`.
    ///
    /// Ancestors of every base are inherited, so the subclass relation is
    /// transitive without walking the hierarchy at check time.
    pub fn define(&self, name: &str, bases: &[ClassId]) -> Result<ClassId, ClassError> {
        if name.is_empty() {
            return Err(ClassError::EmptyName);
        }

        let mut inherited = FxHashSet::default();
        {
            let user = self.user.read();
            for &base in bases {
                let info = self
                    .info_in(&user, base)
                    .ok_or(ClassError::UnknownBase { base })?;
                inherited.extend(info.ancestors.iter().copied());
            }
        }

        let mut user = self.user.write();
        let offset = u32::try_from(user.len()).map_err(|_| ClassError::Overflow)?;
        let raw = ClassId::FIRST_USER
            .checked_add(offset)
            .ok_or(ClassError::Overflow)?;
        let id = ClassId::from_raw(raw);
        let bases: Vec<ClassId> = inherited.into_iter().collect();
        user.push(ClassInfo::new(id, name, &bases, false));

        tracing::debug!(class = name, id = raw, "registered class");
        Ok(id)
    }

    fn info_in<'a>(&'a self, user: &'a [ClassInfo], id: ClassId) -> Option<&'a ClassInfo> {
        if id.is_builtin() {
            return self.builtins.get(id.raw() as usize);
        }
        let offset = id.raw().checked_sub(ClassId::FIRST_USER)?;
        user.get(offset as usize)
    }

    /// Check if `id` was issued by this registry.
    pub fn contains(&self, id: ClassId) -> bool {
        let user = self.user.read();
        self.info_in(&user, id).is_some()
    }

    /// Check if `sub` is `sup` or derives from it.
    ///
    /// Unknown ids are subclasses of nothing but `object`.
    #[inline]
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup || sup == ClassId::OBJECT {
            return true;
        }
        if sub.is_builtin() {
            return self
                .builtins
                .get(sub.raw() as usize)
                .is_some_and(|info| info.ancestors.contains(&sup));
        }
        let user = self.user.read();
        self.info_in(&user, sub)
            .is_some_and(|info| info.ancestors.contains(&sup))
    }

    /// Check if the class only exists to group other classes.
    pub fn is_abstract(&self, id: ClassId) -> bool {
        let user = self.user.read();
        self.info_in(&user, id).is_some_and(|info| info.is_abstract)
    }

    /// Human-readable class name, or `<class N>` for unknown ids.
    pub fn name(&self, id: ClassId) -> String {
        let user = self.user.read();
        match self.info_in(&user, id) {
            Some(info) => info.name.to_string(),
            None => format!("<class {}>", id.raw()),
        }
    }

    /// Append the class name to `buf`.
    pub fn write_name(&self, id: ClassId, buf: &mut String) {
        let user = self.user.read();
        match self.info_in(&user, id) {
            Some(info) => buf.push_str(&info.name),
            None => {
                use std::fmt::Write;
                let _ = write!(buf, "<class {}>", id.raw());
            }
        }
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
