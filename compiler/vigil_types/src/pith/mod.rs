//! Runtime values checked against hints.
//!
//! # Arc Enforcement
//!
//! Heap-backed piths go through factory methods on `Pith`. The `Heap<T>`
//! wrapper has a crate-private constructor, so a `Pith` is always cheap to
//! clone and safe to share between threads.
//!
//! ```text
//! let s = Pith::string("hello");              // OK
//! let xs = Pith::list(vec![Pith::Int(1)]);    // OK
//! let s = Pith::Str(Heap::new(...));          // ERROR: Heap::new is pub(crate)
//! ```

mod probe;

use std::fmt::{self, Write};
use std::ops::Deref;
use std::sync::Arc;

use crate::{ClassId, Literal};

pub use probe::{SampleIndices, SampleStrategy};

/// Shared, immutable heap storage for a pith.
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

/// How many arguments an invocable accepts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Arity {
    /// Arguments without defaults.
    pub required: usize,
    /// Upper bound; `None` when variadic.
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments.
    pub const fn exactly(n: usize) -> Self {
        Arity {
            required: n,
            max: Some(n),
        }
    }

    /// At least `n` arguments.
    pub const fn at_least(n: usize) -> Self {
        Arity {
            required: n,
            max: None,
        }
    }

    /// Check if a call with `n` positional arguments is accepted.
    #[inline]
    pub fn accepts(self, n: usize) -> bool {
        n >= self.required && self.max.map_or(true, |max| n <= max)
    }
}

/// A host function.
#[derive(Clone, PartialEq, Debug)]
pub struct CallableValue {
    pub name: Box<str>,
    pub arity: Arity,
}

/// An instance of an integrator-defined class.
#[derive(Clone, PartialEq, Debug)]
pub struct Instance {
    pub class: ClassId,
    /// Text shown in diagnostics.
    pub repr: Box<str>,
    /// Builtin container contents, for subclasses of builtin containers.
    pub backing: Option<Pith>,
    /// Arity of the instance's call operator, if it has one.
    pub call_arity: Option<Arity>,
}

/// Runtime value under test.
#[derive(Clone, PartialEq, Debug)]
pub enum Pith {
    // Scalars (inline)
    None,
    Bool(bool),
    Int(i64),
    Float(f64),

    // Heap Types
    Str(Heap<String>),
    Bytes(Heap<Vec<u8>>),
    List(Heap<Vec<Pith>>),
    Tuple(Heap<Vec<Pith>>),
    /// Set items; uniqueness is the host's concern.
    Set(Heap<Vec<Pith>>),
    /// Entries in insertion order.
    Dict(Heap<Vec<(Pith, Pith)>>),
    Callable(Heap<CallableValue>),
    Instance(Heap<Instance>),
}

impl Pith {
    // Factory Methods

    pub fn string(s: impl Into<String>) -> Self {
        Pith::Str(Heap::new(s.into()))
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Pith::Bytes(Heap::new(b.into()))
    }

    pub fn list(items: Vec<Pith>) -> Self {
        Pith::List(Heap::new(items))
    }

    pub fn tuple(items: Vec<Pith>) -> Self {
        Pith::Tuple(Heap::new(items))
    }

    pub fn set(items: Vec<Pith>) -> Self {
        Pith::Set(Heap::new(items))
    }

    pub fn dict(entries: Vec<(Pith, Pith)>) -> Self {
        Pith::Dict(Heap::new(entries))
    }

    pub fn function(name: &str, arity: Arity) -> Self {
        Pith::Callable(Heap::new(CallableValue {
            name: name.into(),
            arity,
        }))
    }

    /// A plain instance of `class`, shown as `repr` in diagnostics.
    pub fn instance(class: ClassId, repr: &str) -> Self {
        Pith::Instance(Heap::new(Instance {
            class,
            repr: repr.into(),
            backing: None,
            call_arity: None,
        }))
    }

    /// An instance of a class deriving from a builtin container.
    pub fn instance_backed(class: ClassId, repr: &str, backing: Pith) -> Self {
        Pith::Instance(Heap::new(Instance {
            class,
            repr: repr.into(),
            backing: Some(backing),
            call_arity: None,
        }))
    }

    /// An instance with a call operator.
    pub fn invocable_instance(class: ClassId, repr: &str, arity: Arity) -> Self {
        Pith::Instance(Heap::new(Instance {
            class,
            repr: repr.into(),
            backing: None,
            call_arity: Some(arity),
        }))
    }

    /// The pith's own class.
    pub fn class_id(&self) -> ClassId {
        match self {
            Pith::None => ClassId::NONE_TYPE,
            Pith::Bool(_) => ClassId::BOOL,
            Pith::Int(_) => ClassId::INT,
            Pith::Float(_) => ClassId::FLOAT,
            Pith::Str(_) => ClassId::STR,
            Pith::Bytes(_) => ClassId::BYTES,
            Pith::List(_) => ClassId::LIST,
            Pith::Tuple(_) => ClassId::TUPLE,
            Pith::Set(_) => ClassId::SET,
            Pith::Dict(_) => ClassId::DICT,
            Pith::Callable(_) => ClassId::FUNCTION,
            Pith::Instance(instance) => instance.class,
        }
    }

    /// Check if the pith equals a literal of the same kind.
    ///
    /// `True` does not match `Literal[1]` and `1` does not match
    /// `Literal[True]`.
    pub fn matches_literal(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Pith::None, Literal::None) => true,
            (Pith::Bool(a), Literal::Bool(b)) => a == b,
            (Pith::Int(a), Literal::Int(b)) => a == b,
            (Pith::Str(a), Literal::Str(b)) => a.as_str() == &**b,
            (Pith::Bytes(a), Literal::Bytes(b)) => a.as_slice() == &**b,
            _ => false,
        }
    }

    /// Source-like representation, truncated to `max_len` characters.
    pub fn repr(&self, max_len: usize) -> String {
        let mut buf = String::new();
        self.write_repr(&mut buf, max_len);
        truncate(&mut buf, max_len);
        buf
    }

    /// Append the representation, stopping early once past `budget` bytes.
    fn write_repr(&self, buf: &mut String, budget: usize) {
        match self {
            Pith::None => buf.push_str("None"),
            Pith::Bool(true) => buf.push_str("True"),
            Pith::Bool(false) => buf.push_str("False"),
            Pith::Int(n) => {
                let _ = write!(buf, "{n}");
            }
            Pith::Float(x) => {
                let _ = write!(buf, "{x:?}");
            }
            Pith::Str(s) => {
                let _ = write!(buf, "'{}'", s.escape_default());
            }
            Pith::Bytes(b) => {
                let _ = write!(buf, "b'{}'", b.escape_ascii());
            }
            Pith::List(items) => write_items(buf, budget, "[", "]", items),
            Pith::Tuple(items) if items.len() == 1 => {
                buf.push('(');
                items[0].write_repr(buf, budget);
                buf.push_str(",)");
            }
            Pith::Tuple(items) => write_items(buf, budget, "(", ")", items),
            Pith::Set(items) if items.is_empty() => buf.push_str("set()"),
            Pith::Set(items) => write_items(buf, budget, "{", "}", items),
            Pith::Dict(entries) => {
                buf.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if buf.len() > budget {
                        buf.push_str("...");
                        break;
                    }
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    key.write_repr(buf, budget);
                    buf.push_str(": ");
                    value.write_repr(buf, budget);
                }
                buf.push('}');
            }
            Pith::Callable(callable) => {
                let _ = write!(buf, "<function {}>", callable.name);
            }
            Pith::Instance(instance) => buf.push_str(&instance.repr),
        }
    }
}

fn write_items(buf: &mut String, budget: usize, open: &str, close: &str, items: &[Pith]) {
    buf.push_str(open);
    for (i, item) in items.iter().enumerate() {
        if buf.len() > budget {
            buf.push_str("...");
            break;
        }
        if i > 0 {
            buf.push_str(", ");
        }
        item.write_repr(buf, budget);
    }
    buf.push_str(close);
}

/// Cut `buf` to `max_len` characters, marking the cut with `...`.
fn truncate(buf: &mut String, max_len: usize) {
    if buf.chars().count() <= max_len {
        return;
    }
    let keep = max_len.saturating_sub(3);
    let cut = buf.char_indices().nth(keep).map_or(buf.len(), |(at, _)| at);
    buf.truncate(cut);
    buf.push_str("...");
}

impl fmt::Display for Pith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.write_repr(&mut buf, usize::MAX);
        f.write_str(&buf)
    }
}
