#![allow(clippy::unwrap_used)]

use super::*;
use crate::Literal;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn pre_interned_ids_are_stable() {
    let pool = HintPool::new();
    assert_eq!(pool.intern(HintData::Any), HintId::ANY);
    assert_eq!(pool.class(ClassId::OBJECT), HintId::OBJECT);
    assert_eq!(pool.class(ClassId::NONE_TYPE), HintId::NONE);
    assert_eq!(pool.class(ClassId::INT), HintId::INT);
    assert_eq!(pool.class(ClassId::BYTES), HintId::BYTES);
    assert_eq!(pool.len(), HintId::PRE_INTERNED_COUNT as usize);
    assert!(!pool.is_empty());
}

#[test]
fn structural_deduplication() {
    let pool = HintPool::new();
    let a = pool.list(HintId::INT);
    let b = pool.list(HintId::INT);
    let c = pool.set(HintId::INT);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.lookup(a), HintData::List(HintId::INT));
    assert!(pool.contains(a));
}

#[test]
fn flags_propagate_and_categorize() {
    let pool = HintPool::new();
    assert!(pool.flags(HintId::ANY).is_ignorable());
    assert!(pool.flags(HintId::OBJECT).is_ignorable());
    assert!(!pool.flags(HintId::INT).is_ignorable());

    let node = pool.forward_ref("Node");
    let list = pool.list(node);
    assert!(pool.flags(list).may_cycle());
    assert!(!pool.flags(list).is_ignorable());

    let outer = pool.list(list);
    assert!(pool.flags(outer).contains(HintFlags::HAS_FORWARD_REF));

    let optional = pool.optional(HintId::ANY);
    assert!(pool.flags(optional).is_ignorable());
    let optional_int = pool.optional(HintId::INT);
    assert!(!pool.flags(optional_int).is_ignorable());

    let free = pool.type_var("T", None, &[]);
    assert!(pool.flags(free).is_ignorable());
    let bounded = pool.type_var("N", Some(HintId::INT), &[]);
    assert!(!pool.flags(bounded).is_ignorable());
}

#[test]
fn format_hints() {
    let pool = HintPool::new();
    let cases = [
        (HintId::ANY, "Any"),
        (HintId::NONE, "None"),
        (pool.exact(ClassId::INT), "Exact[int]"),
        (pool.optional(HintId::INT), "int | None"),
        (pool.list(HintId::STR), "list[str]"),
        (pool.collection(ClassId::SEQUENCE, HintId::INT), "Sequence[int]"),
        (pool.var_tuple(HintId::INT), "tuple[int, ...]"),
        (pool.tuple(&[]), "tuple[()]"),
        (pool.tuple(&[HintId::INT, HintId::STR]), "tuple[int, str]"),
        (pool.dict(HintId::STR, HintId::INT), "dict[str, int]"),
        (
            pool.mapping(ClassId::MAPPING, HintId::STR, HintId::FLOAT),
            "Mapping[str, float]",
        ),
        (pool.forward_ref("Node"), "'Node'"),
        (
            pool.literal([Literal::Str("r".into()), Literal::Int(1)]),
            "Literal['r', 1]",
        ),
        (pool.callable(None, HintId::INT), "Callable[..., int]"),
        (
            pool.callable(Some(&[HintId::STR]), HintId::NONE),
            "Callable[[str], None]",
        ),
        (pool.opaque("ParamSpec"), "<opaque: ParamSpec>"),
        (pool.type_var("T", None, &[]), "T"),
    ];
    for (hint, expected) in cases {
        assert_eq!(pool.format_hint(hint), expected);
    }
}

#[test]
fn format_user_generic() {
    let pool = HintPool::new();
    let (boxed, _) = pool.define_class("Box", &[]).unwrap();
    let hint = pool.generic(boxed, &[HintId::INT]);
    assert_eq!(pool.format_hint(hint), "Box[int]");
}

#[test]
fn concurrent_interning_agrees() {
    let pool = Arc::new(HintPool::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || {
                let inner = pool.list(HintId::INT);
                pool.dict(HintId::STR, inner)
            })
        })
        .collect();
    let ids: Vec<HintId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}
