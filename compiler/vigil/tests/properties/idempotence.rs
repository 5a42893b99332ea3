//! Repeated compiles of one hint observe one validator.

use proptest::prelude::*;
use vigil::{HintId, Session};

use crate::common::{passes, pith};

#[test]
fn compiles_at_most_once_sequentially() {
    let session = Session::new();
    let pool = session.pool();
    let hint = pool.dict(HintId::STR, pool.list(pool.optional(HintId::INT)));

    let first = session.checker().get_or_compile(hint).unwrap();
    let compiled = session.checker().cache_stats().compiled;
    for _ in 0..10 {
        let again = session.checker().get_or_compile(hint).unwrap();
        assert!(again.ptr_eq(&first));
    }
    assert_eq!(session.checker().cache_stats().compiled, compiled);
}

#[test]
fn structurally_equal_hints_share_a_validator() {
    let session = Session::new();
    let a = session.pool().list(session.pool().union(&[HintId::INT, HintId::STR]));
    let b = session.pool().list(session.pool().union(&[HintId::INT, HintId::STR]));
    assert_eq!(a, b);

    let va = session.checker().get_or_compile(a).unwrap();
    let vb = session.checker().get_or_compile(b).unwrap();
    assert!(va.ptr_eq(&vb));
}

proptest! {
    #[test]
    fn decisions_are_stable(value in pith()) {
        let session = Session::new();
        let pool = session.pool();
        let hint = pool.list(pool.union(&[HintId::INT, pool.tuple(&[HintId::STR])]));

        let first = passes(&session, hint, &value);
        for _ in 0..3 {
            prop_assert_eq!(passes(&session, hint, &value), first);
        }
    }
}
