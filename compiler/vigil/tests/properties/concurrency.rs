//! Threads racing first compiles and checks.

use std::sync::Barrier;
use std::thread;

use vigil::{CheckConfig, ForwardRefPolicy, HintId, Pith, Session, Validator};

use crate::common::{int_list, passes};

const THREADS: usize = 8;

#[test]
fn racing_first_compiles_publish_one_validator() {
    let session = Session::new();
    let pool = session.pool();
    let hint = pool.dict(
        HintId::STR,
        pool.list(pool.union(&[HintId::INT, pool.tuple(&[HintId::STR, HintId::BYTES])])),
    );
    let barrier = Barrier::new(THREADS);

    let validators: Vec<Validator> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    session.checker().get_or_compile(hint).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(validators.iter().all(|v| v.ptr_eq(&validators[0])));
    let published = session.checker().get_or_compile(hint).unwrap();
    assert!(published.ptr_eq(&validators[0]));
}

#[test]
fn concurrent_checks_agree() {
    let session = Session::new();
    let list_int = session.pool().list(HintId::INT);
    let good = int_list(&[1, 2, 3]);
    let bad = Pith::list(vec![Pith::Int(1), Pith::None]);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert!(passes(&session, list_int, &good));
                    assert!(!passes(&session, list_int, &bad));
                }
            });
        }
    });
}

#[test]
fn racing_recursive_compiles() {
    let session = Session::new();
    let pool = session.pool();
    let node = pool.list(pool.forward_ref("Node"));
    session.define("Node", node);
    let value = Pith::list(vec![Pith::list(Vec::new()), Pith::list(vec![Pith::list(Vec::new())])]);
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                assert!(passes(&session, node, &value));
            });
        }
    });
}

#[test]
fn racing_lazy_resolution() {
    let session =
        Session::with_config(CheckConfig::default().with_forward_refs(ForwardRefPolicy::Lazy));
    let pool = session.pool();
    let hint = pool.list(pool.forward_ref("Item"));
    session.define("Item", pool.optional(HintId::STR));
    let validator = session.checker().get_or_compile(hint).unwrap();
    let value = Pith::list(vec![Pith::string("a"), Pith::None]);
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                let classes = session.pool().classes();
                assert!(validator.accepts(&value, classes).unwrap());
                assert!(!validator.accepts(&Pith::list(vec![Pith::Int(1)]), classes).unwrap());
            });
        }
    });
}
