//! Primitive hints accept exactly their instances.

use proptest::prelude::*;
use vigil::{CheckConfig, ClassId, HintId, Pith, Session};

use crate::common::{passes, pith, rejection};

/// Membership computed from the value alone.
fn is_instance(hint: HintId, pith: &Pith) -> bool {
    match hint {
        HintId::ANY | HintId::OBJECT => true,
        HintId::NONE => matches!(pith, Pith::None),
        HintId::BOOL => matches!(pith, Pith::Bool(_)),
        HintId::INT => matches!(pith, Pith::Int(_) | Pith::Bool(_)),
        HintId::FLOAT => matches!(pith, Pith::Float(_)),
        HintId::STR => matches!(pith, Pith::Str(_)),
        HintId::BYTES => matches!(pith, Pith::Bytes(_)),
        _ => unreachable!("not a primitive hint"),
    }
}

const PRIMITIVES: [HintId; 8] = [
    HintId::ANY,
    HintId::OBJECT,
    HintId::NONE,
    HintId::BOOL,
    HintId::INT,
    HintId::FLOAT,
    HintId::STR,
    HintId::BYTES,
];

proptest! {
    #[test]
    fn check_passes_iff_instance(value in pith(), which in 0..PRIMITIVES.len()) {
        let session = Session::new();
        let hint = PRIMITIVES[which];
        prop_assert_eq!(passes(&session, hint, &value), is_instance(hint, &value));
    }
}

#[test]
fn subclasses_pass_unless_exact() {
    let session = Session::new();
    let (shape, shape_hint) = session.define_class("Shape", &[]).unwrap();
    let (circle, _) = session.define_class("Circle", &[shape]).unwrap();
    let exact_shape = session.pool().exact(shape);

    let a_circle = Pith::instance(circle, "Circle(r=1)");
    assert!(passes(&session, shape_hint, &a_circle));
    assert!(!passes(&session, exact_shape, &a_circle));
    assert_eq!(
        rejection(&session, exact_shape, &a_circle),
        "parameter `x` of `props.f()`: expected `Exact[Shape]`, got Circle Circle(r=1)"
    );
}

#[test]
fn bool_is_an_int_but_not_a_float() {
    let session = Session::new();
    assert!(passes(&session, HintId::INT, &Pith::Bool(true)));
    assert!(!passes(&session, HintId::FLOAT, &Pith::Bool(true)));
    assert!(!passes(&session, session.pool().exact(ClassId::INT), &Pith::Bool(true)));
}

#[test]
fn numeric_tower() {
    let session = Session::with_config(CheckConfig::default().with_numeric_tower(true));
    assert!(passes(&session, HintId::FLOAT, &Pith::Int(3)));
    assert!(passes(&session, HintId::FLOAT, &Pith::Bool(false)));
    assert!(!passes(&session, HintId::INT, &Pith::Float(3.0)));
}

#[test]
fn user_generics_check_only_the_origin() {
    let session = Session::new();
    let (boxed, _) = session.define_class("Box", &[]).unwrap();
    let box_of_int = session.pool().generic(boxed, &[HintId::INT]);

    assert!(passes(&session, box_of_int, &Pith::instance(boxed, "Box('not an int')")));
    assert!(!passes(&session, box_of_int, &Pith::Int(1)));
}
