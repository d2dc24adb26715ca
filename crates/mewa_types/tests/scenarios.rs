//! The concrete type-database scenarios of spec §8 ("Scenarios"), driven
//! end-to-end through the public `TypeDatabase` API rather than its
//! internal tables — mirrors the teacher corpus's placement of
//! end-to-end tests under `tests/`, outside `src/`.

use mewa_base::{IdentTable, Scope};
use mewa_types::{ConstructorId, DefineTypeOutcome, ObjectHandle, TypeDatabase, TypeHandle};

// Scenario B: overload resolution by parameter signature.
#[test]
fn scenario_b_overloads_resolve_by_signature() {
    let mut idents = IdentTable::new();
    let int_ty_name = idents.get("int");
    let float_ty_name = idents.get("float");
    let f_name = idents.get("f");

    let mut db = TypeDatabase::new();
    let scope = Scope::new(0, 100);
    let int_ty = match db.define_type(scope, TypeHandle::NONE, int_ty_name, ConstructorId(0), &[], 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };
    let float_ty = match db.define_type(scope, TypeHandle::NONE, float_ty_name, ConstructorId(0), &[], 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };

    let one_arg = [mewa_types::Parameter { ty: int_ty, constructor: ConstructorId(0) }];
    let two_arg = [
        mewa_types::Parameter { ty: int_ty, constructor: ConstructorId(0) },
        mewa_types::Parameter { ty: int_ty, constructor: ConstructorId(0) },
    ];

    let f1 = match db.define_type(scope, TypeHandle::NONE, f_name, ConstructorId(1), &one_arg, 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };
    let f2 = match db.define_type(scope, TypeHandle::NONE, f_name, ConstructorId(2), &two_arg, 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };
    assert_ne!(f1, f2);

    assert_eq!(db.get_type(scope, TypeHandle::NONE, f_name, &[int_ty]), Some(f1));
    assert_eq!(db.get_type(scope, TypeHandle::NONE, f_name, &[int_ty, int_ty]), Some(f2));
    assert_eq!(db.get_type(scope, TypeHandle::NONE, f_name, &[float_ty]), None);
}

// Scenario C: redefinition at a higher priority replaces the record; a
// subsequent attempt at a lower priority is silently discarded.
#[test]
fn scenario_c_priority_governs_redefinition() {
    let mut idents = IdentTable::new();
    let name = idents.get("g");

    let mut db = TypeDatabase::new();
    let scope = Scope::new(0, 100);

    let first = match db.define_type(scope, TypeHandle::NONE, name, ConstructorId(1), &[], 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };

    // Redefining with an identical signature at a strictly higher
    // priority replaces the record in place and hands back the same
    // handle (§8 Scenario C: "Redefining ... replaces the record and
    // returns a new handle" — this implementation documents reusing the
    // existing handle as the chosen convention, per §4.6's either/or).
    let bumped = db.define_type(scope, TypeHandle::NONE, name, ConstructorId(2), &[], 1).unwrap();
    assert_eq!(bumped, DefineTypeOutcome::Created(first));
    assert_eq!(db.type_constructor(first).unwrap(), ConstructorId(2));

    match db.define_type(scope, TypeHandle::NONE, name, ConstructorId(3), &[], 0).unwrap() {
        DefineTypeOutcome::Discarded { existing } => assert_eq!(existing, first),
        other => panic!("expected a lower-priority redefinition to be discarded, got {other:?}"),
    }
    // Storage is unchanged: the constructor from the priority bump still
    // answers the lookup, not the discarded attempt's.
    assert_eq!(db.type_constructor(first).unwrap(), ConstructorId(2));
}

// Scenario E: object instances shadow by innermost containing scope.
#[test]
fn scenario_e_object_instances_shadow_by_innermost_scope() {
    let mut idents = IdentTable::new();
    let x = idents.get("x");

    let mut db = TypeDatabase::new();
    db.set_object_instance(x, Scope::new(0, 100), ObjectHandle(1)).unwrap();
    db.set_object_instance(x, Scope::new(10, 20), ObjectHandle(2)).unwrap();

    assert_eq!(db.get_object_instance(x, 15), Some(ObjectHandle(2)));
    assert_eq!(db.get_object_instance(x, 50), Some(ObjectHandle(1)));
    assert_eq!(db.get_object_instance(x, 200), None);
}

// Scenario F: a diamond reduction graph reports a conflicting path of
// equal weight rather than picking one arbitrarily.
#[test]
fn scenario_f_diamond_reports_conflict_path() {
    let mut idents = IdentTable::new();
    let a_name = idents.get("A");
    let b_name = idents.get("B");
    let c_name = idents.get("C");
    let d_name = idents.get("D");

    let mut db = TypeDatabase::new();
    let scope = Scope::new(0, 100);
    let mut define = |name| match db.define_type(scope, TypeHandle::NONE, name, ConstructorId(0), &[], 0).unwrap() {
        DefineTypeOutcome::Created(h) => h,
        other => panic!("expected Created, got {other:?}"),
    };
    let a = define(a_name);
    let b = define(b_name);
    let c = define(c_name);
    let d = define(d_name);

    db.define_reduction(scope, b, a, ConstructorId(1), 1, 1).unwrap();
    db.define_reduction(scope, c, a, ConstructorId(2), 1, 1).unwrap();
    db.define_reduction(scope, d, b, ConstructorId(3), 1, 1).unwrap();
    db.define_reduction(scope, d, c, ConstructorId(4), 1, 1).unwrap();

    let derived = db.derive_type(50, a, d, 0xFFFF_FFFF, 0xFFFF_FFFF, u32::MAX).unwrap();
    assert_eq!(derived.weight_sum, 2);
    assert!(derived.conflict_path.is_some(), "diamond of equal-weight paths should report a conflict");
}
