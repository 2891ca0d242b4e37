use mimic_core::{CompositionConfig, MethodOutcome, MimicCreator, MimicError, TransformError};
use mimic_model::{
    AssignOp, BinaryOp, Body, Expr, Method, MethodSignature, MimicMode, Param, Stmt, TypeDef, TypeRef,
};
use mimic_test_utils::fixtures::*;
use mimic_test_utils::{Interpreter, Value};
use pretty_assertions::assert_eq;

fn counter_type(name: &str) -> TypeBuilder {
    TypeBuilder::new(name).field(int_field("counter"))
}

#[test]
fn non_colliding_methods_are_copied_and_behave_like_the_source() {
    let src = counter_type("com.example.Src")
        .method(void_method("bump", vec![add_field("counter", 4)]))
        .method(value_method(
            "twice",
            TypeRef::INT,
            vec![ret(Expr::binary(BinaryOp::Mul, Expr::field("counter"), Expr::int(2)))],
        ))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst").build();

    let creator = MimicCreator::default();
    creator.mimic_fields(&src, &mut dst).unwrap();
    let outcomes = creator.mimic_methods(&src, &mut dst).unwrap();

    assert_eq!(
        outcomes,
        vec![
            MethodOutcome::Copied(MethodSignature::new("bump", vec![])),
            MethodOutcome::Copied(MethodSignature::new("twice", vec![])),
        ]
    );
    assert_eq!(dst.methods, src.methods);

    let interp = Interpreter::new([dst]);
    let mut obj = interp.instantiate("com.example.Dst", vec![]).unwrap();
    interp.invoke(&mut obj, "bump", vec![]).unwrap();
    assert_eq!(interp.invoke(&mut obj, "twice", vec![]).unwrap(), Value::Int(8));
}

#[test]
fn overloads_with_different_parameters_do_not_collide() {
    let src = TypeBuilder::new("com.example.Src")
        .method(Method::new(
            "foo",
            vec![Param::new("x", TypeRef::INT)],
            None,
            Body::default(),
        ))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .method(void_method("foo", vec![]))
        .build();

    let outcomes = MimicCreator::default().mimic_methods(&src, &mut dst).unwrap();
    assert!(matches!(outcomes[0], MethodOutcome::Copied(_)));
    assert_eq!(dst.methods_named("foo").count(), 2);
}

#[test]
fn colliding_methods_forward_their_parameters_to_the_clone() {
    let x = || Param::new("x", TypeRef::INT);
    let src = TypeBuilder::new("com.example.Src")
        .method(Method::new(
            "foo",
            vec![x()],
            None,
            vec![Stmt::Expr(Expr::assign_field(
                "counter",
                AssignOp::Assign,
                Expr::local("x"),
            ))],
        ))
        .build();
    let mut dst = counter_type("com.example.Dst")
        .method(Method::new(
            "foo",
            vec![x()],
            None,
            vec![Stmt::Expr(Expr::assign_field(
                "counter",
                AssignOp::Add,
                Expr::local("x"),
            ))],
        ))
        .build();

    MimicCreator::new(CompositionConfig::new().with_default_mode(MimicMode::AtBeginning))
        .mimic_methods(&src, &mut dst)
        .unwrap();

    let clone = dst
        .method(&MethodSignature::new("copy_foo", vec![TypeRef::INT]))
        .unwrap();
    assert_eq!(clone.params, vec![x()]);

    let interp = Interpreter::new([dst]);
    let mut obj = interp.instantiate("com.example.Dst", vec![]).unwrap();
    interp.invoke(&mut obj, "foo", vec![Value::Int(5)]).unwrap();
    assert_eq!(obj.int("counter"), 10);
}

#[test]
fn clone_names_carry_the_key() {
    let src = TypeBuilder::new("com.example.Src")
        .method(void_method("foo", vec![]))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .method(void_method("foo", vec![]))
        .build();

    let outcomes = MimicCreator::new(
        CompositionConfig::new()
            .with_key("bar")
            .with_default_mode(MimicMode::AtBeginning),
    )
    .mimic_methods(&src, &mut dst)
    .unwrap();

    assert_eq!(outcomes[0].clone_name(), Some("copy_bar_foo"));
    assert_eq!(
        dst.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["foo", "copy_bar_foo"]
    );
    assert_eq!(dst.methods[0].body.as_ref().unwrap().stmts, vec![call_stmt("copy_bar_foo")]);
}

#[test]
fn existing_clone_signature_is_a_conflict() {
    let src = TypeBuilder::new("com.example.Src")
        .method(void_method("foo", vec![]))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .method(void_method("foo", vec![]))
        .method(void_method("copy_foo", vec![]))
        .build();
    let before = dst.clone();

    let err = MimicCreator::new(CompositionConfig::new().with_default_mode(MimicMode::AtBeginning))
        .mimic_methods(&src, &mut dst)
        .unwrap_err();
    assert_eq!(
        err,
        MimicError::CloneConflict {
            type_name: "com.example.Dst".into(),
            signature: "copy_foo()".into(),
        }
    );
    assert_eq!(dst, before);
}

#[test]
fn bodyless_colliding_members_cannot_be_cloned() {
    let src = TypeBuilder::new("com.example.Src")
        .method(abstract_method("foo", vec![], None))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .method(void_method("foo", vec![]))
        .build();
    let before = dst.clone();

    let err = MimicCreator::default()
        .mimic_methods(&src, &mut dst)
        .unwrap_err();
    assert!(matches!(
        err,
        MimicError::UnderlyingTransform {
            source: TransformError::MissingBody,
            ..
        }
    ));
    assert_eq!(dst, before);
}

#[test]
fn valueless_return_aborts_the_splice_without_touching_the_destination() {
    let src = TypeBuilder::new("com.example.Src")
        .method(value_method("foo", TypeRef::INT, vec![ret(Expr::int(1))]))
        .build();
    // The first return splices fine; the second has no value to replace.
    let mut dst = counter_type("com.example.Dst")
        .method(value_method(
            "foo",
            TypeRef::INT,
            vec![
                Stmt::If {
                    cond: field_eq("counter", 0),
                    then_branch: vec![ret(Expr::int(2))],
                    else_branch: vec![],
                },
                Stmt::Return(None),
            ],
        ))
        .build();
    let before = dst.clone();

    let err = MimicCreator::new(CompositionConfig::new().with_default_mode(MimicMode::BeforeReturn))
        .mimic_methods(&src, &mut dst)
        .unwrap_err();
    assert_eq!(
        err,
        MimicError::UnderlyingTransform {
            type_name: "com.example.Dst".into(),
            member: "foo".into(),
            source: TransformError::ValuelessReturn,
        }
    );
    assert_eq!(dst, before);
    assert!(dst.method(&MethodSignature::new("copy_foo", vec![])).is_none());
}

#[test]
fn before_return_runs_the_clone_at_every_exit_of_a_void_method() {
    let src = counter_type("com.example.Src")
        .method(void_method("foo", vec![add_field("counter", 1000)]))
        .build();
    let mut dst = counter_type("com.example.Dst")
        .method(void_method(
            "foo",
            vec![
                Stmt::If {
                    cond: field_eq("counter", 0),
                    then_branch: vec![set_field("counter", 1), Stmt::Return(None)],
                    else_branch: vec![],
                },
                add_field("counter", 100),
            ],
        ))
        .build();

    let outcomes =
        MimicCreator::new(CompositionConfig::new().with_default_mode(MimicMode::BeforeReturn))
            .mimic_methods(&src, &mut dst)
            .unwrap();
    assert!(matches!(outcomes[0], MethodOutcome::Spliced { sites: 2, .. }));

    let interp = Interpreter::new([dst]);
    let mut obj = interp.instantiate("com.example.Dst", vec![]).unwrap();
    interp.invoke(&mut obj, "foo", vec![]).unwrap();
    // early exit
    assert_eq!(obj.int("counter"), 1001);
    interp.invoke(&mut obj, "foo", vec![]).unwrap();
    // fall-through exit
    assert_eq!(obj.int("counter"), 2101);
}

#[test]
fn the_source_is_left_untouched() {
    let src: TypeDef = counter_type("com.example.Src")
        .method(void_method("foo", vec![set_field("counter", 3)]))
        .build();
    let snapshot = src.clone();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .method(void_method("foo", vec![]))
        .build();

    MimicCreator::new(CompositionConfig::new().with_default_mode(MimicMode::AtBeginning))
        .mimic_class(&src, &mut dst)
        .unwrap();
    assert_eq!(src, snapshot);
}
