use mimic_model::{
    AssignOp, Body, CallExpr, Expr, Field, Method, MethodSignature, Modifiers, Param, Stmt,
    TypeDef, TypeRef,
};
use pretty_assertions::assert_eq;

#[test]
fn type_definitions_load_from_json() {
    let json = r#"{
        "name": "com.example.Dst",
        "superclass": "com.example.Base",
        "interfaces": ["java.lang.Runnable"],
        "fields": [
            { "name": "counter", "ty": { "primitive": "int" }, "modifiers": 1 }
        ],
        "methods": [
            {
                "name": "foo",
                "params": [{ "name": "a", "ty": { "object": "java.lang.String" } }],
                "body": [
                    { "expr": { "assign": { "target": { "field": "counter" }, "op": "mul", "value": { "literal": { "int": 2 } } } } },
                    { "expr": { "call": { "callee": "foo", "dispatch": "super", "args": [{ "local": "a" }] } } }
                ]
            }
        ]
    }"#;

    let ty: TypeDef = serde_json::from_str(json).unwrap();

    assert_eq!(ty.superclass.as_deref(), Some("com.example.Base"));
    assert!(ty.has_interface("java.lang.Runnable"));
    assert_eq!(
        ty.field("counter"),
        Some(&Field::new("counter", TypeRef::INT).with_modifiers(Modifiers::PUBLIC))
    );

    let sig = MethodSignature::new("foo", vec![TypeRef::object("java.lang.String")]);
    let method = ty.method(&sig).expect("foo(String) should be declared");
    let expected = Method {
        name: "foo".into(),
        params: vec![Param::new("a", TypeRef::object("java.lang.String"))],
        return_type: None,
        modifiers: Modifiers::NONE,
        body: Some(Body::new(vec![
            Stmt::Expr(Expr::assign_field("counter", AssignOp::Mul, Expr::int(2))),
            Stmt::Expr(CallExpr::super_("foo", vec![Expr::local("a")]).into()),
        ])),
    };
    assert_eq!(method, &expected);
    assert!(ty.inherited.is_empty());
}

#[test]
fn abstract_methods_have_no_body() {
    let json = r#"{ "name": "a.B", "methods": [{ "name": "run", "modifiers": 1025 }] }"#;
    let ty: TypeDef = serde_json::from_str(json).unwrap();
    let run = &ty.methods[0];
    assert!(run.body.is_none());
    assert!(run.modifiers.contains(Modifiers::ABSTRACT));
    assert!(!run.returns_value());
}
