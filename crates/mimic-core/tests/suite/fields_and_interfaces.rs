use mimic_core::{CompositionReport, MimicCreator, MimicError};
use mimic_model::{Expr, Field, TypeRef};
use mimic_test_utils::fixtures::*;
use mimic_test_utils::Interpreter;
use pretty_assertions::assert_eq;

#[test]
fn interfaces_are_merged_once() {
    let src = TypeBuilder::new("com.example.Src")
        .implements("java.io.Serializable")
        .implements("java.lang.Runnable")
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .implements("java.lang.Runnable")
        .build();

    let creator = MimicCreator::default();
    assert_eq!(
        creator.mimic_interfaces(&src, &mut dst),
        vec!["java.io.Serializable".to_string()]
    );
    assert!(creator.mimic_interfaces(&src, &mut dst).is_empty());
    assert_eq!(
        dst.interfaces.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["java.lang.Runnable", "java.io.Serializable"]
    );
}

#[test]
fn fields_are_copied_with_their_initializers() {
    let src = TypeBuilder::new("com.example.Src")
        .field(int_field("count").with_initializer(Expr::int(7)))
        .field(Field::new("label", TypeRef::object("java.lang.String")))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst").build();

    let copied = MimicCreator::default().mimic_fields(&src, &mut dst).unwrap();
    assert_eq!(copied, vec!["count".to_string(), "label".to_string()]);
    assert_eq!(dst.fields, src.fields);

    let interp = Interpreter::new([dst]);
    let obj = interp.instantiate("com.example.Dst", vec![]).unwrap();
    assert_eq!(obj.int("count"), 7);
}

#[test]
fn duplicate_field_aborts_before_any_copy() {
    let src = TypeBuilder::new("com.example.Src")
        .field(int_field("fresh"))
        .field(int_field("taken"))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .field(bool_field("taken"))
        .build();
    let before = dst.clone();

    let err = MimicCreator::default()
        .mimic_fields(&src, &mut dst)
        .unwrap_err();
    assert_eq!(
        err,
        MimicError::DuplicateField {
            type_name: "com.example.Dst".into(),
            field: "taken".into(),
        }
    );
    assert_eq!(err.to_string(), "type com.example.Dst already has a field named taken");
    assert_eq!(dst, before);
}

#[test]
fn mimic_class_reports_every_aspect() {
    let src = TypeBuilder::new("com.example.Src")
        .implements("java.lang.Runnable")
        .field(int_field("n"))
        .method(void_method("run", vec![add_field("n", 1)]))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst").build();

    let report: CompositionReport = MimicCreator::default().mimic_class(&src, &mut dst).unwrap();
    assert_eq!(report.interfaces, vec!["java.lang.Runnable".to_string()]);
    assert_eq!(report.fields, vec!["n".to_string()]);
    assert!(report.constructors.is_empty());
    assert_eq!(report.members_added(), 2);

    let interp = Interpreter::new([dst]);
    let mut obj = interp.instantiate("com.example.Dst", vec![]).unwrap();
    interp.invoke(&mut obj, "run", vec![]).unwrap();
    assert_eq!(obj.int("n"), 1);
}

#[test]
fn failing_aspect_keeps_earlier_aspects() {
    let src = TypeBuilder::new("com.example.Src")
        .implements("java.lang.Runnable")
        .field(int_field("n"))
        .build();
    let mut dst = TypeBuilder::new("com.example.Dst")
        .field(int_field("n"))
        .build();

    assert!(MimicCreator::default().mimic_class(&src, &mut dst).is_err());
    assert!(dst.has_interface("java.lang.Runnable"));
    assert_eq!(dst.fields.len(), 1);
}
