use mimic_config::{ConfigValidationError, MimicConfig, MimicDirective};
use mimic_core::MimicError;
use mimic_model::{MethodOverride, MimicMode, TypeDef};
use mimic_processor::{MemoryTypePool, MimicProcessor, ProcessError, TypePool};
use mimic_test_utils::fixtures::*;
use mimic_test_utils::Interpreter;
use pretty_assertions::assert_eq;

fn base() -> TypeDef {
    TypeBuilder::new("a.Base")
        .field(int_field("counter").with_modifiers(mimic_model::Modifiers::PROTECTED))
        .method(void_method("bar", vec![add_field("counter", 1)]))
        .build()
}

fn source() -> TypeDef {
    TypeBuilder::new("a.Src")
        .implements("a.Marker")
        .field(int_field("extra"))
        .method(void_method("foo", vec![set_field("counter", 3)]))
        .build()
}

fn destination() -> TypeDef {
    TypeBuilder::new("a.Dst")
        .extends("a.Base")
        .method(void_method("foo", vec![call_stmt("bar"), mul_field("counter", 2)]))
        .build()
}

fn pool() -> MemoryTypePool {
    [base(), source(), destination()].into_iter().collect()
}

fn config(directive: MimicDirective) -> MimicConfig {
    MimicConfig {
        mimic: vec![directive],
        ..MimicConfig::default()
    }
}

#[test]
fn insertion_points_resolve_through_the_pool_hierarchy() {
    let mut directive = MimicDirective::new("a.Dst", "a.Src");
    directive
        .methods
        .push(MethodOverride::new("foo", MimicMode::Before).with_insertion_point("bar"));

    let mut pool = pool();
    MimicProcessor::new()
        .process(&mut pool, &config(directive))
        .unwrap();

    let interp = Interpreter::new(pool.iter().cloned());
    let mut obj = interp.instantiate("a.Dst", vec![]).unwrap();
    interp.invoke(&mut obj, "foo", vec![]).unwrap();
    // clone: 3, bar: 4, then *2
    assert_eq!(obj.int("counter"), 8);
}

#[test]
fn disabled_aspects_are_skipped() {
    let mut directive = MimicDirective::new("a.Dst", "a.Src");
    directive.mimic_interfaces = false;
    directive.mimic_methods = false;

    let mut pool = pool();
    let report = MimicProcessor::new()
        .process(&mut pool, &config(directive))
        .unwrap();

    let composition = &report.types[0].composition;
    assert!(composition.interfaces.is_empty());
    assert!(composition.methods.is_empty());
    assert_eq!(composition.fields, vec!["extra".to_string()]);

    let dst = pool.get("a.Dst").unwrap();
    assert!(!dst.has_interface("a.Marker"));
    assert!(dst.has_field("extra"));
    assert_eq!(dst.methods, destination().methods);
}

#[test]
fn failing_directive_leaves_the_pool_untouched() {
    let mut pool = pool();
    // Default mode `after_super`, but `Dst.foo` never calls `super.foo()`.
    let err = MimicProcessor::new()
        .process(&mut pool, &config(MimicDirective::new("a.Dst", "a.Src")))
        .unwrap_err();

    match err {
        ProcessError::Mimic {
            target,
            source_type,
            source: MimicError::MissingCallSite { .. },
        } => {
            assert_eq!(target, "a.Dst");
            assert_eq!(source_type, "a.Src");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(pool.get("a.Dst"), Some(&destination()));
}

#[test]
fn unknown_types_are_reported() {
    let mut pool = pool();
    let err = MimicProcessor::new()
        .process(&mut pool, &config(MimicDirective::new("a.Dst", "a.Nowhere")))
        .unwrap_err();
    assert!(matches!(err, ProcessError::UnknownType { ref name } if name == "a.Nowhere"));
    assert_eq!(err.to_string(), "type a.Nowhere is not in the type pool");
}

#[test]
fn invalid_configs_are_rejected_before_anything_runs() {
    let mut pool = pool();
    let err = MimicProcessor::new()
        .process(&mut pool, &config(MimicDirective::new("a.Dst", "a.Dst")))
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Config(ref errors)
            if matches!(errors.as_slice(), [ConfigValidationError::SelfMimic { .. }])
    ));
    assert_eq!(pool.get("a.Dst"), Some(&destination()));
}
