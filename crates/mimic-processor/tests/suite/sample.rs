use mimic_config::MimicConfig;
use mimic_core::ConstructorOutcome;
use mimic_processor::{MemoryTypePool, MimicProcessor, TypePool};
use mimic_test_utils::Interpreter;
use pretty_assertions::assert_eq;

const POOL: &str = r#"[
    {
        "name": "com.example.sample.ExampleAncestor",
        "fields": [{ "name": "calls", "ty": { "primitive": "int" }, "modifiers": 4 }],
        "methods": [
            {
                "name": "doStuff",
                "modifiers": 1,
                "body": [
                    { "expr": { "assign": { "target": { "field": "calls" }, "op": "add", "value": { "literal": { "int": 1 } } } } }
                ]
            }
        ]
    },
    {
        "name": "com.example.sample.ExampleTemplate",
        "fields": [{ "name": "trace", "ty": { "primitive": "int" }, "modifiers": 2 }],
        "constructors": [
            {
                "modifiers": 1,
                "body": [
                    { "expr": { "assign": { "target": { "field": "trace" }, "op": "add", "value": { "literal": { "int": 1 } } } } }
                ]
            }
        ],
        "methods": [
            {
                "name": "doStuff",
                "modifiers": 1,
                "body": [
                    { "expr": { "assign": { "target": { "field": "trace" }, "op": "add", "value": { "literal": { "int": 10 } } } } }
                ]
            },
            {
                "name": "doOtherStuff",
                "modifiers": 1,
                "body": [
                    { "expr": { "assign": { "target": { "field": "trace" }, "op": "add", "value": { "literal": { "int": 100 } } } } }
                ]
            }
        ]
    },
    {
        "name": "com.example.sample.Example",
        "superclass": "com.example.sample.ExampleAncestor",
        "constructors": [{ "modifiers": 1 }],
        "methods": [
            {
                "name": "doStuff",
                "modifiers": 1,
                "body": [
                    { "expr": { "call": { "callee": "doStuff", "dispatch": "super" } } }
                ]
            }
        ]
    }
]"#;

const CONFIG: &str = r#"
[[mimic]]
target = "com.example.sample.Example"
source = "com.example.sample.ExampleTemplate"
"#;

#[test]
fn example_mimics_its_template() {
    let mut pool = MemoryTypePool::from_json(POOL).unwrap();
    let config = MimicConfig::load_from_str(CONFIG).unwrap();

    let report = MimicProcessor::new().process(&mut pool, &config).unwrap();
    assert_eq!(report.types.len(), 1);
    let composition = &report.types[0].composition;
    assert_eq!(composition.fields, vec!["trace".to_string()]);
    assert!(matches!(
        composition.constructors.as_slice(),
        [ConstructorOutcome::Chained { clone, .. }] if clone == "copy_ExampleTemplate"
    ));
    assert_eq!(composition.methods.len(), 2);

    let example = pool.get("com.example.sample.Example").unwrap();
    assert_eq!(example.inherited.methods.len(), 1);
    assert_eq!(
        example.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["doStuff", "copy_ExampleTemplate", "copy_doStuff", "doOtherStuff"]
    );

    let interp = Interpreter::new(pool.iter().cloned());
    let mut obj = interp
        .instantiate("com.example.sample.Example", vec![])
        .unwrap();
    assert_eq!(obj.int("trace"), 1);
    interp.invoke(&mut obj, "doStuff", vec![]).unwrap();
    assert_eq!((obj.int("calls"), obj.int("trace")), (1, 11));
    interp.invoke(&mut obj, "doOtherStuff", vec![]).unwrap();
    assert_eq!(obj.int("trace"), 111);
}

#[test]
fn processed_pool_round_trips_through_json() {
    let mut pool = MemoryTypePool::from_json(POOL).unwrap();
    let config = MimicConfig::load_from_str(CONFIG).unwrap();
    MimicProcessor::new().process(&mut pool, &config).unwrap();

    let reloaded = MemoryTypePool::from_json(&pool.to_json().unwrap()).unwrap();
    assert_eq!(
        reloaded.get("com.example.sample.Example"),
        pool.get("com.example.sample.Example")
    );
}
