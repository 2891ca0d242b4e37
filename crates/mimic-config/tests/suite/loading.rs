use std::io::Write as _;

use mimic_config::{ConfigError, LoggingConfig, MimicConfig};
use mimic_model::{MethodOverride, MimicMode, MissingCallSitePolicy};
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
[logging]
level = "debug"
json = true

[[mimic]]
target = "com.example.Example"
source = "com.example.ExampleTemplate"
key = "tpl"
default_mode = "before_super"
mimic_constructors = false
missing_call_site = "skip"

[[mimic.methods]]
name = "doStuff"
mode = "before"
insertion_point = "bar"

[[mimic.methods]]
name = "isReady"
mode = "before_return"
"#;

#[test]
fn loads_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let config = MimicConfig::load_from_path(file.path()).unwrap();
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".into(),
            json: true,
            stderr: true,
        }
    );

    let directive = config.directive_for("com.example.Example").unwrap();
    assert_eq!(directive.source, "com.example.ExampleTemplate");
    assert_eq!(directive.key.as_deref(), Some("tpl"));
    assert_eq!(directive.default_mode, MimicMode::BeforeSuper);
    assert!(directive.mimic_interfaces && directive.mimic_fields && directive.mimic_methods);
    assert!(!directive.mimic_constructors);
    assert_eq!(directive.missing_call_site, MissingCallSitePolicy::Skip);
    assert_eq!(
        directive.methods,
        vec![
            MethodOverride::new("doStuff", MimicMode::Before).with_insertion_point("bar"),
            MethodOverride::new("isReady", MimicMode::BeforeReturn),
        ]
    );

    let composition = directive.composition_config();
    assert_eq!(composition.clone_name("doStuff"), "copy_tpl_doStuff");
    assert_eq!(composition.missing_call_site(), MissingCallSitePolicy::Skip);
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mimic.toml");

    let err = MimicConfig::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("mimic.toml"), "{err}");
}

#[test]
fn unknown_modes_are_rejected() {
    let err = MimicConfig::load_from_str(
        r#"
[[mimic]]
target = "a.Dst"
source = "a.Src"
default_mode = "sideways"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(!err.to_string().contains("sideways"), "{err}");
}

#[test]
fn empty_config_is_valid() {
    let config = MimicConfig::load_from_str("").unwrap();
    assert_eq!(config, MimicConfig::default());
    assert!(config.validate().errors.is_empty());
}
