use shockvm::vm::config::VmConfig;

#[test]
fn defaults_are_sane() {
    let config = VmConfig::default();
    assert_eq!(config.step_limit, 10_000_000);
    assert_eq!(config.ancestor_limit, 100);
    assert_eq!(config.max_call_depth, 50);
}

#[test]
fn parses_a_full_config() {
    let config = VmConfig::from_toml(
        r#"
step_limit = 5000
ancestor_limit = 10
max_call_depth = 16
float_precision = 2
"#,
    )
    .unwrap();
    assert_eq!(config.step_limit, 5000);
    assert_eq!(config.ancestor_limit, 10);
    assert_eq!(config.max_call_depth, 16);
    assert_eq!(config.float_precision, 2);
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let config = VmConfig::from_toml("step_limit = 42").unwrap();
    assert_eq!(config.step_limit, 42);
    assert_eq!(config.ancestor_limit, 100);
}

#[test]
fn rejects_malformed_toml() {
    assert!(VmConfig::from_toml("step_limit = {").is_err());
}
