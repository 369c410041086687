use geonav_kernel::config::load_config;
use geonav_kernel::domain::config::NavigatorConfig;
use serial_test::serial;
use std::io::Write;

#[test]
#[serial]
fn file_values_are_layered_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[service]\nbase_url = \"http://regions:9000\"\n\n[navigation]\ndefault_hierarchy = 4")?;

    let cfg: NavigatorConfig = load_config(Some(file.path()))?;
    assert_eq!(cfg.service.base_url, "http://regions:9000");
    assert_eq!(cfg.service.timeout_seconds, 10);
    assert_eq!(cfg.navigation.default_hierarchy, Some(4));
    Ok(())
}

#[test]
#[serial]
fn json_files_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(file, r#"{{ "log": {{ "level": "debug", "directives": ["geonav_navigation=trace"] }} }}"#)?;

    let cfg: NavigatorConfig = load_config(Some(file.path()))?;
    assert_eq!(cfg.log.level, "debug");
    assert_eq!(cfg.log.directives, vec!["geonav_navigation=trace".to_owned()]);
    assert!(cfg.log.console);
    Ok(())
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let result = load_config::<NavigatorConfig>(Some("/definitely/not/here/geonav.toml"));
    assert!(result.is_err());
}
