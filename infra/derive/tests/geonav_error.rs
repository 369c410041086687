#[test]
fn geonav_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/geonav_error_pass.rs");
    t.pass("tests/ui/geonav_error_context.rs");
}
