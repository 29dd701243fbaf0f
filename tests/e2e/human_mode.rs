//! Human-mode end-to-end tests.

use crate::assertions::{assert_contains_all, assert_no_ansi, assert_not_json};
use crate::cli::CliRunner;
use crate::common::fixtures::{TestHome, lit_scene};

#[test]
fn human_quick_start_is_text() {
    let home = TestHome::new();
    let cli = CliRunner::new().with_home(home.path());
    let result = cli.run(&[]);
    result.assert_success();

    assert_not_json(&result.stdout);
    assert_contains_all(&result.stdout, &["QUICK START", "lrig publish", "--robot"]);
}

#[test]
fn human_asset_list_shows_versions() {
    let home = TestHome::new();
    let session = home.session();
    session.publish(&lit_scene(1), "rigA", "", None).unwrap();
    session.publish(&lit_scene(1), "rigA", "", None).unwrap();

    let cli = CliRunner::new()
        .with_home(home.path())
        .with_env("NO_COLOR", "1");
    let result = cli.run(&["assets"]);
    result.assert_success().assert_stdout_matches(r"rigA\s+v2");

    assert_not_json(&result.stdout);
    assert_contains_all(&result.stdout, &["rigA", "v2", "(2 versions)"]);
}

#[test]
fn human_no_color_has_no_ansi() {
    let home = TestHome::new();
    home.session()
        .publish(&lit_scene(1), "rigA", "", None)
        .unwrap();

    let cli = CliRunner::new()
        .with_home(home.path())
        .with_env("NO_COLOR", "1");
    let result = cli.run(&["versions", "rigA"]);
    result.assert_success();

    assert_no_ansi(&result.stdout);
    assert_contains_all(&result.stdout, &["v1", "(latest)"]);
}

#[test]
fn human_error_has_suggestion() {
    let home = TestHome::new();
    let cli = CliRunner::new()
        .with_home(home.path())
        .with_env("NO_COLOR", "1");
    let result = cli.run(&["load", "ghost", "--scene", "missing.json"]);

    result
        .assert_failure()
        .assert_stderr_contains("[ERR]")
        .assert_stderr_contains("Suggestion:");
}
