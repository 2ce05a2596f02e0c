use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Project with only a package manifest
fn minimal_project() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"name": "test-project"}"#).unwrap();
    dir
}

/// Project with the workflow directories and default steering documents
fn workflow_project() -> TempDir {
    let dir = minimal_project();
    let steering = dir.path().join(".kiro/steering");
    fs::create_dir_all(&steering).unwrap();
    fs::create_dir_all(dir.path().join(".kiro/specs/feature1")).unwrap();
    fs::create_dir_all(dir.path().join(".kiro/specs/feature2")).unwrap();
    for name in ["product.md", "tech.md", "structure.md"] {
        fs::write(steering.join(name), "# Default").unwrap();
    }
    dir
}

fn sdd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sdd").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn stdout_of(dir: &Path, args: &[&str]) -> String {
    let output = sdd(dir).args(args).output().unwrap();
    assert!(output.status.success(), "sdd {:?} failed", args);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn version_flags_print_bare_version() {
    let dir = tempdir().unwrap();
    for flag in ["--version", "-v"] {
        sdd(dir.path())
            .arg(flag)
            .assert()
            .success()
            .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn help_is_shown_without_command() {
    let dir = tempdir().unwrap();
    for args in [vec![], vec!["--help"], vec!["-h"]] {
        sdd(dir.path())
            .args(&args)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("sdd v"))
            .stdout(predicate::str::contains("COMMANDS:"))
            .stdout(predicate::str::contains("check-file <path>"));
    }
}

#[test]
fn unknown_command_exits_with_error() {
    let dir = tempdir().unwrap();
    sdd(dir.path())
        .arg("unknown-command")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Unknown command: unknown-command"))
        .stderr(predicate::str::contains("sdd --help"));
}

#[test]
fn check_file_without_path_reports_not_found() {
    let dir = tempdir().unwrap();
    sdd(dir.path())
        .arg("check-file")
        .assert()
        .success()
        .stdout("📝 Not found - Will be created\n");
}

#[test]
fn missing_argument_is_a_handler_failure() {
    let dir = tempdir().unwrap();
    sdd(dir.path())
        .arg("list-spec-dir")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error executing list-spec-dir"));
}

#[test]
fn double_dash_is_an_unknown_command() {
    let dir = tempdir().unwrap();
    sdd(dir.path())
        .args(["--", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: --"));
}

#[cfg(unix)]
#[test]
fn non_utf8_command_exits_with_one() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    sdd(dir.path())
        .arg(OsStr::from_bytes(b"find-\xffdocs"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: find-\u{FFFD}docs"));
}

#[test]
fn list_spec_dir_normalizes_parent_components() {
    let dir = workflow_project();
    sdd(dir.path())
        .args(["list-spec-dir", "../missing"])
        .assert()
        .success()
        .stdout("Directory not found: .kiro/missing\n");

    let listing = stdout_of(dir.path(), &["list-spec-dir", "../steering"]);
    assert_eq!(listing.lines().count(), 3);
    assert!(listing.lines().any(|l| l.ends_with(" product.md")));
}

#[test]
fn check_file_reports_existence() {
    let dir = minimal_project();
    sdd(dir.path())
        .args(["check-file", "package.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ EXISTS"));
    sdd(dir.path())
        .args(["check-file", "non-existing.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("📝 Not found"));
}

#[test]
fn steering_counts_keep_their_asymmetry() {
    let dir = minimal_project();
    assert_eq!(stdout_of(dir.path(), &["count-custom-steering-number"]), "0\n");
    assert_eq!(
        stdout_of(dir.path(), &["count-custom-steering"]),
        "📋 No steering directory yet\n"
    );
}

#[test]
fn custom_steering_files_are_counted_and_listed() {
    let dir = workflow_project();
    let steering = dir.path().join(".kiro/steering");
    assert_eq!(stdout_of(dir.path(), &["count-custom-steering"]), "📋 No custom files\n");

    for name in ["api.md", "security.md", "performance.md"] {
        fs::write(steering.join(name), "# Custom").unwrap();
    }

    assert_eq!(stdout_of(dir.path(), &["count-custom-steering-number"]), "3\n");
    assert_eq!(
        stdout_of(dir.path(), &["count-custom-steering"]),
        "🔧 3 custom file(s) found - Will be preserved\n"
    );

    let listing = stdout_of(dir.path(), &["list-steering-files"]);
    let names: Vec<&str> = listing
        .lines()
        .map(|line| line.rsplit(' ').next().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["api.md", "performance.md", "product.md", "security.md", "structure.md", "tech.md"]
    );
}

#[test]
fn find_project_files_in_empty_project() {
    let dir = minimal_project();
    assert_eq!(stdout_of(dir.path(), &["find-project-files"]), "No source files found\n");
}

#[test]
fn finders_walk_the_project() {
    let dir = workflow_project();
    let root = dir.path();
    for sub in ["src/api", "src/auth", "test/unit", "docs", "node_modules/lib/test"] {
        fs::create_dir_all(root.join(sub)).unwrap();
    }
    for (path, body) in [
        ("README.md", "# Test Project"),
        ("app.js", "console.log('app');"),
        (".eslintrc", "{}"),
        ("jest.config.js", "module.exports = {};"),
        ("src/index.ts", "export default {};"),
        ("src/api/routes.js", "// routes"),
        ("src/babel.config.js", "module.exports = {};"),
        ("test/app.test.js", "// tests"),
        ("docs/API.md", "# API"),
        ("node_modules/lib/index.js", "// vendored"),
    ] {
        fs::write(root.join(path), body).unwrap();
    }

    let sources = stdout_of(root, &["find-project-files"]);
    assert!(sources.lines().any(|l| l == "src/api/routes.js"));
    assert!(sources.lines().any(|l| l == "test/app.test.js"));
    assert!(!sources.contains("node_modules"));

    let docs = stdout_of(root, &["find-docs"]);
    assert!(docs.lines().any(|l| l == "docs/API.md"));
    assert!(!docs.contains(".kiro"));

    let special = stdout_of(root, &["find-special-dirs"]);
    for expected in [".kiro/specs", "src/api", "src/auth", "test"] {
        assert!(special.lines().any(|l| l == expected), "missing {}", expected);
    }
    assert!(!special.contains("node_modules"));

    let patterns = stdout_of(root, &["find-config-patterns"]);
    for expected in [".eslintrc", "jest.config.js", "src/babel.config.js"] {
        assert!(patterns.lines().any(|l| l == expected), "missing {}", expected);
    }

    assert_eq!(stdout_of(root, &["find-config-files"]), "package.json\n");
}

#[test]
fn spec_listings_and_active_specs() {
    let dir = minimal_project();
    let root = dir.path();

    assert_eq!(stdout_of(root, &["find-active-specs"]), "");
    assert_eq!(stdout_of(root, &["list-all-specs"]), "No specs directory found\n");
    sdd(root)
        .args(["list-spec-dir", "feature9"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".kiro/specs/feature9"));

    let specs = root.join(".kiro/specs");
    fs::create_dir_all(specs.join("feature1")).unwrap();
    fs::create_dir_all(specs.join("feature2")).unwrap();
    fs::write(
        specs.join("feature1/spec.json"),
        r#"{"implementation_ready": true, "name": "Feature 1"}"#,
    )
    .unwrap();
    fs::write(
        specs.join("feature2/spec.json"),
        r#"{"implementation_ready": false, "name": "Feature 2"}"#,
    )
    .unwrap();

    assert_eq!(
        stdout_of(root, &["find-active-specs"]),
        ".kiro/specs/feature1/spec.json\n"
    );
    assert_eq!(stdout_of(root, &["list-all-specs"]).lines().count(), 2);
    assert!(stdout_of(root, &["list-spec-dir", "feature1"]).contains(" spec.json"));
}

#[test]
fn ls_dir_lists_pseudo_entries() {
    let dir = minimal_project();
    let listing = stdout_of(dir.path(), &["ls-dir"]);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" ."));
    assert!(lines[1].ends_with(" .."));
    assert!(lines[2].ends_with(" package.json"));

    assert_eq!(
        stdout_of(dir.path(), &["ls-dir", "missing"]),
        "Directory not found: missing\n"
    );
}

#[test]
fn git_queries_outside_repository() {
    let dir = minimal_project();
    assert_eq!(
        stdout_of(dir.path(), &["get-last-steering-commit"]),
        "No previous steering commits\n"
    );
    assert_eq!(
        stdout_of(dir.path(), &["get-commits-since-steering"]),
        "No previous steering update found\n"
    );
    assert_eq!(stdout_of(dir.path(), &["get-git-status"]), "Not a git repository\n");
}
