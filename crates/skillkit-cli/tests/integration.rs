use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn skillkit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("skillkit").unwrap();
    cmd.current_dir(dir.path())
        .env("SKILLKIT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn add_skill(dir: &TempDir, name: &str, description: &str) {
    let d = dir.path().join("skills").join(name);
    std::fs::create_dir_all(&d).unwrap();
    std::fs::write(
        d.join("SKILL.md"),
        format!("---\nname: {name}\ndescription: {description}\nversion: 1.0.0\n---\n\n# {name}\n"),
    )
    .unwrap();
}

fn registry(dir: &TempDir) -> serde_json::Value {
    read_json(&dir.path().join("registry.json"))
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn write_registry(dir: &TempDir, value: serde_json::Value) {
    std::fs::write(
        dir.path().join("registry.json"),
        serde_json::to_string_pretty(&value).unwrap(),
    )
    .unwrap();
}

fn skill_names(value: &serde_json::Value) -> Vec<String> {
    value["categories"]["skill"]
        .as_array()
        .map(|a| a.iter().map(|r| r["name"].as_str().unwrap().to_string()).collect())
        .unwrap_or_default()
}

fn record(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "description": format!("The {name} skill"),
        "path": format!("skills/{name}/SKILL.md"),
        "tags": [],
        "category": "skill"
    })
}

// ---------------------------------------------------------------------------
// skillkit validate / sync
// ---------------------------------------------------------------------------

#[test]
fn validate_reports_missing_then_sync_fixes_it() {
    let dir = TempDir::new().unwrap();
    for n in ["a", "b", "c"] {
        add_skill(&dir, n, "Does useful things");
    }
    write_registry(
        &dir,
        serde_json::json!({ "version": "1.0.0", "categories": { "skill": [record("a"), record("b")] } }),
    );

    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing: c"))
        .stdout(predicate::str::contains("errors (1):"));

    skillkit(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced skill: +1 -0 =2"));

    assert_eq!(skill_names(&registry(&dir)), vec!["a", "b", "c"]);
    skillkit(&dir).arg("validate").assert().success();
}

#[test]
fn fix_is_an_alias_for_sync() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    skillkit(&dir).arg("fix").assert().success();
    assert_eq!(skill_names(&registry(&dir)), vec!["a"]);
}

#[test]
fn orphaned_entry_is_removed_by_sync() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    write_registry(
        &dir,
        serde_json::json!({ "categories": { "skill": [record("a"), record("d")] } }),
    );

    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("orphaned: d"));

    skillkit(&dir).arg("sync").assert().success();
    assert_eq!(skill_names(&registry(&dir)), vec!["a"]);
}

#[test]
fn dangling_reference_fails_even_after_sync() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "x", "Uses an MCP server");
    let mut x = record("x");
    x["requires"] = serde_json::json!([{ "category": "mcp", "id": "missing-mcp" }]);
    write_registry(&dir, serde_json::json!({ "categories": { "skill": [x] } }));

    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("dangling reference x -> missing-mcp"));

    skillkit(&dir)
        .arg("sync")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("dangling reference x -> missing-mcp"));
}

#[test]
fn empty_description_is_warning_only() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    let mut a = record("a");
    a["description"] = serde_json::json!("");
    write_registry(&dir, serde_json::json!({ "categories": { "skill": [a] } }));

    skillkit(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty description: skill/a"))
        .stdout(predicate::str::contains("validation passed"));
}

#[test]
fn sync_preserves_curated_fields() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    add_skill(&dir, "b", "Beta");
    let mut a = record("a");
    a["tags"] = serde_json::json!(["curated", "by-hand"]);
    a["requires"] = serde_json::json!([{ "category": "skill", "id": "b" }]);
    a["maintainer"] = serde_json::json!("docs-team");
    write_registry(
        &dir,
        serde_json::json!({ "owner": "platform", "categories": { "skill": [a.clone()] } }),
    );

    skillkit(&dir).arg("sync").assert().success();

    let after = registry(&dir);
    let a_after = &after["categories"]["skill"][0];
    assert_eq!(a_after["tags"], a["tags"]);
    assert_eq!(a_after["requires"], a["requires"]);
    assert_eq!(a_after["maintainer"], "docs-team");
    assert_eq!(after["owner"], "platform");
    assert!(after["lastUpdated"].is_string());
}

#[test]
fn second_sync_leaves_registry_untouched() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    skillkit(&dir).arg("sync").assert().success();
    let first = std::fs::read_to_string(dir.path().join("registry.json")).unwrap();

    skillkit(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced").not());
    let second = std::fs::read_to_string(dir.path().join("registry.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn doc_count_drift_warns() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    add_skill(&dir, "b", "Beta");
    std::fs::write(dir.path().join("README.md"), "# Library\n\nShips 12 Skills.\n").unwrap();

    skillkit(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md:3 claims 12 Skills, registry has 2"));
}

#[test]
fn case_collision_warns_on_sync() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "Foo", "Upper");
    add_skill(&dir, "foo", "Lower");
    let assert = skillkit(&dir).arg("sync").assert().success();
    let both_present = std::fs::read_dir(dir.path().join("skills")).unwrap().count() == 2;
    if both_present {
        assert.stdout(predicate::str::contains("duplicate id collision, skipped: foo"));
        assert_eq!(skill_names(&registry(&dir)), vec!["Foo"]);
    }
}

#[test]
fn template_placeholder_is_ignored() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "_TEMPLATE", "[Description]");
    add_skill(&dir, "real", "A real skill");
    skillkit(&dir).arg("sync").assert().success();
    assert_eq!(skill_names(&registry(&dir)), vec!["real"]);
}

#[test]
fn broken_registry_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("registry.json"), "{ \"categories\": ").unwrap();
    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("registry.json"))
        .stderr(predicate::str::contains("not valid JSON"));
    skillkit(&dir).arg("sync").assert().code(2);
}

#[test]
fn validate_json_output() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    let output = skillkit(&dir)
        .args(["validate", "--json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["pass"], false);
    assert_eq!(report["findings"][0]["severity"], "error");
    assert_eq!(report["findings"][0]["message"], "missing: a");
    assert_eq!(report["findings"][0]["category"], "skill");
}

// ---------------------------------------------------------------------------
// Multiple manifests
// ---------------------------------------------------------------------------

#[test]
fn all_manifests_for_a_category_are_updated() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".skillkit")).unwrap();
    std::fs::write(
        dir.path().join(".skillkit/config.yaml"),
        r#"
categories:
  skill:
    root: skills
    layout:
      type: directory
      descriptor: SKILL.md
manifests:
  - path: registry.json
    categories: [skill]
  - path: skills/skill-registry.json
    categories: [skill]
docs: []
"#,
    )
    .unwrap();
    add_skill(&dir, "a", "Alpha");
    add_skill(&dir, "b", "Beta");

    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("skills/skill-registry.json"));

    skillkit(&dir).arg("sync").assert().success();
    let main = registry(&dir);
    let side = read_json(&dir.path().join("skills/skill-registry.json"));
    assert_eq!(skill_names(&main), vec!["a", "b"]);
    assert_eq!(skill_names(&main), skill_names(&side));
}

#[test]
fn indexed_category_without_root_fails_the_gate() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".skillkit")).unwrap();
    std::fs::write(
        dir.path().join(".skillkit/config.yaml"),
        r#"
categories:
  skill:
    root: skills
    layout:
      type: directory
      descriptor: SKILL.md
manifests:
  - path: registry.json
    categories: [skill, tool]
docs: []
"#,
    )
    .unwrap();
    add_skill(&dir, "a", "Alpha");
    let mut ghost = record("ghost");
    ghost["category"] = serde_json::json!("tool");
    write_registry(
        &dir,
        serde_json::json!({ "categories": { "skill": [record("a")], "tool": [ghost] } }),
    );

    skillkit(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("orphaned: ghost"))
        .stdout(predicate::str::contains("category 'tool' which has no content root"));

    skillkit(&dir)
        .arg("sync")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("synced tool: +0 -1 =0"));
    assert!(registry(&dir)["categories"]["tool"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// skillkit init / list / status / hook / config
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .skillkit/config.yaml"));
    assert!(dir.path().join(".skillkit/config.yaml").exists());

    skillkit(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_with_hook_needs_git() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir).args(["init", "--hook"]).assert().code(2);

    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    skillkit(&dir).args(["init", "--hook"]).assert().success();
    assert!(dir.path().join(".git/hooks/pre-commit").exists());
}

#[test]
fn hook_install_refuses_foreign_hook() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".git/hooks")).unwrap();
    std::fs::write(dir.path().join(".git/hooks/pre-commit"), "#!/bin/sh\nmake lint\n").unwrap();

    skillkit(&dir)
        .args(["hook", "install"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    skillkit(&dir).args(["hook", "install", "--force"]).assert().success();
    let script = std::fs::read_to_string(dir.path().join(".git/hooks/pre-commit")).unwrap();
    assert!(script.contains("skillkit validate"));
}

#[test]
fn list_reads_from_registry() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("No registered entries"));

    add_skill(&dir, "pdf-tools", "Extract text from PDFs");
    skillkit(&dir).arg("sync").assert().success();

    skillkit(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf-tools"))
        .stdout(predicate::str::contains("Extract text from PDFs"));

    skillkit(&dir)
        .args(["list", "--category", "mcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf-tools").not());

    skillkit(&dir)
        .args(["list", "--category", "gadget"])
        .assert()
        .code(2);
}

#[test]
fn status_shows_drift() {
    let dir = TempDir::new().unwrap();
    add_skill(&dir, "a", "Alpha");
    let output = skillkit(&dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let status: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let skill = status
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["category"] == "skill")
        .unwrap();
    assert_eq!(skill["on_disk"], 1);
    assert_eq!(skill["manifests"]["registry.json"], 0);
    assert_eq!(skill["in_sync"], false);
}

#[test]
fn config_validate_flags_bad_manifest() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    std::fs::create_dir_all(dir.path().join(".skillkit")).unwrap();
    std::fs::write(
        dir.path().join(".skillkit/config.yaml"),
        "manifests:\n  - path: registry.json\n    categories: [skill, tool]\n",
    )
    .unwrap();
    skillkit(&dir)
        .args(["config", "validate"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("category 'tool'"));
}

#[test]
fn config_show_lists_categories() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("skills/<dir>/SKILL.md"));
}
