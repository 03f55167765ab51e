//! E2E tests for the parse and import commands
//!
//! These tests write a checklist workbook to a temp directory and run the
//! built `isoplan` binary against it.

use std::path::{Path, PathBuf};
use std::process::Command;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn isoplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_isoplan"))
}

/// Write rows to `<dir>/<name>`; empty strings leave the cell blank
fn write_workbook(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    let path = dir.join(name);
    workbook.save(&path).unwrap();
    path
}

fn checklist(dir: &Path) -> PathBuf {
    write_workbook(
        dir,
        "checklist.xlsx",
        &[
            &["Implementation checklist"],
            &["No.", "Task", "Owner", "Status"],
            &["1", "Planning", "", ""],
            &["1.1", "Kickoff", "", ""],
            &["1.1.1", "Draft Charter", "Maria", "In Progress"],
            &["2.3.1", "Risk register", "", "Done"],
        ],
    )
}

/// Run isoplan and return (exit_code, stdout, stderr)
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(isoplan_binary())
        .args(args)
        .env_remove("ISOPLAN_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute isoplan");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (exit_code, stdout, stderr)
}

// =============================================================================
// parse
// =============================================================================

#[test]
fn parse_prints_tree() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());

    let (code, stdout, stderr) = run(&["parse", file.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("1. Planning"));
    assert!(stdout.contains("  1.1. Kickoff"));
    assert!(stdout.contains("[IN_PROGRESS/HIGH] 1.1.1 Draft Charter (Maria)"));
    assert!(stdout.contains("2. Phase *"));
    assert!(stdout.contains("2.3. Subphase *"));
    assert!(stdout.contains("Header row: 2"));
}

#[test]
fn parse_json_output() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());

    let (code, stdout, _) = run(&["parse", file.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["phases"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["phases"][1]["subPhases"][0]["tasks"][0]["priority"],
        "LOW"
    );
    assert_eq!(json["stats"]["headerRow"], 1);
}

#[test]
fn parse_with_explicit_columns() {
    let dir = TempDir::new().unwrap();
    let file = write_workbook(
        dir.path(),
        "plain.xlsx",
        &[&["Ref", "What"], &["7", "Closeout"], &["7.1.1", "Archive"]],
    );

    let (code, stdout, _) = run(&[
        "parse",
        file.to_str().unwrap(),
        "--header-row",
        "1",
        "--id-column",
        "Ref",
        "--name-column",
        "What",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("7. Closeout"));
    assert!(stdout.contains("7.1.1 Archive"));
}

#[test]
fn column_flags_need_header_row() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());

    let (code, stdout, stderr) = run(&[
        "parse",
        file.to_str().unwrap(),
        "--status-column",
        "State",
    ]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("--header-row"), "stderr: {stderr}");
}

#[test]
fn parse_with_config_file() {
    let dir = TempDir::new().unwrap();
    let file = write_workbook(
        dir.path(),
        "clauses.xlsx",
        &[&["Clause", "Control"], &["6", "Planning"]],
    );
    let config = dir.path().join("isoplan.toml");
    std::fs::write(
        &config,
        "header_keywords = [\"clause\"]\n\n[columns]\nhierarchy_id = [\"Clause\"]\ntask_name = [\"Control\"]\n",
    )
    .unwrap();

    let (code, stdout, _) = run(&[
        "parse",
        file.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("6. Planning"));
}

#[test]
fn parse_missing_file_fails() {
    let (code, _, stderr) = run(&["parse", "/nonexistent/checklist.xlsx"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn parse_corrupt_file_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.xlsx");
    std::fs::write(&file, b"this is not a workbook").unwrap();

    let (code, _, stderr) = run(&["parse", file.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unreadable workbook"));
}

// =============================================================================
// import
// =============================================================================

#[test]
fn import_resolves_consultants() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());
    let consultants = dir.path().join("consultants.json");
    std::fs::write(
        &consultants,
        r#"[{"userId":"u-42","firstName":"Maria","lastName":"Rossi","email":"maria@example.com"}]"#,
    )
    .unwrap();

    let (code, stdout, stderr) = run(&[
        "import",
        file.to_str().unwrap(),
        "--project-id",
        "acme-iso",
        "--consultants",
        consultants.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Imported into acme-iso: 2 phases, 2 sub-phases, 2 tasks"));
    assert!(stdout.contains("(Maria -> u-42)"));
    assert!(stdout.contains("Assignees: 1 resolved, 0 unresolved"));
}

#[test]
fn import_json_attaches_project() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());

    let (code, stdout, _) = run(&[
        "import",
        file.to_str().unwrap(),
        "--project-id",
        "acme-iso",
        "--format",
        "json",
    ]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["summary"]["created"]["tasks"], 2);
    assert_eq!(json["summary"]["assignees"]["unresolved"], 1);
    assert_eq!(json["phases"][0]["projectId"], "acme-iso");
}

#[test]
fn import_requires_project_id() {
    let dir = TempDir::new().unwrap();
    let file = checklist(dir.path());
    let (code, _, _) = run(&["import", file.to_str().unwrap()]);
    assert_ne!(code, 0);
}
