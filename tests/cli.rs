//! Integration tests for the hisab command line

use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_hisab"))
        // Tests must be deterministic and not depend on a user's ~/.config/hisab/config.toml.
        .arg("--no-config")
        .args(args)
        .env_remove("HISAB_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_multiply_columns() {
    let (stdout, _, code) = run_command(&[
        "-s", "A1=10", "-s", "B1=5", "-s", "A2=20", "-s", "B2=8", "-s", "A3=15", "-s", "B3=3",
        "-e", "a*b",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Operation A*B executed successfully!"));
    assert!(stdout.contains("1 | 10 | 5 |  50"));
    assert!(stdout.contains("2 | 20 | 8 | 160"));
    assert!(stdout.contains("3 | 15 | 3 |  45"));
}

#[test]
fn test_column_sum_message() {
    let (stdout, _, code) = run_command(&[
        "-q", "-s", "A1=10", "-s", "A2=20", "-s", "A3=15", "-c", "A:sum",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Sum of column A: 45");
}

#[test]
fn test_row_operation_then_sum() {
    let (stdout, _, code) = run_command(&[
        "-q", "-s", "A2=4", "-s", "B2=6", "-r", "2:multiply:2", "-r", "2:sum",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Applied multiply 2 to row 2", "Sum of row 2: 20"]);
}

#[test]
fn test_invalid_formula_exits_with_error() {
    let (_, stderr, code) = run_command(&["-e", "A+"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid operation format"));
}

#[test]
fn test_invalid_operand_exits_with_error() {
    let (stdout, stderr, code) = run_command(&["-s", "A1=1", "-c", "A:add:ten"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid value for operation"));
    assert!(!stdout.contains("Applied"));
}

#[test]
fn test_divide_by_zero_is_not_an_error() {
    let (stdout, _, code) = run_command(&["-q", "-s", "A1=9", "-e", "A/B", "-c", "A:divide:0"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Applied divide 0 to column A"));
}

#[test]
fn test_csv_round_trip_and_share() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "10,5\n20,8\n").unwrap();

    let share_dir = dir.path().join("share");
    let (stdout, _, code) = run_command(&[
        input.to_str().unwrap(),
        "-q",
        "-e",
        "A+B",
        "--labeled",
        "-o",
        output.to_str().unwrap(),
        "--share",
        share_dir.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Sharing my Hisab spreadsheet data!"));

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(contents, ",A,B,C\n1,10,5,15\n2,20,8,28\n");

    let bundles: Vec<_> = std::fs::read_dir(&share_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
        .collect();
    assert_eq!(bundles.len(), 1);
}

#[test]
fn test_share_empty_grid_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_command(&["-q", "--share", dir.path().to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No values to share"));
}
