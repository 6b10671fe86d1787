use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const ROSTER_YAML: &str = r#"npcs:
  - id: "001"
    name: Mira
  - id: "002"
    name: Osk
players:
  - id: p1
    name: Ash
"#;

fn write_roster(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("roster.yaml");
    fs::write(&path, ROSTER_YAML).expect("failed to write roster");
    path
}

/// Runs the console with `input` piped to stdin.
fn run_console(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_persona-console"))
        .args(args)
        .arg("--no-color")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start persona-console");

    // The console may exit before reading everything (e.g. a bad roster).
    let mut stdin = child.stdin.take().expect("stdin is piped");
    let _ = stdin.write_all(input.as_bytes());
    drop(stdin);
    child.wait_with_output().expect("failed to wait for persona-console")
}

fn stdout(output: &Output) -> String {
    persona_console::strip_ansi(&String::from_utf8_lossy(&output.stdout))
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("temp path is utf-8")
}

#[test]
fn help_lists_builtin_commands_sorted() {
    let output = run_console(&[], "help\nend\n");
    assert!(output.status.success());

    let text = stdout(&output);
    let end = text.find("end - Shut the console down").unwrap();
    let help = text.find("help - List the available commands").unwrap();
    let session = text.find("session - Show or change").unwrap();
    assert!(end < help && help < session);
    assert!(text.contains("[INFO] -> Shutting down"));
}

#[test]
fn help_for_unknown_command_warns() {
    let output = run_console(&[], "help nope\n");
    assert!(output.status.success());
    assert!(stdout(&output).contains("[WARNING] -> 'nope' is not a valid command"));
}

#[test]
fn bogus_command_is_not_implemented() {
    let output = run_console(&[], "bogus\nend\n");
    assert!(output.status.success());
    assert!(stdout(&output).contains("[WARNING] -> Command 'bogus' is not implemented"));
}

#[test]
fn session_switch_with_roster() {
    let dir = TempDir::new().unwrap();
    let roster = write_roster(&dir);

    let output = run_console(
        &["--roster", arg(&roster)],
        "session switch --npc \"001\"\nsession switch --npc \"999\"\nsession info\nend\n",
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Loading roster - DONE"));
    assert!(text.contains("[INFO] -> Session: npc = Mira (001), player = none"));
    assert!(text.contains("[WARNING] -> no npc found with id: 999"));
    assert_eq!(
        text.matches("Session: npc = Mira (001), player = none").count(),
        2
    );
}

#[test]
fn config_sets_prompt_and_relative_roster() {
    let dir = TempDir::new().unwrap();
    write_roster(&dir);
    let config = dir.path().join("console.yaml");
    fs::write(&config, "prompt: \"persona> \"\nroster: roster.yaml\n").unwrap();

    let output = run_console(
        &["--config", arg(&config)],
        "session switch --player \"p1\"\n",
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("persona> "));
    assert!(text.contains("player = Ash (p1)"));
}

#[test]
fn prompt_flag_overrides_config() {
    let output = run_console(&["--prompt", "$$ "], "end\n");
    assert!(output.status.success());
    assert!(stdout(&output).contains("$$ "));
}

#[test]
fn missing_roster_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.yaml");

    let output = run_console(&["--roster", arg(&missing)], "end\n");
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Loading roster - ERR"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: failed to load roster"));
}

#[test]
fn unsupported_roster_extension_fails() {
    let dir = TempDir::new().unwrap();
    let roster = dir.path().join("roster.txt");
    fs::write(&roster, ROSTER_YAML).unwrap();

    let output = run_console(&["--roster", arg(&roster)], "end\n");
    assert!(!output.status.success());
}
