//! Black-box tests of the `jobwrap` binary: exit codes, stdout, JSON reports.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// An isolated working directory so no outer config file is discovered.
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

fn jobwrap(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobwrap"));
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("JOBWRAP_QUEUE_HOST")
        .env_remove("JOBWRAP_QUEUE_PORT");
    cmd
}

fn write_config(dir: &TempDir, body: &str) {
    let config_dir = dir.path().join(".jobwrap");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), body).unwrap();
}

fn write_input(dir: &TempDir, payload: &[u8]) -> String {
    let path = dir.path().join("payload.bin");
    fs::write(&path, payload).unwrap();
    path.display().to_string()
}

#[test]
fn test_missing_name_exits_2() {
    let dir = workspace();
    let input = write_input(&dir, b"");
    jobwrap(&dir)
        .args(["run", "--cmd", "true", "--input", &input])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("name"));
}

#[test]
fn test_missing_command_exits_3() {
    let dir = workspace();
    let input = write_input(&dir, b"");
    jobwrap(&dir)
        .args(["run", "--name", "job", "--input", &input])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("command"));
}

#[test]
fn test_invalid_config_file_exits_4() {
    let dir = workspace();
    write_config(&dir, "[worker]\nname = \"job\"\nunknown = 1\n");
    let input = write_input(&dir, b"");
    jobwrap(&dir)
        .args(["run", "--input", &input])
        .assert()
        .code(4);
}

#[test]
fn test_object_storage_input_exits_5() {
    let dir = workspace();
    jobwrap(&dir)
        .args([
            "run",
            "--name",
            "job",
            "--cmd",
            "true",
            "--input",
            "s3://bucket/payload",
        ])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not supported"));
}

#[cfg(unix)]
#[test]
fn test_success_prints_result_on_stdout() {
    let dir = workspace();
    jobwrap(&dir)
        .args([
            "run",
            "--name",
            "echo",
            "--cmd",
            "sh",
            "--arg",
            "-c",
            "--arg",
            "printf '%s|' \"$@\"",
            "--arg",
            "sh",
            "--mode",
            "args",
        ])
        .write_stdin("\"arg with quotes\" second third")
        .assert()
        .success()
        .stdout("arg with quotes|second|third|");
}

#[cfg(unix)]
#[test]
fn test_config_file_drives_run() {
    let dir = workspace();
    write_config(
        &dir,
        r#"
[worker]
name = "b64"
command = "sh"
args = ["-c", "printf %s \"$1\"", "sh"]
mode = "payload"
"#,
    );
    let input = write_input(&dir, b"hello");
    jobwrap(&dir)
        .args(["run", "--input", &input])
        .assert()
        .success()
        .stdout("aGVsbG8=");
}

#[cfg(unix)]
#[test]
fn test_failed_job_exits_70() {
    let dir = workspace();
    let input = write_input(&dir, b"");
    jobwrap(&dir)
        .args([
            "run", "--name", "fail", "--cmd", "sh", "--arg", "-c", "--arg",
            "echo bad >&2; exit 2", "--input", &input,
        ])
        .assert()
        .code(70)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("exit status 2"))
        .stderr(predicate::str::contains("bad"));
}

#[cfg(unix)]
#[test]
fn test_output_file_written() {
    let dir = workspace();
    let input = write_input(&dir, b"");
    let output = dir.path().join("out").join("result.txt");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    jobwrap(&dir)
        .args([
            "run",
            "--name",
            "job",
            "--cmd",
            "sh",
            "--arg",
            "-c",
            "--arg",
            "printf done",
            "--input",
            &input,
            "--output",
            &output.display().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(output).unwrap(), "done");
}

#[cfg(unix)]
#[test]
fn test_json_report() {
    let dir = workspace();
    let input = write_input(&dir, b"");
    let assert = jobwrap(&dir)
        .args([
            "run",
            "--name",
            "job",
            "--id",
            "job-42",
            "--cmd",
            "sh",
            "--arg",
            "-c",
            "--arg",
            "echo w1 >&2; echo w2 >&2; printf ok",
            "--warning-lines",
            "1",
            "--input",
            &input,
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["job_id"], "job-42");
    assert_eq!(report["job_name"], "job");
    assert_eq!(report["status"], "success");
    assert_eq!(report["result"], "ok");
    assert_eq!(report["warnings"], serde_json::json!(["w2"]));
}

#[test]
fn test_config_command_shows_sources() {
    let dir = workspace();
    write_config(&dir, "[worker]\nname = \"resize\"\ncommand = \"sh\"\n");
    jobwrap(&dir)
        .args(["config", "--warning-lines", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resize"))
        .stdout(predicate::str::contains("[CLI]"))
        .stdout(predicate::str::contains("config file ("))
        .stdout(predicate::str::contains("queue: not configured"));
}

#[test]
fn test_config_command_json_with_queue() {
    let dir = workspace();
    let assert = jobwrap(&dir)
        .args(["config", "--json", "--name", "job", "--cmd", "sh"])
        .env("JOBWRAP_QUEUE_HOST", "queue.local")
        .env("JOBWRAP_QUEUE_PORT", "4730")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["values"]["name"]["value"], "job");
    assert_eq!(report["values"]["name"]["source"], "CLI");
    assert_eq!(report["values"]["mode"]["value"], "payload");
    assert_eq!(report["queue"]["host"], "queue.local");
    assert_eq!(report["queue"]["port"], 4730);
}
