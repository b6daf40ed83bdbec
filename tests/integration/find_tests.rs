//! `tabdupe find` driven through `run_app`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tabdupe::cli::Cli;
use tabdupe::error::ExitCode;
use tempfile::{tempdir, TempDir};

use crate::ENV_MUTEX;

const SCENARIO_A: &str = "A,B,C\nc,a,1\nc,a,1.01\ne,c,2\nd,a,3\nd,a,3.01\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempdir().unwrap() }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run `tabdupe -q --config <missing> find <args..>`.
    fn find(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        let config = self.path("no-config.toml");
        let mut argv = vec![
            "tabdupe".to_string(),
            "-q".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "find".to_string(),
        ];
        argv.extend(args.iter().map(|a| (*a).to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();
        tabdupe::run_app(cli)
    }
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_find_json_output() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", SCENARIO_A);
    let out = ws.path("out.json");

    let code = ws
        .find(&[s(&input), "-e", "A,B", "-t", "C", "--atol", "0.02", "--destination", s(&out)])
        .unwrap();
    assert_eq!(code, ExitCode::Success);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        json["duplicates"],
        serde_json::json!([false, true, false, false, true])
    );
    assert_eq!(json["duplicate_rows"], serde_json::json!([1, 4]));
    assert_eq!(json["summary"]["total_rows"], 5);
    assert_eq!(json["summary"]["exit_code_name"], "TD000");
}

#[test]
fn test_find_csv_output_annotated() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", SCENARIO_A);
    let out = ws.path("out.csv");

    ws.find(&[
        s(&input), "-e", "A,B", "-t", "C", "--atol", "0.02", "-o", "csv", "--destination", s(&out),
    ])
    .unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "A,B,C,duplicates\nc,a,1,false\nc,a,1.01,true\ne,c,2,false\nd,a,3,false\nd,a,3.01,true\n"
    );
}

#[test]
fn test_find_csv_output_dropped() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", SCENARIO_A);
    let out = ws.path("clean.csv");

    ws.find(&[
        s(&input), "-e", "A,B", "-t", "C", "--atol", "0.02", "-o", "csv", "--drop",
        "--destination", s(&out),
    ])
    .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "A,B,C\nc,a,1\ne,c,2\nd,a,3\n"
    );
}

#[test]
fn test_find_flags_output() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", "x\n0.1\n0.2\n0.3\n0.4\n");
    let out = ws.path("flags.txt");

    let code = ws
        .find(&[s(&input), "-t", "x", "--atol", "0.2", "-o", "flags", "--destination", s(&out)])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_to_string(&out).unwrap(), "false\ntrue\ntrue\ntrue\n");
}

#[test]
fn test_find_no_duplicates_exit_code() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", SCENARIO_A);
    let out = ws.path("out.json");

    // Default atol is far below the 0.01 gaps
    let code = ws
        .find(&[s(&input), "-e", "A,B", "-t", "C", "--destination", s(&out)])
        .unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["summary"]["exit_code"], 2);
}

#[test]
fn test_find_per_column_atol() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", "x,y\n1,10\n1.05,10.5\n");
    let out = ws.path("flags.txt");

    ws.find(&[
        s(&input), "-t", "x,y", "--atol", "0.1,1", "-o", "flags", "--destination", s(&out),
    ])
    .unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "false\ntrue\n");

    let code = ws
        .find(&[s(&input), "-t", "x,y", "--atol", "0.1,0.1", "-o", "flags", "--destination", s(&out)])
        .unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_find_json_records_input() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file(
        "records.json",
        r#"[{"id": "a", "pos": {"x": 1.0}}, {"id": "a", "pos": {"x": 1.001}}]"#,
    );
    let out = ws.path("flags.txt");

    let code = ws
        .find(&[
            s(&input), "-e", "id", "-t", "pos.x", "--atol", "0.01", "-o", "flags",
            "--destination", s(&out),
        ])
        .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_to_string(&out).unwrap(), "false\ntrue\n");
}

#[test]
fn test_find_empty_table() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("empty.csv", "A,C\n");
    let out = ws.path("out.json");

    let code = ws
        .find(&[s(&input), "-e", "A", "-t", "C", "--destination", s(&out)])
        .unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["duplicates"], serde_json::json!([]));
}

#[test]
fn test_find_uses_config_file_tolerance() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let input = ws.file("data.csv", SCENARIO_A);
    let config = ws.file("config.toml", "atol = 0.02\noutput = \"flags\"\n");
    let out = ws.path("flags.txt");

    let cli = Cli::try_parse_from([
        "tabdupe",
        "-q",
        "--config",
        s(&config),
        "find",
        s(&input),
        "-e",
        "A,B",
        "-t",
        "C",
        "--destination",
        s(&out),
    ])
    .unwrap();
    let code = tabdupe::run_app(cli).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "false\ntrue\nfalse\nfalse\ntrue\n"
    );
}
