use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn extsort(args: &[&str]) -> Output {
    let me = assert_cmd::cargo::cargo_bin!("extsort");
    Command::new(me)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn binary")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn apply_scenario_moves_files_and_exits_zero() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    for name in ["x.pdf", "y.py", "z.unknown"] {
        fs::write(root.join(name), name).unwrap();
    }

    let out = extsort(&["--path", path_arg(root), "--apply"]);

    assert_eq!(out.status.code(), Some(0), "stdout: {}", stdout(&out));
    assert!(root.join("Documents").join("x.pdf").is_file());
    assert!(root.join("Code").join("y.py").is_file());
    assert!(root.join("Misc").join("z.unknown").is_file());

    let text = stdout(&out);
    assert!(text.contains("Moved: x.pdf -> "));
    assert!(text.contains("3 moved, 0 failed"));
}

#[test]
fn dry_run_reports_without_moving() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    fs::write(root.join("photo.png"), b"png").unwrap();

    let out = extsort(&["-p", path_arg(root), "--dry"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(root.join("photo.png").is_file());
    assert!(!root.join("Images").exists());

    let text = stdout(&out);
    assert!(text.contains("DRY-RUN on: "));
    assert!(text.contains("[DRY] Would move: photo.png -> "));
    let last = text.lines().rev().find(|l| !l.trim().is_empty()).unwrap();
    assert!(last.contains("1 planned, 0 failed"), "last line: {last}");
}

#[test]
fn dry_run_output_is_deterministic() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    for name in ["b.txt", "a.txt", "c.zip"] {
        fs::write(root.join(name), name).unwrap();
    }

    let first = extsort(&["-p", path_arg(root), "--dry"]);
    let second = extsort(&["-p", path_arg(root), "--dry"]);

    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn config_files_in_home_and_root_are_ignored_without_flag() {
    let home = TempDir::new().unwrap();
    let user_config = home.path().join(".config").join("extsort");
    fs::create_dir_all(&user_config).unwrap();
    fs::write(user_config.join("config.json"), "{ broken").unwrap();

    let td = TempDir::new().unwrap();
    let root = td.path();
    for name in ["x.pdf", "y.py", "z.unknown"] {
        fs::write(root.join(name), name).unwrap();
    }
    fs::write(root.join(".extsort.json"), r#"{"EXT_MAP": {".pdf": "Zzz"}}"#).unwrap();

    let me = assert_cmd::cargo::cargo_bin!("extsort");
    let out = Command::new(me)
        .args(["-p", path_arg(root), "--apply"])
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn binary");

    assert_eq!(out.status.code(), Some(0), "stdout: {}", stdout(&out));
    assert!(root.join("Documents").join("x.pdf").is_file());
    assert!(root.join("Code").join("y.py").is_file());
    assert!(root.join("Misc").join("z.unknown").is_file());
}

#[test]
fn empty_directory_reports_nothing_to_do() {
    let td = TempDir::new().unwrap();

    let out = extsort(&["-p", path_arg(td.path()), "--apply"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("No files found. Nothing to do."));
}

#[test]
fn mode_flag_is_required() {
    let td = TempDir::new().unwrap();
    let out = extsort(&["-p", path_arg(td.path())]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn dry_and_apply_are_mutually_exclusive() {
    let td = TempDir::new().unwrap();
    let out = extsort(&["-p", path_arg(td.path()), "--dry", "--apply"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_root_fails_preflight() {
    let td = TempDir::new().unwrap();
    let missing = td.path().join("missing");

    let out = extsort(&["-p", path_arg(&missing), "--apply"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("directory does not exist"));
}

#[test]
fn invalid_config_aborts_before_moving() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    fs::write(root.join("x.pdf"), b"pdf").unwrap();
    let config = root.join("broken.json");
    fs::write(&config, "{\"EXT_MAP\": ").unwrap();

    let out = extsort(&[
        "-p",
        path_arg(root),
        "--apply",
        "--config",
        path_arg(&config),
    ]);

    assert_eq!(out.status.code(), Some(2));
    assert!(root.join("x.pdf").is_file());
    assert!(!root.join("Documents").exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No files were moved."));
}

#[test]
fn recursive_flag_organizes_subdirectories() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("inbox")).unwrap();
    fs::write(root.join("inbox").join("song.mp3"), b"mp3").unwrap();

    let out = extsort(&["-p", path_arg(root), "--apply", "--recursive"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(root.join("Audio").join("inbox").join("song.mp3").is_file());
}

#[test]
fn per_file_failure_exits_one() {
    let td = TempDir::new().unwrap();
    let root = td.path();
    let config = root.join("map.json");
    fs::write(&config, r#"{"EXT_MAP": {".pdf": "taken", ".py": "Code"}}"#).unwrap();
    // A regular file blocks the destination folder of a.pdf.
    fs::write(root.join("taken"), b"file").unwrap();
    fs::write(root.join("a.pdf"), b"pdf").unwrap();
    fs::write(root.join("z.py"), b"py").unwrap();

    let out = extsort(&["-p", path_arg(root), "--apply", "--config", path_arg(&config)]);

    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert!(text.contains("Failed: a.pdf"));
    assert!(text.contains("2 moved, 1 failed"));
    assert!(root.join("a.pdf").is_file());
    assert!(root.join("Code").join("z.py").is_file());
    assert!(root.join("Misc").join("taken").is_file());
}
