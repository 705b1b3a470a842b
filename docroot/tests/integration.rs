use std::path::Path;
use std::process::{Command, Output};

fn docroot(args: &[&str]) -> Output {
    // Run the compiled binary (avoids cargo lock issues)
    let bin_path = env!("CARGO_BIN_EXE_docroot");
    Command::new(bin_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run docroot")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn site() -> tempfile::TempDir {
    let tmp_dir = tempfile::tempdir().unwrap();
    std::fs::write(tmp_dir.path().join("b.txt"), "bee").unwrap();
    std::fs::write(tmp_dir.path().join("c.txt"), "sea").unwrap();
    std::fs::create_dir(tmp_dir.path().join("a")).unwrap();
    std::fs::create_dir(tmp_dir.path().join("www")).unwrap();
    std::fs::write(tmp_dir.path().join("www/index.html"), "<h1>Hello World</h1>").unwrap();
    tmp_dir
}

#[test]
fn test_list_directory() {
    let tmp_dir = site();
    let output = docroot(&["list", path_str(tmp_dir.path()), "--target", "/files"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains("<title>Index of /files</title>"));
    let a = html.find(">a/</a>").unwrap();
    let b = html.find(">b.txt</a>").unwrap();
    let c = html.find(">c.txt</a>").unwrap();
    assert!(a < b && b < c, "{}", html);
    assert!(html.contains("href=\"/files/b.txt\""));
}

#[test]
fn test_serve_index_and_listing() {
    let tmp_dir = site();
    let root = path_str(tmp_dir.path());

    let output = docroot(&["serve", "/www/", "--root", root]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "<h1>Hello World</h1>");
    assert!(stderr(&output).contains("Content-Type: text/html"));

    let output = docroot(&["serve", "/", "--root", root]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Index of /"));

    let output = docroot(&["serve", "/missing.txt", "--root", root]);
    assert!(!output.status.success());
}

#[test]
fn test_put_cat_rm() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let file = tmp_dir.path().join("note.txt");
    let file = path_str(&file);

    assert!(docroot(&["put", file, "first line\n"]).status.success());
    assert!(docroot(&["put", file, "second line\n", "--append"]).status.success());

    let output = docroot(&["cat", file]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "first line\nsecond line\n");

    let output = docroot(&["stat", file]);
    let text = stdout(&output);
    assert!(text.contains("exists: true"));
    assert!(text.contains("directory: false"));
    assert!(text.contains("last-modified: "));

    assert!(docroot(&["rm", file]).status.success());
    assert!(!Path::new(file).exists());
    // Removing again is a no-op
    assert!(docroot(&["rm", file]).status.success());
    assert!(stdout(&docroot(&["stat", file])).contains("exists: false"));
}

#[test]
fn test_append_to_missing_file_fails() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let file = tmp_dir.path().join("absent.txt");
    let output = docroot(&["put", path_str(&file), "data", "--append"]);
    assert!(!output.status.success());
    assert!(!file.exists());
}

#[test]
fn test_mime_negotiation() {
    let output = docroot(&["mime", "/srv/page.html.xyzzy"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), ".html\ttext/html\n");

    let output = docroot(&["mime", "/srv/page.html.xyzzy", "--plain"]);
    assert_eq!(stdout(&output), ".xyzzy\tapplication/octet-stream\n");
}

#[test]
fn test_mime_overrides_from_config() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let config_path = tmp_dir.path().join("docroot.toml");
    std::fs::write(
        &config_path,
        r#"
[files]
default_type = "text/plain"

[files.mime_types]
".xyzzy" = "text/x-adventure"
"#,
    )
    .unwrap();
    let config = path_str(&config_path);

    let output = docroot(&["--config", config, "mime", "story.xyzzy"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), ".xyzzy\ttext/x-adventure\n");

    let output = docroot(&["--config", config, "mime", "blob.qqq-none", "--plain"]);
    assert_eq!(stdout(&output), ".qqq-none\ttext/plain\n");

    // A text/plain default must not hide a real .txt during negotiation
    let output = docroot(&["--config", config, "mime", "notes.v2.txt.en"]);
    assert_eq!(stdout(&output), ".txt\ttext/plain\n");
}

#[test]
fn test_matches() {
    let tmp_dir = tempfile::tempdir().unwrap();
    for name in ["page.html", "page.en.html", "page.fr.html", "page.txt"] {
        std::fs::write(tmp_dir.path().join(name), name).unwrap();
    }
    let page = tmp_dir.path().join("page.html");

    let output = docroot(&["matches", path_str(&page)]);
    assert!(output.status.success(), "{}", stderr(&output));
    let mut found: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    found.sort();
    assert_eq!(found, vec!["page.en.html", "page.fr.html"]);
}

#[test]
fn test_validate_config() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let good = tmp_dir.path().join("good.json");
    std::fs::write(&good, r#"{"files": {"autoindex": false}}"#).unwrap();
    let output = docroot(&["validate", path_str(&good)]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("is valid"));

    let bad = tmp_dir.path().join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    let output = docroot(&["validate", path_str(&bad)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Configuration Error"));
}

#[test]
fn test_version() {
    let output = docroot(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Docroot v"));
}
