use std::fs;
use std::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_urlgrab(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute urlgrab binary")
}

#[test]
fn test_missing_required_arguments() {
    let output = run_urlgrab(&[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--src") || stderr.contains("--dst"), "{}", stderr);
}

#[test]
fn test_unreadable_source_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let dst = tmp.path().join("out");
    let output = run_urlgrab(&[
        "--src",
        "/tmp/nonexistent_urlgrab_list_98765.txt",
        "--dst",
        dst.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open the URL list"), "{}", stderr);
    assert!(!dst.exists(), "nothing is created before the source is open");
}

#[test]
fn test_destination_that_is_a_file_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("urls.txt");
    fs::write(&src, "http://127.0.0.1:1/a\n").unwrap();
    let dst = tmp.path().join("file");
    fs::write(&dst, "not a directory").unwrap();

    let output = run_urlgrab(&["-s", src.to_str().unwrap(), "-d", dst.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create directory"), "{}", stderr);
}

#[test]
fn test_invalid_user_agent_is_reported_as_setup_error() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("urls.txt");
    fs::write(&src, "http://127.0.0.1:1/a\n").unwrap();
    let dst = tmp.path().join("out");

    let output = run_urlgrab(&[
        "-s",
        src.to_str().unwrap(),
        "-d",
        dst.to_str().unwrap(),
        "--user-agent",
        "bad\nagent",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR]"), "{}", stderr);
    assert!(stderr.contains("Failed to build the HTTP client"), "{}", stderr);
    assert!(!dst.exists(), "nothing is created after a setup failure");
}

#[tokio::test]
async fn test_full_run_json_output() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("document a"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("urls.txt");
    fs::write(&src, format!("{0}/a\n{0}/b\n\n", mock_server.uri())).unwrap();
    let dst = tmp.path().join("pages").join("nested");
    let csv_report = tmp.path().join("failures.csv");

    let output = run_urlgrab(&[
        "--src",
        src.to_str().unwrap(),
        "--dst",
        dst.to_str().unwrap(),
        "--workers",
        "2",
        "--json",
        "--report-path",
        csv_report.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "per-URL failures do not fail the run: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["summary"]["attempted"], 2);
    assert_eq!(json["summary"]["saved"], 1);
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["failures"][0]["kind"], "HTTPStatusError");

    let saved = json["saved"][0]["path"].as_str().unwrap();
    assert_eq!(fs::read_to_string(saved).unwrap(), "document a");
    assert!(csv_report.exists());
}
