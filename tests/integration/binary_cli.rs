//! Tests that drive the compiled binary.

use super::test_utils::{FakeEtcd, FakeProxy};
use etcdextract::store::RemoteNode;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const PROXY_VARS: [&str; 8] = [
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
    "NO_PROXY",
    "no_proxy",
];

fn bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_etcdextract"));
    command
        .env_remove("ETCDEXTRACT_LOG")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("etcdextract-tests-no-config"));
    for var in PROXY_VARS {
        command.env_remove(var);
    }
    command
}

#[test]
fn test_wrong_argument_count_exits_with_usage() {
    let output = bin().arg("/a").arg("5").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr={}", stderr);
}

#[test]
fn test_non_integer_interval_exits_before_any_cycle() {
    let output = bin().args(["/a", "often", "stdout://"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_destination_exits_with_error() {
    let output = bin().args(["/a", "1", "ftp://example.com"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid destination"), "stderr={}", stderr);
}

#[cfg(unix)]
#[test]
fn test_terminate_signal_sets_exit_status() {
    let etcd = FakeEtcd::start(vec![RemoteNode::leaf("/x", "v")]);
    let child = bin()
        .args(["-e", &etcd.endpoint, "/x", "60", "stdout://"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(143));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"data\": {\n    \"x\": \"v\"\n  }"), "stdout={}", stdout);
}

#[test]
fn test_http_traffic_honours_proxy_environment() {
    let proxy = FakeProxy::start(RemoteNode::leaf("/x", "v"));
    let mut child = bin()
        .env("HTTP_PROXY", &proxy.url)
        .env("http_proxy", &proxy.url)
        .args([
            "-e",
            "http://etcd.invalid:2379",
            "/x",
            "60",
            "http://sink.invalid/snapshots",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let started = Instant::now();
    let posted = loop {
        let posted = proxy
            .requests
            .lock()
            .iter()
            .any(|line| line.starts_with("POST "));
        if posted || started.elapsed() > Duration::from_secs(10) {
            break posted;
        }
        thread::sleep(Duration::from_millis(50));
    };
    child.kill().unwrap();
    let _ = child.wait();

    assert!(posted, "requests={:?}", proxy.requests.lock());
    let requests = proxy.requests.lock();
    assert!(requests
        .iter()
        .any(|line| line.starts_with("GET http://etcd.invalid:2379/v2/keys/x")));
    assert!(requests
        .iter()
        .any(|line| line == "POST http://sink.invalid/snapshots"));
}
