//! End-to-end cycles against fake etcd and sink servers.

use super::test_utils::{FakeEtcd, FakeSink};
use etcdextract::publish::{Destination, PublishOutcome, SnapshotPublisher};
use etcdextract::scheduler::Scheduler;
use etcdextract::store::{EtcdClient, RemoteNode, RootFetcher};
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn scheduler(etcd: &FakeEtcd, roots: &[&str], sink_url: &str) -> Scheduler {
    let store = EtcdClient::new(&etcd.endpoint, Duration::from_secs(5)).unwrap();
    let destination = Destination::Http(Url::parse(sink_url).unwrap());
    Scheduler::new(
        roots.iter().map(|r| r.to_string()).collect(),
        Duration::from_secs(1),
        RootFetcher::new(Arc::new(store)),
        SnapshotPublisher::new(destination, Duration::from_secs(5)).unwrap(),
    )
}

fn app_tree() -> RemoteNode {
    RemoteNode::directory(
        "/app",
        vec![
            RemoteNode::leaf("/app/name", "demo"),
            RemoteNode::directory("/app/db", vec![RemoteNode::leaf("/app/db/port", "5432")]),
        ],
    )
}

#[tokio::test]
async fn test_cycle_posts_merged_snapshot() {
    let etcd = FakeEtcd::start(vec![app_tree(), RemoteNode::leaf("/flag", "on")]);
    let sink = FakeSink::start(200);
    let mut scheduler = scheduler(&etcd, &["/app", "/flag"], &sink.url);

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(report.outcome, PublishOutcome::Delivered);

    let bodies = sink.bodies.lock().clone();
    assert_eq!(bodies.len(), 1);
    assert!(!bodies[0].contains('\n'), "HTTP body should be compact");

    let posted: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(
        posted["data"],
        json!({"app": {"name": "demo", "db": {"port": "5432"}}, "flag": "on"})
    );
    assert_eq!(posted["timestamp"].as_i64(), Some(report.envelope.timestamp));

    let requests = etcd.requests.lock().clone();
    assert_eq!(
        requests,
        vec!["/v2/keys/app?recursive=true", "/v2/keys/flag?recursive=true"]
    );
}

#[tokio::test]
async fn test_missing_root_does_not_block_others() {
    let etcd = FakeEtcd::start(vec![app_tree()]);
    let sink = FakeSink::start(200);
    let mut scheduler = scheduler(&etcd, &["/gone", "/app"], &sink.url);

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(report.failed_roots, vec!["/gone"]);
    assert_eq!(report.merged_roots, vec!["/app"]);

    let posted: Value = serde_json::from_str(&sink.bodies.lock()[0]).unwrap();
    assert_eq!(posted["data"]["app"]["name"], "demo");
}

#[tokio::test]
async fn test_overlapping_roots_last_write_wins() {
    let etcd = FakeEtcd::start(vec![
        app_tree(),
        RemoteNode::directory("/app/db", vec![RemoteNode::leaf("/app/db/port", "6543")]),
    ]);
    let sink = FakeSink::start(200);
    let mut scheduler = scheduler(&etcd, &["/app", "/app/db"], &sink.url);

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(
        report.envelope.data.to_json(),
        json!({"app": {"name": "demo", "db": {"port": "6543"}}})
    );
}

#[tokio::test]
async fn test_rejected_publish_completes_cycle() {
    let etcd = FakeEtcd::start(vec![RemoteNode::leaf("/x", "v")]);
    let sink = FakeSink::start(500);
    let mut scheduler = scheduler(&etcd, &["/x"], &sink.url);

    let first = scheduler.run_cycle().await.unwrap();
    assert_eq!(first.outcome, PublishOutcome::Rejected { status: 500 });

    let second = scheduler.run_cycle().await.unwrap();
    assert_eq!(second.cycle, 2);
    assert_eq!(sink.bodies.lock().len(), 2);
}

#[tokio::test]
async fn test_unreachable_store_publishes_empty_snapshot() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let store = EtcdClient::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
        .unwrap();
    let sink = FakeSink::start(200);
    let mut scheduler = Scheduler::new(
        vec!["/a".to_string()],
        Duration::from_secs(1),
        RootFetcher::with_deadline(Arc::new(store), Duration::from_secs(2)),
        SnapshotPublisher::new(
            Destination::Http(Url::parse(&sink.url).unwrap()),
            Duration::from_secs(5),
        )
        .unwrap(),
    );

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(report.failed_roots, vec!["/a"]);
    let posted: Value = serde_json::from_str(&sink.bodies.lock()[0]).unwrap();
    assert_eq!(posted["data"], json!({}));
}
