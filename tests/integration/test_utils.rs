//! In-process HTTP fakes for the store and the snapshot sink.

use etcdextract::store::RemoteNode;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

fn json_header() -> Header {
    Header::from_bytes("Content-Type", "application/json").unwrap()
}

fn bind() -> (Arc<Server>, String) {
    let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
    let port = server.server_addr().to_ip().unwrap().port();
    (server, format!("http://127.0.0.1:{}", port))
}

/// Serves etcd v2 `GET /v2/keys/...` reads from a fixed set of roots.
pub struct FakeEtcd {
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeEtcd {
    pub fn start(roots: Vec<RemoteNode>) -> Self {
        let (server, endpoint) = bind();
        let nodes: HashMap<String, RemoteNode> =
            roots.into_iter().map(|node| (node.path.clone(), node)).collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for request in server.incoming_requests() {
                let url = request.url().to_string();
                seen.lock().push(url.clone());

                let path = url.split('?').next().unwrap_or_default();
                let key = format!("/{}", path.trim_start_matches("/v2/keys").trim_start_matches('/'));
                let (status, body) = match nodes.get(&key) {
                    Some(node) => (200, json!({"action": "get", "node": node})),
                    None => (
                        404,
                        json!({"errorCode": 100, "message": "Key not found", "cause": key, "index": 1}),
                    ),
                };
                let response = Response::from_string(body.to_string())
                    .with_status_code(status)
                    .with_header(json_header());
                let _ = request.respond(response);
            }
        });

        Self { endpoint, requests }
    }
}

/// Accepts snapshot POSTs, answering every one with `status`.
pub struct FakeSink {
    pub url: String,
    pub bodies: Arc<Mutex<Vec<String>>>,
}

impl FakeSink {
    pub fn start(status: u16) -> Self {
        let (server, base) = bind();
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let received = bodies.clone();

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                received.lock().push(body);
                let _ = request.respond(Response::from_string("ack").with_status_code(status));
            }
        });

        Self {
            url: format!("{}/snapshots", base),
            bodies,
        }
    }
}

/// Forward proxy stand-in: records `METHOD target` for every request, answers
/// store reads with `root` and everything else with 200.
pub struct FakeProxy {
    pub url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeProxy {
    pub fn start(root: RemoteNode) -> Self {
        let (server, url) = bind();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for request in server.incoming_requests() {
                let line = format!("{} {}", request.method(), request.url());
                let is_read = line.starts_with("GET ");
                seen.lock().push(line);

                let response = if is_read {
                    Response::from_string(json!({"action": "get", "node": root}).to_string())
                        .with_header(json_header())
                } else {
                    Response::from_string("ack")
                };
                let _ = request.respond(response);
            }
        });

        Self { url, requests }
    }
}
