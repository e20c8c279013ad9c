// Minimal HTTP/1.1 server for exercising the API client against canned JSON.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Request targets (path + query) in the order they arrived.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve `routes` (request target → (status, body)). Unknown targets get 404.
/// Every response closes its connection, so each request is one accept.
pub async fn spawn(routes: Vec<(String, u16, String)>) -> MockApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: HashMap<String, (u16, String)> = routes
        .into_iter()
        .map(|(target, status, body)| (target, (status, body)))
        .collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let request = String::from_utf8_lossy(&buf);
            let target = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("")
                .to_string();
            seen.lock().unwrap().push(target.clone());

            let (status, body) = routes
                .get(&target)
                .cloned()
                .unwrap_or((404, "{\"detail\":\"Not found.\"}".to_string()));
            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                500 => "Internal Server Error",
                503 => "Service Unavailable",
                _ => "Unknown",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
            let _ = socket.shutdown().await;
        }
    });

    MockApi {
        base_url: format!("http://{addr}"),
        requests,
        handle,
    }
}

pub fn ok(target: impl Into<String>, body: impl Into<String>) -> (String, u16, String) {
    (target.into(), 200, body.into())
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

pub fn fixture_json(
    gameweek: u32,
    side_1: (Option<u64>, &str, i32),
    side_2: (Option<u64>, &str, i32),
) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "event": gameweek,
        "entry_1_entry": side_1.0,
        "entry_1_name": side_1.1,
        "entry_1_points": side_1.2,
        "entry_2_entry": side_2.0,
        "entry_2_name": side_2.1,
        "entry_2_points": side_2.2,
    })
}

/// A page of `count` fixtures whose `entry_1_points` run from `first` upward.
pub fn matches_page(first: i32, count: i32, has_next: bool) -> String {
    let results: Vec<_> = (first..first + count)
        .map(|n| fixture_json(1, (Some(1), "A", n), (Some(2), "B", 0)))
        .collect();
    serde_json::json!({ "results": results, "has_next": has_next, "page": 1 }).to_string()
}

/// Bootstrap payload with players 1..=15 scoring `id` points each.
pub fn bootstrap() -> String {
    let elements: Vec<_> = (1..=15)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "web_name": format!("P{id}"),
                "event_points": id,
                "team": 1
            })
        })
        .collect();
    serde_json::json!({ "events": [], "elements": elements }).to_string()
}

/// Picks for players 1..=15 in squad order.
pub fn picks(captain: Option<u32>, points: i32, cost: i32, chip: Option<&str>) -> String {
    let picks: Vec<_> = (1..=15u32)
        .map(|id| {
            serde_json::json!({
                "element": id,
                "position": id,
                "multiplier": 1,
                "is_captain": Some(id) == captain,
                "is_vice_captain": false
            })
        })
        .collect();
    serde_json::json!({
        "active_chip": chip,
        "automatic_subs": [],
        "entry_history": {
            "event": 1,
            "points": points,
            "total_points": 1000,
            "rank": 12345,
            "event_transfers": if cost > 0 { 2 } else { 0 },
            "event_transfers_cost": cost,
            "points_on_bench": 6
        },
        "picks": picks
    })
    .to_string()
}
