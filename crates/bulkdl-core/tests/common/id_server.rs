//! Minimal HTTP/1.1 server keyed by `download_id` for integration tests.
//!
//! Each ID maps to a canned response (status, optional Content-Disposition,
//! body, optional delay, optional redirect to another ID). Unknown IDs get a 404. The server counts requests
//! and tracks the peak number of requests handled at once.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DOWNLOAD_PATH: &str = "/index.php?route=product/download&download_id=";

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
    pub delay: Duration,
    /// Sends `Location` pointing at this ID on the same server.
    pub redirect_to: Option<u64>,
}

impl Canned {
    /// 200 with `Content-Disposition: attachment; filename="<name>"`.
    pub fn file(name: &str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_disposition: Some(format!("attachment; filename=\"{}\"", name)),
            body: body.to_vec(),
            delay: Duration::ZERO,
            redirect_to: None,
        }
    }

    /// 200 without Content-Disposition.
    pub fn anonymous(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_disposition: None,
            body: body.to_vec(),
            delay: Duration::ZERO,
            redirect_to: None,
        }
    }

    pub fn status(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            content_disposition: None,
            body: body.to_vec(),
            delay: Duration::ZERO,
            redirect_to: None,
        }
    }

    /// 302 to `id` on the same server, carrying its own body.
    pub fn redirect(id: u64, body: &[u8]) -> Self {
        Self {
            redirect_to: Some(id),
            ..Self::status(302, body)
        }
    }

    pub fn with_disposition(mut self, value: &str) -> Self {
        self.content_disposition = Some(value.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Default)]
pub struct Stats {
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Stats {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct IdServer {
    /// Template suitable for `base_url`, e.g. `http://127.0.0.1:1234/dl?download_id=`.
    pub base_url: String,
    pub stats: Arc<Stats>,
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: HashMap<u64, Canned>) -> IdServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let stats = Arc::new(Stats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || handle(stream, &routes, &stats));
        }
    });
    IdServer {
        base_url: format!("http://127.0.0.1:{}{}", port, DOWNLOAD_PATH),
        stats,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<u64, Canned>, stats: &Stats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };

    stats.requests.fetch_add(1, Ordering::SeqCst);
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak.fetch_max(now, Ordering::SeqCst);

    let canned = parse_id(request)
        .and_then(|id| routes.get(&id).cloned())
        .unwrap_or_else(|| Canned::status(404, b"no such download"));

    if !canned.delay.is_zero() {
        thread::sleep(canned.delay);
    }

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        canned.status,
        reason(canned.status),
        canned.body.len()
    );
    if let Some(id) = canned.redirect_to {
        head.push_str(&format!("Location: {}{}\r\n", DOWNLOAD_PATH, id));
    }
    if let Some(cd) = &canned.content_disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&canned.body);
    let _ = stream.flush();

    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
}

/// Extracts `download_id=<N>` from the request line.
fn parse_id(request: &str) -> Option<u64> {
    let target = request.lines().next()?.split_whitespace().nth(1)?;
    let (_, rest) = target.split_once("download_id=")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
