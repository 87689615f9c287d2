//! Shared mock HTTP server for the in-crate tests.
//!
//! Serves a scripted sequence of responses on a random local port, one
//! connection per request (`Connection: close`), and records every request
//! target so tests can assert on cursor threading and request counts.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub reason: &'static str,
    pub body: Option<String>,
    pub delay: Duration,
}

impl MockResponse {
    /// A 200 response with a JSON body.
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: Some(body.to_string()),
            delay: Duration::ZERO,
        }
    }

    /// An empty 204 response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            reason: "No Content",
            body: None,
            delay: Duration::ZERO,
        }
    }

    /// An arbitrary status with a raw text body.
    pub fn text(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            body: Some(body.to_string()),
            delay: Duration::ZERO,
        }
    }

    /// Delays the response, simulating a slow upstream.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock server.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// The request targets seen so far, in arrival order
    /// (e.g. `/api/orders?since=T1`).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Starts a mock server on a random local port.
///
/// The scripted responses are served in order; once exhausted, every further
/// request gets a 500 with a `detail` body, so a polling test can keep
/// running without accidentally invoking its merge function again.
pub fn serve(responses: Vec<MockResponse>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let requests_handle = Arc::clone(&requests);

    thread::spawn(move || {
        let exhausted = MockResponse::text(500, "Internal Server Error", r#"{"detail":"script exhausted"}"#);
        let mut script = responses.into_iter();
        // Serve one request per connection until the test process exits.
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(target) = read_request_target(&mut stream) else {
                continue;
            };
            requests_handle.lock().unwrap().push(target);

            let response = script.next().unwrap_or_else(|| exhausted.clone());
            if !response.delay.is_zero() {
                thread::sleep(response.delay);
            }
            let _ = write_response(&mut stream, &response);
        }
    });

    MockServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

/// Reads the request head and returns the request target from the first line.
fn read_request_target(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => return None,
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let first_line = head.lines().next()?;
    let mut parts = first_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

fn write_response(stream: &mut TcpStream, response: &MockResponse) -> std::io::Result<()> {
    let body = response.body.as_deref().unwrap_or("");
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n",
        response.status,
        response.reason,
        body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(body.as_bytes())?;
    stream.flush()
}
