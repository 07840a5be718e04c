//! Test utilities shared across modules.
//!
//! Provides a throwaway HTTP server so the blocking client can be exercised
//! against real sockets without a running Process Manager.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A local HTTP server that answers a fixed list of requests, one per
/// connection, then exits.
pub struct StubServer {
    /// Base URL including the `/api` prefix, e.g. `http://127.0.0.1:4321/api`.
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    /// Wait for the server to answer every queued response and return the
    /// request lines it saw (e.g. `GET /api/processes HTTP/1.1`).
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

/// Serve each `(status, body)` pair to one incoming connection, in order.
pub fn serve(responses: Vec<(u16, String)>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(read_request_line(&stream));
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason_phrase(status),
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        seen
    });

    StubServer { base_url, handle }
}

/// Accept one connection and hold it open without answering.
pub fn serve_stalled(hold_for: Duration) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let line = read_request_line(&stream);
        thread::sleep(hold_for);
        vec![line]
    });

    StubServer { base_url, handle }
}

/// A base URL on a local port that nothing is listening on.
pub fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

fn read_request_line(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    // Drain headers; GET requests carry no body.
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).unwrap();
        if read == 0 || header == "\r\n" {
            break;
        }
    }

    request_line.trim_end().to_string()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_local_url_points_at_loopback() {
        let url = unused_local_url();
        assert!(url.starts_with("http://127.0.0.1:"));
        assert!(url.ends_with("/api"));
    }
}
