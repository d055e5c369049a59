//! Scripted HTTP/1.1 responder for REST backend tests.
//!
//! Each accepted connection reads one request and answers with the next
//! scripted response, then closes.

use crate::config::HttpConfig;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One request as received by the stub.
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: String,
    /// Path plus query string, e.g. `/demo/image/upload`.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of a text part in a `multipart/form-data` body.
    pub fn multipart_field(&self, name: &str) -> Option<String> {
        let body = self.body_text();
        let marker = format!("name=\"{name}\"\r\n\r\n");
        let start = body.find(&marker)? + marker.len();
        let end = body[start..].find("\r\n")? + start;
        Some(body[start..end].to_string())
    }
}

pub(crate) struct StubServer {
    base_url: String,
    handle: JoinHandle<Vec<CapturedRequest>>,
}

impl StubServer {
    /// Serves `(status, json body)` responses in order, one per connection.
    pub fn serve(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let base_url = format!("http://{}", listener.local_addr().expect("stub address"));
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().expect("accept stub connection");
                let mut reader = BufReader::new(stream);
                captured.push(read_request(&mut reader));

                let mut stream = reader.into_inner();
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream
                    .write_all(response.as_bytes())
                    .expect("write stub response");
            }
            captured
        });
        Self { base_url, handle }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for every scripted response to be served.
    pub fn finish(self) -> Vec<CapturedRequest> {
        self.handle.join().expect("stub server thread")
    }
}

/// Fast-failing client settings for talking to a local stub.
pub(crate) fn local_http() -> HttpConfig {
    HttpConfig {
        connect_timeout_secs: 2,
        read_timeout_secs: 5,
        bypass_proxy: true,
    }
}

fn read_request(reader: &mut impl BufRead) -> CapturedRequest {
    let mut line = String::new();
    reader.read_line(&mut line).expect("read request line");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).expect("read header");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((key, value)) = header.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).expect("read body");

    CapturedRequest {
        method,
        target,
        headers,
        body,
    }
}
