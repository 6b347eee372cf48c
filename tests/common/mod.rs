use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct StubConsul {
    pub host: String,
    pub port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubConsul {
    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

// Serves a canned status/body to every connection and records each request
// line. The listener thread runs until the test process exits.
pub fn start(status: u16, body: &str) -> StubConsul {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let port = listener.local_addr().expect("stub addr").port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let body = body.to_string();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let seen = Arc::clone(&seen);
            let body = body.clone();
            thread::spawn(move || handle(stream, status, &body, &seen));
        }
    });
    StubConsul {
        host: "127.0.0.1".to_string(),
        port,
        requests,
    }
}

// Binds an ephemeral port and releases it so connections are refused.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    listener.local_addr().expect("probe addr").port()
}

fn handle(
    mut stream: std::net::TcpStream,
    status: u16,
    body: &str,
    seen: &Arc<Mutex<Vec<String>>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    if let Some(line) = request.lines().next() {
        if let Ok(mut guard) = seen.lock() {
            guard.push(line.to_string());
        }
    }
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Response",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
