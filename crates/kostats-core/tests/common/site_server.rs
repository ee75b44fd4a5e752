//! Minimal HTTP/1.1 member site for integration tests.
//!
//! Serves a login page, accepts a form POST with the right password (setting
//! a session cookie), and only serves listing pages and files to requests
//! carrying that cookie. Paths listed in `truncated` announce twice their real
//! length and close early.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const LOGIN_PATH: &str = "/amember5/member";
pub const PASSWORD: &str = "secret";
const SESSION_COOKIE: &str = "PHPSESSID=test-session";

const LOGIN_PAGE: &str = r#"<html><body>
<form id="am-login-form" method="post" action="/amember5/login">
  <input type="text" name="amember_login" value="">
  <input type="password" name="amember_pass" value="">
  <input type="hidden" name="login_attempt_id" value="1730966400">
  <input type="submit" value="Login">
</form></body></html>"#;

#[derive(Debug, Default, Clone)]
pub struct Site {
    /// Path → body, served only with the session cookie.
    pub pages: HashMap<String, Vec<u8>>,
    pub truncated: HashSet<String>,
}

impl Site {
    pub fn page(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(path.to_string(), body.into());
        self
    }

    pub fn truncate(mut self, path: &str) -> Self {
        self.truncated.insert(path.to_string());
        self
    }
}

/// Request log: `"METHOD /path"` per request, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Starts the site on an ephemeral port. Returns the base URL (no trailing slash) and the request log.
pub fn start(site: Site) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let site = Arc::new(site);
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let log_srv = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let site = Arc::clone(&site);
            let log = Arc::clone(&log_srv);
            thread::spawn(move || handle(stream, &site, &log));
        }
    });
    (format!("http://127.0.0.1:{}", port), log)
}

struct Request {
    method: String,
    path: String,
    cookie: Option<String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let mut content_length = 0usize;
    let mut cookie = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            if name.trim().eq_ignore_ascii_case("cookie") {
                cookie = Some(value.trim().to_string());
            }
        }
    }
    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Some(Request {
        method,
        path,
        cookie,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, extra: &str, body: &[u8], announced: usize) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status, announced, extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn handle(mut stream: TcpStream, site: &Site, log: &RequestLog) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    log.lock()
        .unwrap()
        .push(format!("{} {}", req.method, req.path));

    let logged_in = req
        .cookie
        .as_deref()
        .is_some_and(|c| c.contains(SESSION_COOKIE));

    match (req.method.as_str(), req.path.as_str()) {
        ("GET", LOGIN_PATH) => {
            respond(&mut stream, "200 OK", "", LOGIN_PAGE.as_bytes(), LOGIN_PAGE.len());
        }
        ("POST", "/amember5/login") => {
            let form = String::from_utf8_lossy(&req.body);
            let ok = form
                .split('&')
                .any(|kv| kv == format!("amember_pass={}", PASSWORD));
            if ok {
                let body = b"<a href=\"/amember5/logout\">Logout</a>";
                let cookie = format!("Set-Cookie: {}; path=/\r\n", SESSION_COOKIE);
                respond(&mut stream, "200 OK", &cookie, body, body.len());
            } else {
                respond(&mut stream, "200 OK", "", LOGIN_PAGE.as_bytes(), LOGIN_PAGE.len());
            }
        }
        ("GET", path) => match site.pages.get(path) {
            Some(_) if !logged_in => {
                respond(&mut stream, "200 OK", "", LOGIN_PAGE.as_bytes(), LOGIN_PAGE.len());
            }
            Some(body) if site.truncated.contains(path) => {
                respond(&mut stream, "200 OK", "", body, body.len() * 2);
            }
            Some(body) => respond(&mut stream, "200 OK", "", body, body.len()),
            None => respond(&mut stream, "404 Not Found", "", b"", 0),
        },
        _ => respond(&mut stream, "405 Method Not Allowed", "", b"", 0),
    }
}
