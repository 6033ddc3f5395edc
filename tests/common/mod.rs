#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned HTTP/1.1 responder on a random local port. Records every request
/// target (path plus query) it receives.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &'static str, body: &str) -> Self {
        Self {
            path,
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            status,
            body: body.to_string(),
        }
    }
}

impl MockServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) => break,
                        Ok(_) if header == "\r\n" || header == "\n" => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }

                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                seen.lock().unwrap().push(target.clone());

                let path = target.split('?').next().unwrap_or("");
                let (status, body) = routes
                    .iter()
                    .find(|r| r.path == path)
                    .map(|r| (r.status, r.body.clone()))
                    .unwrap_or((404, "{}".to_string()));

                let reason = if status < 400 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Address of a port that was just released, so connections are refused
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub const SAVINGS_TYPES_BODY: &str =
    r#"{"jenis_simpanan": [{"id": 1, "nama_simpanan": "Simpanan Pokok"}, {"id": 3, "nama_simpanan": "Simpanan Wajib"}]}"#;

pub const SCENARIO_BODY: &str = r#"{
    "history": [{
        "id_pembayaran": 41,
        "nama_anggota": "Budi",
        "created_at": "2024-03-05T08:30:00.000Z",
        "jumlah": 50000,
        "jumlah_bersih": 47500,
        "biaya_admin": 2500,
        "jenis_simpanan": "Simpanan Wajib",
        "jenis_pembayaran": "Transfer",
        "bank_name": "BRI",
        "keterangan": "Iuran Maret",
        "status_pembayaran": "SUKSES"
    }],
    "total_nominal": 50000
}"#;
