use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use odo_core::{Extraction, ImageInput, OdoError, Provider, VisionClient, extract};

/// One-shot HTTP server; the join handle yields the raw request it received.
struct OneShot {
    base: String,
    request: JoinHandle<String>,
}

fn serve_once(status: &'static str, body: &str) -> OneShot {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();
    let request = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let req = read_request(&mut stream);
        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).unwrap();
        req
    });
    OneShot { base, request }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn client(provider: Provider, key: &str, base: &str) -> VisionClient {
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    VisionClient::new(provider, key)
        .unwrap()
        .with_api_base(base)
        .with_http_client(http)
}

fn image() -> ImageInput {
    ImageInput::from_bytes(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0], None).unwrap()
}

#[test]
fn gemini_reply_is_parsed_into_reading() {
    let srv = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"Odometer: 45,231 km"}]}}]}"#,
    );
    let model = client(Provider::Gemini, "test-key", &srv.base);

    assert_eq!(extract(&model, &image()).unwrap(), Extraction::Reading(45231));

    let req = srv.request.join().unwrap();
    assert!(req.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent "));
    assert!(req.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(req.contains("\"inlineData\""));
    assert!(req.contains("extracts odometer readings"));
    assert!(!req.contains("key=test-key"));
}

#[test]
fn openai_reply_is_parsed_into_reading() {
    let srv = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"content":"The odometer shows 123,456"}}]}"#,
    );
    let model = client(Provider::OpenAi, "sk-test", &srv.base);

    assert_eq!(extract(&model, &image()).unwrap(), Extraction::Reading(123456));

    let req = srv.request.join().unwrap();
    assert!(req.starts_with("POST /v1/chat/completions "));
    assert!(req.to_ascii_lowercase().contains("authorization: bearer sk-test"));
    assert!(req.contains("data:image/png;base64,"));
}

#[test]
fn error_status_is_a_model_error() {
    let srv = serve_once("401 Unauthorized", r#"{"error":{"message":"API key not valid"}}"#);
    let model = client(Provider::Gemini, "bad-key", &srv.base);

    match extract(&model, &image()) {
        Err(OdoError::Model(msg)) => {
            assert!(msg.contains("401"), "{msg}");
            assert!(msg.contains("API key not valid"), "{msg}");
        }
        other => panic!("expected model error, got {other:?}"),
    }
    srv.request.join().unwrap();
}

#[test]
fn undecodable_body_is_a_model_error() {
    let srv = serve_once("200 OK", "<html>gateway</html>");
    let model = client(Provider::Gemini, "test-key", &srv.base);

    assert!(matches!(extract(&model, &image()), Err(OdoError::Model(_))));
    srv.request.join().unwrap();
}

#[test]
fn reply_without_candidates_is_no_reading() {
    let srv = serve_once("200 OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
    let model = client(Provider::Gemini, "test-key", &srv.base);

    assert_eq!(extract(&model, &image()).unwrap(), Extraction::NoReading);
    srv.request.join().unwrap();
}

#[test]
fn unreachable_endpoint_is_an_http_error() {
    let base = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let model = client(Provider::Gemini, "test-key", &base);

    assert!(matches!(extract(&model, &image()), Err(OdoError::Http(_))));
}
