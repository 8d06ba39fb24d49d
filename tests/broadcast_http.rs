//! Broadcasts against a throwaway HTTP relay bound to an ephemeral port

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use txcast::{broadcast, AppConfig, BroadcastOutcome, Event, HttpTransport, Session};

/// Serve exactly one request with a canned response. The handle yields the
/// request head as received.
fn one_shot_relay(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let head = read_head(&stream);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        (&stream).write_all(response.as_bytes()).unwrap();
        head
    });

    (endpoint, handle)
}

fn read_head(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }
    head
}

fn transport() -> HttpTransport {
    HttpTransport::new(Some(Duration::from_secs(10))).unwrap()
}

#[test]
fn accepted_transaction_reports_txid() {
    let (endpoint, server) = one_shot_relay("200 OK", r#"{"status":"success","txid":"9f2c01"}"#);

    let outcome = broadcast::broadcast(&transport(), &endpoint, "02 00+/=");
    let head = server.join().unwrap();

    assert_eq!(
        outcome,
        BroadcastOutcome::Accepted {
            txid: "9f2c01".to_string()
        }
    );
    let request_line = head.lines().next().unwrap();
    assert_eq!(request_line, "GET /tx/broadcast/02%2000%2B%2F%3D HTTP/1.1");
    assert!(head.to_ascii_lowercase().contains("accept: application/json"));
}

#[test]
fn endpoint_with_trailing_slash_hits_same_path() {
    let (endpoint, server) = one_shot_relay("200 OK", r#"{"status":"success","txid":"aa"}"#);

    broadcast::broadcast(&transport(), &format!("{}/", endpoint), "0100");
    let head = server.join().unwrap();

    assert!(head.starts_with("GET /tx/broadcast/0100 HTTP/1.1"));
}

#[test]
fn relay_rejection_reports_message() {
    let (endpoint, server) =
        one_shot_relay("200 OK", r#"{"status":"error","message":"bad-txns-inputs-missingorspent"}"#);

    let outcome = broadcast::broadcast(&transport(), &endpoint, "0200");
    server.join().unwrap();

    assert_eq!(
        txcast::form::outcome_label(&outcome),
        "Error: bad-txns-inputs-missingorspent"
    );
}

#[test]
fn unknown_status_is_unrecognized() {
    let (endpoint, server) = one_shot_relay("200 OK", r#"{"status":"pending"}"#);

    let outcome = broadcast::broadcast(&transport(), &endpoint, "0200");
    server.join().unwrap();

    assert_eq!(outcome, BroadcastOutcome::Unrecognized);
}

#[test]
fn server_error_status_fails_request() {
    let (endpoint, server) = one_shot_relay(
        "500 Internal Server Error",
        r#"{"status":"error","message":"ignored"}"#,
    );

    let outcome = broadcast::broadcast(&transport(), &endpoint, "0200");
    server.join().unwrap();

    assert_eq!(
        outcome,
        BroadcastOutcome::Failed {
            reason: "Request failed with status code 500".to_string()
        }
    );
}

#[test]
fn refused_connection_fails_request() {
    // Grab a free port, then release it so nothing is listening
    let endpoint = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let outcome = broadcast::broadcast(&transport(), &endpoint, "0200");

    assert!(matches!(outcome, BroadcastOutcome::Failed { .. }));
    assert!(txcast::form::outcome_label(&outcome).starts_with("Error: "));
}

#[test]
fn slow_relay_hits_configured_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        read_head(&stream);
        thread::sleep(Duration::from_secs(2));
    });

    let transport = HttpTransport::new(Some(Duration::from_millis(200))).unwrap();
    let start = Instant::now();
    let outcome = broadcast::broadcast(&transport, &endpoint, "0200");

    assert!(matches!(outcome, BroadcastOutcome::Failed { .. }));
    assert!(start.elapsed() < Duration::from_secs(2));
    server.join().unwrap();
}

#[test]
fn session_label_follows_relay_reply() {
    let (endpoint, server) = one_shot_relay("200 OK", r#"{"status":"success","txid":"c0ffee"}"#);
    let config = AppConfig {
        endpoint,
        ..Default::default()
    };
    let mut session = Session::from_config(&config).unwrap();

    session.dispatch(Event::PayloadEdited("0200".to_string()));
    session.dispatch(Event::BroadcastSubmitted);
    assert!(session.form.is_broadcasting());

    let deadline = Instant::now() + Duration::from_secs(10);
    while session.form.is_broadcasting() && Instant::now() < deadline {
        session.process_completions();
        thread::sleep(Duration::from_millis(10));
    }
    server.join().unwrap();

    assert_eq!(session.form.label, "Transaction ID: c0ffee");
    assert!(session.label_updated_at.is_some());
}
