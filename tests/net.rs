// tests/net.rs
//
// HTTP adapters against a loopback stub: one canned response per accepted
// connection, raw request text handed back for inspection.
//
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use fragshop::core::net::GitHubSource;
use fragshop::reserve::{Contact, Reservation, ReservationSink};
use fragshop::{
    normalize, PageRequest, PageResponse, RawTicket, ReserveError, ShopOptions, SyncError,
    TicketSource,
};

fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (k, v) in headers {
        out.push_str(&format!("{k}: {v}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

fn serve(responses: Vec<String>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for reply in responses {
            let Ok((mut stream, _)) = listener.accept() else { return };
            let request = read_request(&mut stream);
            let _ = tx.send(request);
            let _ = stream.write_all(reply.as_bytes());
            let _ = stream.flush();
        }
    });
    (format!("http://{addr}"), rx)
}

fn read_request(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else { continue };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        let done = match length {
            Some(len) => buf.len() >= end + 4 + len,
            None if head.contains("transfer-encoding: chunked") => buf.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if done {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn next_request(rx: &Receiver<String>) -> String {
    rx.recv_timeout(Duration::from_secs(10)).expect("stub saw a request")
}

fn source(base: &str) -> GitHubSource {
    let opts = ShopOptions {
        inventory_owner: "o".into(),
        inventory_repo: "r".into(),
        ..ShopOptions::default()
    };
    GitHubSource::new(&opts).expect("client").with_api_base(format!("{base}/"))
}

const PAGE: &str = r#"[
    {"id": 1, "number": 11, "html_url": "https://github.com/o/r/issues/11", "title": "Acme - Rain", "labels": [{"name": "In Stock"}]},
    {"id": 2, "number": 12, "html_url": "https://github.com/o/r/issues/12", "title": "Acme - Snow", "labels": []}
]"#;

#[test]
fn listing_query_and_etag() {
    let (base, rx) = serve(vec![response("200 OK", &[("ETag", "\"abc\"")], PAGE)]);
    let mut src = source(&base);
    assert_eq!(src.api_base(), base);

    let reply = src.fetch_page(&PageRequest::page(1, 100)).expect("page");

    let PageResponse::Page { tickets, etag } = reply else { panic!("expected a page") };
    assert_eq!(etag.as_deref(), Some("\"abc\""));
    let numbers: Vec<u64> = tickets.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![11, 12]);

    let req = next_request(&rx);
    let line = req.lines().next().unwrap_or_default();
    assert!(line.starts_with("GET /repos/o/r/issues?"), "{line}");
    assert!(line.contains("state=open"), "{line}");
    assert!(line.contains("per_page=100"), "{line}");
    assert!(line.contains("page=1"), "{line}");
    assert!(line.contains("labels=list%3Ainventory%2CIn+Stock"), "{line}");

    let lower = req.to_ascii_lowercase();
    assert!(lower.contains("accept: application/vnd.github+json"));
    assert!(lower.contains("user-agent: fragshop/"));
    assert!(!lower.contains("if-none-match"));
}

#[test]
fn token_goes_out_and_304_is_not_modified() {
    let (base, rx) = serve(vec![response("304 Not Modified", &[], "")]);
    let mut src = source(&base);
    let req = PageRequest { if_none_match: Some("\"v1\"".into()), ..PageRequest::page(1, 100) };

    assert_eq!(src.fetch_page(&req), Ok(PageResponse::NotModified));
    assert!(next_request(&rx).to_ascii_lowercase().contains("if-none-match: \"v1\""));
}

#[test]
fn rate_limit_headers_are_mapped() {
    let reset = (chrono::Utc::now().timestamp() + 120).to_string();
    let (base, _rx) = serve(vec![
        response("403 Forbidden", &[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", &reset)], "{}"),
        response("429 Too Many Requests", &[], ""),
    ]);
    let mut src = source(&base);

    match src.fetch_page(&PageRequest::page(1, 100)) {
        Err(SyncError::RateLimited { remaining, retry_after_mins }) => {
            assert_eq!(remaining, Some(0));
            assert!(matches!(retry_after_mins, Some(1..=3)), "{retry_after_mins:?}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        src.fetch_page(&PageRequest::page(1, 100)),
        Err(SyncError::RateLimited { remaining: None, retry_after_mins: None })
    );
}

#[test]
fn server_errors_keep_their_text() {
    let (base, _rx) = serve(vec![
        response("500 Internal Server Error", &[], "boom"),
        response("502 Bad Gateway", &[], ""),
    ]);
    let mut src = source(&base);

    assert_eq!(
        src.fetch_page(&PageRequest::page(1, 100)),
        Err(SyncError::Api { status: 500, body: "boom".into() })
    );
    assert_eq!(
        src.fetch_page(&PageRequest::page(1, 100)),
        Err(SyncError::Api { status: 502, body: "Bad Gateway".into() })
    );
}

#[test]
fn malformed_entry_is_skipped_not_fatal() {
    let body = r#"[
        {"id": 1, "number": 11, "title": "Acme - Rain"},
        {"id": 2, "number": 12, "title": null}
    ]"#;
    let (base, _rx) = serve(vec![response("200 OK", &[], body)]);
    let mut src = source(&base);

    let Ok(PageResponse::Page { tickets, .. }) = src.fetch_page(&PageRequest::page(1, 100)) else {
        panic!("expected a page");
    };
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].number, 11);
}

#[test]
fn non_array_listing_is_a_decode_error() {
    let (base, _rx) = serve(vec![response("200 OK", &[], r#"{"message":"nope"}"#)]);
    let mut src = source(&base);
    assert!(matches!(src.fetch_page(&PageRequest::page(1, 100)), Err(SyncError::Decode(_))));
}

fn item() -> fragshop::Product {
    normalize(&RawTicket {
        id: 1,
        number: 12,
        url: "https://github.com/o/r/issues/12".into(),
        title: "Acme - Midnight Bloom EDP 50ml".into(),
        body: Some("### Desired Sell Price (USD)\n\n120".into()),
        ..RawTicket::default()
    })
}

fn contact() -> Contact {
    Contact { name: "Sam".into(), contact: "@sam".into(), ..Contact::default() }
}

fn form_sink(base: &str) -> ReservationSink {
    let opts = ShopOptions { form_endpoint: Some(format!("{base}/f/shop")), ..ShopOptions::default() };
    ReservationSink::from_options(&opts).expect("form sink")
}

#[test]
fn form_post_sends_multipart_and_reads_envelope() {
    let (base, rx) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"success":true,"message":"Thanks, we'll be in touch"}"#,
    )]);

    let outcome = form_sink(&base).submit(&item(), &contact()).expect("accepted");
    assert_eq!(outcome, Reservation::Submitted { message: "Thanks, we'll be in touch".into() });

    let req = next_request(&rx);
    assert!(req.starts_with("POST /f/shop "), "{req}");
    assert!(req.to_ascii_lowercase().contains("content-type: multipart/form-data"));
    assert!(req.contains("name=\"subject\""));
    assert!(req.contains("Reservation: [RESERVE] Acme - Midnight Bloom (50mL)"));
    assert!(req.contains("name=\"contact\""));
    assert!(req.contains("@sam"));
    assert!(req.contains("$120.00"));
}

#[test]
fn form_post_rejection_carries_service_text() {
    let (base, _rx) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"success":false,"error":"Missing contact"}"#,
    )]);
    match form_sink(&base).submit(&item(), &contact()) {
        Err(ReserveError::Rejected(reason)) => assert_eq!(reason, "Missing contact"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn form_post_unreachable_is_transport() {
    let port = TcpListener::bind("127.0.0.1:0").and_then(|l| l.local_addr()).expect("free port").port();
    let sink = form_sink(&format!("http://127.0.0.1:{port}"));
    assert!(matches!(sink.submit(&item(), &contact()), Err(ReserveError::Transport(_))));
}
