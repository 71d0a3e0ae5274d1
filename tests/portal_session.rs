//! Runs the live page fetcher against a local portal stand-in.
//!
//! The stand-in sets a per-student session cookie on login and serves grades
//! only to requests carrying that cookie; everything else gets the login page.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use grades::models::{Config, Credentials, FieldKind, PortalConfig, Semester};
use grades::services::table::page_title;
use grades::services::{GradeService, PageSource, PortalClient};
use scraper::Html;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const LOGIN_TITLE: &str = "Вход в систему / РИТМ.Рейтинг";

struct Request {
    method: String,
    target: String,
    headers: HashMap<String, String>,
    body: String,
}

async fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(Request {
        method,
        target,
        headers,
        body,
    })
}

fn page(title: &str, cells: &[&str]) -> String {
    let rows: String = cells
        .chunks(8)
        .map(|row| {
            let tds: String = row.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();
    format!(
        "<html><head><title>{title}</title></head>\
         <body><table>{rows}</table></body></html>"
    )
}

/// Grades per student and term.
fn grades_for(student: &str, semester: &str) -> Vec<&'static str> {
    match (student, semester) {
        ("ivanov", "1") => vec!["Math", "5", "", "", "", "", "", "5"],
        ("ivanov", "2") => vec!["Physics", "", "", "", "", "", "", ""],
        ("petrova", "1") => vec!["History", "4", "", "", "", "", "", ""],
        _ => Vec::new(),
    }
}

fn respond(request: &Request) -> (String, Option<String>) {
    if request.method == "POST" && request.target == "/login" {
        let form: HashMap<String, String> = url::form_urlencoded::parse(request.body.as_bytes())
            .into_owned()
            .collect();
        let user = form.get("LoginForm[username]").cloned().unwrap_or_default();
        let password = form.get("LoginForm[password]").cloned().unwrap_or_default();
        let cookie = (password == format!("{user}-pass") && form.contains_key("yt0"))
            .then(|| format!("session={user}; Path=/"));
        return (page(LOGIN_TITLE, &[]), cookie);
    }

    let session = request
        .headers
        .get("cookie")
        .and_then(|c| c.split(';').find_map(|kv| kv.trim().strip_prefix("session=")))
        .map(str::to_string);

    let Some(student) = session else {
        return (page(LOGIN_TITLE, &[]), None);
    };

    let semester = request
        .target
        .split_once("semester=")
        .map(|(_, n)| n.to_string());
    let body = match semester {
        Some(n) => page("Успеваемость", &grades_for(&student, &n)),
        None => page("Успеваемость", &[]),
    };
    (body, None)
}

async fn handle(mut stream: TcpStream) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    let (body, cookie) = respond(&request);
    let set_cookie = cookie
        .map(|c| format!("Set-Cookie: {c}\r\n"))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\nConnection: close\r\n{set_cookie}\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn start_portal() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream));
        }
    });
    addr
}

fn config_for(addr: SocketAddr) -> Config {
    let mut config = Config::default();
    config.portal = PortalConfig {
        timeout_secs: 5,
        ..PortalConfig::with_base_url(format!("http://{addr}"))
    };
    config
}

fn student(login: &str) -> Credentials {
    Credentials::new(login, format!("{login}-pass"))
}

#[tokio::test]
async fn test_check_password_against_portal() {
    let addr = start_portal().await;
    let service = GradeService::new(Arc::new(config_for(addr)));

    assert!(service.check_password(&student("ivanov")).await);
    assert!(!service.check_password(&Credentials::new("ivanov", "wrong")).await);
}

#[tokio::test]
async fn test_unreachable_portal_is_not_authenticated() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = GradeService::new(Arc::new(config_for(addr)));
    assert!(!service.check_password(&student("ivanov")).await);
    assert!(service.fetch_all_semesters(&student("ivanov")).await.is_empty());
}

#[tokio::test]
async fn test_fetch_all_semesters_reuses_login_cookie() {
    let addr = start_portal().await;
    let service = GradeService::new(Arc::new(config_for(addr)));

    let semesters = service.fetch_all_semesters(&student("ivanov")).await;
    let numbers: Vec<u32> = semesters.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(semesters[0].subjects[0].name, "Math");
    assert_eq!(semesters[1].subjects[0].name, "Physics");
}

#[tokio::test]
async fn test_concurrent_students_do_not_share_sessions() {
    let addr = start_portal().await;
    let service = GradeService::new(Arc::new(config_for(addr)));

    let (first, second) = (student("ivanov"), student("petrova"));
    let (ivanov, petrova) = tokio::join!(
        service.fetch_all_semesters(&first),
        service.fetch_all_semesters(&second),
    );

    assert_eq!(ivanov.len(), 2);
    assert_eq!(ivanov[0].subjects[0].name, "Math");
    assert_eq!(petrova.len(), 1);
    assert_eq!(petrova[0].subjects[0].name, "History");
}

#[tokio::test]
async fn test_check_for_updates_against_portal() {
    let addr = start_portal().await;
    let service = GradeService::new(Arc::new(config_for(addr)));
    let credentials = student("ivanov");

    let mut previous: Vec<Semester> = service.fetch_all_semesters(&credentials).await;
    previous[0].subjects[0].test1 = "4".into();

    let (changes, snapshot) = service
        .check_for_updates(&credentials, &previous)
        .await
        .unwrap()
        .into_parts();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].semester, 1);
    assert_eq!(changes[0].subject, "Math");
    assert_eq!(changes[0].field, FieldKind::Test1);
    assert_eq!(changes[0].previous_value, "4");
    assert_eq!(changes[0].new_value, "5");
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_fetch_markup_requires_login_cookie() {
    let addr = start_portal().await;
    let config = config_for(addr);
    let client = PortalClient::new(Arc::new(config.portal.clone()));
    let url = config.portal.grades_url().unwrap();

    let rejected = client
        .fetch_markup(&Credentials::new("ivanov", "wrong"), &url)
        .await
        .unwrap();
    let accepted = client.fetch_markup(&student("ivanov"), &url).await.unwrap();

    let title = |markup: &str| page_title(&Html::parse_document(markup)).unwrap();
    assert_eq!(title(&rejected).as_deref(), Some(LOGIN_TITLE));
    assert_eq!(title(&accepted).as_deref(), Some("Успеваемость"));
}
