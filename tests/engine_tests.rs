//! Tests for the HTTP engines against a local mock server.
//!
//! Every test runs against both engine implementations:
//! - Status, reason phrase, headers and body streaming
//! - Request bodies and method/body validation
//! - Redirects and the shared cookie store
//! - Transport failures
//! - End-to-end conditional downloads

use std::io::Read;
use std::sync::Arc;

use fetchkit::dest::{Dest, FileDest, MemoryDest};
use fetchkit::download::{DownloadActionBuilder, Status};
use fetchkit::http::{
    create_engine, BytesBody, EngineKind, EngineResponse, HttpClientConfig, HttpEngine, ReaderBody,
    WebBody,
};
use fetchkit::Error;
use reqwest::Url;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::helpers::*;

const KINDS: [EngineKind; 2] = [EngineKind::Blocking, EngineKind::Middleware];

fn engine(kind: EngineKind) -> Arc<dyn HttpEngine> {
    create_engine(kind, &HttpClientConfig::default()).expect("Failed to create engine")
}

fn get(engine: &Arc<dyn HttpEngine>, url: &str) -> Box<dyn EngineResponse> {
    let mut request = engine.new_request();
    request.set_url(Url::parse(url).unwrap());
    request.method("GET", None).unwrap();
    request.execute().unwrap()
}

fn read_body(response: &mut Box<dyn EngineResponse>) -> Option<Vec<u8>> {
    let body = response.take_body()?;
    let mut data = Vec::new();
    body.into_reader().unwrap().read_to_end(&mut data).unwrap();
    Some(data)
}

#[test]
fn test_status_headers_and_body() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", "\"v1\"")
                    .insert_header("Content-Type", "application/octet-stream")
                    .set_body_bytes(HELLO_BODY.to_vec()),
            ),
    );

    for kind in KINDS {
        let mut response = get(&engine(kind), &server.url("/file"));
        assert_eq!(response.status(), 200, "{kind:?}");
        assert_eq!(response.reason(), "OK");
        assert_eq!(response.headers().get("etag"), Some("\"v1\""));

        let body = response.take_body().expect("200 carries a body");
        assert_eq!(body.content_length(), Some(11));
        assert_eq!(body.content_type(), Some("application/octet-stream"));
        let mut data = Vec::new();
        body.into_reader().unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, HELLO_BODY);

        assert!(response.take_body().is_none(), "body is taken once");
        response.close();
        response.close();
    }
}

#[test]
fn test_not_found_reason() {
    let server = TestServer::start();
    server.mount(Mock::given(path("/missing")).respond_with(ResponseTemplate::new(404)));

    for kind in KINDS {
        let response = get(&engine(kind), &server.url("/missing"));
        assert_eq!(response.status(), 404, "{kind:?}");
        assert_eq!(response.reason(), "Not Found");
    }
}

#[test]
fn test_no_body_for_not_modified_and_head() {
    let server = TestServer::start();
    server.mount(Mock::given(path("/cached")).respond_with(ResponseTemplate::new(304)));
    server.mount(
        Mock::given(method("HEAD"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(HELLO_BODY.to_vec())),
    );

    for kind in KINDS {
        let engine = engine(kind);
        let mut response = get(&engine, &server.url("/cached"));
        assert_eq!(response.status(), 304, "{kind:?}");
        assert!(read_body(&mut response).is_none());

        let mut request = engine.new_request();
        request.set_url(Url::parse(&server.url("/file")).unwrap());
        request.method("HEAD", None).unwrap();
        let mut response = request.execute().unwrap();
        assert_eq!(response.status(), 200);
        assert!(read_body(&mut response).is_none());
    }
}

#[test]
fn test_request_headers_are_sent() {
    let server = TestServer::start();
    server.mount(
        Mock::given(path("/echo"))
            .and(header("x-token", "secret"))
            .respond_with(ResponseTemplate::new(200)),
    );
    server.mount(
        Mock::given(path("/echo"))
            .respond_with(ResponseTemplate::new(400))
            .with_priority(10),
    );

    for kind in KINDS {
        let mut request = engine(kind).new_request();
        request.set_url(Url::parse(&server.url("/echo")).unwrap());
        request.method("GET", None).unwrap();
        request.header("X-Token", "stale");
        request.set_header("X-Token", "secret");
        assert_eq!(request.headers().get_all("x-token"), vec!["secret"]);
        assert_eq!(request.execute().unwrap().status(), 200, "{kind:?}");
    }
}

#[test]
fn test_post_body_and_content_type() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header("content-type", "text/plain"))
            .and(body_bytes(b"payload".to_vec()))
            .respond_with(ResponseTemplate::new(201)),
    );

    for kind in KINDS {
        let mut request = engine(kind).new_request();
        request.set_url(Url::parse(&server.url("/upload")).unwrap());
        request
            .method(
                "POST",
                Some(Box::new(BytesBody::new("payload").with_content_type("text/plain"))),
            )
            .unwrap();
        let response = request.execute().unwrap();
        assert_eq!(response.status(), 201, "{kind:?}");
        assert_eq!(response.reason(), "Created");
    }
}

#[test]
fn test_post_body_with_overstated_length() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(body_bytes(b"abc".to_vec()))
            .respond_with(ResponseTemplate::new(204)),
    );

    let mut request = engine(EngineKind::Middleware).new_request();
    request.set_url(Url::parse(&server.url("/upload")).unwrap());
    let body = ReaderBody::new(std::io::Cursor::new(b"abc".to_vec()), Some(u64::MAX));
    request.method("POST", Some(Box::new(body))).unwrap();

    assert_eq!(request.execute().unwrap().status(), 204);
}

#[test]
fn test_method_body_rules() {
    for kind in KINDS {
        let engine = engine(kind);

        let mut request = engine.new_request();
        assert!(matches!(request.method("PUT", None), Err(Error::Config(_))));

        let mut request = engine.new_request();
        let body: Box<dyn WebBody> = Box::new(BytesBody::new("x"));
        assert!(matches!(request.method("GET", Some(body)), Err(Error::Config(_))));

        let request = engine.new_request();
        assert!(matches!(request.execute(), Err(Error::Config(_))), "{kind:?}");
    }
}

#[test]
fn test_redirects_are_followed() {
    let server = TestServer::start();
    server.mount(
        Mock::given(path("/old"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new")),
    );
    server.mount(
        Mock::given(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved")),
    );

    for kind in KINDS {
        let mut response = get(&engine(kind), &server.url("/old"));
        assert_eq!(response.status(), 200, "{kind:?}");
        assert_eq!(response.url().as_str(), server.url("/new"));
        assert_eq!(read_body(&mut response).unwrap(), b"moved");
    }
}

#[test]
fn test_cookies_are_kept_per_engine() {
    let server = TestServer::start();
    server.mount(
        Mock::given(path("/login"))
            .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "session=abc; Path=/")),
    );
    server.mount(
        Mock::given(path("/private"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200)),
    );
    server.mount(
        Mock::given(path("/private"))
            .respond_with(ResponseTemplate::new(403))
            .with_priority(10),
    );

    for kind in KINDS {
        let engine = engine(kind);
        assert_eq!(get(&engine, &server.url("/private")).status(), 403, "{kind:?}");
        assert_eq!(get(&engine, &server.url("/login")).status(), 200);
        assert_eq!(get(&engine, &server.url("/private")).status(), 200);
    }
}

#[test]
fn test_connection_refused_is_a_transport_error() {
    for kind in KINDS {
        let mut request = engine(kind).new_request();
        request.set_url(Url::parse("http://127.0.0.1:1/file").unwrap());
        request.method("GET", None).unwrap();
        let err = request.execute().err().expect("connection must fail");
        assert!(err.is_transport(), "{kind:?}: {err}");
    }
}

#[test]
fn test_retrying_client_still_reports_status() {
    let server = TestServer::start();
    server.mount(Mock::given(path("/flaky")).respond_with(ResponseTemplate::new(503)));

    let config = HttpClientConfig {
        retries: 1,
        ..HttpClientConfig::default()
    };
    let engine = create_engine(EngineKind::Middleware, &config).unwrap();
    let response = get(&engine, &server.url("/flaky"));

    assert_eq!(response.status(), 503);
    assert_eq!(response.reason(), "Service Unavailable");
    assert_eq!(server.received().len(), 2);
}

// === End-to-end ===

#[test]
fn test_download_then_not_modified() {
    let server = TestServer::start();
    server.mount(
        Mock::given(path("/data.bin"))
            .and(header("if-none-match", "\"v1\""))
            .respond_with(ResponseTemplate::new(304)),
    );
    server.mount(
        Mock::given(path("/data.bin"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", "\"v1\"")
                    .set_body_bytes(HELLO_BODY.to_vec()),
            )
            .with_priority(10),
    );

    for kind in KINDS {
        let dir = create_temp_dir();
        let url = Url::parse(&server.url("/data.bin")).unwrap();
        let dest = FileDest::in_directory(dir.path(), &url).unwrap();
        let target = dest.path().to_path_buf();
        let mut action = DownloadActionBuilder::new(engine(kind))
            .url(url.as_str())
            .dest(dest)
            .use_etag(true)
            .user_agent(TEST_USER_AGENT)
            .quiet(true)
            .build();

        let first = action.execute().unwrap();
        assert_eq!(first.status(), Status::Downloaded, "{kind:?}");
        assert_eq!(first.size(), 11);
        assert_file_content(&target, HELLO_BODY);

        let second = action.execute().unwrap();
        assert_eq!(second.status(), Status::UpToDate);
        assert_eq!(second.statuscode(), 304);
        assert!(action.is_up_to_date());
        assert_file_content(&target, HELLO_BODY);
    }

    let agents: Vec<_> = server
        .received()
        .iter()
        .filter_map(|r| r.headers.get("user-agent").cloned())
        .collect();
    assert_eq!(agents.len(), 4);
    assert!(agents.iter().all(|a| a == TEST_USER_AGENT));
}

#[test]
fn test_download_server_error() {
    let server = TestServer::start();
    server.mount(Mock::given(path("/broken")).respond_with(ResponseTemplate::new(500)));

    for kind in KINDS {
        let dest = MemoryDest::new();
        let mut action = DownloadActionBuilder::new(engine(kind))
            .url(server.url("/broken"))
            .dest(dest.clone())
            .quiet(true)
            .build();

        match action.execute() {
            Err(Error::Status { code, reason, .. }) => {
                assert_eq!(code, 500);
                assert_eq!(reason, "Internal Server Error");
            }
            other => panic!("{kind:?}: unexpected outcome {other:?}"),
        }
        assert_eq!(dest.opens(), 0);
        assert_eq!(dest.etag(), None);
    }
}
