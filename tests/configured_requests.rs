//! Requests built from a loaded configuration, serialized end to end.

use std::sync::Arc;

use outbound_request::config::load_config_str;
use outbound_request::request::{
    ClientCookie, CookieEncoder, HttpMethod, Request, RequestFactory, X_REQUEST_ID,
};
use outbound_request::wire::ToWire;
use outbound_request::RequestError;

const CONFIG: &str = r#"
[request]
user_agent = "inventory-sync/2.1"
request_id = true

[[request.default_headers]]
name = "accept"
value = "application/json"

[cookies]
encoder = "strict"

[query]
max_params = 3
semicolon_is_separator = false

[observability]
log_level = "debug"
log_format = "json"
"#;

fn factory() -> RequestFactory {
    let config = load_config_str(CONFIG).unwrap();
    RequestFactory::new(&config).unwrap()
}

#[test]
fn test_configured_defaults_reach_the_wire() {
    let mut request = factory()
        .request(HttpMethod::Get, "https://api.example.com/v1/items?page=2")
        .unwrap();
    request
        .add_cookies([ClientCookie::new("s", "1"), ClientCookie::new("t", "2")])
        .unwrap();

    let head = request.to_request_head();
    assert_eq!(head.request_line(), "GET /v1/items?page=2 HTTP/1.1");
    assert_eq!(head.headers()["accept"], "application/json");
    assert_eq!(head.headers()["user-agent"], "inventory-sync/2.1");
    assert_eq!(head.headers()["cookie"], "s=1;t=2");
    assert!(head.headers().contains_key(X_REQUEST_ID));
}

#[test]
fn test_configured_strict_encoder_rejects_invalid_cookie() {
    let mut request = factory().request(HttpMethod::Post, "/login").unwrap();
    assert_eq!(request.cookie_encoder(), CookieEncoder::Strict);

    let err = request
        .add_cookie(&ClientCookie::new("token", "a b"))
        .unwrap_err();
    assert!(matches!(err, RequestError::InvalidCookie { .. }));
    assert!(request.headers().get("cookie").is_none());
}

#[test]
fn test_configured_query_options() {
    let request = factory()
        .request(HttpMethod::Get, "/search?a=1;b=2&c=3&d=4&e=5")
        .unwrap();
    let params = request.parameters();

    assert_eq!(params.len(), 3);
    assert_eq!(params.get("a"), Some("1;b=2"));
    assert!(!params.contains("e"));
}

#[test]
fn test_parameter_rewrite_is_visible_on_the_wire() {
    let mut request = Request::get("http://host/list?page=1&sort=asc#top").unwrap();
    request
        .parameters_mut()
        .set("page", ["2"])
        .unwrap()
        .add("filter", "new items")
        .unwrap();

    assert_eq!(request.parameters().get_as::<u32>("page"), Some(2));
    assert_eq!(
        request.to_request_head().target(),
        "/list?page=2&sort=asc&filter=new+items#top"
    );
}

#[tokio::test]
async fn test_parameters_shared_across_tasks() {
    let request = Arc::new(Request::get("/a?x=1&y=2&y=3").unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let request = Arc::clone(&request);
            tokio::spawn(async move { request.parameters() })
        })
        .collect();

    let mut decoded = Vec::new();
    for handle in handles {
        decoded.push(handle.await.unwrap());
    }

    let first = &decoded[0];
    assert!(decoded.iter().all(|p| Arc::ptr_eq(p, first)));
    assert_eq!(first.get_all("y"), ["2", "3"]);
}
