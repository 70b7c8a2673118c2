//! The `getData` contract and the colo probe.

#[path = "helpers.rs"]
mod helpers;

use std::time::Duration;

use helpers::{background_with, mount_details};
use ipscope::background::{Event, Request, RequestCompleted, ResourceType};
use ipscope::colo::{probe_colo_at, ColoOutcome};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_data_contract() {
    let server = MockServer::start().await;
    mount_details(&server, "1.1.1.1", json!({ "ip": "1.1.1.1", "country": "AU" }), 1).await;

    let bg = background_with(&server, Some("tok"));
    bg.handle_event(&Event::RequestCompleted(RequestCompleted {
        tab_id: 8,
        resource_type: ResourceType::MainFrame,
        ip: Some("1.1.1.1".into()),
        url: None,
    }))
    .await;
    bg.handle_event(&Event::TabActivated { tab_id: 8 }).await;

    let response = bg.handle_request(&Request::GetData { active_tab: None });
    let value = serde_json::to_value(&response).expect("serialize");

    let keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
    for key in [
        "token",
        "domIpv4",
        "domIpv6",
        "globIpv4",
        "globIpv6",
        "siteIp",
        "siteDetails",
    ] {
        assert!(keys.iter().any(|k| k == key), "missing {}", key);
    }
    assert_eq!(value["token"], "tok");
    assert_eq!(value["siteIp"], "1.1.1.1");
    assert_eq!(value["siteDetails"]["country"], "AU");
    assert!(value["domIpv4"].is_null());
}

#[tokio::test]
async fn test_requests_parse_from_wire_json() {
    let server = MockServer::start().await;
    let bg = background_with(&server, None);

    let request: Request = serde_json::from_value(json!({ "action": "getData" })).expect("parse");
    let value = serde_json::to_value(bg.handle_request(&request)).expect("serialize");
    assert!(value["token"].is_null());

    let request: Request = serde_json::from_value(json!({
        "action": "pageInfo",
        "pageInfo": {
            "url": "https://example.test/a",
            "hostname": "example.test",
            "origin": "https://example.test",
            "title": "Example"
        }
    }))
    .expect("parse");
    assert_eq!(
        serde_json::to_value(bg.handle_request(&request)).expect("serialize"),
        json!({})
    );
}

#[tokio::test]
async fn test_colo_probe_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/found/cdn-cgi/trace"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "fl=123\nh=example.test\nip=198.51.100.4\ncolo=NRT\nloc=JP\n",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/unknown/cdn-cgi/trace"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow/cdn-cgi/trace"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("colo=SJC")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let timeout = Duration::from_millis(300);
    let url = |p: &str| format!("{}/{}/cdn-cgi/trace", server.uri(), p);

    assert_eq!(
        probe_colo_at(&client, &url("found"), timeout).await,
        ColoOutcome::Found("NRT".into())
    );
    assert_eq!(
        probe_colo_at(&client, &url("unknown"), timeout).await,
        ColoOutcome::Unknown
    );
    assert_eq!(
        probe_colo_at(&client, &url("slow"), timeout).await,
        ColoOutcome::Failed
    );
}
