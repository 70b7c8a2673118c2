//! Egress refresh against mock endpoints.

#[path = "helpers.rs"]
mod helpers;

use std::time::Duration;

use helpers::{background_with, mount_details, mount_egress, EGRESS_PATHS};
use ipscope::egress::EgressSlot;
use ipscope::error_handling::FailureKind;
use ipscope::lookup::IpRecord;
use ipscope::store::{StorageKey, Store, StoreExt};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stored(bg: &ipscope::Background, slot: EgressSlot) -> Option<IpRecord> {
    bg.session()
        .get::<IpRecord>(&StorageKey::Egress(slot))
        .expect("readable record")
}

#[tokio::test]
async fn test_refresh_with_token_writes_all_slots() {
    let server = MockServer::start().await;
    mount_egress(&server, EGRESS_PATHS[0], "36.112.0.1\n").await;
    mount_egress(&server, EGRESS_PATHS[1], "240e:1::1").await;
    mount_egress(&server, EGRESS_PATHS[2], " 203.0.113.10 ").await;
    mount_egress(&server, EGRESS_PATHS[3], "2001:db8::10").await;
    Mock::given(method("GET"))
        .and(path("/36.112.0.1"))
        .and(query_param("token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "36.112.0.1", "country": "CN", "org": "AS4808 China Unicom"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, "240e:1::1", json!({ "ip": "240e:1::1", "country": "CN" }), 1).await;
    mount_details(&server, "203.0.113.10", json!({ "ip": "203.0.113.10", "country": "JP" }), 1).await;
    // A failed lookup still stores the IP, with null details.
    Mock::given(method("GET"))
        .and(path("/2001:db8::10"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let bg = background_with(&server, Some("tok"));
    let written = bg.refresh_egress().await;
    assert_eq!(written.len(), 4);

    let dom = stored(&bg, EgressSlot::DomesticV4).expect("domestic v4");
    assert_eq!(dom.ip, "36.112.0.1");
    assert_eq!(dom.details.as_ref().and_then(|d| d.country()), Some("CN"));

    let glob = stored(&bg, EgressSlot::GlobalV4).expect("global v4");
    assert_eq!(glob.ip, "203.0.113.10");

    let glob6 = stored(&bg, EgressSlot::GlobalV6).expect("global v6");
    assert_eq!(glob6.ip, "2001:db8::10");
    assert!(glob6.details.is_none());
    assert_eq!(bg.stats().count(FailureKind::Status), 1);
}

#[tokio::test]
async fn test_refresh_without_token_writes_nothing() {
    let server = MockServer::start().await;
    for route in EGRESS_PATHS {
        mount_egress(&server, route, "203.0.113.10").await;
    }
    mount_details(&server, "203.0.113.10", json!({ "country": "JP" }), 0).await;

    let bg = background_with(&server, None);
    assert!(bg.refresh_egress().await.is_empty());
    assert!(bg.session().keys().expect("keys").is_empty());
}

#[tokio::test]
async fn test_timeout_leaves_no_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EGRESS_PATHS[0]))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("36.112.0.1")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let bg = background_with(&server, Some("tok")).with_egress_timeout(Duration::from_millis(200));
    let written = bg.refresh_egress().await;

    assert!(!written.contains(&EgressSlot::DomesticV4));
    assert!(stored(&bg, EgressSlot::DomesticV4).is_none());
    assert!(bg.stats().count(FailureKind::Timeout) >= 1);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_record() {
    let server = MockServer::start().await;
    mount_egress(&server, EGRESS_PATHS[2], "203.0.113.10").await;
    mount_details(&server, "203.0.113.10", json!({ "country": "JP" }), 1).await;

    let bg = background_with(&server, Some("tok"));
    bg.refresh_egress().await;
    assert!(stored(&bg, EgressSlot::GlobalV4).is_some());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path(EGRESS_PATHS[2]))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
        .mount(&server)
        .await;

    assert!(bg.refresh_egress().await.is_empty());
    assert_eq!(
        stored(&bg, EgressSlot::GlobalV4).map(|r| r.ip).as_deref(),
        Some("203.0.113.10")
    );
    assert_eq!(bg.stats().count(FailureKind::EmptyBody), 1);
}
