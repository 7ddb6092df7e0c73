//! The SDK against a live relay.

use relay_sdk::{Paging, RelayClient};
use royale_relay::meta::{ranked_player_tags, MetaAnalyzer};
use serde_json::json;

mod common;

use common::{http_client, relay_config, start_mock_upstream, start_relay, test_credentials, MockReply};

#[tokio::test]
async fn test_sdk_health() {
    let upstream = start_mock_upstream(|_| MockReply::json(200, json!({}))).await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;

    let client = RelayClient::with_client(http_client(), &relay.url(""));
    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_sdk_clan_with_marker() {
    let upstream = start_mock_upstream(|_| MockReply::json(200, json!({"name": "Royals"}))).await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;

    let client = RelayClient::with_client(http_client(), &relay.url(""));
    let res = client.clan("#abc").await.unwrap();

    assert!(res.is_success());
    assert_eq!(res.body["name"], "Royals");
    assert_eq!(upstream.seen()[0].target, "/v1/clans/%23ABC");
}

#[tokio::test]
async fn test_sdk_proxy_keeps_tag_in_one_segment() {
    let upstream = start_mock_upstream(|_| MockReply::json(404, json!({"reason": "notFound"}))).await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;

    let client = RelayClient::with_client(http_client(), &relay.url(""));
    let res = client.proxy("players/#ABC/battlelog", Some("limit=5")).await.unwrap();

    assert_eq!(res.status.as_u16(), 404);
    assert_eq!(res.body["reason"], "notFound");
    assert_eq!(
        upstream.seen()[0].target,
        "/mirror/v1/players/%23ABC/battlelog?limit=5"
    );
}

#[tokio::test]
async fn test_sdk_reports_relay_errors() {
    let upstream = start_mock_upstream(|_| MockReply::json(404, json!({}))).await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;

    let client = RelayClient::with_client(http_client(), &relay.url(""));
    let res = client.player("ghost").await.unwrap();

    assert!(!res.is_success());
    assert_eq!(res.error_message(), Some("Player not found"));
}

#[tokio::test]
async fn test_sdk_paged_rankings_query() {
    let upstream = start_mock_upstream(|_| MockReply::json(200, json!({"items": []}))).await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;

    let client = RelayClient::with_client(http_client(), &relay.url(""));
    let paging = Paging {
        limit: Some(3),
        before: Some("cursor=".to_string()),
        ..Paging::default()
    };
    let query = paging.query().unwrap();
    let res = client
        .proxy("locations/global/pathoflegend/2024-05/rankings/players", query.as_deref())
        .await
        .unwrap();

    assert!(res.is_success());
    assert_eq!(
        upstream.seen()[0].target,
        "/mirror/v1/locations/global/pathoflegend/2024-05/rankings/players?limit=3&before=cursor%3D"
    );
}

#[tokio::test]
async fn test_meta_snapshot_from_top_players() {
    let upstream = start_mock_upstream(|path| {
        if path.ends_with("/pathoflegend/players") {
            MockReply::json(200, json!({"items": [{"tag": "#AAA"}, {"tag": "#BBB"}]}))
        } else if path.contains("%23AAA") {
            MockReply::json(
                200,
                json!([
                    {"type": "pathOfLegend", "team": [{"cards": [{"name": "Hog Rider"}, {"name": "Zap"}]}]},
                    {"type": "friendly", "team": [{"cards": [{"name": "Golem"}]}]}
                ]),
            )
        } else {
            MockReply::json(404, json!({"reason": "notFound"}))
        }
    })
    .await;
    let relay = start_relay(relay_config(&upstream), test_credentials()).await;
    let client = RelayClient::with_client(http_client(), &relay.url(""));

    let rankings = client
        .proxy("locations/global/pathoflegend/players", Some("limit=2"))
        .await
        .unwrap();
    let tags = ranked_player_tags(&rankings.body);
    assert_eq!(tags, vec!["#AAA", "#BBB"]);

    let mut analyzer = MetaAnalyzer::new();
    for tag in &tags {
        let res = client
            .proxy(&format!("players/{}/battlelog", tag), None)
            .await
            .unwrap();
        if res.is_success() {
            analyzer.add_battle_log(&res.body, 5);
        }
    }

    let snapshot = analyzer.snapshot(tags.len());
    assert_eq!(snapshot.meta_summary.total_players_analyzed, 2);
    assert_eq!(snapshot.meta_summary.total_decks_analyzed, 1);
    assert_eq!(snapshot.archetypes[0].archetype, "Cycle");
    assert_eq!(snapshot.top_synergies[0].pair, "Hog Rider + Zap");
}
