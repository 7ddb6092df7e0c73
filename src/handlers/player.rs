//! Player lookup: profile, battle log and upcoming chests in one answer.
//!
//! # Responsibilities
//! - Issue the three sub-resource calls concurrently and wait for all
//! - Fail the request when the profile call fails
//! - Degrade battle log and upcoming chests to `[]` on any failure
//! - Merge everything into one flat object
//!
//! # Design Decisions
//! - `tokio::join!` polls all three futures; none is awaited alone
//! - No per-call timeout beyond the client's; no cancellation between calls

use axum::extract::{Path, State};
use serde_json::Value;

use crate::config::UpstreamKind;
use crate::error::{RelayError, RelayResult};
use crate::handlers::{expect_success, upstream_failure};
use crate::http::response::JsonPayload;
use crate::http::server::AppState;
use crate::tag::Tag;
use crate::upstream::{CacheHint, UpstreamClient, UpstreamError, UpstreamResponse};

const PROFILE: &str = "player_profile";
const BATTLE_LOG: &str = "player_battlelog";
const UPCOMING_CHESTS: &str = "player_upcomingchests";

/// Key of the battle history in the merged object.
pub const BATTLE_LOG_KEY: &str = "battleLog";
/// Key of the upcoming rewards in the merged object.
pub const UPCOMING_CHESTS_KEY: &str = "upcomingChests";

/// `GET /player/{tag}`
pub async fn get_player(
    State(state): State<AppState>,
    Path(raw_tag): Path<String>,
) -> RelayResult<JsonPayload> {
    let player = lookup_player(&state.upstream, state.player_upstream, &raw_tag).await?;
    Ok(JsonPayload::ok(player, CacheHint::PROFILE))
}

/// Fetch and merge the three player sub-resources from `kind`.
pub async fn lookup_player(
    upstream: &UpstreamClient,
    kind: UpstreamKind,
    raw_tag: &str,
) -> RelayResult<Value> {
    let tag = Tag::parse(raw_tag)?;

    if !upstream.has_credential(kind) {
        return Err(RelayError::missing_credential());
    }

    let profile_path = format!("players/{}", tag.encoded());
    let battle_log_path = format!("{}/battlelog", profile_path);
    let chests_path = format!("{}/upcomingchests", profile_path);

    let (profile, battle_log, chests) = tokio::join!(
        upstream.get(kind, PROFILE, &profile_path, None, CacheHint::PROFILE),
        upstream.get(kind, BATTLE_LOG, &battle_log_path, None, CacheHint::BATTLE_LOG),
        upstream.get(kind, UPCOMING_CHESTS, &chests_path, None, CacheHint::UPCOMING_CHESTS),
    );

    let profile = profile.map_err(|e| upstream_failure(PROFILE, e))?;
    let profile = expect_success(PROFILE, profile, "Player not found")?;

    let battle_log = match optional_json(BATTLE_LOG, battle_log) {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!(tag = %tag, "Battle log is not a list, using empty list");
            Vec::new()
        }
        None => Vec::new(),
    };

    let upcoming_chests = optional_json(UPCOMING_CHESTS, chests)
        .map(take_items)
        .unwrap_or_default();

    merge_player(profile, battle_log, upcoming_chests)
}

/// Body of a sub-resource that is allowed to fail; failures are logged and dropped.
fn optional_json(
    resource: &'static str,
    result: Result<UpstreamResponse, UpstreamError>,
) -> Option<Value> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(resource, error = %e, "Optional sub-resource failed");
            return None;
        }
    };

    if !response.is_success() {
        tracing::warn!(resource, status = response.status.as_u16(), "Optional sub-resource unavailable");
        return None;
    }

    match response.json() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(resource, error = %e, "Optional sub-resource body malformed");
            None
        }
    }
}

/// The `items` list of an upcoming-chests payload, or empty.
pub fn take_items(mut payload: Value) -> Vec<Value> {
    match payload.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Merge profile fields with the battle log and upcoming chests.
///
/// The two added keys replace same-named profile fields.
pub fn merge_player(
    profile: Value,
    battle_log: Vec<Value>,
    upcoming_chests: Vec<Value>,
) -> RelayResult<Value> {
    let Value::Object(mut merged) = profile else {
        tracing::error!("Player profile is not a JSON object");
        return Err(RelayError::internal());
    };

    merged.insert(BATTLE_LOG_KEY.to_string(), Value::Array(battle_log));
    merged.insert(UPCOMING_CHESTS_KEY.to_string(), Value::Array(upcoming_chests));

    Ok(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_merge() {
        let merged = merge_player(
            json!({"name": "A"}),
            vec![json!({"id": 1})],
            take_items(json!({"items": [{"id": 2}]})),
        )
        .unwrap();

        assert_eq!(
            merged,
            json!({
                "name": "A",
                "battleLog": [{"id": 1}],
                "upcomingChests": [{"id": 2}]
            })
        );
    }

    #[test]
    fn test_merged_keys_win() {
        let merged = merge_player(json!({"battleLog": "stale"}), vec![], vec![]).unwrap();
        assert_eq!(merged["battleLog"], json!([]));
    }

    #[test]
    fn test_non_object_profile_is_internal() {
        let err = merge_player(json!([1, 2]), vec![], vec![]).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_take_items_defaults_to_empty() {
        assert!(take_items(json!({})).is_empty());
        assert!(take_items(json!({"items": null})).is_empty());
        assert!(take_items(json!([])).is_empty());
    }

    #[test]
    fn test_optional_json_drops_failures() {
        let failed = UpstreamResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Bytes::from_static(b"{}"),
        };
        assert!(optional_json("t", Ok(failed)).is_none());

        let malformed = UpstreamResponse {
            status: StatusCode::OK,
            body: Bytes::from_static(b"not json"),
        };
        assert!(optional_json("t", Ok(malformed)).is_none());

        let missing = Err(UpstreamError::MissingCredential(UpstreamKind::Mirror));
        assert!(optional_json("t", missing).is_none());

        let ok = UpstreamResponse {
            status: StatusCode::OK,
            body: Bytes::from_static(b"[1]"),
        };
        assert_eq!(optional_json("t", Ok(ok)), Some(json!([1])));
    }
}
