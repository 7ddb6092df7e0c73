//! Clan lookup.

use axum::extract::{Path, State};
use serde_json::Value;

use crate::config::UpstreamKind;
use crate::error::{RelayError, RelayResult};
use crate::handlers::{expect_success, upstream_failure};
use crate::http::response::JsonPayload;
use crate::http::server::AppState;
use crate::tag::Tag;
use crate::upstream::{CacheHint, UpstreamClient};

const RESOURCE: &str = "clan";

/// `GET /clan/{tag}`
pub async fn get_clan(
    State(state): State<AppState>,
    Path(raw_tag): Path<String>,
) -> RelayResult<JsonPayload> {
    let clan = lookup_clan(&state.upstream, &raw_tag).await?;
    Ok(JsonPayload::ok(clan, CacheHint::CLAN))
}

/// Fetch clan details from the official upstream.
pub async fn lookup_clan(upstream: &UpstreamClient, raw_tag: &str) -> RelayResult<Value> {
    let tag = Tag::parse(raw_tag)?;

    if !upstream.has_credential(UpstreamKind::Official) {
        return Err(RelayError::missing_credential());
    }

    let response = upstream
        .get(
            UpstreamKind::Official,
            RESOURCE,
            &format!("clans/{}", tag.encoded()),
            None,
            CacheHint::CLAN,
        )
        .await
        .map_err(|e| upstream_failure(RESOURCE, e))?;

    expect_success(RESOURCE, response, "Clan not found")
}
