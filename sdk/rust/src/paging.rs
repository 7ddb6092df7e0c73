use std::fmt;

/// Cursor paging for list endpoints (rankings, leaderboards).
///
/// The upstream accepts at most one of `after` and `before`.
#[derive(Debug, Clone, Default)]
pub struct Paging {
    pub limit: Option<u32>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// Both paging cursors were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingCursors;

impl fmt::Display for ConflictingCursors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Only one of 'after' or 'before' can be specified, not both.")
    }
}

impl std::error::Error for ConflictingCursors {}

impl Paging {
    pub fn limit(limit: Option<u32>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Query string for these parameters, `None` when nothing is set.
    pub fn query(&self) -> Result<Option<String>, ConflictingCursors> {
        if self.after.is_some() && self.before.is_some() {
            return Err(ConflictingCursors);
        }

        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(after) = &self.after {
            params.push(format!("after={}", urlencoding::encode(after)));
        }
        if let Some(before) = &self.before {
            params.push(format!("before={}", urlencoding::encode(before)));
        }

        if params.is_empty() {
            Ok(None)
        } else {
            Ok(Some(params.join("&")))
        }
    }
}
