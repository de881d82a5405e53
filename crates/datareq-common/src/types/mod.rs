//! Domain types shared by the server and its collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{DataReqError, Result};

/// Lifecycle state of a data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    Open,
    Closed,
}

impl RequestState {
    /// Machine name used in facets and query strings
    pub fn name(self) -> &'static str {
        match self {
            RequestState::Open => "open",
            RequestState::Closed => "closed",
        }
    }

    /// Human readable label
    pub fn display_name(self) -> &'static str {
        match self {
            RequestState::Open => "Open",
            RequestState::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A user-submitted request for a dataset
///
/// `closed` and `close_time` always move together: a request is closed
/// exactly when it carries a close time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequest {
    pub id: Uuid,
    /// Owner, fixed at creation
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub open_time: DateTime<Utc>,
    pub closed: bool,
    pub accepted_dataset_id: Option<String>,
    pub close_time: Option<DateTime<Utc>>,
}

impl DataRequest {
    /// Create a new open request owned by `user_id`, opened now
    pub fn open(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::open_at(user_id, title, Utc::now())
    }

    /// Create a new open request with an explicit open time
    pub fn open_at(
        user_id: impl Into<String>,
        title: impl Into<String>,
        open_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            organization_id: None,
            open_time,
            closed: false,
            accepted_dataset_id: None,
            close_time: None,
        }
    }

    pub fn state(&self) -> RequestState {
        if self.closed {
            RequestState::Closed
        } else {
            RequestState::Open
        }
    }

    /// Close the request, recording the accepted dataset if any
    ///
    /// # Errors
    ///
    /// Returns [`DataReqError::AlreadyClosed`] if the request was closed
    /// before; the request is left untouched in that case.
    pub fn close(&mut self, accepted_dataset_id: Option<String>, at: DateTime<Utc>) -> Result<()> {
        if self.closed {
            return Err(DataReqError::AlreadyClosed(self.id));
        }
        self.closed = true;
        self.accepted_dataset_id = accepted_dataset_id.filter(|id| !id.is_empty());
        self.close_time = Some(at);
        Ok(())
    }
}

/// A comment attached to a data request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    /// Author, fixed at creation
    pub user_id: String,
    pub comment: String,
    pub time: DateTime<Utc>,
}

impl Comment {
    pub fn new(datarequest_id: Uuid, user_id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            datarequest_id,
            user_id: user_id.into(),
            comment: comment.into(),
            time: Utc::now(),
        }
    }
}

/// An up or down vote on a data request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    pub user_id: String,
    /// +1 for an up vote, -1 for a down vote
    pub vote: i16,
}

impl Vote {
    pub fn new(datarequest_id: Uuid, user_id: impl Into<String>, vote: i16) -> Self {
        Self {
            id: Uuid::new_v4(),
            datarequest_id,
            user_id: user_id.into(),
            vote,
        }
    }
}

/// Parse a raw vote value, accepting only +1 and -1
pub fn parse_vote(value: i64) -> Result<i16> {
    match value {
        1 => Ok(1),
        -1 => Ok(-1),
        other => Err(DataReqError::InvalidVote(other)),
    }
}

/// Ordering by creation time
///
/// Deserializes leniently: `desc` in any case sorts newest first, every other
/// value sorts oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_desc(self) -> bool {
        matches!(self, SortOrder::Desc)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl From<&str> for SortOrder {
    fn from(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SortOrder::from(raw.as_str()))
    }
}

/// Identity of whoever invokes an action
///
/// Passed explicitly to every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Catalog user id, `None` for anonymous callers
    pub user_id: Option<String>,
    #[serde(default)]
    pub sysadmin: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            sysadmin: false,
        }
    }

    pub fn sysadmin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            sysadmin: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// True when the caller is `user_id` or a sysadmin
    pub fn owns(&self, user_id: &str) -> bool {
        self.sysadmin || self.user_id.as_deref() == Some(user_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_request_defaults() {
        let req = DataRequest::open("user-1", "Need traffic data");
        assert_eq!(req.user_id, "user-1");
        assert!(!req.closed);
        assert!(req.close_time.is_none());
        assert!(req.accepted_dataset_id.is_none());
        assert_eq!(req.state(), RequestState::Open);
    }

    #[test]
    fn test_close_sets_time_and_dataset() {
        let mut req = DataRequest::open("user-1", "Need traffic data");
        let now = Utc::now();
        req.close(Some("pkg-1".to_string()), now).unwrap();

        assert!(req.closed);
        assert_eq!(req.close_time, Some(now));
        assert_eq!(req.accepted_dataset_id.as_deref(), Some("pkg-1"));
        assert_eq!(req.state(), RequestState::Closed);
    }

    #[test]
    fn test_close_twice_fails_and_keeps_state() {
        let mut req = DataRequest::open("user-1", "Need traffic data");
        let first = Utc::now();
        req.close(Some("pkg-1".to_string()), first).unwrap();

        let err = req.close(Some("pkg-2".to_string()), Utc::now()).unwrap_err();
        assert!(matches!(err, DataReqError::AlreadyClosed(id) if id == req.id));
        assert_eq!(req.accepted_dataset_id.as_deref(), Some("pkg-1"));
        assert_eq!(req.close_time, Some(first));
    }

    #[test]
    fn test_close_with_empty_dataset_stores_none() {
        let mut req = DataRequest::open("user-1", "Title");
        req.close(Some(String::new()), Utc::now()).unwrap();
        assert!(req.closed);
        assert!(req.accepted_dataset_id.is_none());
    }

    #[test]
    fn test_sort_order_is_lenient() {
        assert_eq!(SortOrder::from("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::from(" Desc "), SortOrder::Desc);
        assert_eq!(SortOrder::from("sideways"), SortOrder::Asc);
        assert_eq!(SortOrder::default(), SortOrder::Asc);

        let sort: SortOrder = serde_json::from_str("\"DESC\"").unwrap();
        assert_eq!(sort, SortOrder::Desc);
        let sort: SortOrder = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(sort, SortOrder::Asc);
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"desc\"");
    }

    #[test]
    fn test_parse_vote() {
        assert_eq!(parse_vote(1).unwrap(), 1);
        assert_eq!(parse_vote(-1).unwrap(), -1);
        assert!(matches!(parse_vote(0), Err(DataReqError::InvalidVote(0))));
        assert!(parse_vote(5).is_err());
    }

    #[test]
    fn test_caller_ownership() {
        assert!(Caller::user("u1").owns("u1"));
        assert!(!Caller::user("u2").owns("u1"));
        assert!(Caller::sysadmin("admin").owns("u1"));
        assert!(!Caller::anonymous().owns("u1"));
        assert!(!Caller::anonymous().is_authenticated());
    }
}
