//! Database row models
//!
//! Rows map one-to-one onto the tables created by the migrations and convert
//! into the shared domain types.

use chrono::{DateTime, Utc};
use datareq_common::types::{Comment, DataRequest, Vote};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `datarequests` table
#[derive(Debug, Clone, FromRow)]
pub struct DataRequestRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub open_time: DateTime<Utc>,
    pub accepted_dataset_id: Option<String>,
    pub close_time: Option<DateTime<Utc>>,
    pub closed: bool,
}

impl From<DataRequestRow> for DataRequest {
    fn from(row: DataRequestRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            organization_id: row.organization_id,
            open_time: row.open_time,
            closed: row.closed,
            accepted_dataset_id: row.accepted_dataset_id,
            close_time: row.close_time,
        }
    }
}

/// Row of the `datarequests_comments` table
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    pub user_id: String,
    pub comment: String,
    pub time: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            datarequest_id: row.datarequest_id,
            user_id: row.user_id,
            comment: row.comment,
            time: row.time,
        }
    }
}

/// Row of the `datarequests_votes` table
#[derive(Debug, Clone, FromRow)]
pub struct VoteRow {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    pub user_id: String,
    pub vote: i16,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            id: row.id,
            datarequest_id: row.datarequest_id,
            user_id: row.user_id,
            vote: row.vote,
        }
    }
}
