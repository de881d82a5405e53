//! PostgreSQL implementation of [`DataRequestStore`]

use async_trait::async_trait;
use datareq_common::types::{Comment, DataRequest, SortOrder, Vote};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::{DataRequestFilter, DataRequestStore, StoreError, StoreResult};
use crate::models::{CommentRow, DataRequestRow, VoteRow};

const DATAREQUEST_COLUMNS: &str = "id, user_id, title, description, organization_id, \
     open_time, accepted_dataset_id, close_time, closed";

const COMMENT_COLUMNS: &str = "id, datarequest_id, user_id, comment, time";

/// sqlx-backed store; cloning shares the pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    migrated: std::sync::Arc<OnceCell<()>>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrated: std::sync::Arc::new(OnceCell::new()),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DataRequestStore for PgStore {
    async fn init(&self) -> StoreResult<()> {
        self.migrated
            .get_or_try_init(|| async {
                tracing::info!("Running data request migrations");
                sqlx::migrate!("../../migrations").run(&self.pool).await?;
                Ok::<_, StoreError>(())
            })
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_datarequest(&self, id: Uuid) -> StoreResult<Option<DataRequest>> {
        let sql = format!("SELECT {DATAREQUEST_COLUMNS} FROM datarequests WHERE id = $1");
        let row = sqlx::query_as::<_, DataRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_datarequest_by_title(&self, title: &str) -> StoreResult<Option<DataRequest>> {
        let sql = format!(
            "SELECT {DATAREQUEST_COLUMNS} FROM datarequests WHERE LOWER(title) = LOWER($1) LIMIT 1"
        );
        let row = sqlx::query_as::<_, DataRequestRow>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn list_datarequests(&self, filter: &DataRequestFilter) -> StoreResult<Vec<DataRequest>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {DATAREQUEST_COLUMNS} FROM datarequests WHERE TRUE"));

        if let Some(ref org) = filter.organization_id {
            builder.push(" AND organization_id = ").push_bind(org.clone());
        }
        if let Some(ref user) = filter.user_id {
            builder.push(" AND user_id = ").push_bind(user.clone());
        }
        if let Some(closed) = filter.closed {
            builder.push(" AND closed = ").push_bind(closed);
        }
        if let Some(ref q) = filter.q {
            let pattern = format!("%{}%", escape_like(q));
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        let order = filter.sort.as_sql();
        builder.push(format!(" ORDER BY open_time {order}, id {order}"));

        let rows = builder
            .build_query_as::<DataRequestRow>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(rows = rows.len(), "Listed data requests");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_datarequest(&self, request: &DataRequest) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO datarequests
                (id, user_id, title, description, organization_id, open_time,
                 accepted_dataset_id, close_time, closed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(request.id)
        .bind(&request.user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.organization_id)
        .bind(request.open_time)
        .bind(&request.accepted_dataset_id)
        .bind(request.close_time)
        .bind(request.closed)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_datarequest(&self, request: &DataRequest) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE datarequests
            SET title = $2,
                description = $3,
                organization_id = $4,
                accepted_dataset_id = $5,
                close_time = $6,
                closed = $7
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.organization_id)
        .bind(&request.accepted_dataset_id)
        .bind(request.close_time)
        .bind(request.closed)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Missing {
                entity: "Data request",
                id: request.id,
            });
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_datarequest(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM datarequests WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM datarequests_comments WHERE id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_comments(&self, datarequest_id: Uuid, sort: SortOrder) -> StoreResult<Vec<Comment>> {
        let order = sort.as_sql();
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM datarequests_comments \
             WHERE datarequest_id = $1 ORDER BY time {order}, id {order}"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(datarequest_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO datarequests_comments (id, datarequest_id, user_id, comment, time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.datarequest_id)
        .bind(&comment.user_id)
        .bind(&comment.comment)
        .bind(comment.time)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE datarequests_comments SET comment = $2 WHERE id = $1")
            .bind(comment.id)
            .bind(&comment.comment)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Missing {
                entity: "Comment",
                id: comment.id,
            });
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM datarequests_comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_vote(&self, vote: &Vote) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO datarequests_votes (id, datarequest_id, user_id, vote)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(vote.id)
        .bind(vote.datarequest_id)
        .bind(&vote.user_id)
        .bind(vote.vote)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_votes(&self, datarequest_id: Uuid) -> StoreResult<Vec<Vote>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT id, datarequest_id, user_id, vote FROM datarequests_votes WHERE datarequest_id = $1",
        )
        .bind(datarequest_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside ILIKE
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
