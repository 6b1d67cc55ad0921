use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::image::ImageRecord;
use crate::models::match_record::MatchRecord;
use crate::storage::{IndexStore, StorageError};

/// Index tables in PostgreSQL. See `db::ensure_schema` for the DDL.
#[derive(Clone)]
pub struct PgIndexStore {
    pool: PgPool,
}

impl PgIndexStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndexStore for PgIndexStore {
    async fn put_match_record(&self, record: &MatchRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO match_results (request_id, "timestamp", storage_key, bucket, match_score)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (request_id) DO UPDATE
            SET "timestamp" = EXCLUDED."timestamp",
                storage_key = EXCLUDED.storage_key,
                bucket = EXCLUDED.bucket,
                match_score = EXCLUDED.match_score
            "#,
        )
        .bind(record.request_id)
        .bind(&record.timestamp)
        .bind(&record.storage_key)
        .bind(&record.bucket)
        .bind(&record.match_score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_match_record(&self, request_id: Uuid) -> Result<Option<MatchRecord>, StorageError> {
        Ok(sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT request_id, "timestamp", storage_key, bucket, match_score
            FROM match_results
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn put_image_record(&self, record: &ImageRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO image_analysis_results (image_id, bucket, uploaded_file, "timestamp", labels)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (image_id) DO UPDATE
            SET bucket = EXCLUDED.bucket,
                uploaded_file = EXCLUDED.uploaded_file,
                "timestamp" = EXCLUDED."timestamp",
                labels = EXCLUDED.labels
            "#,
        )
        .bind(&record.image_id)
        .bind(&record.bucket)
        .bind(&record.uploaded_file)
        .bind(&record.timestamp)
        .bind(&record.labels)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
