//! PostgreSQL implementation of the hierarchy repository.
//!
//! Provides the production backend for the `HierarchyRepository` trait with
//! connection pooling and transaction safety.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Multi-statement lifecycle transitions (version supersession, approval
//!   cascade, M&A apply) wrapped in single transactions
//! - Identity-field filters via JSONB extraction (`user_input ->> 'company'`)
//! - The single-active-draft invariant enforced by a partial unique index
//!
//! ## Database Tables
//!
//! - `hierarchy_metadata`: one row per version of one hierarchy submission
//! - `hierarchy_data`: append-only payload snapshots per metadata record
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hierarchy_shared::types::{
    HierarchyData, HierarchyMetadata, HierarchyStatus, MaStatus, NewHierarchyMetadata,
    TrackedHierarchy,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{HierarchyRepository, HierarchyRepositoryError};

const METADATA_COLUMNS: &str = "id, user_input, project_name, version, version_number, status, \
     is_active_draft, root_hierarchy_id, user_feedback, has_ma_update, last_ma_checked, created_at";

const DATA_COLUMNS: &str = "id, metadata_id, data, created_at, updated_at";

/// Raw `hierarchy_metadata` row, decoded before domain conversion.
#[derive(sqlx::FromRow)]
struct MetadataRow {
    id: Uuid,
    user_input: Value,
    project_name: String,
    version: String,
    version_number: i32,
    status: String,
    is_active_draft: bool,
    root_hierarchy_id: Option<Uuid>,
    user_feedback: Option<Value>,
    has_ma_update: bool,
    last_ma_checked: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl MetadataRow {
    fn into_metadata(self) -> Result<HierarchyMetadata, HierarchyRepositoryError> {
        let status = self
            .status
            .parse::<HierarchyStatus>()
            .map_err(|e| HierarchyRepositoryError::InvalidStatus {
                id: self.id,
                status: e.0,
            })?;
        let user_input = serde_json::from_value(self.user_input).map_err(|source| {
            HierarchyRepositoryError::InvalidUserInput {
                id: self.id,
                source,
            }
        })?;
        Ok(HierarchyMetadata {
            id: self.id,
            user_input,
            project_name: self.project_name,
            version: self.version,
            version_number: self.version_number,
            status,
            is_active_draft: self.is_active_draft,
            root_hierarchy_id: self.root_hierarchy_id,
            user_feedback: self.user_feedback,
            has_ma_update: self.has_ma_update,
            last_ma_checked: self.last_ma_checked,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DataRow {
    id: Uuid,
    metadata_id: Uuid,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DataRow> for HierarchyData {
    fn from(row: DataRow) -> Self {
        HierarchyData {
            id: row.id,
            metadata_id: row.metadata_id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TrackedRow {
    id: Uuid,
    company: Option<String>,
    has_ma_update: bool,
    last_ma_checked: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct MaStatusRow {
    has_ma_update: bool,
    last_ma_checked: Option<DateTime<Utc>>,
}

/// PostgreSQL implementation of the hierarchy repository.
///
/// All lifecycle write paths that touch more than one row run inside a
/// single transaction, so a failure mid-sequence rolls back cleanly and a
/// chain is never left half-transitioned.
pub struct PostgresHierarchyRepository {
    pool: sqlx::PgPool,
}

impl PostgresHierarchyRepository {
    /// Creates a new PostgreSQL repository instance over a configured pool
    /// whose schema has the hierarchy migrations applied.
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, HierarchyRepositoryError> {
        Ok(Self { pool })
    }

    /// Inserts a metadata record within an active transaction.
    ///
    /// New records always enter as the editable draft; the partial unique
    /// index on active drafts rejects a second one for the same
    /// (company, project, location) tuple.
    async fn insert_metadata_tx(
        &self,
        metadata: &NewHierarchyMetadata,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<HierarchyMetadata, HierarchyRepositoryError> {
        let user_input = serde_json::to_value(&metadata.user_input)
            .map_err(HierarchyRepositoryError::Serialization)?;
        let sql = format!(
            "INSERT INTO hierarchy_metadata \
             (user_input, project_name, version, version_number, status, user_feedback, root_hierarchy_id, is_active_draft) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE) \
             RETURNING {METADATA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MetadataRow>(&sql)
            .bind(user_input)
            .bind(&metadata.project_name)
            .bind(&metadata.version)
            .bind(metadata.version_number)
            .bind(metadata.status.as_str())
            .bind(&metadata.user_feedback)
            .bind(metadata.root_hierarchy_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| Self::translate_insert_error(metadata, e))?;
        row.into_metadata()
    }

    /// Inserts a data snapshot within an active transaction.
    async fn insert_data_tx(
        &self,
        metadata_id: Uuid,
        data: &Value,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<HierarchyData, HierarchyRepositoryError> {
        let sql = format!(
            "INSERT INTO hierarchy_data (metadata_id, data) VALUES ($1, $2) RETURNING {DATA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DataRow>(&sql)
            .bind(metadata_id)
            .bind(data)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.into())
    }

    /// Maps a unique violation on the active-draft index to the dedicated
    /// error variant; everything else stays a database error.
    fn translate_insert_error(
        metadata: &NewHierarchyMetadata,
        error: sqlx::Error,
    ) -> HierarchyRepositoryError {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.constraint() == Some("uq_hierarchy_metadata_active_draft") {
                return HierarchyRepositoryError::ActiveDraftExists {
                    company: metadata.user_input.company.clone(),
                    project_name: metadata.project_name.clone(),
                };
            }
        }
        HierarchyRepositoryError::DatabaseError(error)
    }

    fn metadata_rows(
        rows: Vec<MetadataRow>,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError> {
        rows.into_iter().map(MetadataRow::into_metadata).collect()
    }
}

#[async_trait]
impl HierarchyRepository for PostgresHierarchyRepository {
    async fn insert_root(
        &self,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let inserted = self.insert_metadata_tx(metadata, &mut tx).await?;
        let snapshot = self.insert_data_tx(inserted.id, data, &mut tx).await?;
        tx.commit().await?;
        debug!(id = %inserted.id, company = %inserted.user_input.company, "inserted hierarchy root");
        Ok((inserted, snapshot))
    }

    async fn insert_version(
        &self,
        parent_id: Uuid,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE hierarchy_metadata SET is_active_draft = FALSE WHERE id = $1")
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        let inserted = self.insert_metadata_tx(metadata, &mut tx).await?;
        let snapshot = self.insert_data_tx(inserted.id, data, &mut tx).await?;
        tx.commit().await?;
        debug!(id = %inserted.id, %parent_id, version = %inserted.version, "inserted hierarchy version");
        Ok((inserted, snapshot))
    }

    async fn approve_chain_member(
        &self,
        root_id: Uuid,
        id: Uuid,
    ) -> Result<HierarchyMetadata, HierarchyRepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE hierarchy_metadata SET status = 'archived', is_active_draft = FALSE \
             WHERE (root_hierarchy_id = $1 OR id = $1) AND id <> $2",
        )
        .bind(root_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let sql = format!(
            "UPDATE hierarchy_metadata SET status = 'approved', is_active_draft = FALSE \
             WHERE id = $1 RETURNING {METADATA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MetadataRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(%id, %root_id, "approved hierarchy version, chain archived");
        row.into_metadata()
    }

    async fn archive_active_draft(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<u64, HierarchyRepositoryError> {
        let base = "UPDATE hierarchy_metadata SET status = 'archived', is_active_draft = FALSE \
             WHERE user_input->>'company' = $1 AND project_name = $2 AND status = 'in-draft'";
        let result = match location {
            Some(location) => {
                let sql = format!("{base} AND user_input->>'location' = $3");
                sqlx::query(&sql)
                    .bind(company)
                    .bind(project_name)
                    .bind(location)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{base} AND (user_input->>'location' IS NULL OR user_input->>'location' = '')"
                );
                sqlx::query(&sql)
                    .bind(company)
                    .bind(project_name)
                    .execute(&self.pool)
                    .await?
            }
        };
        let archived = result.rows_affected();
        if archived > 0 {
            debug!(%company, %project_name, archived, "archived active draft");
        }
        Ok(archived)
    }

    async fn metadata_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError> {
        let sql = format!("SELECT {METADATA_COLUMNS} FROM hierarchy_metadata WHERE id = $1");
        let row = sqlx::query_as::<_, MetadataRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(MetadataRow::into_metadata).transpose()
    }

    async fn data_for_metadata(
        &self,
        metadata_id: Uuid,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError> {
        let sql = format!(
            "SELECT {DATA_COLUMNS} FROM hierarchy_data WHERE metadata_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, DataRow>(&sql)
            .bind(metadata_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(HierarchyData::from).collect())
    }

    async fn find_latest_by_name(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError> {
        let base = format!(
            "SELECT {METADATA_COLUMNS} FROM hierarchy_metadata \
             WHERE user_input->>'company' = $1 AND project_name = $2"
        );
        let row = match location {
            Some(location) => {
                let sql = format!(
                    "{base} AND user_input->>'location' = $3 \
                     ORDER BY version_number DESC LIMIT 1"
                );
                sqlx::query_as::<_, MetadataRow>(&sql)
                    .bind(company)
                    .bind(project_name)
                    .bind(location)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{base} AND (user_input->>'location' IS NULL OR user_input->>'location' = '') \
                     ORDER BY version_number DESC LIMIT 1"
                );
                sqlx::query_as::<_, MetadataRow>(&sql)
                    .bind(company)
                    .bind(project_name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        row.map(MetadataRow::into_metadata).transpose()
    }

    async fn find_active_by_company(
        &self,
        company: &str,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM hierarchy_metadata \
             WHERE user_input->>'company' = $1 AND status IN ('approved', 'in-draft') \
             ORDER BY version_number DESC"
        );
        let rows = sqlx::query_as::<_, MetadataRow>(&sql)
            .bind(company)
            .fetch_all(&self.pool)
            .await?;
        Self::metadata_rows(rows)
    }

    async fn all_metadata_grouped_order(
        &self,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM hierarchy_metadata \
             ORDER BY user_input->>'company', user_input->>'location', project_name, \
             version_number DESC"
        );
        let rows = sqlx::query_as::<_, MetadataRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Self::metadata_rows(rows)
    }

    async fn latest_data_snapshots(
        &self,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError> {
        let sql = format!(
            "SELECT DISTINCT ON (metadata_id) {DATA_COLUMNS} FROM hierarchy_data \
             ORDER BY metadata_id, created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, DataRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(HierarchyData::from).collect())
    }

    async fn list_trackable(&self) -> Result<Vec<TrackedHierarchy>, HierarchyRepositoryError> {
        let rows = sqlx::query_as::<_, TrackedRow>(
            "SELECT id, user_input->>'company' AS company, has_ma_update, last_ma_checked \
             FROM hierarchy_metadata WHERE status IN ('in-draft', 'approved')",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| TrackedHierarchy {
                id: row.id,
                company: row.company.unwrap_or_default(),
                has_ma_update: row.has_ma_update,
                last_ma_checked: row.last_ma_checked,
            })
            .collect())
    }

    async fn apply_ma_update(
        &self,
        id: Uuid,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let metadata_sql = format!(
            "UPDATE hierarchy_metadata SET has_ma_update = FALSE, last_ma_checked = NOW() \
             WHERE id = $1 RETURNING {METADATA_COLUMNS}"
        );
        let metadata_row = sqlx::query_as::<_, MetadataRow>(&metadata_sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        // fetch_one: a record with no snapshot aborts the transaction instead
        // of leaving the flag cleared with a stale payload.
        let data_sql = format!(
            "UPDATE hierarchy_data SET data = $2, updated_at = NOW() \
             WHERE id = (SELECT id FROM hierarchy_data WHERE metadata_id = $1 \
                         ORDER BY created_at DESC, id DESC LIMIT 1) \
             RETURNING {DATA_COLUMNS}"
        );
        let data_row = sqlx::query_as::<_, DataRow>(&data_sql)
            .bind(id)
            .bind(data)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(%id, "applied M&A update");
        Ok((metadata_row.into_metadata()?, data_row.into()))
    }

    async fn ma_status(&self, id: Uuid) -> Result<Option<MaStatus>, HierarchyRepositoryError> {
        let row = sqlx::query_as::<_, MaStatusRow>(
            "SELECT has_ma_update, last_ma_checked FROM hierarchy_metadata WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| MaStatus {
            has_ma_update: row.has_ma_update,
            last_ma_checked: row.last_ma_checked,
        }))
    }
}
