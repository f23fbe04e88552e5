//! This module defines the `HierarchyRepository` trait, which provides an
//! interface for interacting with the underlying data store for hierarchy
//! metadata and data snapshots. It abstracts the database operations for
//! persistence and retrieval.
use crate::errors::HierarchyRepositoryError;
use hierarchy_shared::types::{
    HierarchyData, HierarchyMetadata, MaStatus, NewHierarchyMetadata, TrackedHierarchy,
};
use serde_json::Value;
use uuid::Uuid;

/// A trait that defines the interface for interacting with the hierarchy store.
///
/// Implementors provide the write paths of the version-chain lifecycle
/// (root insertion, version supersession, approval cascade, draft archival),
/// the lookup queries layered over the same records, and the M&A review
/// side-channel. Multi-statement write paths are expected to be atomic: a
/// failure mid-sequence must leave no partial effect behind.
#[async_trait::async_trait]
pub trait HierarchyRepository: Send + Sync {
    /// Inserts a chain root together with its first data snapshot.
    ///
    /// Both rows are written in a single transaction. The store enforces the
    /// single-active-draft invariant; inserting a second editable draft for
    /// the same (company, project, location) tuple fails with
    /// [`HierarchyRepositoryError::ActiveDraftExists`].
    ///
    /// # Returns
    ///
    /// The inserted (metadata, data) pair as stored, server-assigned fields
    /// included.
    async fn insert_root(
        &self,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError>;

    /// Inserts a successor version and deactivates the parent draft.
    ///
    /// The parent's `is_active_draft` flag is cleared and the new metadata
    /// and data rows are inserted in the same transaction, so the editable
    /// tip of the chain moves atomically.
    ///
    /// # Arguments
    ///
    /// * `parent_id` - The record whose draft flag is handed over.
    /// * `metadata` - The successor record, with chain fields already computed.
    /// * `data` - The successor's first data snapshot.
    async fn insert_version(
        &self,
        parent_id: Uuid,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError>;

    /// Approves one chain member and archives every other member.
    ///
    /// Runs the archive-then-approve sequence in a single transaction:
    /// all records with `root_hierarchy_id = root_id` or `id = root_id`,
    /// except `id` itself, become `archived` with the draft flag cleared,
    /// then `id` becomes `approved`. Concurrent approvals on the same chain
    /// serialize on the row locks taken by the archive update.
    ///
    /// # Returns
    ///
    /// The approved metadata record as stored after the transition.
    async fn approve_chain_member(
        &self,
        root_id: Uuid,
        id: Uuid,
    ) -> Result<HierarchyMetadata, HierarchyRepositoryError>;

    /// Archives the active in-draft record for a (company, project, location)
    /// tuple, if one exists.
    ///
    /// A provided location is matched exactly; an absent location matches
    /// records whose stored location is null or empty.
    ///
    /// # Returns
    ///
    /// The number of records archived (0 or 1 under the invariant).
    async fn archive_active_draft(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<u64, HierarchyRepositoryError>;

    /// Fetches a metadata record by id, `None` when it does not exist.
    async fn metadata_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError>;

    /// Fetches all data snapshots for a metadata record, most recent first.
    async fn data_for_metadata(
        &self,
        metadata_id: Uuid,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError>;

    /// Fetches the highest-versioned record for a (company, project, location)
    /// tuple, with the same location matching rules as
    /// [`archive_active_draft`](Self::archive_active_draft).
    async fn find_latest_by_name(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError>;

    /// Fetches every non-archived record for a company, ordered by version
    /// number descending.
    async fn find_active_by_company(
        &self,
        company: &str,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError>;

    /// Fetches every metadata record ordered by the grouping fields
    /// (company, location, project) with version numbers descending within
    /// each tuple, ready for a single grouping pass.
    async fn all_metadata_grouped_order(
        &self,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError>;

    /// Fetches the most recent data snapshot of every metadata record that
    /// has one, in one scan.
    async fn latest_data_snapshots(
        &self,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError>;

    /// Fetches the M&A projection of every record still in draft or approved.
    async fn list_trackable(&self) -> Result<Vec<TrackedHierarchy>, HierarchyRepositoryError>;

    /// Clears the M&A flag and overwrites the latest data snapshot.
    ///
    /// Both effects run in one transaction: the metadata's `has_ma_update`
    /// is cleared with `last_ma_checked` set to the database clock, and the
    /// latest snapshot's payload is replaced with `data` and its
    /// `updated_at` refreshed. A record without any snapshot aborts the
    /// transaction, so a partial application is never left behind.
    ///
    /// # Returns
    ///
    /// The updated (metadata, data) pair.
    async fn apply_ma_update(
        &self,
        id: Uuid,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError>;

    /// Fetches the M&A flag pair for a record, `None` when it does not exist.
    async fn ma_status(&self, id: Uuid) -> Result<Option<MaStatus>, HierarchyRepositoryError>;
}
