//! Hierarchy service implementation.
//!
//! This module provides the main service for the hierarchy tracker.
//! Application code uses this to drive the version-chain lifecycle, the
//! lookup and grouping views, entity fuzzy search, and the M&A review
//! side-channel.
//!
//! # Note on Version Chains
//!
//! A chain is the set of records descended from one root submission. The
//! service owns the chain rules (root linkage, version numbering, draft
//! supersession, the approval cascade) and delegates the storage of each
//! transition to a `HierarchyRepository`, whose write paths keep
//! multi-statement transitions atomic.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use hierarchy_repository::HierarchyRepository;
use hierarchy_shared::types::{
    HierarchyMetadata, MaStatus, NewHierarchyMetadata, TrackedHierarchy,
};

use crate::config::HierarchyServiceConfig;
use crate::errors::HierarchyServiceError;
use crate::matching::{NormalizedLevenshteinScorer, SimilarityScorer};
use crate::types::{
    CreateHierarchyRequest, CreateVersionRequest, EntityMatch, EntitySearchHit, HierarchyDetail,
    HierarchyGroup, HierarchyRecord,
};

/// The main service for tracking hierarchy versions.
///
/// This is the high-level API that the request-handling layer should use.
/// It validates input, applies the version-chain rules and delegates
/// persistence to a [`HierarchyRepository`]. All operations return
/// [`HierarchyServiceError`], whose variants keep validation, not-found and
/// store failures distinguishable for the caller.
pub struct HierarchyService {
    repository: Arc<dyn HierarchyRepository>,
    scorer: Box<dyn SimilarityScorer>,
    config: HierarchyServiceConfig,
}

impl HierarchyService {
    /// Create a new service with the default scorer and configuration.
    pub fn new(repository: Arc<dyn HierarchyRepository>) -> Self {
        Self::with_config(repository, HierarchyServiceConfig::default())
    }

    /// Create a new service with custom configuration.
    pub fn with_config(
        repository: Arc<dyn HierarchyRepository>,
        config: HierarchyServiceConfig,
    ) -> Self {
        Self {
            repository,
            scorer: Box::new(NormalizedLevenshteinScorer),
            config,
        }
    }

    /// Replace the similarity scorer used by [`search_entity`](Self::search_entity).
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Create the root version of a new hierarchy.
    ///
    /// Fails with a validation error when the company, the project name or
    /// the data payload is missing. With `force_new`, an existing active
    /// draft for the same (company, project, location) tuple is archived
    /// first; without it, such a draft makes the insert fail on the store's
    /// single-active-draft constraint.
    pub async fn create_initial(
        &self,
        request: CreateHierarchyRequest,
    ) -> Result<HierarchyRecord, HierarchyServiceError> {
        let CreateHierarchyRequest {
            user_input,
            project_name,
            data,
            force_new,
        } = request;

        if user_input.company.trim().is_empty() {
            return Err(HierarchyServiceError::validation(
                "Company is required in userInput",
            ));
        }
        if project_name.trim().is_empty() {
            return Err(HierarchyServiceError::validation("Project name is required"));
        }
        if data.is_null() {
            return Err(HierarchyServiceError::validation("Data is required"));
        }

        if force_new {
            self.repository
                .archive_active_draft(
                    &user_input.company,
                    &project_name,
                    user_input.normalized_location(),
                )
                .await?;
        }

        let (metadata, data) = self
            .repository
            .insert_root(&NewHierarchyMetadata::root(user_input, project_name), &data)
            .await?;
        info!(
            id = %metadata.id,
            company = %metadata.user_input.company,
            project = %metadata.project_name,
            "created initial hierarchy"
        );
        Ok(HierarchyRecord { metadata, data })
    }

    /// Supersede a draft with a new version.
    ///
    /// The new record carries the parent's identity fields forward, points
    /// at the chain root and takes over the editable-draft flag; the parent
    /// stays `in-draft` but is no longer the tip.
    pub async fn create_version(
        &self,
        request: CreateVersionRequest,
    ) -> Result<HierarchyRecord, HierarchyServiceError> {
        let CreateVersionRequest {
            parent_id,
            data,
            user_feedback,
        } = request;

        if data.is_null() {
            return Err(HierarchyServiceError::validation(
                "New hierarchy data is required",
            ));
        }
        let parent = self
            .repository
            .metadata_by_id(parent_id)
            .await?
            .ok_or(HierarchyServiceError::NotFound(parent_id))?;

        let feedback = user_feedback.map(|text| json!({ "text": text }));
        let next = NewHierarchyMetadata::next_version(&parent, feedback);
        let (metadata, data) = self
            .repository
            .insert_version(parent.id, &next, &data)
            .await?;
        info!(
            id = %metadata.id,
            parent = %parent.id,
            version = %metadata.version,
            "created new hierarchy version"
        );
        Ok(HierarchyRecord { metadata, data })
    }

    /// Approve a version, archiving every other member of its chain.
    ///
    /// Approval is exclusive within a chain: after this returns, the target
    /// is the only approved member and no member is an active draft.
    pub async fn approve(&self, id: Uuid) -> Result<HierarchyMetadata, HierarchyServiceError> {
        let target = self
            .repository
            .metadata_by_id(id)
            .await?
            .ok_or(HierarchyServiceError::NotFound(id))?;
        let approved = self
            .repository
            .approve_chain_member(target.root_id(), target.id)
            .await?;
        info!(id = %approved.id, root = %approved.root_id(), "approved hierarchy version");
        Ok(approved)
    }

    /// Fetch a metadata record with all of its data snapshots, most recent
    /// first.
    pub async fn get_hierarchy(
        &self,
        id: Uuid,
    ) -> Result<HierarchyDetail, HierarchyServiceError> {
        let metadata = self
            .repository
            .metadata_by_id(id)
            .await?
            .ok_or(HierarchyServiceError::NotFound(id))?;
        let data = self.repository.data_for_metadata(id).await?;
        Ok(HierarchyDetail { metadata, data })
    }

    /// Fetch the highest-versioned record for a (company, project, location)
    /// tuple, if any. An empty location is treated as absent.
    pub async fn find_latest_by_name(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<Option<HierarchyMetadata>, HierarchyServiceError> {
        if company.trim().is_empty() {
            return Err(HierarchyServiceError::validation("Company is required"));
        }
        if project_name.trim().is_empty() {
            return Err(HierarchyServiceError::validation("Project name is required"));
        }
        let location = location.filter(|location| !location.is_empty());
        Ok(self
            .repository
            .find_latest_by_name(company, project_name, location)
            .await?)
    }

    /// Fetch every approved or in-draft record for a company, ordered by
    /// version number descending. Archived records are excluded.
    pub async fn find_active_by_company(
        &self,
        company: &str,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyServiceError> {
        if company.trim().is_empty() {
            return Err(HierarchyServiceError::validation("Company is required"));
        }
        Ok(self.repository.find_active_by_company(company).await?)
    }

    /// Group every metadata record by (company, location, project).
    ///
    /// Records without a location (null or empty) share one group whose
    /// display location is `"Global"`; the join key is its case-insensitive
    /// equivalent, so the grouping is stable regardless of how the absence
    /// was stored. Groups keep first-seen order from the sorted scan.
    pub async fn group_all(&self) -> Result<Vec<HierarchyGroup>, HierarchyServiceError> {
        let records = self.repository.all_metadata_grouped_order().await?;

        let mut positions: HashMap<(String, String, String), usize> = HashMap::new();
        let mut groups: Vec<HierarchyGroup> = Vec::new();
        for record in records {
            let key = (
                record.user_input.company.clone(),
                record
                    .user_input
                    .normalized_location()
                    .unwrap_or("global")
                    .to_string(),
                record.project_name.clone(),
            );
            match positions.get(&key).copied() {
                Some(position) => groups[position].versions.push(record),
                None => {
                    positions.insert(key, groups.len());
                    let location = record
                        .user_input
                        .normalized_location()
                        .unwrap_or("Global")
                        .to_string();
                    groups.push(HierarchyGroup {
                        company: record.user_input.company.clone(),
                        location,
                        project_name: record.project_name.clone(),
                        versions: vec![record],
                    });
                }
            }
        }

        // Null and empty locations arrive from two sort positions of the
        // scan; re-establish the per-group descending order after merging.
        for group in &mut groups {
            group
                .versions
                .sort_by(|a, b| b.version_number.cmp(&a.version_number));
        }
        Ok(groups)
    }

    /// Fuzzy-search entity names across the latest snapshot of every
    /// hierarchy.
    ///
    /// Records without a snapshot or with a non-sequence payload are
    /// skipped, as are entities without a string `entityName`. This is a
    /// linear scan over hierarchies and their entities; no index is
    /// maintained.
    pub async fn search_entity(
        &self,
        name: &str,
    ) -> Result<Vec<EntitySearchHit>, HierarchyServiceError> {
        if name.trim().is_empty() {
            return Err(HierarchyServiceError::validation("Entity name is required"));
        }

        let records = self.repository.all_metadata_grouped_order().await?;
        let mut latest: HashMap<Uuid, Value> = self
            .repository
            .latest_data_snapshots()
            .await?
            .into_iter()
            .map(|snapshot| (snapshot.metadata_id, snapshot.data))
            .collect();

        let mut hits = Vec::new();
        for record in records {
            let entities = match latest.remove(&record.id) {
                Some(Value::Array(entities)) => entities,
                _ => continue,
            };
            let mut matches = Vec::new();
            for entity in entities {
                let score = match entity.get("entityName").and_then(Value::as_str) {
                    Some(entity_name) => self.scorer.score(name, entity_name),
                    None => continue,
                };
                if score <= self.config.similarity_threshold {
                    matches.push(EntityMatch { entity, score });
                }
            }
            if !matches.is_empty() {
                debug!(id = %record.id, matches = matches.len(), "entity search hit");
                hits.push(EntitySearchHit {
                    metadata: record,
                    matches,
                });
            }
        }
        Ok(hits)
    }

    /// List the M&A projection of every record still in draft or approved.
    pub async fn list_trackable(&self) -> Result<Vec<TrackedHierarchy>, HierarchyServiceError> {
        Ok(self.repository.list_trackable().await?)
    }

    /// Apply externally sourced M&A data to a hierarchy.
    ///
    /// Clears the review flag, stamps `last_ma_checked` and overwrites the
    /// latest data snapshot. The repository persists both effects in one
    /// transaction; a partial application surfaces as an error.
    pub async fn apply_ma_update(
        &self,
        id: Uuid,
        data: Value,
    ) -> Result<HierarchyRecord, HierarchyServiceError> {
        if data.is_null() {
            return Err(HierarchyServiceError::validation(
                "Updated hierarchy data is required",
            ));
        }
        self.repository
            .metadata_by_id(id)
            .await?
            .ok_or(HierarchyServiceError::NotFound(id))?;

        let (metadata, data) = self.repository.apply_ma_update(id, &data).await?;
        info!(id = %metadata.id, "applied M&A update");
        Ok(HierarchyRecord { metadata, data })
    }

    /// Fetch the current M&A review flag for a record.
    pub async fn ma_status(&self, id: Uuid) -> Result<MaStatus, HierarchyServiceError> {
        self.repository
            .ma_status(id)
            .await?
            .ok_or(HierarchyServiceError::NotFound(id))
    }
}
