//! Test support: an in-memory `HierarchyRepository` used to drive the
//! service without a database.
//!
//! The double implements the same contract as the Postgres repository:
//! atomic lifecycle transitions, the single-active-draft constraint, and
//! latest-snapshot selection (insertion order breaks timestamp ties).
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use hierarchy_repository::{HierarchyRepository, HierarchyRepositoryError};
use hierarchy_shared::types::{
    HierarchyData, HierarchyMetadata, HierarchyStatus, MaStatus, NewHierarchyMetadata,
    TrackedHierarchy,
};
use serde_json::Value;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    metadata: Vec<HierarchyMetadata>,
    data: Vec<HierarchyData>,
}

#[derive(Default)]
pub struct InMemoryHierarchyRepository {
    store: Mutex<Store>,
}

impl InMemoryHierarchyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a record as touched by external M&A data. In production the
    /// ingestion side sets this; it is outside the service surface.
    pub fn set_ma_flag(&self, id: Uuid) {
        let mut store = self.store.lock().unwrap();
        if let Some(record) = store.metadata.iter_mut().find(|record| record.id == id) {
            record.has_ma_update = true;
        }
    }

    /// Remove every snapshot of a record, for exercising the
    /// missing-snapshot failure path of the M&A apply.
    pub fn drop_snapshots(&self, id: Uuid) {
        let mut store = self.store.lock().unwrap();
        store.data.retain(|snapshot| snapshot.metadata_id != id);
    }

    fn same_tuple(
        record: &HierarchyMetadata,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> bool {
        record.user_input.company == company
            && record.project_name == project_name
            && record.user_input.normalized_location() == location
    }

    fn insert_pair(
        store: &mut Store,
        new: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let conflict = store.metadata.iter().any(|record| {
            record.is_active_draft
                && record.status == HierarchyStatus::InDraft
                && Self::same_tuple(
                    record,
                    &new.user_input.company,
                    &new.project_name,
                    new.user_input.normalized_location(),
                )
        });
        if conflict {
            return Err(HierarchyRepositoryError::ActiveDraftExists {
                company: new.user_input.company.clone(),
                project_name: new.project_name.clone(),
            });
        }

        let now = Utc::now();
        let metadata = HierarchyMetadata {
            id: Uuid::new_v4(),
            user_input: new.user_input.clone(),
            project_name: new.project_name.clone(),
            version: new.version.clone(),
            version_number: new.version_number,
            status: new.status,
            is_active_draft: true,
            root_hierarchy_id: new.root_hierarchy_id,
            user_feedback: new.user_feedback.clone(),
            has_ma_update: false,
            last_ma_checked: None,
            created_at: now,
        };
        let snapshot = HierarchyData {
            id: Uuid::new_v4(),
            metadata_id: metadata.id,
            data: data.clone(),
            created_at: now,
            updated_at: now,
        };
        store.metadata.push(metadata.clone());
        store.data.push(snapshot.clone());
        Ok((metadata, snapshot))
    }
}

#[async_trait]
impl HierarchyRepository for InMemoryHierarchyRepository {
    async fn insert_root(
        &self,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut store = self.store.lock().unwrap();
        Self::insert_pair(&mut store, metadata, data)
    }

    async fn insert_version(
        &self,
        parent_id: Uuid,
        metadata: &NewHierarchyMetadata,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut store = self.store.lock().unwrap();
        if let Some(parent) = store
            .metadata
            .iter_mut()
            .find(|record| record.id == parent_id)
        {
            parent.is_active_draft = false;
        }
        Self::insert_pair(&mut store, metadata, data)
    }

    async fn approve_chain_member(
        &self,
        root_id: Uuid,
        id: Uuid,
    ) -> Result<HierarchyMetadata, HierarchyRepositoryError> {
        let mut store = self.store.lock().unwrap();
        if !store.metadata.iter().any(|record| record.id == id) {
            return Err(HierarchyRepositoryError::DatabaseError(
                sqlx::Error::RowNotFound,
            ));
        }
        for record in store.metadata.iter_mut() {
            let in_chain = record.root_hierarchy_id == Some(root_id) || record.id == root_id;
            if in_chain && record.id != id {
                record.status = HierarchyStatus::Archived;
                record.is_active_draft = false;
            }
        }
        let target = store
            .metadata
            .iter_mut()
            .find(|record| record.id == id)
            .expect("checked above");
        target.status = HierarchyStatus::Approved;
        target.is_active_draft = false;
        Ok(target.clone())
    }

    async fn archive_active_draft(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<u64, HierarchyRepositoryError> {
        let mut store = self.store.lock().unwrap();
        let mut archived = 0;
        for record in store.metadata.iter_mut() {
            if record.status == HierarchyStatus::InDraft
                && Self::same_tuple(record, company, project_name, location)
            {
                record.status = HierarchyStatus::Archived;
                record.is_active_draft = false;
                archived += 1;
            }
        }
        Ok(archived)
    }

    async fn metadata_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .metadata
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn data_for_metadata(
        &self,
        metadata_id: Uuid,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .data
            .iter()
            .rev()
            .filter(|snapshot| snapshot.metadata_id == metadata_id)
            .cloned()
            .collect())
    }

    async fn find_latest_by_name(
        &self,
        company: &str,
        project_name: &str,
        location: Option<&str>,
    ) -> Result<Option<HierarchyMetadata>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .metadata
            .iter()
            .filter(|record| Self::same_tuple(record, company, project_name, location))
            .max_by_key(|record| record.version_number)
            .cloned())
    }

    async fn find_active_by_company(
        &self,
        company: &str,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        let mut records: Vec<_> = store
            .metadata
            .iter()
            .filter(|record| record.user_input.company == company && record.status.is_live())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(records)
    }

    async fn all_metadata_grouped_order(
        &self,
    ) -> Result<Vec<HierarchyMetadata>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        let mut records = store.metadata.clone();
        records.sort_by(|a, b| {
            let key = |record: &HierarchyMetadata| {
                (
                    record.user_input.company.clone(),
                    record.user_input.location.clone().unwrap_or_default(),
                    record.project_name.clone(),
                )
            };
            key(a)
                .cmp(&key(b))
                .then(b.version_number.cmp(&a.version_number))
        });
        Ok(records)
    }

    async fn latest_data_snapshots(
        &self,
    ) -> Result<Vec<HierarchyData>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        let mut latest: std::collections::HashMap<Uuid, HierarchyData> =
            std::collections::HashMap::new();
        for snapshot in &store.data {
            latest.insert(snapshot.metadata_id, snapshot.clone());
        }
        Ok(latest.into_values().collect())
    }

    async fn list_trackable(&self) -> Result<Vec<TrackedHierarchy>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .metadata
            .iter()
            .filter(|record| record.status.is_live())
            .map(|record| TrackedHierarchy {
                id: record.id,
                company: record.user_input.company.clone(),
                has_ma_update: record.has_ma_update,
                last_ma_checked: record.last_ma_checked,
            })
            .collect())
    }

    async fn apply_ma_update(
        &self,
        id: Uuid,
        data: &Value,
    ) -> Result<(HierarchyMetadata, HierarchyData), HierarchyRepositoryError> {
        let mut store = self.store.lock().unwrap();
        // Locate both rows before mutating either, the way the transaction
        // in the real repository leaves no partial effect behind.
        let Some(snapshot_index) = store
            .data
            .iter()
            .rposition(|snapshot| snapshot.metadata_id == id)
        else {
            return Err(HierarchyRepositoryError::DatabaseError(
                sqlx::Error::RowNotFound,
            ));
        };
        let Some(metadata_index) = store.metadata.iter().position(|record| record.id == id)
        else {
            return Err(HierarchyRepositoryError::DatabaseError(
                sqlx::Error::RowNotFound,
            ));
        };

        let now = Utc::now();
        let record = &mut store.metadata[metadata_index];
        record.has_ma_update = false;
        record.last_ma_checked = Some(now);
        let metadata = record.clone();

        let snapshot = &mut store.data[snapshot_index];
        snapshot.data = data.clone();
        snapshot.updated_at = now;
        Ok((metadata, snapshot.clone()))
    }

    async fn ma_status(&self, id: Uuid) -> Result<Option<MaStatus>, HierarchyRepositoryError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .metadata
            .iter()
            .find(|record| record.id == id)
            .map(|record| MaStatus {
                has_ma_update: record.has_ma_update,
                last_ma_checked: record.last_ma_checked,
            }))
    }
}
