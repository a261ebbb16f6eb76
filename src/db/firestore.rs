// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the document side of the record store:
//! - Owner queries over `profiles`, `exercises`, `histories`, `routines`
//! - Listing of nested subcollections (`profiles/{id}/records`)
//! - Chunked batch deletion

use crate::db::CollectionRef;
use crate::error::AppError;
use crate::models::{ChildRecord, Collection, Exercise, History, Profile, Routine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// Uses the service account key when one is given, application default
    /// credentials otherwise. For local development with the emulator, set
    /// FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, service_account: Option<&Path>) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = match service_account {
            Some(path) => firestore::FirestoreDb::with_options_token_source(
                firestore::FirestoreDbOptions::new(project_id.to_string()),
                gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
                gcloud_sdk::TokenSourceType::File(path.to_path_buf()),
            )
            .await,
            None => firestore::FirestoreDb::new(project_id).await,
        }
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Owner Queries ───────────────────────────────────────────

    /// Get every document in `collection` owned by `owner_id`.
    pub async fn query_by_owner(
        &self,
        collection: Collection,
        owner_id: &str,
    ) -> Result<Vec<ChildRecord>, AppError> {
        let records = match collection {
            Collection::Profiles => self
                .query_owned::<Profile>(collection, owner_id)
                .await?
                .into_iter()
                .map(ChildRecord::Profile)
                .collect(),
            Collection::Exercises => self
                .query_owned::<Exercise>(collection, owner_id)
                .await?
                .into_iter()
                .map(ChildRecord::Exercise)
                .collect(),
            Collection::Histories => self
                .query_owned::<History>(collection, owner_id)
                .await?
                .into_iter()
                .map(ChildRecord::History)
                .collect(),
            Collection::Routines => self
                .query_owned::<Routine>(collection, owner_id)
                .await?
                .into_iter()
                .map(ChildRecord::Routine)
                .collect(),
        };
        Ok(records)
    }

    async fn query_owned<T>(&self, collection: Collection, owner_id: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection.name())
            .filter(|q| q.for_all([q.field("uid").eq(owner_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(format!("Query on {} failed: {}", collection, e)))
    }

    /// List document IDs in the subcollection `name` under `parent/{parent_id}`.
    pub async fn list_nested(
        &self,
        parent: Collection,
        parent_id: &str,
        name: &'static str,
    ) -> Result<Vec<String>, AppError> {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(parent.name(), parent_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let docs = client
            .fluent()
            .select()
            .from(name)
            .parent(&parent_path)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs
            .iter()
            .filter_map(|doc| doc.name.rsplit('/').next())
            .map(str::to_string)
            .collect())
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Create or replace a user-owned document. Returns its ID.
    pub async fn upsert_record(&self, record: &ChildRecord) -> Result<String, AppError> {
        let client = self.get_client()?;
        let collection = record.collection().name();
        let doc_id = record.id().to_string();

        let result = match record {
            ChildRecord::Profile(p) => self.upsert(client, collection, &doc_id, p).await,
            ChildRecord::Exercise(e) => self.upsert(client, collection, &doc_id, e).await,
            ChildRecord::History(h) => self.upsert(client, collection, &doc_id, h).await,
            ChildRecord::Routine(r) => self.upsert(client, collection, &doc_id, r).await,
        };
        result.map(|_| doc_id)
    }

    async fn upsert<T>(
        &self,
        client: &firestore::FirestoreDb,
        collection: &str,
        doc_id: &str,
        object: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create or replace a document in a nested subcollection.
    pub async fn upsert_nested<T>(
        &self,
        parent: Collection,
        parent_id: &str,
        name: &'static str,
        doc_id: &str,
        object: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(parent.name(), parent_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let _: () = client
            .fluent()
            .update()
            .in_col(name)
            .document_id(doc_id)
            .parent(&parent_path)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Batch delete documents using transactions.
    ///
    /// Each chunk of at most `BATCH_SIZE` deletions is committed on its own.
    /// An empty `ids` slice performs no commit at all.
    pub async fn batch_delete(&self, target: &CollectionRef, ids: &[String]) -> Result<(), AppError> {
        let client = self.get_client()?;

        let parent_path = match target {
            CollectionRef::Top(_) => None,
            CollectionRef::Nested {
                parent, parent_id, ..
            } => Some(
                client
                    .parent_path(parent.name(), parent_id)
                    .map_err(|e| AppError::Database(e.to_string()))?,
            ),
        };
        let collection = match target {
            CollectionRef::Top(collection) => collection.name(),
            CollectionRef::Nested { name, .. } => name,
        };

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                let added = match &parent_path {
                    Some(parent_path) => client
                        .fluent()
                        .delete()
                        .from(collection)
                        .parent(parent_path)
                        .document_id(doc_id)
                        .add_to_transaction(&mut transaction),
                    None => client
                        .fluent()
                        .delete()
                        .from(collection)
                        .document_id(doc_id)
                        .add_to_transaction(&mut transaction),
                };
                added.map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add deletion to transaction for {}: {}",
                        target, e
                    ))
                })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        tracing::debug!(target = %target, count = ids.len(), "Batch deleted documents");

        Ok(())
    }
}
