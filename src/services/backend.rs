// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Production backend combining Firestore and Firebase Authentication.
//!
//! The backend is built once per process and shared by every task the
//! console spawns.

use crate::config::Config;
use crate::db::{CollectionRef, FirestoreDb, OwnerDeletion, RecordStore};
use crate::error::Result;
use crate::models::{ChildRecord, Collection, UserPage};
use crate::services::identity::{IdentityClient, UserListSource};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

static SHARED: OnceCell<Arc<FirebaseBackend>> = OnceCell::const_new();

/// Firestore documents plus identity records.
pub struct FirebaseBackend {
    pub firestore: FirestoreDb,
    pub identity: IdentityClient,
}

impl FirebaseBackend {
    pub async fn connect(config: &Config) -> Result<Self> {
        let service_account = config.service_account.as_deref();
        let firestore = FirestoreDb::new(&config.project_id, service_account).await?;
        let identity = IdentityClient::new(&config.project_id, service_account).await?;
        Ok(Self {
            firestore,
            identity,
        })
    }

    /// The process-wide backend, connecting on first use.
    ///
    /// A failed connection is not cached; the next call tries again.
    pub async fn shared(config: &Config) -> Result<Arc<Self>> {
        SHARED
            .get_or_try_init(|| async { Self::connect(config).await.map(Arc::new) })
            .await
            .cloned()
    }
}

#[async_trait]
impl UserListSource for FirebaseBackend {
    async fn fetch_page(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage> {
        self.identity.fetch_page(page_size, page_token).await
    }
}

#[async_trait]
impl RecordStore for FirebaseBackend {
    async fn query_by_owner(
        &self,
        collection: Collection,
        owner_id: &str,
    ) -> Result<Vec<ChildRecord>> {
        self.firestore.query_by_owner(collection, owner_id).await
    }

    async fn list_nested(
        &self,
        parent: Collection,
        parent_id: &str,
        name: &'static str,
    ) -> Result<Vec<String>> {
        self.firestore.list_nested(parent, parent_id, name).await
    }

    async fn batch_delete(&self, target: &CollectionRef, ids: &[String]) -> Result<()> {
        self.firestore.batch_delete(target, ids).await
    }

    async fn delete_owner_record(&self, owner_id: &str) -> Result<OwnerDeletion> {
        self.identity.delete_account(owner_id).await
    }
}
