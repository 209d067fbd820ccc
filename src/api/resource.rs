use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::api::transport::{RequestOptions, Transport};
use crate::error::{ClientError, ClientResult};
use crate::models::{Editable, Entity, EntityId, Record};

/// Success marker returned by deletes and other bodiless responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// The canonical CRUD operations for one resource collection.
///
/// `update` is only available for [`Editable`] kinds, so the account
/// resource is create/list/delete only.
pub struct Resource<T> {
    transport: Arc<Transport>,
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T: Entity> Resource<T> {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            name: T::KIND.resource(),
            _phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn collection_path(&self) -> String {
        format!("/{}", self.name)
    }

    fn record_path(&self, id: &EntityId) -> String {
        format!("/{}/{}", self.name, id)
    }

    /// GET /<resource>
    pub async fn list(&self) -> ClientResult<Vec<Record<T>>> {
        self.transport
            .request_as(&self.collection_path(), RequestOptions::get())
            .await
    }

    /// POST /<resource> with the unsaved entity; the server assigns the id
    pub async fn create(&self, draft: &T::Draft) -> ClientResult<Record<T>> {
        let body = to_body(draft)?;
        self.transport
            .request_as(&self.collection_path(), RequestOptions::post(body))
            .await
    }

    /// DELETE /<resource>/<id>
    pub async fn delete(&self, id: &EntityId) -> ClientResult<Acknowledgement> {
        self.transport
            .request_as(&self.record_path(id), RequestOptions::delete())
            .await
    }
}

impl<T: Editable> Resource<T> {
    /// PUT /<resource>/<id> with the full entity
    pub async fn update(&self, record: &Record<T>) -> ClientResult<Record<T>> {
        let body = to_body(record)?;
        self.transport
            .request_as(&self.record_path(&record.id), RequestOptions::put(body))
            .await
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            name: self.name,
            _phantom: PhantomData,
        }
    }
}

fn to_body<B: serde::Serialize>(body: &B) -> ClientResult<Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Decode(format!("cannot encode request: {}", e)))
}
