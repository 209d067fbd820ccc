//! Generic admin surface: one form and one table, parameterized at runtime
//! by the selected entity kind. All shape-specific behavior is delegated to
//! the kind's `FormShape` pair and the store's typed mutation wrappers.

use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::forms::{assemble_submission, flatten_record, FormFields, FormShape, Submission};
use crate::models::account::{assemble_new_account, new_account_form};
use crate::models::{
    Account, Activity, Editable, EntityId, EntityKind, ExecutiveLeader, GalleryItem, LegalMember,
    NewsItem, SocialMediaMember, StateLeader, TeamMember, Video,
};
use crate::store::{Collected, Collections, Store};

/// Run `$body` with `$t` bound to the entity type of an editable `$kind`,
/// or `$account` for the account kind.
macro_rules! dispatch_kind {
    ($kind:expr, $t:ident => $body:expr, account => $account:expr) => {
        match $kind {
            EntityKind::TeamMember => { type $t = TeamMember; $body }
            EntityKind::ExecutiveLeader => { type $t = ExecutiveLeader; $body }
            EntityKind::StateLeader => { type $t = StateLeader; $body }
            EntityKind::SocialMediaMember => { type $t = SocialMediaMember; $body }
            EntityKind::LegalMember => { type $t = LegalMember; $body }
            EntityKind::News => { type $t = NewsItem; $body }
            EntityKind::Activity => { type $t = Activity; $body }
            EntityKind::Video => { type $t = Video; $body }
            EntityKind::Gallery => { type $t = GalleryItem; $body }
            EntityKind::Account => $account,
        }
    };
}

pub struct AdminConsole {
    store: Arc<Store>,
}

impl AdminConsole {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Form state for a new entity (`id` is `None`) or an existing one
    pub async fn begin_edit(&self, kind: EntityKind, id: Option<&EntityId>) -> ClientResult<FormFields> {
        let collections = self.store.snapshot().await;
        dispatch_kind!(kind, T => edit_form::<T>(&collections, id),
            account => match id {
                None => Ok(new_account_form()),
                Some(id) => edit_form::<Account>(&collections, Some(id)),
            })
    }

    /// Table rows of the current snapshot
    pub async fn rows(&self, kind: EntityKind) -> Vec<(EntityId, FormFields)> {
        let collections = self.store.snapshot().await;
        dispatch_kind!(kind, T => table_rows::<T>(&collections),
            account => table_rows::<Account>(&collections))
    }

    /// Assemble the fields and create or update, returning the entity's id
    pub async fn submit(
        &self,
        kind: EntityKind,
        fields: &FormFields,
        id: Option<EntityId>,
    ) -> ClientResult<EntityId> {
        dispatch_kind!(kind, T => save::<T>(&self.store, fields, id).await,
            account => match id {
                None => {
                    let draft = assemble_new_account(fields);
                    self.store.add::<Account>(&draft).await.map(|record| record.id)
                }
                Some(_) => Err(ClientError::Unsupported(
                    "accounts cannot be edited, delete and recreate instead".to_string(),
                )),
            })
    }

    pub async fn remove(&self, kind: EntityKind, id: &EntityId) -> ClientResult<()> {
        dispatch_kind!(kind, T => self.store.delete::<T>(id).await.map(|_| ()),
            account => self.store.delete::<Account>(id).await.map(|_| ()))
    }
}

fn edit_form<T: Collected + FormShape>(
    collections: &Collections,
    id: Option<&EntityId>,
) -> ClientResult<FormFields> {
    match id {
        None => Ok(T::flatten(None)),
        Some(id) => collections
            .find::<T>(id)
            .map(|record| flatten_record(Some(record)))
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", T::KIND.label(), id))),
    }
}

fn table_rows<T: Collected + FormShape>(collections: &Collections) -> Vec<(EntityId, FormFields)> {
    collections
        .of::<T>()
        .iter()
        .map(|record| (record.id.clone(), flatten_record(Some(record))))
        .collect()
}

async fn save<T: Collected + Editable + FormShape>(
    store: &Store,
    fields: &FormFields,
    id: Option<EntityId>,
) -> ClientResult<EntityId> {
    match assemble_submission::<T>(fields, id) {
        Submission::Create(entity) => store.add::<T>(&entity).await.map(|record| record.id),
        Submission::Update(record) => store.update(&record).await.map(|record| record.id),
    }
}
