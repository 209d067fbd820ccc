//! Flattened form state and the per-kind flatten/assemble pairs.
//!
//! A generic edit form only binds scalar text fields. Each entity kind
//! implements [`FormShape`] to move between its normalized shape (nested
//! link maps, sequences, numbers) and a [`FormFields`] bag.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    Activity, EntityId, EntityKind, ExecutiveLeader, GalleryItem, LegalMember, NewsItem, Record,
    SocialLinks, SocialMediaMember, StateLeader, TeamMember, Video,
};

/// Scalar-only field bag a generic form binds to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Text of a field, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One field per link key, named after the key
    pub fn set_links(&mut self, links: &SocialLinks) {
        for key in SocialLinks::KEYS {
            self.set(key, links.get(key).unwrap_or_default());
        }
    }

    pub fn links(&self) -> SocialLinks {
        let mut links = SocialLinks::default();
        for key in SocialLinks::KEYS {
            links.set(key, self.text(key));
        }
        links
    }

    /// Comma-joined text meant for human editing
    pub fn set_free_text(&mut self, name: &str, values: &[String]) {
        self.set(name, join_free_text(values));
    }

    pub fn free_text(&self, name: &str) -> Vec<String> {
        split_free_text(self.get(name).unwrap_or_default())
    }

    /// Compact encoding that survives separators inside elements
    pub fn set_exact(&mut self, name: &str, values: &[String]) {
        self.set(name, encode_exact(values));
    }

    pub fn exact(&self, name: &str) -> Vec<String> {
        decode_exact(self.get(name).unwrap_or_default())
    }

    pub fn set_number<N: ToString>(&mut self, name: &str, value: N) {
        self.set(name, value.to_string());
    }

    /// Parsed number, zero (the type's default) when the text does not parse
    pub fn number<N: FromStr + Default>(&self, name: &str) -> N {
        parse_number(self.get(name).unwrap_or_default())
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn join_free_text(values: &[String]) -> String {
    values.join(", ")
}

/// Split on commas, trim, and drop empty segments
pub fn split_free_text(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

pub fn encode_exact(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a JSON string array. Hand-typed text that is not one is read as
/// a comma list instead of being discarded.
pub fn decode_exact(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(e) => {
            debug!("Field is not an encoded list ({}), reading it as comma separated", e);
            split_free_text(raw)
        }
    }
}

pub fn parse_number<N: FromStr + Default>(raw: &str) -> N {
    raw.trim().parse().unwrap_or_default()
}

/// Per-kind transformation pair between an entity and its form fields
pub trait FormShape: Sized {
    /// `None` yields the defaults used for a new entity
    fn flatten(entity: Option<&Self>) -> FormFields;

    fn assemble(fields: &FormFields) -> Self;

    /// Every field name the kind's form carries
    fn field_names() -> Vec<String> {
        Self::flatten(None).names().map(String::from).collect()
    }
}

/// What an assembled form should do on submit
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    Create(T),
    Update(Record<T>),
}

impl<T> Submission<T> {
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Submission::Create(_) => None,
            Submission::Update(record) => Some(&record.id),
        }
    }

    pub fn attributes(&self) -> &T {
        match self {
            Submission::Create(entity) => entity,
            Submission::Update(record) => &record.attributes,
        }
    }
}

/// Flatten a stored record (the identifier is not a form field)
pub fn flatten_record<T: FormShape>(record: Option<&Record<T>>) -> FormFields {
    T::flatten(record.map(|r| &r.attributes))
}

/// Assemble form fields, attaching the identifier only when one is given
pub fn assemble_submission<T: FormShape>(fields: &FormFields, id: Option<EntityId>) -> Submission<T> {
    let entity = T::assemble(fields);
    match id {
        Some(id) => Submission::Update(Record::new(id, entity)),
        None => Submission::Create(entity),
    }
}

impl EntityKind {
    /// Field names of this kind's edit form
    pub fn field_names(&self) -> Vec<String> {
        self.empty_form().names().map(String::from).collect()
    }

    /// Default form state for creating an entity of this kind
    pub fn empty_form(&self) -> FormFields {
        match self {
            EntityKind::TeamMember => TeamMember::flatten(None),
            EntityKind::ExecutiveLeader => ExecutiveLeader::flatten(None),
            EntityKind::StateLeader => StateLeader::flatten(None),
            EntityKind::SocialMediaMember => SocialMediaMember::flatten(None),
            EntityKind::LegalMember => LegalMember::flatten(None),
            EntityKind::News => NewsItem::flatten(None),
            EntityKind::Activity => Activity::flatten(None),
            EntityKind::Video => Video::flatten(None),
            EntityKind::Gallery => GalleryItem::flatten(None),
            EntityKind::Account => crate::models::account::new_account_form(),
        }
    }
}
