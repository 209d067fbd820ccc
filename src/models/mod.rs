//! Entity shapes managed through the content API

pub mod account;
pub mod content;
pub mod people;

pub use account::{Account, NewAccount};
pub use content::{Activity, GalleryItem, NewsItem, Video};
pub use people::{ExecutiveLeader, LegalMember, SocialMediaMember, StateLeader, TeamMember};

use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned identifier, unique within one entity kind.
///
/// Servers hand these out as strings or integers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => EntityId(s),
            RawId::Signed(n) => EntityId(n.to_string()),
            RawId::Unsigned(n) => EntityId(n.to_string()),
        })
    }
}

/// An entity the server has accepted: identifier plus attributes.
///
/// Unsaved entities are the bare attribute type, so a `Record` can never
/// exist without an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub id: EntityId,
    #[serde(flatten)]
    pub attributes: T,
}

/// Wire shape of a record: `id`, `_id`, or both (document stores that add
/// an `id` virtual send both). `id` wins when both are present.
#[derive(Deserialize)]
struct WireRecord<T> {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default, rename = "_id")]
    document_id: Option<EntityId>,
    #[serde(flatten)]
    attributes: T,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireRecord::<T>::deserialize(deserializer)?;
        let id = wire
            .id
            .or(wire.document_id)
            .ok_or_else(|| de::Error::missing_field("id"))?;
        Ok(Self {
            id,
            attributes: wire.attributes,
        })
    }
}

impl<T> Record<T> {
    pub fn new(id: impl Into<EntityId>, attributes: T) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

/// The fixed set of manageable record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    TeamMember,
    ExecutiveLeader,
    StateLeader,
    SocialMediaMember,
    LegalMember,
    News,
    Activity,
    Video,
    Gallery,
    Account,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::TeamMember,
        EntityKind::ExecutiveLeader,
        EntityKind::StateLeader,
        EntityKind::SocialMediaMember,
        EntityKind::LegalMember,
        EntityKind::News,
        EntityKind::Activity,
        EntityKind::Video,
        EntityKind::Gallery,
        EntityKind::Account,
    ];

    /// Collection path segment on the remote API
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::TeamMember => "team-members",
            EntityKind::ExecutiveLeader => "executives",
            EntityKind::StateLeader => "state-leaders",
            EntityKind::SocialMediaMember => "social-media-team",
            EntityKind::LegalMember => "legal-team",
            EntityKind::News => "news",
            EntityKind::Activity => "activities",
            EntityKind::Video => "videos",
            EntityKind::Gallery => "gallery",
            EntityKind::Account => "accounts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::TeamMember => "team member",
            EntityKind::ExecutiveLeader => "executive leader",
            EntityKind::StateLeader => "state leader",
            EntityKind::SocialMediaMember => "social media team member",
            EntityKind::LegalMember => "legal team member",
            EntityKind::News => "news item",
            EntityKind::Activity => "activity",
            EntityKind::Video => "video",
            EntityKind::Gallery => "gallery item",
            EntityKind::Account => "account",
        }
    }

    /// Only listed while a session is authenticated
    pub fn is_privileged(&self) -> bool {
        matches!(self, EntityKind::Account)
    }

    /// Accounts can be created and deleted but never edited
    pub fn is_editable(&self) -> bool {
        !self.is_privileged()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.resource() == wanted || kind.label().replace(' ', "-") == wanted
            })
            .ok_or_else(|| {
                let known: Vec<&str> = EntityKind::ALL.iter().map(|k| k.resource()).collect();
                format!("unknown entity kind '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// A record kind reachable through the CRUD resource factory
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Payload accepted by `create`
    type Draft: Serialize + Send + Sync;
}

/// Kinds that can be updated in place after creation
pub trait Editable: Entity<Draft = Self> {}

/// Named link values shared by the people rosters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
    pub whatsapp: String,
}

impl SocialLinks {
    pub const KEYS: [&'static str; 5] = ["facebook", "twitter", "instagram", "linkedin", "whatsapp"];

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "facebook" => Some(&self.facebook),
            "twitter" => Some(&self.twitter),
            "instagram" => Some(&self.instagram),
            "linkedin" => Some(&self.linkedin),
            "whatsapp" => Some(&self.whatsapp),
            _ => None,
        }
    }

    /// Returns false for keys outside the known set
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "facebook" => &mut self.facebook,
            "twitter" => &mut self.twitter,
            "instagram" => &mut self.instagram,
            "linkedin" => &mut self.linkedin,
            "whatsapp" => &mut self.whatsapp,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}
