//! Central store: in-memory snapshots of every collection.
//!
//! Consistency comes from re-fetching everything. Every mutation is a
//! remote write followed by a full bulk refresh, never a local patch, so
//! derived views (team members grouped by district, leaders ordered by
//! rank) are always recomputed from one server snapshot. The cost is one
//! request per collection per mutation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{Acknowledgement, ApiClient};
use crate::error::ClientResult;
use crate::models::{
    Account, Activity, Editable, Entity, EntityId, EntityKind, ExecutiveLeader, GalleryItem,
    LegalMember, NewsItem, Record, SocialMediaMember, StateLeader, TeamMember, Video,
};

/// One consistent snapshot of every collection
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub team_members: Vec<Record<TeamMember>>,
    pub executives: Vec<Record<ExecutiveLeader>>,
    pub state_leaders: Vec<Record<StateLeader>>,
    pub social_media_team: Vec<Record<SocialMediaMember>>,
    pub legal_team: Vec<Record<LegalMember>>,
    pub news: Vec<Record<NewsItem>>,
    pub activities: Vec<Record<Activity>>,
    pub videos: Vec<Record<Video>>,
    pub gallery: Vec<Record<GalleryItem>>,
    /// Empty unless the snapshot was taken while authenticated
    pub accounts: Vec<Record<Account>>,
}

/// Kinds that have a slot in [`Collections`]
pub trait Collected: Entity {
    fn select(collections: &Collections) -> &[Record<Self>];
}

macro_rules! collected {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Collected for $ty {
                fn select(collections: &Collections) -> &[Record<Self>] {
                    &collections.$field
                }
            }
        )*
    };
}

collected! {
    TeamMember => team_members,
    ExecutiveLeader => executives,
    StateLeader => state_leaders,
    SocialMediaMember => social_media_team,
    LegalMember => legal_team,
    NewsItem => news,
    Activity => activities,
    Video => videos,
    GalleryItem => gallery,
    Account => accounts,
}

impl Collections {
    pub fn of<T: Collected>(&self) -> &[Record<T>] {
        T::select(self)
    }

    pub fn find<T: Collected>(&self, id: &EntityId) -> Option<&Record<T>> {
        self.of::<T>().iter().find(|record| &record.id == id)
    }

    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::TeamMember => self.team_members.len(),
            EntityKind::ExecutiveLeader => self.executives.len(),
            EntityKind::StateLeader => self.state_leaders.len(),
            EntityKind::SocialMediaMember => self.social_media_team.len(),
            EntityKind::LegalMember => self.legal_team.len(),
            EntityKind::News => self.news.len(),
            EntityKind::Activity => self.activities.len(),
            EntityKind::Video => self.videos.len(),
            EntityKind::Gallery => self.gallery.len(),
            EntityKind::Account => self.accounts.len(),
        }
    }

    /// Team members grouped by district; blank districts go under "Unassigned"
    pub fn team_by_district(&self) -> BTreeMap<String, Vec<&Record<TeamMember>>> {
        let mut groups: BTreeMap<String, Vec<&Record<TeamMember>>> = BTreeMap::new();
        for member in &self.team_members {
            let district = member.attributes.district.trim();
            let key = if district.is_empty() { "Unassigned" } else { district };
            groups.entry(key.to_string()).or_default().push(member);
        }
        groups
    }

    pub fn executives_by_rank(&self) -> Vec<&Record<ExecutiveLeader>> {
        let mut leaders: Vec<_> = self.executives.iter().collect();
        leaders.sort_by_key(|leader| leader.attributes.rank);
        leaders
    }

    /// Newest first by publication date (ISO dates sort as text)
    pub fn latest_news(&self) -> Vec<&Record<NewsItem>> {
        let mut items: Vec<_> = self.news.iter().collect();
        items.sort_by(|a, b| b.attributes.published_on.cmp(&a.attributes.published_on));
        items
    }
}

async fn fetch<T: Entity>(client: &ApiClient) -> ClientResult<Vec<Record<T>>> {
    client.resource::<T>().list().await
}

/// The committed snapshot and the refresh that produced it
#[derive(Default)]
struct Committed {
    generation: u64,
    collections: Arc<Collections>,
}

/// Holds the snapshots and wraps every write with a bulk refresh
pub struct Store {
    client: ApiClient,
    committed: RwLock<Committed>,
    // last refresh generation handed out
    generation: AtomicU64,
}

impl Store {
    /// An empty store; call [`Store::refresh`] or use [`Store::mount`]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            committed: RwLock::new(Committed::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Build the store and perform the initial bulk refresh
    pub async fn mount(client: ApiClient) -> ClientResult<Arc<Self>> {
        let store = Arc::new(Self::new(client));
        store.refresh().await?;
        Ok(store)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn snapshot(&self) -> Arc<Collections> {
        self.committed.read().await.collections.clone()
    }

    /// Refetch every collection concurrently and commit them together.
    ///
    /// The account collection is only requested while authenticated. If
    /// any request fails nothing is committed. Refreshes that overlap
    /// commit in start order: a result older than the committed snapshot
    /// is discarded.
    pub async fn refresh(&self) -> ClientResult<()> {
        let generation = self.begin_refresh();
        let authenticated = self.client.session().is_authenticated();
        let client = &self.client;

        let accounts = async {
            if authenticated {
                fetch::<Account>(client).await
            } else {
                Ok(Vec::new())
            }
        };

        let (
            team_members,
            executives,
            state_leaders,
            social_media_team,
            legal_team,
            news,
            activities,
            videos,
            gallery,
            accounts,
        ) = futures::try_join!(
            fetch::<TeamMember>(client),
            fetch::<ExecutiveLeader>(client),
            fetch::<StateLeader>(client),
            fetch::<SocialMediaMember>(client),
            fetch::<LegalMember>(client),
            fetch::<NewsItem>(client),
            fetch::<Activity>(client),
            fetch::<Video>(client),
            fetch::<GalleryItem>(client),
            accounts,
        )?;

        let mut next = Collections {
            team_members,
            executives,
            state_leaders,
            social_media_team,
            legal_team,
            news,
            activities,
            videos,
            gallery,
            accounts,
        };

        // the session may have ended while the requests were in flight
        if authenticated && !self.client.session().is_authenticated() {
            debug!("Session ended during refresh, dropping fetched accounts");
            next.accounts.clear();
        }

        info!(
            "Refreshed collections: {} team, {} executives, {} state, {} social, {} legal, {} news, {} activities, {} videos, {} gallery, {} accounts",
            next.team_members.len(),
            next.executives.len(),
            next.state_leaders.len(),
            next.social_media_team.len(),
            next.legal_team.len(),
            next.news.len(),
            next.activities.len(),
            next.videos.len(),
            next.gallery.len(),
            next.accounts.len(),
        );

        self.commit(generation, next).await;
        Ok(())
    }

    fn begin_refresh(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install `next` unless a newer refresh already committed
    async fn commit(&self, generation: u64, next: Collections) -> bool {
        let mut committed = self.committed.write().await;
        if generation < committed.generation {
            debug!(
                "Discarding refresh {} behind committed refresh {}",
                generation, committed.generation
            );
            return false;
        }
        committed.generation = generation;
        committed.collections = Arc::new(next);
        true
    }

    /// Create remotely, then refresh everything
    pub async fn add<T: Collected>(&self, draft: &T::Draft) -> ClientResult<Record<T>> {
        let created = self.client.resource::<T>().create(draft).await?;
        debug!("Created {} {}", T::KIND.label(), created.id);
        self.refresh().await?;
        Ok(created)
    }

    /// Update remotely, then refresh everything
    pub async fn update<T: Collected + Editable>(&self, record: &Record<T>) -> ClientResult<Record<T>> {
        let updated = self.client.resource::<T>().update(record).await?;
        debug!("Updated {} {}", T::KIND.label(), updated.id);
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete remotely, then refresh everything
    pub async fn delete<T: Collected>(&self, id: &EntityId) -> ClientResult<Acknowledgement> {
        let ack = self.client.resource::<T>().delete(id).await?;
        debug!("Deleted {} {}", T::KIND.label(), id);
        self.refresh().await?;
        Ok(ack)
    }

    /// Refresh on every authentication-state transition.
    ///
    /// The task holds only a weak reference and stops once the store or the
    /// session is dropped. Failures are logged because no caller awaits them.
    pub fn watch_auth(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.client.session().subscribe();
        let store: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let state = *changes.borrow_and_update();
                let Some(store) = store.upgrade() else {
                    break;
                };
                debug!("Authentication state is now {:?}, refreshing", state);
                if let Err(e) = store.refresh().await {
                    warn!("Refresh after authentication change failed: {}", e);
                }
            }
        })
    }
}
