use std::sync::Arc;

use log::{info, warn};
use tokio::{sync::watch, time::sleep};

use crate::{Collection, FetchError, StorefrontConfig};

use super::{run_query, CollectionSource, QueryState};

/// A section of the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    RecentlyAdded,
    NewReleases,
    BestSellers,
}

impl SectionKind {
    /// The sections in the order they are rendered
    pub const ALL: [Self; 3] = [Self::RecentlyAdded, Self::NewReleases, Self::BestSellers];

    pub fn title(&self) -> &'static str {
        match self {
            Self::RecentlyAdded => "RECENTLY ADDED",
            Self::NewReleases => "NEW RELEASES",
            Self::BestSellers => "BEST SELLERS",
        }
    }
}

/// What a single section renders
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub collection: Collection,
    pub loading: bool,
}

/// What the home page renders
#[derive(Debug, Clone, PartialEq)]
pub enum HomeView {
    /// The primary collection failed, so the whole page is an error
    Error { message: String, status_code: u16 },
    Sections(Vec<Section>),
}

impl HomeView {
    /// Returns the section of the given kind, if the page has sections
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        match self {
            Self::Error { .. } => None,
            Self::Sections(sections) => sections.iter().find(|s| s.kind == kind),
        }
    }
}

/// The state of both home page queries
#[derive(Debug, Clone, PartialEq)]
pub struct HomeState {
    /// The primary query, also backing the best sellers section
    pub recently_added: QueryState,
    /// The secondary query, only enabled once the primary one settled
    pub new_releases: QueryState,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            recently_added: QueryState::Loading,
            new_releases: QueryState::Disabled,
        }
    }
}

impl HomeState {
    /// Returns true once no query will change anymore
    pub fn is_settled(&self) -> bool {
        self.fatal_error().is_some()
            || (!self.recently_added.is_loading() && !self.new_releases.is_loading())
    }

    /// Returns the error that takes down the whole page, if any.
    /// Only a primary failure other than not found is fatal.
    pub fn fatal_error(&self) -> Option<&FetchError> {
        self.recently_added.error().filter(|e| !e.is_not_found())
    }

    /// Decides what every section renders
    pub fn view(&self) -> HomeView {
        if let Some(error) = self.fatal_error() {
            return HomeView::Error {
                message: error.message.clone(),
                status_code: error.http_status.unwrap_or(500),
            };
        }

        let primary_loading = self.recently_added.is_loading();
        let secondary_loading = primary_loading || self.new_releases.is_loading();

        let recently_added = resolve(&self.recently_added, primary_loading);
        let new_releases = resolve(&self.new_releases, secondary_loading);

        HomeView::Sections(vec![
            Section {
                kind: SectionKind::RecentlyAdded,
                collection: recently_added.clone(),
                loading: primary_loading,
            },
            Section {
                kind: SectionKind::NewReleases,
                collection: new_releases,
                loading: secondary_loading,
            },
            Section {
                kind: SectionKind::BestSellers,
                collection: recently_added,
                loading: primary_loading,
            },
        ])
    }
}

fn resolve(state: &QueryState, loading: bool) -> Collection {
    if loading {
        return Collection::default();
    }

    state.collection().cloned().unwrap_or_default()
}

/// Loads the home page collections.
///
/// The primary query starts right away. The secondary one is enabled a fixed
/// delay after the primary one settled, so both never hold a connection to
/// the shared database at the same time.
pub struct HomeLoader<S: ?Sized> {
    source: Arc<S>,
    config: StorefrontConfig,
}

impl<S> HomeLoader<S>
where
    S: CollectionSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, config: StorefrontConfig) -> Self {
        Self { source, config }
    }

    /// Loads both collections and returns the settled state
    pub async fn load(&self) -> HomeState {
        let (sender, _receiver) = watch::channel(HomeState::default());
        self.drive(&sender).await;

        let state = sender.borrow().clone();
        state
    }

    /// Loads both collections on a separate task, publishing every state change.
    /// The task stops once every receiver is dropped.
    pub fn spawn(self) -> watch::Receiver<HomeState> {
        let (sender, receiver) = watch::channel(HomeState::default());

        tokio::spawn(async move { self.drive(&sender).await });

        receiver
    }

    async fn drive(&self, sender: &watch::Sender<HomeState>) {
        let config = &self.config.query;

        let report = run_query(&*self.source, &self.config.recently_added_id, config).await;
        report.log("Recently added");

        let primary: QueryState = report.into();
        let fatal = primary.error().is_some_and(|e| !e.is_not_found());

        if !publish(sender, |state| state.recently_added = primary) {
            return;
        }

        if fatal {
            warn!("Recently added collection failed, new releases won't be loaded");
            return;
        }

        sleep(config.stagger_delay).await;

        if !publish(sender, |state| state.new_releases = QueryState::Loading) {
            return;
        }

        let report = run_query(&*self.source, &self.config.new_releases_id, config).await;
        report.log("New releases");

        publish(sender, |state| state.new_releases = report.into());
        info!("Home page collections settled");
    }
}

/// Applies an update, unless nobody is listening anymore
fn publish(sender: &watch::Sender<HomeState>, update: impl FnOnce(&mut HomeState)) -> bool {
    if sender.is_closed() {
        info!("Home page went away, stopping");
        return false;
    }

    sender.send_modify(update);
    true
}
