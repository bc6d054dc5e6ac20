#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tuneiq_api::config::{GameDelivery, ReaperConfig, ServerConfig};
use tuneiq_api::router::build_app_router;
use tuneiq_api::state::AppState;
use tuneiq_catalog::SpotifyConfig;
use tuneiq_core::catalog::TrackCatalog;
use tuneiq_core::error::CoreError;
use tuneiq_core::game::{assemble_game, GameDetails, GameMeta, GameSettings};
use tuneiq_core::rounds::CandidateTrack;
use tuneiq_core::store::{GameStore, StaleGame, StoredGame};
use tuneiq_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory [`GameStore`] with switchable failures.
pub struct MemoryStore {
    games: Mutex<BTreeMap<DbId, StoredGame>>,
    next_id: AtomicI64,
    failing_deletes: Mutex<HashSet<DbId>>,
    healthy: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            games: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            failing_deletes: Mutex::new(HashSet::new()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    /// Insert a game that started at `start_time` (or never, for `None`).
    pub fn insert_game(&self, start_time: Option<Timestamp>) -> DbId {
        let mut details = sample_details();
        details.start_time = start_time;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        self.games.lock().unwrap().insert(
            id,
            StoredGame {
                id,
                details,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn fail_delete(&self, id: DbId) {
        self.failing_deletes.lock().unwrap().insert(id);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn ids(&self) -> Vec<DbId> {
        self.games.lock().unwrap().keys().copied().collect()
    }

    pub fn get(&self, id: DbId) -> Option<StoredGame> {
        self.games.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn store(&self, game: &GameDetails) -> Result<DbId, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        self.games.lock().unwrap().insert(
            id,
            StoredGame {
                id,
                details: game.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn find(&self, id: DbId) -> Result<Option<StoredGame>, CoreError> {
        Ok(self.get(id))
    }

    async fn query_stale(&self, cutoff: Timestamp) -> Result<Vec<StaleGame>, CoreError> {
        let mut stale: Vec<StaleGame> = self
            .games
            .lock()
            .unwrap()
            .values()
            .filter_map(|g| {
                g.details
                    .start_time
                    .filter(|start| *start <= cutoff)
                    .map(|start_time| StaleGame { id: g.id, start_time })
            })
            .collect();
        stale.sort_by_key(|g| (g.start_time, g.id));
        Ok(stale)
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if self.failing_deletes.lock().unwrap().contains(&id) {
            return Err(CoreError::Upstream(format!("delete of game {id} failed")));
        }
        self.games
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(CoreError::NotFound { entity: "Game", id })
    }

    async fn ping(&self) -> Result<(), CoreError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CoreError::Upstream("store unreachable".to_string()))
        }
    }
}

/// [`TrackCatalog`] serving a fixed pool and recording every request.
#[derive(Default)]
pub struct StaticCatalog {
    tracks: Vec<CandidateTrack>,
    fail: bool,
    requests: Mutex<Vec<(String, usize)>>,
}

impl StaticCatalog {
    pub fn with_tracks(tracks: Vec<CandidateTrack>) -> Self {
        Self {
            tracks,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackCatalog for StaticCatalog {
    async fn fetch_candidate_tracks(
        &self,
        genre: &str,
        limit: usize,
    ) -> Result<Vec<CandidateTrack>, CoreError> {
        self.requests.lock().unwrap().push((genre.to_string(), limit));
        if self.fail {
            return Err(CoreError::Upstream("catalog: token exchange failed".to_string()));
        }
        Ok(self.tracks.iter().take(limit).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// `playable` tracks with a preview clip followed by `silent` tracks without.
pub fn track_pool(playable: usize, silent: usize) -> Vec<CandidateTrack> {
    let with_preview = (0..playable).map(|i| CandidateTrack {
        id: format!("p{i}"),
        title: format!("Playable {i}"),
        artists: vec![format!("Artist {i}")],
        preview_url: Some(format!("https://previews.test/p{i}.mp3")),
    });
    let without_preview = (0..silent).map(|i| CandidateTrack {
        id: format!("s{i}"),
        title: format!("Silent {i}"),
        artists: vec![format!("Artist {i}")],
        preview_url: None,
    });
    with_preview.chain(without_preview).collect()
}

pub fn sample_details() -> GameDetails {
    assemble_game(
        GameMeta {
            name: "Stored quiz".to_string(),
            genre: "rock".to_string(),
            host_id: "host-1".to_string(),
            host_name: "Host".to_string(),
            access_code: None,
        },
        Vec::new(),
    )
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Games have 3 rounds of 4 options, are persisted, and the scheduled reaper
/// is disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        game: GameSettings {
            round_count: 3,
            options_per_round: 4,
            allow_partial_games: false,
        },
        delivery: GameDelivery::Persist,
        spotify: SpotifyConfig::new("test-id", "test-secret"),
        reaper: ReaperConfig {
            retention_hours: 24.0,
            interval_secs: 0,
        },
    }
}

/// Handles to the fakes behind a test router.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub catalog: Arc<StaticCatalog>,
    pub config: ServerConfig,
}

impl TestApp {
    pub fn new(catalog: StaticCatalog) -> Self {
        Self::with_config(catalog, test_config())
    }

    pub fn with_config(catalog: StaticCatalog, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// A fresh router over the shared fakes. Routers are consumed by
    /// `oneshot`, so build one per request.
    pub fn router(&self) -> Router {
        build_test_app(self.store.clone(), self.catalog.clone(), &self.config)
    }
}

/// Build the full application router with all middleware layers, using the
/// given collaborators.
pub fn build_test_app(
    store: Arc<dyn GameStore>,
    catalog: Arc<dyn TrackCatalog>,
    config: &ServerConfig,
) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        catalog,
    };
    build_app_router(state, config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
