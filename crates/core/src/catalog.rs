//! Music catalog collaborator.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::rounds::CandidateTrack;

/// Source of candidate tracks for a game.
///
/// Implementations fail with [`CoreError::Upstream`] on network or auth
/// problems. Callers propagate the error; nothing here retries.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Fetch up to `limit` tracks for the given genre, in the order the
    /// catalog ranks them.
    async fn fetch_candidate_tracks(
        &self,
        genre: &str,
        limit: usize,
    ) -> Result<Vec<CandidateTrack>, CoreError>;
}
