//! Round construction for music quiz games.
//!
//! Turns a flat pool of candidate tracks into an ordered list of
//! multiple-choice rounds. Each round has one answer (a track with a
//! playable preview clip) followed by distractors drawn from the rest of the
//! pool. Selection follows the pool order strictly; any shuffling is the
//! catalog's job.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A track offered by the music catalog.
///
/// Only tracks with a `preview_url` can become round answers; every track can
/// serve as a distractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTrack {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub preview_url: Option<String>,
}

/// One selectable option inside a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTrack {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub is_answer: bool,
}

impl GameTrack {
    fn from_candidate(track: &CandidateTrack, is_answer: bool) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artists: track.artists.clone(),
            is_answer,
        }
    }
}

/// A single quiz question: the answer's preview clip plus the options.
///
/// The answer is always the first entry of `tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub preview_url: String,
    pub tracks: Vec<GameTrack>,
}

impl Round {
    /// The track marked as the correct answer.
    pub fn answer(&self) -> Option<&GameTrack> {
        self.tracks.iter().find(|t| t.is_answer)
    }

    /// Iterate over the incorrect options.
    pub fn distractors(&self) -> impl Iterator<Item = &GameTrack> {
        self.tracks.iter().filter(|t| !t.is_answer)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Incremental round builder over a borrowed track pool.
///
/// Answers are chosen up front (first `round_count` tracks with a preview).
/// Distractors are drawn through a single cursor that only moves forward, so
/// a pool entry is inspected for distractor use at most once per game.
/// Answer ids are excluded from distractor duty in every round.
///
/// Yields one [`Round`] per selected answer. A round can come out with fewer
/// than `options_per_round` tracks once the pool runs dry.
#[derive(Debug)]
pub struct RoundBuilder<'a> {
    pool: &'a [CandidateTrack],
    answers: Vec<(&'a CandidateTrack, &'a str)>,
    answer_ids: HashSet<&'a str>,
    next_answer: usize,
    cursor: usize,
    options_per_round: usize,
}

impl<'a> RoundBuilder<'a> {
    /// Select the answers for up to `round_count` rounds.
    ///
    /// `options_per_round` of 0 is treated as 1: a round always carries its
    /// answer.
    pub fn new(pool: &'a [CandidateTrack], round_count: usize, options_per_round: usize) -> Self {
        let answers: Vec<(&CandidateTrack, &str)> = pool
            .iter()
            .filter_map(|track| track.preview_url.as_deref().map(|url| (track, url)))
            .take(round_count)
            .collect();

        let answer_ids = answers.iter().map(|&(track, _)| track.id.as_str()).collect();

        Self {
            pool,
            answers,
            answer_ids,
            next_answer: 0,
            cursor: 0,
            options_per_round: options_per_round.max(1),
        }
    }

    /// Number of rounds this builder will produce in total.
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Index of the next pool entry the distractor scan will inspect.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn fill_distractors(&mut self, tracks: &mut Vec<GameTrack>) {
        while tracks.len() < self.options_per_round {
            let Some(candidate) = self.pool.get(self.cursor) else {
                break;
            };
            self.cursor += 1;

            if self.answer_ids.contains(candidate.id.as_str()) {
                continue;
            }
            // Upstream pools occasionally repeat a track.
            if tracks.iter().any(|t| t.id == candidate.id) {
                continue;
            }

            tracks.push(GameTrack::from_candidate(candidate, false));
        }
    }
}

impl Iterator for RoundBuilder<'_> {
    type Item = Round;

    fn next(&mut self) -> Option<Round> {
        let (answer, preview_url) = *self.answers.get(self.next_answer)?;
        self.next_answer += 1;

        let mut tracks = Vec::with_capacity(self.options_per_round);
        tracks.push(GameTrack::from_candidate(answer, true));
        self.fill_distractors(&mut tracks);

        Some(Round {
            preview_url: preview_url.to_string(),
            tracks,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.answers.len() - self.next_answer;
        (remaining, Some(remaining))
    }
}

/// Build every round for a game in one call.
///
/// Returns fewer than `round_count` rounds when the pool holds fewer tracks
/// with a preview; use [`PoolShortfall::detect`] to decide whether that is
/// acceptable.
pub fn build_rounds(
    pool: &[CandidateTrack],
    round_count: usize,
    options_per_round: usize,
) -> Vec<Round> {
    RoundBuilder::new(pool, round_count, options_per_round).collect()
}

// ---------------------------------------------------------------------------
// Shortfall
// ---------------------------------------------------------------------------

/// Describes how a built game falls short of what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolShortfall {
    /// Rounds asked for.
    pub requested: usize,
    /// Rounds actually built.
    pub built: usize,
    /// Built rounds holding fewer than the requested number of options.
    pub thin_rounds: usize,
}

impl PoolShortfall {
    /// Compare built rounds against the request. `None` means no shortfall.
    pub fn detect(rounds: &[Round], round_count: usize, options_per_round: usize) -> Option<Self> {
        let wanted_options = options_per_round.max(1);
        let thin_rounds = rounds
            .iter()
            .filter(|r| r.tracks.len() < wanted_options)
            .count();

        if rounds.len() >= round_count && thin_rounds == 0 {
            return None;
        }

        Some(Self {
            requested: round_count,
            built: rounds.len(),
            thin_rounds,
        })
    }
}

impl From<PoolShortfall> for CoreError {
    fn from(s: PoolShortfall) -> Self {
        CoreError::PoolExhausted {
            requested: s.requested,
            built: s.built,
            thin_rounds: s.thin_rounds,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
