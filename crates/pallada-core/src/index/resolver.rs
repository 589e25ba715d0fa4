//! Fuzzy query resolution over an [`EntityIndex`].
//!
//! Ranks every entity against the normalized query and selects the best
//! one deterministically: score, then substring containment, then edit
//! distance, then index position.
//!
//! The score is the best of three similarities in `0..=100`:
//! - normalized Levenshtein over the whole name
//! - Indel similarity `2 * lcs / (len(query) + len(name))`, which keeps a
//!   mistyped prefix of a long name (`proskurn`) above the threshold
//! - a containment floor for names that contain the whole query

use std::cmp::Ordering;
use std::time::Instant;

use super::normalize::normalize;
use super::EntityIndex;
use crate::errors::{Result, TimetableError};
use crate::model::Entity;
use crate::{log_op_end, log_op_error, log_op_start};

/// Minimum similarity (0-100, exclusive) a match must exceed to be accepted
pub const MIN_SIMILARITY: f64 = 30.0;

/// Score floor for names that contain the whole query
const CONTAINMENT_FLOOR: f64 = 50.0;

/// A scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub entity: &'a Entity,
    /// Similarity in `0.0..=100.0`
    pub score: f64,
    /// The normalized name contains the normalized query
    pub contains: bool,
    /// Levenshtein distance between normalized query and name
    pub distance: usize,
    position: usize,
}

impl Match<'_> {
    /// Ranking order: `Less` means `self` is the better match
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.contains.cmp(&self.contains))
            .then_with(|| self.distance.cmp(&other.distance))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Length of the longest common subsequence, in chars
fn lcs_len(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ca in a.chars() {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == *cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Indel similarity in `0..=100`
fn indel_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

fn score_entity<'a>(query: &str, entity: &'a Entity, position: usize) -> Match<'a> {
    let name = entity.normalized_name.as_str();
    let levenshtein = 100.0 * strsim::normalized_levenshtein(query, name);
    let ratio = levenshtein.max(indel_ratio(query, name));
    let distance = strsim::levenshtein(query, name);
    let contains = name.contains(query);

    let score = if contains {
        let coverage = query.chars().count() as f64 / name.chars().count().max(1) as f64;
        ratio.max(CONTAINMENT_FLOOR + CONTAINMENT_FLOOR * coverage)
    } else {
        ratio
    };

    Match {
        entity,
        score,
        contains,
        distance,
        position,
    }
}

fn ranked<'a>(index: &'a EntityIndex, query: &str) -> Vec<Match<'a>> {
    let mut matches: Vec<Match<'a>> = index
        .entities()
        .iter()
        .enumerate()
        .map(|(i, e)| score_entity(query, e, i))
        .collect();
    matches.sort_by(|a, b| a.rank(b));
    matches
}

/// Resolve a free-text query using the default [`MIN_SIMILARITY`] threshold.
///
/// # Errors
///
/// `EntityNotFound` when the query is empty or no entity scores above the
/// threshold.
pub fn resolve<'a>(index: &'a EntityIndex, query: &str) -> Result<&'a Entity> {
    resolve_with_threshold(index, query, MIN_SIMILARITY)
}

/// Resolve a free-text query against an explicit acceptance threshold.
///
/// An entity whose normalized name equals the normalized query is returned
/// immediately (first one in index order).
///
/// # Errors
///
/// `EntityNotFound` when the query is empty or no entity scores above
/// `threshold`. The best rejected candidate's display name is attached.
pub fn resolve_with_threshold<'a>(
    index: &'a EntityIndex,
    query: &str,
    threshold: f64,
) -> Result<&'a Entity> {
    let start = Instant::now();
    log_op_start!("resolve", query = query, index_len = index.len());

    let normalized = normalize(query);
    if normalized.is_empty() {
        let err = TimetableError::EntityNotFound {
            query: query.to_string(),
            best_candidate: None,
        };
        log_op_error!(
            "resolve",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            query = query
        );
        return Err(err);
    }

    if let Some(exact) = index
        .entities()
        .iter()
        .find(|e| e.normalized_name == normalized)
    {
        log_op_end!(
            "resolve",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_id = exact.id,
            exact = true
        );
        return Ok(exact);
    }

    let best = ranked(index, &normalized).into_iter().next();
    match best {
        Some(m) if m.score > threshold => {
            log_op_end!(
                "resolve",
                duration_ms = start.elapsed().as_millis() as u64,
                entity_id = m.entity.id,
                score = m.score
            );
            Ok(m.entity)
        }
        other => {
            let best_score = other.as_ref().map(|m| m.score);
            let err = TimetableError::EntityNotFound {
                query: query.to_string(),
                best_candidate: other.map(|m| m.entity.display_name.clone()),
            };
            log_op_error!(
                "resolve",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                query = query,
                best_score = ?best_score
            );
            Err(err)
        }
    }
}

/// Top `limit` accepted matches (score above `threshold`), best first.
///
/// An empty query yields no matches.
pub fn search<'a>(
    index: &'a EntityIndex,
    query: &str,
    threshold: f64,
    limit: usize,
) -> Vec<Match<'a>> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return Vec::new();
    }
    ranked(index, &normalized)
        .into_iter()
        .filter(|m| m.score > threshold)
        .take(limit)
        .collect()
}
