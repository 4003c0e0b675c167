//! Fuzzy matching for type names, in the style of fzf
//!
//! Query characters must appear in order in the target but not necessarily
//! next to each other. Matching is case-insensitive. Besides the usual
//! bonuses for runs and boundaries, the score is lowered by the distance to
//! the first matched character and by the number of target characters left
//! unmatched, so shorter and earlier hits rank first.

use crate::view::selection_tree::{NodeId, SelectionTree};

/// Score constants for match quality ranking
mod score {
    /// Bonus for each character matched right after the previous one
    pub const CONSECUTIVE: i32 = 16;
    /// Bonus for matching right after a separator (`.`, `/`, `_`, ...)
    pub const SEGMENT_START: i32 = 32;
    /// Bonus for matching the first character of the target
    pub const START_OF_STRING: i32 = 48;
    /// Bonus for matching a lowercase -> uppercase transition
    pub const CAMEL_CASE: i32 = 24;
    /// Penalty for opening a gap between two matched characters
    pub const GAP_START: i32 = -5;
    /// Penalty per additional character inside a gap
    pub const GAP_EXTENSION: i32 = -3;
    /// Penalty per character before the first match
    pub const LEADING_GAP: i32 = -2;
    /// Floor for the total leading gap penalty
    pub const MAX_LEADING_GAP: i32 = -20;
    /// Penalty per target character not covered by the query
    pub const UNMATCHED_CHAR: i32 = -1;
    /// Bonus when the query is the whole target
    pub const EXACT_MATCH: i32 = 100;
    /// Bonus when the query is the whole last segment (`orc` in `Game.Enemy.Orc`)
    pub const LAST_SEGMENT_MATCH: i32 = 80;
}

/// Characters that start a new name segment
fn is_separator(c: char) -> bool {
    matches!(c, '.' | '/' | '_' | '-' | ' ' | '+' | '<' | ',')
}

/// Result of a fuzzy match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Whether the query matched the target
    pub matched: bool,
    /// Whether the query occurs as one unbroken run in the target
    pub contiguous: bool,
    /// Quality score (higher is better). Only meaningful if matched is true.
    pub score: i32,
    /// Char indices in the target where query characters matched
    pub match_positions: Vec<usize>,
}

impl FuzzyMatch {
    /// Create a non-matching result
    pub fn no_match() -> Self {
        Self {
            matched: false,
            contiguous: false,
            score: 0,
            match_positions: Vec::new(),
        }
    }
}

impl Ord for FuzzyMatch {
    /// A substring hit outranks any scattered hit; score breaks ties within each
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.matched, other.matched) {
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => std::cmp::Ordering::Equal,
            (true, true) => self
                .contiguous
                .cmp(&other.contiguous)
                .then(self.score.cmp(&other.score)),
        }
    }
}

impl PartialOrd for FuzzyMatch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Match `query` against `target`
///
/// An empty query matches everything with a score of 0.
///
/// # Examples
/// ```
/// use type_picker::input::fuzzy::fuzzy_match;
///
/// assert!(fuzzy_match("orc", "Game.Enemy.Orc").matched);
/// assert!(fuzzy_match("geo", "Game.Enemy.Orc").matched);
/// assert!(!fuzzy_match("xyz", "Game.Enemy.Orc").matched);
/// ```
pub fn fuzzy_match(query: &str, target: &str) -> FuzzyMatch {
    if query.is_empty() {
        return FuzzyMatch {
            matched: true,
            contiguous: true,
            score: 0,
            match_positions: Vec::new(),
        };
    }

    let query_lower: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let target_chars: Vec<char> = target.chars().collect();
    // Lowercased per char so indices line up with `target_chars`
    let target_lower: Vec<char> = target_chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    // A substring occurrence wins over any scattered alignment
    let (positions, mut total, contiguous) =
        match best_run(&query_lower, &target_chars, &target_lower) {
            Some((positions, total)) => (positions, total, true),
            None => match best_alignment(&query_lower, &target_chars, &target_lower) {
                Some((positions, total)) => (positions, total, false),
                None => return FuzzyMatch::no_match(),
            },
        };

    let query_len = query_lower.len();
    let target_len = target_lower.len();
    total += score::UNMATCHED_CHAR * (target_len - query_len) as i32;

    if query_len == target_len {
        total += score::EXACT_MATCH;
    } else if is_last_segment(&query_lower, &target_lower) {
        total += score::LAST_SEGMENT_MATCH;
    }

    FuzzyMatch {
        matched: true,
        contiguous,
        score: total,
        match_positions: positions,
    }
}

/// Whether the query spells out the segment after the last separator
fn is_last_segment(query: &[char], target: &[char]) -> bool {
    let start = target
        .iter()
        .rposition(|&c| is_separator(c))
        .map_or(0, |index| index + 1);
    &target[start..] == query
}

/// Best-scoring substring occurrence of `query` in `target`
fn best_run(
    query: &[char],
    target_chars: &[char],
    target_lower: &[char],
) -> Option<(Vec<usize>, i32)> {
    let m = query.len();
    let mut best: Option<(Vec<usize>, i32)> = None;
    for (start, window) in target_lower.windows(m).enumerate() {
        if window != query {
            continue;
        }
        let positions: Vec<usize> = (start..start + m).collect();
        let total = alignment_score(target_chars, &positions);
        if best.as_ref().map_or(true, |(_, current)| total > *current) {
            best = Some((positions, total));
        }
    }
    best
}

/// Score of matching at `positions`, before the whole-target adjustments
fn alignment_score(target: &[char], positions: &[usize]) -> i32 {
    let mut total = 0;
    let mut last = None;
    for &ti in positions {
        total += boundary_bonus(target, ti);
        total += match last {
            Some(last) => transition(last, ti),
            None => leading_gap(ti),
        };
        last = Some(ti);
    }
    total
}

/// Highest-scoring alignment of `query` in `target`, if all characters occur in order
///
/// `score[qi][ti]` is the best total for `query[..=qi]` with `query[qi]` placed
/// at `ti`. It is reached either straight from `ti - 1` or across a gap; the gap
/// side is carried as a running maximum aged by `GAP_EXTENSION` per step.
fn best_alignment(
    query: &[char],
    target_chars: &[char],
    target_lower: &[char],
) -> Option<(Vec<usize>, i32)> {
    let n = target_lower.len();
    let m = query.len();
    if m == 0 || n < m {
        return None;
    }

    let mut score: Vec<Vec<Option<i32>>> = vec![vec![None; n]; m];
    let mut from: Vec<Vec<Option<usize>>> = vec![vec![None; n]; m];

    for qi in 0..m {
        // Best (score, position) of the previous row ending at least two chars back
        let mut across_gap: Option<(i32, usize)> = None;
        for ti in qi..n {
            if qi > 0 && ti >= 2 {
                across_gap = across_gap.map(|(total, k)| (total + score::GAP_EXTENSION, k));
                if let Some(prev) = score[qi - 1][ti - 2] {
                    let opened = prev + score::GAP_START;
                    if across_gap.map_or(true, |(total, _)| opened > total) {
                        across_gap = Some((opened, ti - 2));
                    }
                }
            }
            if target_lower[ti] != query[qi] {
                continue;
            }

            let bonus = boundary_bonus(target_chars, ti);
            let best = if qi == 0 {
                Some((leading_gap(ti), None))
            } else {
                let straight = score[qi - 1][ti - 1].map(|prev| (prev + score::CONSECUTIVE, ti - 1));
                match (straight, across_gap) {
                    (Some(s), Some(g)) if g.0 > s.0 => Some((g.0, Some(g.1))),
                    (Some(s), _) => Some((s.0, Some(s.1))),
                    (None, Some(g)) => Some((g.0, Some(g.1))),
                    (None, None) => None,
                }
            };
            if let Some((total, prev)) = best {
                score[qi][ti] = Some(total + bonus);
                from[qi][ti] = prev;
            }
        }
    }

    // Earliest end wins ties
    let (end, total) = score[m - 1]
        .iter()
        .enumerate()
        .filter_map(|(ti, total)| total.map(|total| (ti, total)))
        .fold(None, |best: Option<(usize, i32)>, (ti, total)| match best {
            Some((_, current)) if current >= total => best,
            _ => Some((ti, total)),
        })?;

    let mut positions = vec![0; m];
    let mut ti = end;
    for qi in (0..m).rev() {
        positions[qi] = ti;
        if let Some(prev) = from[qi][ti] {
            ti = prev;
        }
    }
    Some((positions, total))
}

/// Bonus for where `ti` sits in the name
fn boundary_bonus(target: &[char], ti: usize) -> i32 {
    if ti == 0 {
        return score::START_OF_STRING;
    }
    let prev_char = target[ti - 1];
    if is_separator(prev_char) {
        score::SEGMENT_START
    } else if prev_char.is_lowercase() && target[ti].is_uppercase() {
        score::CAMEL_CASE
    } else {
        0
    }
}

/// Penalty for the characters skipped before the first match
fn leading_gap(first: usize) -> i32 {
    (score::LEADING_GAP * first as i32).max(score::MAX_LEADING_GAP)
}

/// Score for stepping from a match at `last` to one at `ti`
fn transition(last: usize, ti: usize) -> i32 {
    if ti == last + 1 {
        score::CONSECUTIVE
    } else {
        let gap = (ti - last - 1) as i32;
        score::GAP_START + score::GAP_EXTENSION * (gap - 1)
    }
}

/// Filter a list of items using fuzzy matching, returning sorted results
///
/// Substring hits come first, then items by descending score. Ties keep
/// their input order.
/// Non-matching items are excluded.
pub fn fuzzy_filter<T, F>(query: &str, items: &[T], get_text: F) -> Vec<(usize, FuzzyMatch)>
where
    F: Fn(&T) -> &str,
{
    let mut results: Vec<(usize, FuzzyMatch)> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (idx, fuzzy_match(query, get_text(item))))
        .filter(|(_, m)| m.matched)
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.1.cmp(&a.1));

    results
}

/// Rank tree nodes against `query` using their search-mode label
pub fn rank_nodes<P>(query: &str, tree: &SelectionTree<P>, nodes: &[NodeId]) -> Vec<NodeId> {
    let labelled: Vec<(NodeId, &str)> = nodes
        .iter()
        .filter_map(|&id| tree.get_node(id).map(|node| (id, node.label(true))))
        .collect();

    fuzzy_filter(query, &labelled, |(_, label)| *label)
        .into_iter()
        .map(|(idx, _)| labelled[idx].0)
        .collect()
}
