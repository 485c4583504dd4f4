// Move grouping for the Pokemon detail view's learnset panels.
//
// Two independent groupings over the same move list: by special move
// category (signature groups and similar orthogonal tags) and by Pokemon
// type. Both subdivide by damage class in the fixed Physical/Special/Status
// order, with moves alphabetical inside each subdivision.

use std::collections::BTreeMap;

use crate::models::{MoveCategory, MoveInfo};

// ---------------------------------------------------------------------------
// Group structures
// ---------------------------------------------------------------------------

/// Moves of one damage class within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: MoveCategory,
    pub moves: Vec<MoveInfo>,
}

/// One top-level group (a Pokemon type, or a special move category).
#[derive(Debug, Clone, PartialEq)]
pub struct MoveGroup {
    pub name: String,
    pub buckets: Vec<CategoryBucket>,
}

// ---------------------------------------------------------------------------
// Groupings
// ---------------------------------------------------------------------------

/// Group moves by Pokemon type.
///
/// Groups are alphabetical by type name. Moves without a type are excluded
/// from this grouping (not an error).
pub fn group_moves_by_type(moves: &[MoveInfo]) -> Vec<MoveGroup> {
    let mut keyed: BTreeMap<String, Vec<MoveInfo>> = BTreeMap::new();
    for m in moves {
        if let Some(move_type) = &m.move_type {
            keyed.entry(move_type.clone()).or_default().push(m.clone());
        }
    }
    into_groups(keyed)
}

/// Group moves by special move category.
///
/// A move tagged with several categories appears in each of them; a move
/// with no tags appears nowhere. Groups are alphabetical by tag.
pub fn group_moves_by_special_category(moves: &[MoveInfo]) -> Vec<MoveGroup> {
    let mut keyed: BTreeMap<String, Vec<MoveInfo>> = BTreeMap::new();
    for m in moves {
        for tag in &m.special_categories {
            keyed.entry(tag.clone()).or_default().push(m.clone());
        }
    }
    into_groups(keyed)
}

fn into_groups(keyed: BTreeMap<String, Vec<MoveInfo>>) -> Vec<MoveGroup> {
    keyed
        .into_iter()
        .map(|(name, members)| MoveGroup {
            name,
            buckets: bucket_by_category(members),
        })
        .collect()
}

/// Subdivide by damage class in the fixed presentation order, dropping empty
/// subdivisions and sorting moves alphabetically within each.
fn bucket_by_category(members: Vec<MoveInfo>) -> Vec<CategoryBucket> {
    let mut buckets = Vec::new();
    for category in MoveCategory::ORDERED {
        let mut moves: Vec<MoveInfo> = members
            .iter()
            .filter(|m| m.category == category)
            .cloned()
            .collect();
        if moves.is_empty() {
            continue;
        }
        moves.sort_by(|a, b| a.name.cmp(&b.name));
        buckets.push(CategoryBucket { category, moves });
    }
    buckets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
