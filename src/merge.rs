//! Merging two copies of the same song.
//!
//! The right-hand record wins every attribute conflict. Points of interest
//! from both sides are kept in order (left first), duplicates dropped, and
//! cue slot numbers made unique again afterwards.

use crate::catalog::{AttributeBag, Element, Poi, SongRecord};
use std::collections::HashSet;

/// Merge two optional records; a missing side yields the other unchanged.
pub fn merge(a: Option<&SongRecord>, b: Option<&SongRecord>) -> Option<SongRecord> {
    match (a, b) {
        (Some(a), Some(b)) => Some(merge_songs(a, b)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

pub fn merge_songs(a: &SongRecord, b: &SongRecord) -> SongRecord {
    SongRecord {
        file_path: b.file_path.clone(),
        file_size: b.file_size.or(a.file_size),
        attrs: a.attrs.merge(&b.attrs),
        tags: merge_singleton(&a.tags, &b.tags),
        infos: merge_singleton(&a.infos, &b.infos),
        scan: merge_singleton(&a.scan, &b.scan),
        points: merge_points(&a.points, &b.points),
        extra: merge_extra(&a.extra, &b.extra),
    }
}

fn merge_singleton(a: &Option<AttributeBag>, b: &Option<AttributeBag>) -> Option<AttributeBag> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

#[derive(PartialEq, Eq, Hash)]
enum PoiKey<'a> {
    Name(&'a str),
    Pos(&'a str),
    Unplaced,
}

fn poi_key(poi: &Poi) -> PoiKey<'_> {
    match (poi.name().filter(|n| !n.is_empty()), poi.pos()) {
        (Some(name), _) => PoiKey::Name(name),
        (None, Some(pos)) => PoiKey::Pos(pos),
        (None, None) => PoiKey::Unplaced,
    }
}

/// Concatenate, drop duplicates (first wins), then free repeated cue slots.
pub fn merge_points(a: &[Poi], b: &[Poi]) -> Vec<Poi> {
    let mut seen = HashSet::new();
    let mut points: Vec<Poi> = a
        .iter()
        .chain(b)
        .filter(|&poi| seen.insert(poi_key(poi)))
        .cloned()
        .collect();

    let mut taken_slots: HashSet<String> = HashSet::new();
    for poi in &mut points {
        let Some(num) = poi.num() else {
            continue;
        };
        if !taken_slots.insert(num.to_string()) {
            poi.clear_num();
        }
    }
    points
}

fn merge_extra(a: &[Element], b: &[Element]) -> Vec<Element> {
    let mut merged = a.to_vec();
    let mut replaced: HashSet<usize> = HashSet::new();
    for element in b {
        // each left element can be replaced once; later same-name ones append
        let existing = (0..a.len())
            .find(|idx| !replaced.contains(idx) && merged[*idx].name == element.name);
        match existing {
            Some(idx) => {
                merged[idx] = element.clone();
                replaced.insert(idx);
            }
            None => merged.push(element.clone()),
        }
    }
    merged
}
