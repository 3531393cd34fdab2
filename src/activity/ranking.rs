use indexmap::IndexMap;
use std::collections::BTreeSet;

/// One row of a frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub name: String,
    pub count: usize,
}

/// Count occurrences of each key and return the `limit` most frequent,
/// highest first. Ties keep the order in which keys were first seen.
pub fn top_by_count<'a, I>(keys: I, limit: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(name, count)| RankedEntry {
            name: name.to_string(),
            count,
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

pub fn distinct_count<'a, I>(keys: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter().collect::<BTreeSet<_>>().len()
}

/// Sorted, deduplicated union of all keys.
pub fn sorted_union<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
