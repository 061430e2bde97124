//! Owned item collections and the filters sections apply to them.

use std::cmp::Reverse;

use crate::application::host::SearchIndex;
use crate::domain::entities::ItemRecord;
use crate::domain::types::PageStatus;

const SEARCH_MIN_WORD_LENGTH: usize = 2;
const SCORE_EXACT: u32 = 16;
const SCORE_CONTAINS: u32 = 8;
const SCORE_WORD: u32 = 2;

/// Ordered set of items. Every operation consumes the set and returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    items: Vec<ItemRecord>,
}

impl ItemSet {
    pub fn new(items: Vec<ItemRecord>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<ItemRecord> {
        self.items
    }

    pub fn filter(self, predicate: impl Fn(&ItemRecord) -> bool) -> Self {
        Self::new(self.items.into_iter().filter(|item| predicate(item)).collect())
    }

    /// Drop protected items.
    pub fn readable(self) -> Self {
        self.filter(|item| item.readable)
    }

    pub fn listed(self) -> Self {
        self.filter(|item| item.status == Some(PageStatus::Listed))
    }

    pub fn unlisted(self) -> Self {
        self.filter(|item| item.status == Some(PageStatus::Unlisted))
    }

    /// Keep items whose intended template is one of `templates`; an empty list keeps everything.
    pub fn templates(self, templates: &[String]) -> Self {
        if templates.is_empty() {
            return self;
        }
        self.filter(|item| templates.iter().any(|template| *template == item.template))
    }

    /// Append `other`, skipping ids already present.
    pub fn merge(mut self, other: ItemSet) -> Self {
        for item in other.items {
            if !self.items.iter().any(|existing| existing.id == item.id) {
                self.items.push(item);
            }
        }
        self
    }

    pub fn flip(mut self) -> Self {
        self.items.reverse();
        self
    }

    pub(crate) fn sort_with(
        mut self,
        compare: impl FnMut(&ItemRecord, &ItemRecord) -> std::cmp::Ordering,
    ) -> Self {
        self.items.sort_by(compare);
        self
    }
}

impl FromIterator<ItemRecord> for ItemSet {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ItemSet {
    type Item = ItemRecord;
    type IntoIter = std::vec::IntoIter<ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Scores every searchable field of an item against the query and keeps
/// matching items, best matches first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSearch;

impl ContentSearch {
    fn score(item: &ItemRecord, query: &str, words: &[&str]) -> u32 {
        let mut fields: Vec<String> = vec![item.id.to_lowercase(), item.template.to_lowercase()];
        if let Some(filename) = item.filename() {
            fields.push(filename.to_lowercase());
        }
        fields.extend(item.content.values().map(str::to_lowercase));

        fields
            .iter()
            .map(|field| {
                let mut score = 0;
                if field == query {
                    score += SCORE_EXACT;
                } else if field.contains(query) {
                    score += SCORE_CONTAINS;
                }
                score
                    + words
                        .iter()
                        .filter(|word| field.contains(*word))
                        .count() as u32
                        * SCORE_WORD
            })
            .sum()
    }
}

impl SearchIndex for ContentSearch {
    fn search(&self, items: ItemSet, query: &str) -> ItemSet {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return ItemSet::default();
        }

        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|word| word.chars().count() >= SEARCH_MIN_WORD_LENGTH)
            .collect();

        let mut scored: Vec<(u32, ItemRecord)> = items
            .into_iter()
            .map(|item| (Self::score(&item, &query, &words), item))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by_key(|(score, _)| Reverse(*score));

        scored.into_iter().map(|(_, item)| item).collect()
    }
}
