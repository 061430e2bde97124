//! Explicit sort specs, the default file order and flipping.

use std::cmp::Ordering;

use crate::application::collection::ItemSet;
use crate::domain::types::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One `field [asc|desc]` clause of a sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// Ordering requested by a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub sort_by: Vec<SortKey>,
    pub flip: bool,
}

impl SortSpec {
    pub fn new(sort_by: Option<&str>, flip: bool) -> Self {
        Self {
            sort_by: sort_by.map(parse_sort_args).unwrap_or_default(),
            flip,
        }
    }

    pub fn is_explicit(&self) -> bool {
        !self.sort_by.is_empty()
    }
}

/// Parse `"date desc, title"` into sort keys. Unknown direction tokens sort ascending.
pub fn parse_sort_args(raw: &str) -> Vec<SortKey> {
    raw.split(',')
        .filter_map(|clause| {
            let mut tokens = clause.split_whitespace();
            let field = tokens.next()?;
            let direction = match tokens.next() {
                Some(token) if token.eq_ignore_ascii_case("desc") => Direction::Desc,
                _ => Direction::Asc,
            };
            Some(SortKey {
                field: field.to_string(),
                direction,
            })
        })
        .collect()
}

/// Apply the explicit sort or the default order for `kind`, then flip if requested.
pub fn order(items: ItemSet, spec: &SortSpec, kind: SectionKind) -> ItemSet {
    let sorted = if spec.is_explicit() {
        sort_by_keys(items, &spec.sort_by)
    } else {
        default_order(items, kind)
    };

    if spec.flip { sorted.flip() } else { sorted }
}

/// Files sort by their sort number then filename; pages keep the parent's order.
pub fn default_order(items: ItemSet, kind: SectionKind) -> ItemSet {
    match kind {
        SectionKind::Pages => items,
        SectionKind::Files => sort_by_keys(
            items,
            &[
                SortKey {
                    field: "sort".to_string(),
                    direction: Direction::Asc,
                },
                SortKey {
                    field: "filename".to_string(),
                    direction: Direction::Asc,
                },
            ],
        ),
    }
}

pub fn sort_by_keys(items: ItemSet, keys: &[SortKey]) -> ItemSet {
    items.sort_with(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare_values(
                    a.field(&key.field).as_deref().unwrap_or(""),
                    b.field(&key.field).as_deref().unwrap_or(""),
                );
                match key.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

/// Rank of a field value: empty first, then finite numbers, then text.
#[derive(Debug)]
enum SortValue {
    Empty,
    Number(f64),
    Text(String),
}

impl SortValue {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SortValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => SortValue::Number(number),
            _ => SortValue::Text(raw.to_lowercase()),
        }
    }
}

fn compare_values(a: &str, b: &str) -> Ordering {
    match (SortValue::parse(a), SortValue::parse(b)) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(&y),
        (SortValue::Text(x), SortValue::Text(y)) => x.cmp(&y),
        (x, y) => rank(&x).cmp(&rank(&y)),
    }
}

fn rank(value: &SortValue) -> u8 {
    match value {
        SortValue::Empty => 0,
        SortValue::Number(_) => 1,
        SortValue::Text(_) => 2,
    }
}
