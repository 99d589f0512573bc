//! Survey aggregation
//!
//! Turns the immutable [`Dataset`] into ordered [`Bucket`]s. Every function here is pure:
//! the same dataset and parameters always give the same buckets in the same order.

use indexmap::{IndexMap, IndexSet};
use pulse_core::{Dataset, Grouping, Value};

use crate::normalize::is_yes;

/// One aggregated row feeding a chart: a count or a percentage.
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub primary: String,
    pub secondary: Option<String>,
    pub value: f64,
}

impl Bucket {
    pub fn new(primary: impl Into<String>, secondary: Option<String>, value: f64) -> Self {
        Self {
            primary: primary.into(),
            secondary,
            value,
        }
    }

    /// Stable identity of the bucket across redraws.
    pub fn key(&self) -> String {
        match &self.secondary {
            Some(secondary) => format!("{}/{}", self.primary, secondary),
            None => self.primary.clone(),
        }
    }
}

/// A categorical column with a known, ordered list of categories.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryField {
    field: String,
    categories: IndexSet<String>,
}

impl CategoryField {
    pub fn new<I, S>(field: impl Into<String>, categories: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let mut set = IndexSet::new();
        for category in categories {
            let category = category.into();
            anyhow::ensure!(
                !set.contains(&category),
                "category '{category}' listed twice for '{field}'"
            );
            set.insert(category);
        }
        anyhow::ensure!(!set.is_empty(), "'{field}' requires at least 1 category");
        Ok(Self {
            field,
            categories: set,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.get_index_of(category)
    }
}

/// Secondary dimension of an aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GroupingSpec {
    #[default]
    Ungrouped,
    By(String),
}

impl From<&Grouping> for GroupingSpec {
    fn from(grouping: &Grouping) -> Self {
        match grouping {
            Grouping::None => GroupingSpec::Ungrouped,
            Grouping::Field(name) => GroupingSpec::By(name.clone()),
        }
    }
}

/// A yes/no survey column shown under a short label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Indicator {
    pub label: String,
    pub column: String,
}

impl Indicator {
    pub fn new(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column: column.into(),
        }
    }
}

/// `100 × part / total`, or 0 for an empty total.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        100.0 * part / total
    } else {
        0.0
    }
}

/// Distinct category labels of a column, in first-occurrence order.
pub fn distinct_values(ds: &Dataset, field: &str) -> IndexSet<String> {
    let f = ds.field(field);
    ds.records().iter().map(|r| r.get(f).category()).collect()
}

/// Count records per declared category, optionally crossed with a grouping field.
///
/// Ungrouped output has one bucket per declared category; grouped output has one per
/// `(category, group)` pair, category-major, groups in first-occurrence order. Unobserved
/// combinations are present with a count of zero. Records whose category is not declared
/// are not counted.
pub fn count_buckets(ds: &Dataset, fixed: &CategoryField, grouping: &GroupingSpec) -> Vec<Bucket> {
    let primary = ds.field(fixed.field());
    match grouping {
        GroupingSpec::Ungrouped => {
            let mut counts = vec![0u64; fixed.len()];
            for record in ds.records() {
                if let Some(i) = category_index(fixed, record.get(primary)) {
                    counts[i] += 1;
                }
            }
            fixed
                .categories()
                .zip(counts)
                .map(|(category, n)| Bucket::new(category, None, n as f64))
                .collect()
        }
        GroupingSpec::By(field) => {
            let secondary = ds.field(field);
            let groups = distinct_values(ds, field);
            let mut counts = vec![0u64; fixed.len() * groups.len()];
            for record in ds.records() {
                let Some(i) = category_index(fixed, record.get(primary)) else {
                    continue;
                };
                if let Some(j) = groups.get_index_of(&record.get(secondary).category()) {
                    counts[i * groups.len() + j] += 1;
                }
            }

            let mut out = Vec::with_capacity(counts.len());
            for (i, category) in fixed.categories().enumerate() {
                for (j, group) in groups.iter().enumerate() {
                    out.push(Bucket::new(
                        category,
                        Some(group.clone()),
                        counts[i * groups.len() + j] as f64,
                    ));
                }
            }
            out
        }
    }
}

fn category_index(fixed: &CategoryField, value: &Value) -> Option<usize> {
    match value {
        Value::Text(s) => fixed.index_of(s),
        other => fixed.index_of(&other.category()),
    }
}

/// Secondary labels of a grouped aggregation, in bucket order.
pub fn secondary_groups(buckets: &[Bucket]) -> IndexSet<String> {
    buckets.iter().filter_map(|b| b.secondary.clone()).collect()
}

/// Pie entries: declared categories (zero-filled) when ungrouped, otherwise one entry per
/// distinct value of the grouping field.
pub fn distribution(ds: &Dataset, fixed: &CategoryField, grouping: &GroupingSpec) -> Vec<Bucket> {
    match grouping {
        GroupingSpec::Ungrouped => count_buckets(ds, fixed, grouping),
        GroupingSpec::By(field) => {
            let f = ds.field(field);
            let mut counts: IndexMap<String, u64> = IndexMap::new();
            for record in ds.records() {
                *counts.entry(record.get(f).category()).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .map(|(key, n)| Bucket::new(key, None, n as f64))
                .collect()
        }
    }
}

/// Number of yes-answers per indicator for each group.
///
/// Groups come from `label` applied to the group column, in first-occurrence order; each
/// group gets one bucket per indicator, in indicator order.
pub fn indicator_counts_by_group<F>(
    ds: &Dataset,
    group_field: &str,
    indicators: &[Indicator],
    label: F,
) -> Vec<Bucket>
where
    F: Fn(&Value) -> String,
{
    let group = ds.field(group_field);
    let columns: Vec<_> = indicators.iter().map(|i| ds.field(&i.column)).collect();

    let mut totals: IndexMap<String, Vec<u64>> = IndexMap::new();
    for record in ds.records() {
        let row = totals
            .entry(label(record.get(group)))
            .or_insert_with(|| vec![0; indicators.len()]);
        for (slot, column) in row.iter_mut().zip(&columns) {
            if is_yes(record.get(*column)) {
                *slot += 1;
            }
        }
    }

    totals
        .into_iter()
        .flat_map(|(group, row)| {
            indicators.iter().zip(row).map(move |(indicator, n)| {
                Bucket::new(group.clone(), Some(indicator.label.clone()), n as f64)
            })
        })
        .collect()
}

/// Yes and No shares of a binary answer for each group, as percentages of the group size.
///
/// "No" is everything that is not a yes, so the two always add up to 100.
pub fn yes_no_percentages_by_group<F>(
    ds: &Dataset,
    group_field: &str,
    answer_field: &str,
    label: F,
) -> Vec<Bucket>
where
    F: Fn(&Value) -> String,
{
    let group = ds.field(group_field);
    let answer = ds.field(answer_field);

    let mut tallies: IndexMap<String, (u64, u64)> = IndexMap::new();
    for record in ds.records() {
        let (total, yes) = tallies.entry(label(record.get(group))).or_insert((0, 0));
        *total += 1;
        if is_yes(record.get(answer)) {
            *yes += 1;
        }
    }

    tallies
        .into_iter()
        .flat_map(|(group, (total, yes))| {
            let total = total as f64;
            let yes = yes as f64;
            [
                Bucket::new(group.clone(), Some("Yes".into()), percentage(yes, total)),
                Bucket::new(group, Some("No".into()), percentage(total - yes, total)),
            ]
        })
        .collect()
}

/// Largest bucket value, 0 for no buckets.
pub fn max_value(buckets: &[Bucket]) -> f64 {
    buckets.iter().map(|b| b.value).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq() -> CategoryField {
        CategoryField::new("freq", ["rarely", "often"]).unwrap()
    }

    #[test]
    fn category_field_rejects_duplicates_and_empty() {
        assert!(CategoryField::new("f", ["a", "a"]).is_err());
        assert!(CategoryField::new("f", Vec::<String>::new()).is_err());
    }

    #[test]
    fn ungrouped_zero_fills_and_skips_undeclared() {
        let ds = Dataset::from_text_rows(&["freq"], &[&["often"], &["never"], &["often"]])
            .unwrap();
        let b = count_buckets(&ds, &freq(), &GroupingSpec::Ungrouped);
        assert_eq!(
            b,
            vec![
                Bucket::new("rarely", None, 0.0),
                Bucket::new("often", None, 2.0)
            ]
        );
    }

    #[test]
    fn grouped_is_category_major_with_first_seen_groups() {
        let ds = Dataset::from_text_rows(
            &["freq", "g"],
            &[&["often", "b"], &["rarely", "a"], &["often", "a"]],
        )
        .unwrap();
        let b = count_buckets(&ds, &freq(), &GroupingSpec::By("g".into()));
        let keys: Vec<_> = b.iter().map(Bucket::key).collect();
        assert_eq!(keys, ["rarely/b", "rarely/a", "often/b", "often/a"]);
        let values: Vec<_> = b.iter().map(|b| b.value).collect();
        assert_eq!(values, [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            secondary_groups(&b).into_iter().collect::<Vec<_>>(),
            ["b", "a"]
        );
    }

    #[test]
    fn missing_group_values_form_their_own_group() {
        let ds = Dataset::new(
            vec!["freq".into(), "g".into()],
            vec![
                pulse_core::Record::new(vec![Value::Text("often".into()), Value::Missing]),
                pulse_core::Record::new(vec![
                    Value::Text("often".into()),
                    Value::Text("x".into()),
                ]),
            ],
        )
        .unwrap();
        let b = count_buckets(&ds, &freq(), &GroupingSpec::By("g".into()));
        assert_eq!(b.len(), 4);
        assert_eq!(b[2], Bucket::new("often", Some(String::new()), 1.0));
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn grouped_distribution_counts_each_distinct_value() {
        let ds = Dataset::from_text_rows(&["freq", "g"], &[&["x", "b"], &["y", "a"], &["z", "b"]])
            .unwrap();
        let d = distribution(&ds, &freq(), &GroupingSpec::By("g".into()));
        assert_eq!(
            d,
            vec![Bucket::new("b", None, 2.0), Bucket::new("a", None, 1.0)]
        );
        assert_eq!(max_value(&d), 2.0);
    }
}
