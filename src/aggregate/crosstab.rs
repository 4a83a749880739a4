//! Count tables over buckets and labels

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{AggregateRow, Bucket, SentimentLabel};

/// Number of tweets carrying one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: SentimentLabel,
    pub count: usize,
}

/// Complete bucket × label cross tabulation
///
/// Every pair of `B::ALL` and [`SentimentLabel::ALL`] is present, zero
/// counts included, ordered by bucket then label.
pub fn cross_tab<B, I>(pairs: I) -> Vec<AggregateRow<B>>
where
    B: Bucket,
    I: IntoIterator<Item = (B, SentimentLabel)>,
{
    let mut counts: BTreeMap<(B, SentimentLabel), usize> = BTreeMap::new();
    for pair in pairs {
        *counts.entry(pair).or_insert(0) += 1;
    }

    B::ALL
        .iter()
        .flat_map(|&category| {
            SentimentLabel::ALL.iter().map(move |&label| (category, label))
        })
        .map(|(category, label)| AggregateRow {
            category,
            label,
            count: counts.get(&(category, label)).copied().unwrap_or(0),
        })
        .collect()
}

/// Count of each label, all three always present
pub fn label_distribution<I>(labels: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = SentimentLabel>,
{
    let mut counts = [0usize; 3];
    for label in labels {
        counts[label_index(label)] += 1;
    }

    SentimentLabel::ALL
        .iter()
        .map(|&label| LabelCount {
            label,
            count: counts[label_index(label)],
        })
        .collect()
}

fn label_index(label: SentimentLabel) -> usize {
    match label {
        SentimentLabel::Positive => 0,
        SentimentLabel::Neutral => 1,
        SentimentLabel::Negative => 2,
    }
}

/// Sum of counts in a table
pub fn total<B>(rows: &[AggregateRow<B>]) -> usize {
    rows.iter().map(|r| r.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Season};

    #[test]
    fn test_cross_tab_is_complete() {
        let pairs = vec![
            (Category::Daytime, SentimentLabel::Positive),
            (Category::Daytime, SentimentLabel::Positive),
            (Category::Overnight, SentimentLabel::Negative),
        ];
        let table = cross_tab(pairs);

        assert_eq!(table.len(), 9);
        assert_eq!(total(&table), 3);

        assert_eq!(table[0].category, Category::Overnight);
        assert_eq!(table[0].label, SentimentLabel::Positive);
        assert_eq!(table[0].count, 0);
        assert_eq!(table[2].count, 1);
        assert_eq!(table[3].category, Category::Daytime);
        assert_eq!(table[3].count, 2);
        assert_eq!(table[8].category, Category::Nighttime);
        assert_eq!(table[8].label, SentimentLabel::Negative);
    }

    #[test]
    fn test_empty_input_gives_zero_table() {
        let table = cross_tab(Vec::<(Category, SentimentLabel)>::new());

        assert_eq!(table.len(), 9);
        assert!(table.iter().all(|r| r.count == 0));
    }

    #[test]
    fn test_season_table() {
        let table = cross_tab(vec![(Season::Autumn, SentimentLabel::Neutral)]);

        assert_eq!(table.len(), 12);
        assert_eq!(table[10].category, Season::Autumn);
        assert_eq!(table[10].label, SentimentLabel::Neutral);
        assert_eq!(table[10].count, 1);
    }

    #[test]
    fn test_label_distribution() {
        let counts = label_distribution(vec![
            SentimentLabel::Negative,
            SentimentLabel::Negative,
            SentimentLabel::Positive,
        ]);

        assert_eq!(
            counts,
            vec![
                LabelCount { label: SentimentLabel::Positive, count: 1 },
                LabelCount { label: SentimentLabel::Neutral, count: 0 },
                LabelCount { label: SentimentLabel::Negative, count: 2 },
            ]
        );
    }
}
