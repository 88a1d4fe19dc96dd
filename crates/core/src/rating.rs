//! Rating statistics.

/// Lowest accepted rating score.
pub const MIN_SCORE: i32 = 1;

/// Highest accepted rating score.
pub const MAX_SCORE: i32 = 5;

/// Aggregate of the ratings attached to one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    /// Mean score rounded to two decimals; `None` when there are no ratings.
    pub average: Option<f64>,
    pub total: i64,
}

impl RatingStats {
    /// Build stats from a score sum and a count.
    pub fn from_totals(score_sum: i64, total: i64) -> Self {
        let average = (total > 0).then(|| round2(score_sum as f64 / total as f64));
        Self { average, total }
    }

    /// Build stats from individual scores.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0_i64, 0_i64), |(sum, count), s| (sum + i64::from(s), count + 1));
        Self::from_totals(sum, count)
    }

    /// Average for ordering purposes: "no ratings" ranks as zero.
    pub fn sort_key(&self) -> f64 {
        self.average.unwrap_or(0.0)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
