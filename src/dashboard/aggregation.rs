//! Derived views over a ledger snapshot.
//!
//! Provides the headline statistics, the status distribution and the
//! time-bucketed volume/risk series shown on the dashboard.

use crate::transaction::{Transaction, TransactionStatus};

/// The number of buckets in the volume/risk series.
pub const BUCKET_COUNT: usize = 12;

/// The width of each bucket in hours.
pub const BUCKET_HOURS: i64 = 2;

const BUCKET_MILLIS: i64 = BUCKET_HOURS * 60 * 60 * 1000;

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateStats {
    pub total_count: usize,
    pub fraud_count: usize,
    pub flagged_count: usize,
    /// The sum of all transaction amounts.
    pub total_volume: f64,
    /// The mean risk score, zero for an empty ledger.
    pub average_risk_score: f64,
}

impl AggregateStats {
    /// The share of transactions classified as fraud as a percentage, zero
    /// for an empty ledger.
    pub fn fraud_rate(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.fraud_count as f64 / self.total_count as f64 * 100.0
        }
    }
}

/// Calculate the headline statistics for `transactions`.
pub fn calculate_aggregate_stats(transactions: &[Transaction]) -> AggregateStats {
    let total_count = transactions.len();
    let count_status = |status| {
        transactions
            .iter()
            .filter(|transaction| transaction.status == status)
            .count()
    };
    let total_volume = transactions.iter().map(|transaction| transaction.amount).sum();
    let total_risk: f64 = transactions
        .iter()
        .map(|transaction| transaction.risk_score)
        .sum();

    AggregateStats {
        total_count,
        fraud_count: count_status(TransactionStatus::Fraud),
        flagged_count: count_status(TransactionStatus::Flagged),
        total_volume,
        average_risk_score: total_risk / total_count.max(1) as f64,
    }
}

/// How many transactions ended up with each terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusDistribution {
    pub approved: usize,
    pub fraud: usize,
    pub flagged: usize,
}

impl StatusDistribution {
    pub fn total(&self) -> usize {
        self.approved + self.fraud + self.flagged
    }
}

/// Count the transactions in each terminal status.
pub fn calculate_status_distribution(transactions: &[Transaction]) -> StatusDistribution {
    let count_status = |status| {
        transactions
            .iter()
            .filter(|transaction| transaction.status == status)
            .count()
    };

    StatusDistribution {
        approved: count_status(TransactionStatus::Approved),
        fraud: count_status(TransactionStatus::Fraud),
        flagged: count_status(TransactionStatus::Flagged),
    }
}

/// The accumulated volume and peak risk of one time window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeBucket {
    /// How many hours before now the window starts.
    pub hours_ago: i64,
    pub volume: f64,
    pub max_risk_score: f64,
}

/// The index of the bucket that `timestamp` falls into.
///
/// Buckets are [BUCKET_HOURS] wide and counted backwards from `now`, so bucket
/// zero holds the most recent transactions. Timestamps older than a day, or in
/// the future, wrap around modulo [BUCKET_COUNT].
pub fn bucket_index(timestamp: i64, now: i64) -> usize {
    // The difference of two i64 values always fits in an i128.
    let elapsed = i128::from(now) - i128::from(timestamp);

    elapsed
        .div_euclid(i128::from(BUCKET_MILLIS))
        .rem_euclid(BUCKET_COUNT as i128) as usize
}

/// Partition `transactions` into two-hour windows across the last day.
///
/// Each bucket accumulates the sum of the amounts and the maximum risk score
/// of the transactions assigned to it.
pub fn calculate_volume_risk_series(
    transactions: &[Transaction],
    now: i64,
) -> [TimeBucket; BUCKET_COUNT] {
    let mut buckets: [TimeBucket; BUCKET_COUNT] = std::array::from_fn(|index| TimeBucket {
        hours_ago: index as i64 * BUCKET_HOURS,
        ..Default::default()
    });

    for transaction in transactions {
        let bucket = &mut buckets[bucket_index(transaction.timestamp, now)];
        bucket.volume += transaction.amount;
        bucket.max_risk_score = bucket.max_risk_score.max(transaction.risk_score);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use crate::transaction::{Transaction, TransactionId, TransactionStatus};

    use super::{
        AggregateStats, BUCKET_COUNT, StatusDistribution, bucket_index,
        calculate_aggregate_stats, calculate_status_distribution, calculate_volume_risk_series,
    };

    const HOUR: i64 = 60 * 60 * 1000;
    const NOW: i64 = 1_700_000_000_000;

    fn create_test_transaction(
        amount: f64,
        risk_score: f64,
        status: TransactionStatus,
        timestamp: i64,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new_random(),
            timestamp,
            amount,
            merchant: "Merchant".to_owned(),
            location: "Somewhere".to_owned(),
            v1: 0.0,
            v2: 0.0,
            v3: 0.0,
            status,
            risk_score,
            analysis: None,
        }
    }

    #[test]
    fn aggregate_stats_on_empty_ledger_are_zero() {
        let stats = calculate_aggregate_stats(&[]);

        assert_eq!(stats, AggregateStats::default());
        assert_eq!(stats.average_risk_score, 0.0);
        assert_eq!(stats.fraud_rate(), 0.0);
    }

    #[test]
    fn aggregate_stats_sum_and_average() {
        let transactions = vec![
            create_test_transaction(100.0, 10.0, TransactionStatus::Approved, NOW),
            create_test_transaction(50.0, 90.0, TransactionStatus::Fraud, NOW),
            create_test_transaction(25.5, 50.0, TransactionStatus::Flagged, NOW),
            create_test_transaction(0.5, 30.0, TransactionStatus::Fraud, NOW),
        ];

        let stats = calculate_aggregate_stats(&transactions);

        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.fraud_count, 2);
        assert_eq!(stats.flagged_count, 1);
        assert_eq!(stats.total_volume, 176.0);
        assert_eq!(stats.average_risk_score, 45.0);
        assert_eq!(stats.fraud_rate(), 50.0);
    }

    #[test]
    fn status_distribution_on_empty_ledger_is_zero() {
        assert_eq!(calculate_status_distribution(&[]), StatusDistribution::default());
    }

    #[test]
    fn status_distribution_sums_to_ledger_length() {
        let statuses = [
            TransactionStatus::Approved,
            TransactionStatus::Fraud,
            TransactionStatus::Flagged,
            TransactionStatus::Approved,
            TransactionStatus::Approved,
            TransactionStatus::Flagged,
        ];
        let transactions: Vec<_> = statuses
            .iter()
            .map(|status| create_test_transaction(1.0, 1.0, *status, NOW))
            .collect();

        let distribution = calculate_status_distribution(&transactions);

        assert_eq!(
            distribution,
            StatusDistribution {
                approved: 3,
                fraud: 1,
                flagged: 2
            }
        );
        assert_eq!(distribution.total(), transactions.len());
    }

    #[test]
    fn bucket_index_is_pinned_for_fixed_timestamps() {
        assert_eq!(bucket_index(NOW, NOW), 0);
        assert_eq!(bucket_index(NOW - HOUR, NOW), 0);
        assert_eq!(bucket_index(NOW - 2 * HOUR, NOW), 1);
        assert_eq!(bucket_index(NOW - 2 * HOUR + 1, NOW), 0);
        assert_eq!(bucket_index(NOW - 23 * HOUR, NOW), 11);
        // Older than a day wraps around.
        assert_eq!(bucket_index(NOW - 24 * HOUR, NOW), 0);
        assert_eq!(bucket_index(NOW - 27 * HOUR, NOW), 1);
        // Timestamps slightly in the future wrap to the last bucket.
        assert_eq!(bucket_index(NOW + HOUR, NOW), 11);
    }

    #[test]
    fn bucket_index_handles_extreme_timestamps() {
        assert_eq!(bucket_index(i64::MIN, NOW), 2);
        assert_eq!(bucket_index(i64::MAX, NOW), 7);
        assert!(bucket_index(i64::MIN, i64::MAX) < BUCKET_COUNT);
        assert!(bucket_index(i64::MAX, i64::MIN) < BUCKET_COUNT);
    }

    #[test]
    fn series_with_extreme_timestamps_does_not_panic() {
        let transactions = vec![
            create_test_transaction(10.0, 20.0, TransactionStatus::Approved, i64::MIN),
            create_test_transaction(30.0, 80.0, TransactionStatus::Fraud, i64::MAX),
        ];

        let series = calculate_volume_risk_series(&transactions, NOW);

        assert_eq!(series[2].volume, 10.0);
        assert_eq!(series[7].volume, 30.0);
        assert_eq!(series[7].max_risk_score, 80.0);
    }

    #[test]
    fn bucketing_is_deterministic() {
        let transactions: Vec<_> = (0..50)
            .map(|i| {
                create_test_transaction(
                    i as f64,
                    i as f64,
                    TransactionStatus::Approved,
                    NOW - i * HOUR,
                )
            })
            .collect();

        let first = calculate_volume_risk_series(&transactions, NOW);
        let second = calculate_volume_risk_series(&transactions, NOW);

        assert_eq!(first, second);
    }

    #[test]
    fn series_accumulates_volume_and_peak_risk() {
        let transactions = vec![
            create_test_transaction(100.0, 20.0, TransactionStatus::Approved, NOW - HOUR / 2),
            create_test_transaction(50.0, 80.0, TransactionStatus::Fraud, NOW - HOUR),
            create_test_transaction(10.0, 45.0, TransactionStatus::Flagged, NOW - 5 * HOUR),
        ];

        let series = calculate_volume_risk_series(&transactions, NOW);

        assert_eq!(series.len(), BUCKET_COUNT);
        assert_eq!(series[0].hours_ago, 0);
        assert_eq!(series[0].volume, 150.0);
        assert_eq!(series[0].max_risk_score, 80.0);
        assert_eq!(series[2].hours_ago, 4);
        assert_eq!(series[2].volume, 10.0);
        assert_eq!(series[2].max_risk_score, 45.0);
        assert_eq!(series[11].hours_ago, 22);

        let total_volume: f64 = series.iter().map(|bucket| bucket.volume).sum();
        assert_eq!(total_volume, 160.0);
    }

    #[test]
    fn series_on_empty_ledger_is_all_zero() {
        let series = calculate_volume_risk_series(&[], NOW);

        assert!(
            series
                .iter()
                .all(|bucket| bucket.volume == 0.0 && bucket.max_risk_score == 0.0)
        );
    }
}
