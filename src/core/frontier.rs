use crate::domain::model::{Frontier, FrontierPoint, Precision};

/// Sequence lengths are swept over `1..MAX_SEQ_LENGTH`.
pub const MAX_SEQ_LENGTH: u32 = 4096;
pub const MAX_BATCH_SIZE: f64 = 128.0;

/// Batch size that fits `available_gb` at `seq_length`, unclamped.
pub fn batch_size_at(available_gb: f64, per_token_gb: f64, seq_length: u32) -> f64 {
    available_gb / (seq_length as f64 * per_token_gb)
}

/// Keeps `(seq, batch)` pairs with `seq > 1` and `1 < batch <= 128`.
/// Batch size falls as sequence length grows, so the points come out
/// strictly decreasing.
pub fn generate_frontier(precision: Precision, available_gb: f64, per_token_gb: f64) -> Frontier {
    let points = if per_token_gb > 0.0 && available_gb > 0.0 {
        (1..MAX_SEQ_LENGTH)
            .map(|seq_length| FrontierPoint {
                seq_length,
                batch_size: batch_size_at(available_gb, per_token_gb, seq_length),
            })
            .filter(|p| p.batch_size <= MAX_BATCH_SIZE && p.batch_size > 1.0 && p.seq_length > 1)
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        "Frontier {}: {} points from {:.3} GB available",
        precision,
        points.len(),
        available_gb
    );

    Frontier {
        precision,
        available_memory_gb: available_gb,
        points,
    }
}

/// The line chart is only drawn when a token costs something and at least
/// one precision leaves memory over.
pub fn is_drawable(per_token_gb: f64, available: &[f64]) -> bool {
    per_token_gb > 0.0 && available.iter().any(|a| *a > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size_example() {
        let batch = batch_size_at(10.0, 0.001, 100);
        assert!((batch - 100.0).abs() < 1e-9);

        let frontier = generate_frontier(Precision::Fp16, 10.0, 0.001);
        let point = frontier
            .points
            .iter()
            .find(|p| p.seq_length == 100)
            .expect("seq 100 should be on the frontier");
        assert!((point.batch_size - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_stay_in_bounds_and_decrease() {
        let frontier = generate_frontier(Precision::Int4, 20.5, 0.000524288);
        assert!(!frontier.points.is_empty());
        assert!(frontier
            .points
            .iter()
            .all(|p| p.batch_size > 1.0 && p.batch_size <= MAX_BATCH_SIZE && p.seq_length > 1));
        assert!(frontier
            .points
            .windows(2)
            .all(|w| w[0].batch_size > w[1].batch_size && w[0].seq_length < w[1].seq_length));
        assert!(frontier.points.iter().all(|p| p.seq_length < MAX_SEQ_LENGTH));
    }

    #[test]
    fn test_batch_cap_excludes_short_sequences() {
        // seq 78 gives 128.2, seq 79 gives 126.6
        let frontier = generate_frontier(Precision::Fp16, 10.0, 0.001);
        assert_eq!(frontier.points.first().map(|p| p.seq_length), Some(79));
        // batch drops to 1 at seq 10000, past the sweep, so the last point is seq 4095
        assert_eq!(frontier.points.last().map(|p| p.seq_length), Some(4095));
    }

    #[test]
    fn test_no_memory_left_means_empty_frontier() {
        assert!(generate_frontier(Precision::Fp32, -4.0, 0.001).points.is_empty());
        assert!(generate_frontier(Precision::Fp32, 0.0, 0.001).points.is_empty());
        assert!(generate_frontier(Precision::Fp32, 10.0, 0.0).points.is_empty());
    }

    #[test]
    fn test_is_drawable() {
        assert!(is_drawable(0.001, &[-3.0, 2.0]));
        assert!(!is_drawable(0.001, &[-3.0, -1.0]));
        assert!(!is_drawable(0.0, &[5.0]));
    }
}
