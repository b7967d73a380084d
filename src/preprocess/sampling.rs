//! Random subsampling of edge coordinates.

use rand::seq::index;
use rand::Rng;

/// Keep at most `max_points` points, chosen uniformly without replacement.
///
/// Clouds that already fit are returned unchanged and in order.
pub fn subsample<R: Rng + ?Sized>(
    points: Vec<[f64; 2]>,
    max_points: usize,
    rng: &mut R,
) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points;
    }
    index::sample(rng, points.len(), max_points)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn grid(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [(i / 10) as f64, (i % 10) as f64]).collect()
    }

    #[test]
    fn test_small_cloud_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let pts = grid(20);
        assert_eq!(subsample(pts.clone(), 20, &mut rng), pts);
        assert_eq!(subsample(pts.clone(), 50, &mut rng), pts);
    }

    #[test]
    fn test_sample_is_distinct_subset() {
        let mut rng = StdRng::seed_from_u64(42);
        let pts = grid(500);
        let sample = subsample(pts.clone(), 100, &mut rng);

        assert_eq!(sample.len(), 100);
        let keys: HashSet<(u64, u64)> = sample
            .iter()
            .map(|p| (p[0].to_bits(), p[1].to_bits()))
            .collect();
        assert_eq!(keys.len(), 100, "sampling must not repeat points");
        assert!(sample.iter().all(|p| pts.contains(p)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let pts = grid(300);
        let a = subsample(pts.clone(), 30, &mut StdRng::seed_from_u64(9));
        let b = subsample(pts, 30, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
