use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Result of a full batch K-means run.
#[derive(Debug, Clone)]
pub struct KmeansResult {
    /// Cluster index of each input point, in input order.
    pub assignments: Vec<usize>,
    /// Final centroid vectors, indexed by cluster.
    pub centroids: Vec<Vec<f64>>,
    /// Number of clusters.
    pub k: usize,
    /// Number of Lloyd's iterations performed.
    pub iterations: usize,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

impl KmeansResult {
    /// Indices of the points assigned to `cluster`, in input order.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == cluster)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Run Lloyd's K-means algorithm once.
///
/// Centroids are seeded with K-means++ sampling drawn from a `StdRng`
/// seeded with `seed`, so the same input and seed always give the same
/// result. Iterates until assignments stabilize or `max_iterations` is
/// reached.
///
/// # Panics
/// Panics if `k` is 0, `points` is empty, or `k > points.len()`.
pub fn kmeans(points: &[Vec<f64>], k: usize, max_iterations: usize, seed: u64) -> KmeansResult {
    assert!(!points.is_empty(), "kmeans: points must not be empty");
    assert!(k >= 1, "kmeans: k must be at least 1");
    assert!(k <= points.len(), "kmeans: k must be <= number of points");

    let dim = points[0].len();
    let n = points.len();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = kmeanspp_init(points, k, &mut rng);

    let mut assignments = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;

        let mut changed = false;
        for (i, vec) in points.iter().enumerate() {
            let nearest = nearest_centroid(vec, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        if !changed && iterations > 1 {
            break;
        }

        let mut new_centroids = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];

        for (vec, &cluster) in points.iter().zip(&assignments) {
            counts[cluster] += 1;
            for (j, &val) in vec.iter().enumerate() {
                new_centroids[cluster][j] += val;
            }
        }

        for (c, centroid) in new_centroids.iter_mut().enumerate() {
            if counts[c] > 0 {
                let count = counts[c] as f64;
                for val in centroid.iter_mut() {
                    *val /= count;
                }
            } else {
                // Empty cluster: keep previous centroid.
                centroid.clone_from(&centroids[c]);
            }
        }

        centroids = new_centroids;
    }

    let inertia = points
        .iter()
        .zip(&assignments)
        .map(|(vec, &cluster)| squared_euclidean(vec, &centroids[cluster]))
        .sum();

    KmeansResult {
        assignments,
        centroids,
        k,
        iterations,
        inertia,
    }
}

/// Run K-means `restarts` times and keep the lowest-inertia result.
///
/// Restart `r` is seeded with `seed + r`. Restarts run in parallel but the
/// winner is chosen in restart order, so ties go to the earliest restart
/// and the outcome does not depend on thread scheduling.
pub fn kmeans_best_of(
    points: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    seed: u64,
    restarts: usize,
) -> KmeansResult {
    let first = kmeans(points, k, max_iterations, seed);
    let rest: Vec<KmeansResult> = (1..restarts as u64)
        .into_par_iter()
        .map(|r| kmeans(points, k, max_iterations, seed.wrapping_add(r)))
        .collect();

    rest.into_iter()
        .fold(first, |best, run| if run.inertia < best.inertia { run } else { best })
}

/// K-means++ initialization: the first centroid is a uniformly random point,
/// each following one is sampled with probability proportional to its
/// squared distance from the nearest centroid chosen so far.
fn kmeanspp_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut min_dists: Vec<f64> = points
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();

    for _ in 1..k {
        let total: f64 = min_dists.iter().sum();
        let idx = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = n - 1;
            for (i, &d) in min_dists.iter().enumerate() {
                cumulative += d;
                if cumulative > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // Every point coincides with a centroid.
            rng.gen_range(0..n)
        };

        let centroid = points[idx].clone();
        for (d, p) in min_dists.iter_mut().zip(points) {
            *d = d.min(squared_euclidean(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Find the index of the nearest centroid. Ties go to the lowest index.
pub fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}

/// Squared Euclidean distance.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate points around the given centers, `per_cluster` each, with a
    /// small deterministic spread.
    fn make_clusters(centers: &[(f64, f64)], per_cluster: usize) -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        for &(cx, cy) in centers {
            for i in 0..per_cluster {
                let offset = (i as f64) * 0.1;
                points.push(vec![cx + offset, cy - offset]);
            }
        }
        points
    }

    #[test]
    fn kmeans_two_clusters() {
        let points = make_clusters(&[(0.0, 0.0), (100.0, 100.0)], 10);
        let result = kmeans_best_of(&points, 2, 100, 42, 5);

        assert_eq!(result.k, 2);
        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.assignments.len(), 20);

        let c0 = result.assignments[0];
        assert!(result.assignments[..10].iter().all(|&c| c == c0));
        let c1 = result.assignments[10];
        assert!(result.assignments[10..].iter().all(|&c| c == c1));
        assert_ne!(c0, c1);
    }

    #[test]
    fn kmeans_single_cluster() {
        let points = make_clusters(&[(5.0, 5.0)], 20);
        let result = kmeans(&points, 1, 100, 42);

        assert_eq!(result.k, 1);
        assert_eq!(result.centroids.len(), 1);
        assert!(result.assignments.iter().all(|&c| c == 0));
    }

    #[test]
    fn kmeans_three_clusters() {
        let points = make_clusters(&[(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)], 15);
        let result = kmeans_best_of(&points, 3, 100, 42, 10);

        let groups: Vec<usize> = (0..3).map(|g| result.assignments[g * 15]).collect();
        for (g, &cluster) in groups.iter().enumerate() {
            assert!(result.assignments[g * 15..(g + 1) * 15]
                .iter()
                .all(|&c| c == cluster));
        }
        assert_ne!(groups[0], groups[1]);
        assert_ne!(groups[1], groups[2]);
        assert_ne!(groups[0], groups[2]);
    }

    #[test]
    fn same_seed_same_result() {
        let points = make_clusters(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0)], 8);
        let a = kmeans_best_of(&points, 3, 100, 7, 4);
        let b = kmeans_best_of(&points, 3, 100, 7, 4);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn best_of_is_never_worse_than_first_restart() {
        let points = make_clusters(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)], 6);
        let single = kmeans(&points, 4, 100, 42);
        let best = kmeans_best_of(&points, 4, 100, 42, 10);
        assert!(best.inertia <= single.inertia);
    }

    #[test]
    fn kmeans_converges_quickly_on_separable_data() {
        let points = make_clusters(&[(0.0, 0.0), (1000.0, 1000.0)], 5);
        let result = kmeans_best_of(&points, 2, 100, 42, 3);
        assert!(result.iterations <= 5, "iterations: {}", result.iterations);
    }

    #[test]
    fn identical_points_do_not_break_init() {
        let points = vec![vec![1.0, 1.0]; 4];
        let result = kmeans(&points, 3, 10, 42);
        assert_eq!(result.centroids.len(), 3);
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn members_lists_points_in_order() {
        let result = KmeansResult {
            assignments: vec![1, 0, 1, 1],
            centroids: vec![vec![0.0], vec![1.0]],
            k: 2,
            iterations: 1,
            inertia: 0.0,
        };
        assert_eq!(result.members(1), vec![0, 2, 3]);
        assert_eq!(result.members(0), vec![1]);
    }

    #[test]
    fn kmeanspp_init_picks_spread_centroids() {
        let points = make_clusters(&[(0.0, 0.0), (100.0, 100.0)], 5);
        let mut rng = StdRng::seed_from_u64(42);
        let centroids = kmeanspp_init(&points, 2, &mut rng);

        assert_eq!(centroids.len(), 2);
        let dist = squared_euclidean(&centroids[0], &centroids[1]);
        assert!(dist > 1000.0, "centroids too close: dist²={}", dist);
    }

    #[test]
    #[should_panic(expected = "points must not be empty")]
    fn kmeans_panics_on_empty() {
        let points: Vec<Vec<f64>> = Vec::new();
        kmeans(&points, 1, 10, 0);
    }

    #[test]
    #[should_panic(expected = "k must be at least 1")]
    fn kmeans_panics_on_zero_k() {
        kmeans(&[vec![1.0]], 0, 10, 0);
    }

    #[test]
    #[should_panic(expected = "k must be <= number of points")]
    fn kmeans_panics_on_k_greater_than_n() {
        kmeans(&[vec![1.0], vec![2.0]], 3, 10, 0);
    }
}
