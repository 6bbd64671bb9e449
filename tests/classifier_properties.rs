use nearest_neighbors::knn::distance::distance_row;
use nearest_neighbors::{
    euclidean_distance, majority_vote, normalization, DistanceMatrix, KnnClassifier,
};
use proptest::prelude::*;

fn points(dimension: usize, count: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-1000.0f64..1000.0, dimension), count)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_distance_is_symmetric(
        a in prop::collection::vec(-1e6f64..1e6, 4),
        b in prop::collection::vec(-1e6f64..1e6, 4)
    ) {
        prop_assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
    }

    #[test]
    fn prop_distance_to_self_is_zero(a in prop::collection::vec(-1e6f64..1e6, 1..16)) {
        prop_assert_eq!(euclidean_distance(&a, &a), 0.0);
        let row = distance_row(&a, std::slice::from_ref(&a));
        prop_assert_eq!(row, vec![0.0]);
    }

    #[test]
    fn prop_distance_matrix_is_symmetric(a in points(3, 1..12), b in points(3, 1..12)) {
        let forward = DistanceMatrix::compute(&a, &b);
        let backward = DistanceMatrix::compute(&b, &a);
        prop_assert_eq!(forward.rows(), backward.cols());
        prop_assert_eq!(forward.cols(), backward.rows());
        for i in 0..a.len() {
            for j in 0..b.len() {
                prop_assert_eq!(forward.get(i, j), backward.get(j, i));
            }
        }
    }

    #[test]
    fn prop_k1_returns_training_label(reference in points(3, 1..30)) {
        let labels: Vec<usize> = (0..reference.len()).collect();
        let mut classifier = KnnClassifier::new();
        classifier.train(reference.clone(), labels).unwrap();
        let predicted = classifier.predict(&reference, 1).unwrap();
        for (i, label) in predicted.into_iter().enumerate() {
            // Exact duplicates resolve to the earliest copy.
            let first_copy = reference.iter().position(|r| r == &reference[i]).unwrap();
            prop_assert_eq!(label, first_copy);
        }
    }

    #[test]
    fn prop_predict_is_deterministic(
        reference in points(3, 5..40),
        queries in points(3, 1..10),
        k in 1usize..5
    ) {
        let labels: Vec<u8> = (0..reference.len()).map(|i| (i % 3) as u8).collect();
        let mut classifier = KnnClassifier::new();
        classifier.train(reference, labels).unwrap();
        let first = classifier.predict(&queries, k).unwrap();
        let second = classifier.predict(&queries, k).unwrap();
        prop_assert_eq!(first.len(), queries.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_parallel_matches_sequential(
        reference in points(2, 5..40),
        queries in points(2, 1..20),
        k in 1usize..5
    ) {
        let labels: Vec<u8> = (0..reference.len()).map(|i| (i % 4) as u8).collect();
        let mut sequential = KnnClassifier::new();
        sequential.train(reference.clone(), labels.clone()).unwrap();
        let mut parallel = KnnClassifier::new().with_parallel(true);
        parallel.train(reference, labels).unwrap();
        prop_assert_eq!(sequential.predict(&queries, k).unwrap(), parallel.predict(&queries, k).unwrap());
    }

    #[test]
    fn prop_vote_winner_has_maximal_count(labels in prop::collection::vec(0u8..5, 1..30)) {
        let winner = majority_vote(&labels).unwrap();
        let count = |l: u8| labels.iter().filter(|&&x| x == l).count();
        let best = count(winner);
        for &other in &labels {
            prop_assert!(count(other) <= best);
            if count(other) == best {
                prop_assert!(winner <= other);
            }
        }
    }

    #[test]
    fn prop_normalized_values_lie_in_unit_interval(data in points(3, 1..30)) {
        let (normalized, params) = normalization::fit_transform(&data).unwrap();
        for row in &normalized {
            for (d, &v) in row.iter().enumerate() {
                prop_assert!((0.0..=1.0).contains(&v), "dimension {} value {}", d, v);
            }
        }
        prop_assert_eq!(params.dimension(), 3);
    }
}
