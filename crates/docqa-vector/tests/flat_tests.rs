use docqa_core::traits::Embedder;
use docqa_core::Error;
use docqa_embed::HashingEmbedder;
use docqa_vector::{distance_to_similarity, FlatL2Index};

fn grid() -> FlatL2Index {
    let mut idx = FlatL2Index::new();
    idx.add(&[vec![0.0, 0.0], vec![3.0, 4.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    idx
}

#[test]
fn search_orders_by_squared_distance_then_row() {
    let idx = grid();
    let hits = idx.search(&[0.0, 0.0], 3).unwrap();
    assert_eq!(hits, vec![(0.0, 0), (1.0, 2), (1.0, 3)]);
}

#[test]
fn fewer_rows_than_k_returns_all() {
    let idx = grid();
    let hits = idx.search(&[3.0, 4.0], 10).unwrap();
    assert_eq!(hits.len(), 4);
    assert_eq!(hits[0], (0.0, 1));
    assert_eq!(hits[3], (25.0, 0));
}

#[test]
fn empty_index_and_zero_k_return_nothing() {
    let idx = FlatL2Index::new();
    assert!(idx.search(&[1.0, 2.0, 3.0], 5).unwrap().is_empty());
    assert!(grid().search(&[0.0, 0.0], 0).unwrap().is_empty());
}

#[test]
fn first_add_fixes_dimension() {
    let mut idx = grid();
    assert_eq!(idx.dim(), Some(2));
    let err = idx.add(&[vec![1.0, 1.0], vec![1.0, 1.0, 1.0]]).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 3 }));
    assert_eq!(idx.len(), 4, "rejected batch leaves no partial rows");

    let err = idx.search(&[1.0], 1).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 1 }));
}

#[test]
fn empty_batch_is_noop_and_zero_length_vectors_rejected() {
    let mut idx = FlatL2Index::new();
    idx.add(&[]).unwrap();
    assert!(idx.is_empty());
    assert_eq!(idx.dim(), None);
    assert!(matches!(idx.add(&[vec![]]), Err(Error::EmptyVector)));
}

#[test]
fn clear_resets_dimension() {
    let mut idx = grid();
    idx.clear();
    assert!(idx.is_empty());
    idx.add(&[vec![1.0, 2.0, 3.0]]).unwrap();
    assert_eq!(idx.row(0), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(idx.row(1), None);
}

#[test]
fn similarity_is_monotone_and_bounded() {
    assert_eq!(distance_to_similarity(0.0), 1.0);
    assert!(distance_to_similarity(0.5) > distance_to_similarity(2.0));
    assert!(distance_to_similarity(1e9) > 0.0);
}

#[test]
fn embedded_documents_find_themselves_first() {
    let embedder = HashingEmbedder::new(64);
    let texts = ["rainwater harvesting barrels", "solar charge controllers", "sourdough starter feeding"];
    let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed(t).unwrap()).collect();
    let mut idx = FlatL2Index::new();
    idx.add(&vectors).unwrap();
    for (row, v) in vectors.iter().enumerate() {
        let hits = idx.search(v, 1).unwrap();
        assert_eq!(hits[0].1, row);
        assert!(hits[0].0.abs() < 1e-6);
    }
}
