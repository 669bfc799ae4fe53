use docqa_hybrid::{reciprocal_rank_fusion, DEFAULT_RRF_K};

fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-6 }

#[test]
fn appearing_in_both_lists_beats_a_single_top_rank() {
    let semantic = vec!["x", "z", "p"];
    let lexical = vec!["y", "p", "x"];
    let fused = reciprocal_rank_fusion(&[semantic, lexical], DEFAULT_RRF_K, 10);

    let score_of = |key: &str| fused.iter().find(|(k, _)| *k == key).map(|(_, s)| *s).unwrap();
    assert!(close(score_of("x"), 1.0 / 60.0 + 1.0 / 62.0));
    assert!(close(score_of("y"), 1.0 / 60.0));
    assert!(score_of("x") > score_of("y"));
    assert_eq!(fused[0].0, "x");
}

#[test]
fn ties_keep_first_seen_order() {
    let fused = reciprocal_rank_fusion(&[vec![1, 2], vec![3, 4]], 60.0, 10);
    let keys: Vec<_> = fused.iter().map(|(k, _)| *k).collect();
    // 1 and 3 tie at 1/60, 2 and 4 at 1/61
    assert_eq!(keys, vec![1, 3, 2, 4]);
}

#[test]
fn duplicate_keys_count_once_per_list() {
    let fused = reciprocal_rank_fusion(&[vec!["a", "b", "a"]], 60.0, 10);
    assert_eq!(fused.len(), 2);
    assert!(close(fused[0].1, 1.0 / 60.0));
}

#[test]
fn output_is_truncated_and_empty_inputs_fuse_to_nothing() {
    let fused = reciprocal_rank_fusion(&[vec![1, 2, 3, 4], vec![5, 6]], 60.0, 3);
    assert_eq!(fused.len(), 3);
    assert!(reciprocal_rank_fusion::<u32>(&[vec![], vec![]], 60.0, 5).is_empty());
    assert!(reciprocal_rank_fusion(&[vec![1]], 60.0, 0).is_empty());
}

#[test]
fn constant_shifts_the_contribution() {
    let fused = reciprocal_rank_fusion(&[vec!["only"]], 1.0, 1);
    assert!(close(fused[0].1, 1.0));
}
