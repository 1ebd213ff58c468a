use pullseq::*;

fn pull_in_steps<S: Seq>(mut seq: S, step: usize) -> Vec<S::Item> {
    let mut out = Vec::new();
    loop {
        let batch = seq.next(Request::Count(step));
        let short = batch.len() < step;
        out.extend(batch);
        if short {
            return out;
        }
    }
}

#[test]
fn test_uniq() {
    assert_eq!(from_vec(vec![3, 1, 2, 3, 3, 5]).uniq().to_vec(), vec![3, 1, 2, 5]);
}

#[test]
fn test_dup() {
    assert_eq!(from_vec(vec![3, 1, 2, 3, 3, 5]).dup().to_vec(), vec![3]);
    assert_eq!(
        from_vec(vec![1, 2, 1, 2, 1, 3, 3]).dup().to_vec(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_uniq_incremental_matches_eager() {
    let data = vec![5, 1, 5, 2, 2, 9, 1, 7, 9, 0];
    let eager = from_vec(data.clone()).uniq().to_vec();
    for step in 1..5 {
        assert_eq!(pull_in_steps(from_vec(data.clone()).uniq(), step), eager);
    }
}

#[test]
fn test_dup_incremental_matches_eager() {
    let data = vec![5, 1, 5, 2, 2, 9, 1, 7, 9, 0, 5];
    let eager = from_vec(data.clone()).dup().to_vec();
    assert_eq!(eager, vec![5, 2, 1, 9]);
    for step in 1..5 {
        assert_eq!(pull_in_steps(from_vec(data.clone()).dup(), step), eager);
    }
}

#[test]
fn test_uniq_bounded_batches_are_full() {
    let mut seq = from_vec(vec![1, 1, 1, 2, 2, 3, 4]).uniq();
    assert_eq!(seq.next(Request::Count(3)), vec![1, 2, 3]);
    assert_eq!(seq.next(Request::Count(3)), vec![4]);
}

#[test]
fn test_uniq_by_projection() {
    let words = vec!["apple", "avocado", "banana", "blueberry", "cherry"];
    let out = from_vec(words).uniq_by(|w| w.chars().next()).to_vec();
    assert_eq!(out, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_dup_by_projection() {
    let out = from_vec(vec![10, 21, 12, 33, 14]).dup_by(|x| x % 2).to_vec();
    assert_eq!(out, vec![12, 33]);
}

#[test]
fn test_uniq_with_fast_path_config() {
    let config = FastPathConfig::new().capacity_ratio(2.0);
    let out = range(0, 100).map(|x| x % 7).uniq().with_fast_path(config).to_vec();
    assert_eq!(out, (0..7).collect::<Vec<_>>());
}

#[test]
fn test_uniq_over_unbounded_source() {
    let mut seq = from_iter((0..).map(|x| x / 3)).uniq();
    assert_eq!(seq.next(Request::Count(4)), vec![0, 1, 2, 3]);
}
