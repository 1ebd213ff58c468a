use pullseq::*;
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_from_vec_round_trip() {
    let data = vec![5, 3, 8, 1];
    assert_eq!(from_vec(data.clone()).to_vec(), data);
}

#[test]
fn test_from_vec_batches() {
    let mut seq = from_vec(vec![1, 2, 3, 4, 5]);
    assert_eq!(seq.next(Request::Count(2)), vec![1, 2]);
    assert_eq!(seq.remaining(), 3);
    assert_eq!(seq.next(Request::Count(10)), vec![3, 4, 5]);
    assert_eq!(seq.remaining(), 0);
    assert!(seq.next(Request::Count(1)).is_empty());
}

#[test]
fn test_from_vec_zero_request() {
    let mut seq = from_vec(vec![1]);
    assert!(seq.next(Request::Count(0)).is_empty());
    assert_eq!(seq.remaining(), 1);
}

#[test]
fn test_from_slice_leaves_input_untouched() {
    let data = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let mut seq = from_slice(&data);
    assert_eq!(seq.next(Request::Count(2)), vec!["a", "b"]);
    assert_eq!(seq.remaining(), 1);
    assert_eq!(seq.next(ALL), vec!["c"]);
    assert_eq!(data.len(), 3);
}

#[test]
fn test_from_iter_pulls_lazily() {
    let mut pulled = 0;
    {
        let mut seq = from_iter((0..).inspect(|_| pulled += 1));
        assert_eq!(seq.next(Request::Count(3)), vec![0, 1, 2]);
    }
    assert_eq!(pulled, 3);
}

#[test]
fn test_empty_and_once() {
    assert!(empty::<i32>().to_vec().is_empty());

    let mut one = once(42);
    assert!(one.next(Request::Count(0)).is_empty());
    assert_eq!(one.next(Request::Count(5)), vec![42]);
    assert!(one.next(ALL).is_empty());
}

#[test]
fn test_repeat_serves_any_count() {
    let mut seq = repeat("x");
    assert_eq!(seq.next(Request::Count(3)), vec!["x", "x", "x"]);
    assert_eq!(seq.next(Request::Count(1)), vec!["x"]);
    assert!(seq.is_unbounded());
}

#[test]
fn test_range() {
    assert_eq!(range(0, 5).to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(range(0, 5).remaining(), 5);
    assert!(range(5, 5).to_vec().is_empty());
}

#[test]
fn test_range_wrong_direction_is_empty() {
    assert!(range(5, 1).to_vec().is_empty());
    let down = assert_ok!(range_with_step(0, 10, -1));
    assert!(down.to_vec().is_empty());
}

#[test]
fn test_range_with_step() {
    let seq = assert_ok!(range_with_step(0, 10, 3));
    assert_eq!(seq.to_vec(), vec![0, 3, 6, 9]);

    let seq = assert_ok!(range_with_step(10, 0, -4));
    assert_eq!(seq.to_vec(), vec![10, 6, 2]);

    let seq = assert_ok!(range_with_step(0.0, 1.0, 0.25));
    assert_eq!(seq.to_vec(), vec![0.0, 0.25, 0.5, 0.75]);
}

#[test]
fn test_range_zero_step_is_rejected() {
    let err = assert_err!(range_with_step(0, 10, 0));
    assert!(matches!(err, SeqError::InvalidArgument(_)));
}

#[test]
fn test_range_in_batches() {
    let mut seq = range(1u64, 8);
    assert_eq!(seq.next(Request::Count(3)), vec![1, 2, 3]);
    assert_eq!(seq.next(Request::Count(3)), vec![4, 5, 6]);
    assert_eq!(seq.next(Request::Count(3)), vec![7]);
    assert!(seq.next(ALL).is_empty());
}

#[test]
fn test_range_near_i64_max() {
    let seq = range(i64::MAX - 2000, i64::MAX);
    assert_eq!(seq.remaining(), 2000);
    let all = seq.to_vec();
    assert_eq!(all.len(), 2000);
    assert_eq!(all.first(), Some(&(i64::MAX - 2000)));
    assert_eq!(all.last(), Some(&(i64::MAX - 1)));
}

#[test]
fn test_range_near_u64_max() {
    assert_eq!(range(u64::MAX - 1, u64::MAX).to_vec(), vec![u64::MAX - 1]);

    let seq = assert_ok!(range_with_step(u64::MAX - 10, u64::MAX, 4));
    assert_eq!(seq.to_vec(), vec![u64::MAX - 10, u64::MAX - 6, u64::MAX - 2]);
}

#[test]
fn test_range_down_to_i64_min() {
    let seq = assert_ok!(range_with_step(i64::MIN + 7, i64::MIN, -2));
    assert_eq!(
        seq.to_vec(),
        vec![i64::MIN + 7, i64::MIN + 5, i64::MIN + 3, i64::MIN + 1]
    );
}

#[test]
fn test_range_across_full_i64_span() {
    // Each step lands within one stride of the type limits without passing them
    let seq = assert_ok!(range_with_step(i64::MIN, i64::MAX, i64::MAX));
    assert_eq!(seq.to_vec(), vec![i64::MIN, -1, i64::MAX - 1]);

    let seq = assert_ok!(range_with_step(i64::MAX, i64::MIN, i64::MIN));
    assert_eq!(seq.to_vec(), vec![i64::MAX, -1]);
}
