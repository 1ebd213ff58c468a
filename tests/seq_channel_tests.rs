use pullseq::*;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

#[test]
fn test_from_channel_until_closed() {
    let (tx, rx) = mpsc::channel(4);
    let producer = thread::spawn(move || {
        for i in 0..10 {
            tx.blocking_send(i).unwrap();
        }
    });

    let out = from_channel(rx, CancellationToken::new()).to_vec();
    producer.join().unwrap();
    assert_eq!(out, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_from_channel_bounded_requests() {
    let (tx, rx) = mpsc::unbounded_channel();
    for i in 0..5 {
        tx.send(i).unwrap();
    }
    drop(tx);

    let mut seq = from_channel(rx, CancellationToken::new());
    assert_eq!(seq.next(Request::Count(2)), vec![0, 1]);
    assert_eq!(seq.next(Request::Count(2)), vec![2, 3]);
    assert_eq!(seq.next(Request::Count(2)), vec![4]);
    assert!(seq.next(ALL).is_empty());
}

#[test]
fn test_from_channel_through_stages() {
    let (tx, rx) = mpsc::unbounded_channel();
    for word in ["a", "bb", "a", "ccc", "bb"] {
        tx.send(word.to_string()).unwrap();
    }
    drop(tx);

    let out = from_channel(rx, CancellationToken::new()).uniq().map(|w| w.len()).to_vec();
    assert_eq!(out, vec![1, 2, 3]);
}

#[test]
fn test_from_channel_cancelled_while_waiting() {
    let (tx, rx) = mpsc::channel::<i32>(4);
    tx.blocking_send(1).unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        canceller.cancel();
    });

    // The sender stays open; only cancellation ends the drain
    let out = from_channel(rx, token).to_vec();
    handle.join().unwrap();
    assert_eq!(out, vec![1]);
    drop(tx);
}

#[test]
fn test_from_channel_already_cancelled() {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(1).unwrap();
    let token = CancellationToken::new();
    token.cancel();
    assert!(from_channel(rx, token).to_vec().is_empty());
}

#[tokio::test]
async fn test_to_channel() {
    let mut rx = range(0, 5).to_channel(CancellationToken::new());
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_to_buffered_channel() {
    let mut rx = from_vec((0..25).collect::<Vec<i32>>())
        .filter(|x| x % 2 == 0)
        .to_buffered_channel(CancellationToken::new(), 4);
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out, (0..25).filter(|x| x % 2 == 0).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_to_buffered_channel_exact_multiple() {
    // Upstream length divisible by the batch size still closes the channel
    let mut rx = range(0, 8).to_buffered_channel(CancellationToken::new(), 4);
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out.len(), 8);
}

#[tokio::test]
async fn test_to_channel_with_config() {
    let config = ChannelConfig::new().capacity(16).batch_size(3);
    let mut rx = range(0, 10).to_channel_with(CancellationToken::new(), config);
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out, (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_to_unbounded_channel() {
    let mut rx = from_vec(vec!["x", "y"]).to_unbounded_channel(CancellationToken::new());
    assert_eq!(rx.recv().await, Some("x"));
    assert_eq!(rx.recv().await, Some("y"));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_to_channel_cancellation_stops_unbounded_source() {
    let token = CancellationToken::new();
    let mut rx = repeat(7).to_channel(token.clone());

    for _ in 0..3 {
        assert_eq!(rx.recv().await, Some(7));
    }
    token.cancel();

    // At most the in-flight element can still arrive before the channel closes
    let mut tail = 0;
    while rx.recv().await.is_some() {
        tail += 1;
    }
    assert!(tail <= 2);
}

#[tokio::test]
async fn test_to_channel_stops_when_receiver_dropped() {
    let rx = repeat(1).to_channel(CancellationToken::new());
    drop(rx);
    // Nothing to assert beyond the background task finishing without hanging
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test]
async fn test_to_buffered_channel_closes_after_upstream_panic() {
    // Elements sent before the panic arrive; the receiver then sees a close
    let mut rx = range(0, 10)
        .map(|x| {
            if x == 5 {
                panic!("bad element");
            }
            x
        })
        .to_buffered_channel(CancellationToken::new(), 2);
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_to_unbounded_channel_closes_after_upstream_panic() {
    let mut rx = range(0, 100)
        .map(|x| {
            if x == 3 {
                panic!("bad element");
            }
            x
        })
        .to_unbounded_channel(CancellationToken::new());
    let mut out = Vec::new();
    while let Some(v) = rx.recv().await {
        out.push(v);
    }
    assert_eq!(out, vec![0, 1, 2]);
}
