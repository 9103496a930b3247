use super::*;

#[test]
fn sequential_and_parallel_preserve_order() {
    let items: Vec<u32> = (0..32).collect();
    let seq = run_batch(&items, &BatchThreading::default(), |_, x| x * 2).unwrap();
    let par = run_batch(
        &items,
        &BatchThreading {
            parallel: true,
            threads: Some(3),
        },
        |_, x| x * 2,
    )
    .unwrap();
    assert_eq!(seq, par);
    assert_eq!(seq[31], 62);
}

#[test]
fn zero_threads_is_rejected() {
    let items = vec![1, 2, 3];
    let threading = BatchThreading {
        parallel: true,
        threads: Some(0),
    };
    assert!(run_batch(&items, &threading, |_, x| *x).is_err());
}

#[test]
fn failures_become_statuses() {
    let st = failed("a.png", &MediaError::decode("truncated"));
    assert!(st.is_failed());
    assert_eq!(st, AssetStatus::Failed("decode failure: truncated".to_string()));
    assert!(!AssetStatus::Ready.is_failed());
}
