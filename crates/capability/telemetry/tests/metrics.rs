use hist_telemetry::{
    metrics, new_batch_id, record_batch, record_write_failure, record_write_skip,
    record_write_success,
};

#[test]
fn batch_ids_are_unique() {
    let first = new_batch_id();
    let second = new_batch_id();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_write_success();
    record_write_success();
    record_write_skip();
    record_write_failure();
    record_batch(12);
    let after = metrics().snapshot();

    assert!(after.write_success >= before.write_success + 2);
    assert!(after.write_skip > before.write_skip);
    assert!(after.write_failure > before.write_failure);
    assert!(after.batches > before.batches);
    assert!(after.batch_latency_ms_total >= before.batch_latency_ms_total + 12);
}
