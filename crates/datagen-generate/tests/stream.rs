use std::sync::Arc;
use std::time::Duration;

use datagen_core::Value;
use datagen_generate::{GeneratorCatalog, StreamOptions, StreamRunner};
use datagen_spec::{DatasetSpec, FieldSpec, SplitDescriptor};

fn descriptor(records_per_split: u64) -> SplitDescriptor {
    let spec = DatasetSpec::new(
        1,
        records_per_split,
        vec![FieldSpec::new("id", "sequential_long", 0, None)],
        None,
        Some(21),
    );
    SplitDescriptor::new(Arc::new(spec), 0)
}

#[tokio::test]
async fn bounded_stream_replays_the_split() {
    let options = StreamOptions {
        pause: Duration::from_millis(1),
        channel_capacity: 4,
        max_cycles: Some(3),
    };
    let mut handle = StreamRunner::spawn(Arc::new(GeneratorCatalog::new()), descriptor(5), options);

    let mut ids = Vec::new();
    while let Some(record) = handle.records.recv().await {
        ids.push(record.values()[0].clone());
    }
    assert_eq!(ids.len(), 15);
    assert_eq!(ids[0], Value::Long(0));
    assert_eq!(ids[5], Value::Long(0));
    assert_eq!(ids[..5], ids[10..]);

    let summary = handle.join().await.expect("stream summary");
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.records, 15);
}

#[tokio::test(start_paused = true)]
async fn stop_ends_an_unbounded_stream() {
    let options = StreamOptions {
        pause: Duration::from_secs(60),
        ..StreamOptions::default()
    };
    let mut handle = StreamRunner::spawn(Arc::new(GeneratorCatalog::new()), descriptor(2), options);

    for _ in 0..2 {
        handle.records.recv().await.expect("record");
    }
    handle.stop();

    let summary = handle.join().await.expect("stream summary");
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.records, 2);
}

#[tokio::test]
async fn dropping_the_consumer_ends_the_stream() {
    let options = StreamOptions {
        pause: Duration::ZERO,
        channel_capacity: 1,
        max_cycles: None,
    };
    let handle = StreamRunner::spawn(Arc::new(GeneratorCatalog::new()), descriptor(10), options);

    let summary = tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .expect("stream ends")
        .expect("stream summary");
    assert!(summary.records <= 10 * (summary.cycles + 1));
}
