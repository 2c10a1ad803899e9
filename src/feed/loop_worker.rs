use std::{future::Future, io::Read};

use chrono::Utc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    metrics::{DeliveryMetrics, MetricsCollector},
    models::Reading,
    source::Readings,
};

use super::FeedStatus;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Pacing parameters for one replay run.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub stride: usize,
    pub interval: Duration,
    pub verbose: bool,
}

/// Drive `readings` into `on_record`, keeping one of every `stride` readings
/// and pausing `interval` after each delivery.
///
/// The stride counter advances for every reading the source produces,
/// delivered or not. Each delivery is awaited before the pause starts, so
/// deliveries never overlap. Cancellation is checked before every reading and
/// also cuts the pause short.
pub async fn replay_loop<R, F, Fut>(
    readings: Readings<R>,
    pacing: Pacing,
    metrics: MetricsCollector,
    cancel_token: CancellationToken,
    mut on_record: F,
) -> FeedStatus
where
    R: Read,
    F: FnMut(Reading) -> Fut,
    Fut: Future<Output = ()>,
{
    let stride = pacing.stride.max(1);
    if readings.columns().is_none() {
        log_info!("nothing to replay: dataset has no usable rows");
    }

    for (i, reading) in readings.enumerate() {
        if cancel_token.is_cancelled() {
            log_info!("replay cancelled after {i} readings");
            return FeedStatus::Cancelled;
        }

        metrics.record_consumed().await;
        if i % stride != 0 {
            continue;
        }

        let sequence_index = reading.sequence_index;
        let region = reading.region.clone();
        if pacing.verbose {
            log_info!("delivering #{sequence_index} {region}={}", reading.value);
        } else {
            log_debug!("delivering #{sequence_index} {region}={}", reading.value);
        }

        let apply_start = Instant::now();
        on_record(reading).await;
        metrics
            .record_delivery(DeliveryMetrics {
                timestamp: Utc::now(),
                sequence_index,
                region,
                apply_us: apply_start.elapsed().as_micros() as u64,
            })
            .await;

        tokio::select! {
            _ = tokio::time::sleep(pacing.interval) => {}
            _ = cancel_token.cancelled() => {
                log_info!("replay cancelled while waiting after #{sequence_index}");
                return FeedStatus::Cancelled;
            }
        }
    }

    log_info!("replay finished: dataset exhausted");
    FeedStatus::Finished
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReadingSource;
    use std::sync::{Arc, Mutex};

    fn dataset(rows: usize) -> String {
        let mut data = String::from("site,value\n");
        for i in 0..rows {
            data.push_str(&format!("north,{i}\n"));
        }
        data
    }

    fn pacing(stride: usize) -> Pacing {
        Pacing {
            stride,
            interval: Duration::ZERO,
            verbose: false,
        }
    }

    #[tokio::test]
    async fn delivers_every_stride_th_reading() {
        let data = dataset(12);
        let readings = ReadingSource::from_reader(data.as_bytes()).stream();
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();
        let metrics = MetricsCollector::new();

        let token = CancellationToken::new();
        let status = replay_loop(readings, pacing(5), metrics.clone(), token, |reading| {
            sink.lock().unwrap().push(reading.sequence_index);
            async {}
        })
        .await;

        assert_eq!(status, FeedStatus::Finished);
        assert_eq!(*delivered.lock().unwrap(), vec![0, 5, 10]);

        let snapshot = metrics.get_snapshot().await;
        assert_eq!(snapshot.readings_consumed, 12);
        assert_eq!(snapshot.readings_delivered, 3);
    }

    #[tokio::test]
    async fn stride_counts_only_produced_readings() {
        let data = "site,value\nnorth,0\nnorth,bad\nnorth,2\nnorth,3\n";
        let readings = ReadingSource::from_reader(data.as_bytes()).stream();
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();

        let metrics = MetricsCollector::new();
        let token = CancellationToken::new();
        replay_loop(readings, pacing(2), metrics, token, |reading| {
            sink.lock().unwrap().push(reading.sequence_index);
            async {}
        })
        .await;

        // Row 1 is dropped, so readings 0, 2, 3 get stride positions 0, 1, 2.
        assert_eq!(*delivered.lock().unwrap(), vec![0, 3]);
    }

    #[tokio::test]
    async fn cancelled_feed_stops_delivering() {
        let data = dataset(50);
        let readings = ReadingSource::from_reader(data.as_bytes()).stream();
        let cancel_token = CancellationToken::new();
        let trigger = cancel_token.clone();
        let delivered = Arc::new(Mutex::new(0usize));
        let sink = delivered.clone();

        let metrics = MetricsCollector::new();
        let status = replay_loop(readings, pacing(1), metrics, cancel_token, |_| {
            let mut count = sink.lock().unwrap();
            *count += 1;
            if *count == 3 {
                trigger.cancel();
            }
            async {}
        })
        .await;

        assert_eq!(status, FeedStatus::Cancelled);
        assert_eq!(*delivered.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_source_finishes_immediately() {
        let readings = ReadingSource::<&[u8]>::empty().stream();
        let metrics = MetricsCollector::new();
        let token = CancellationToken::new();
        let status = replay_loop(readings, pacing(5), metrics, token, |_| async {}).await;
        assert_eq!(status, FeedStatus::Finished);
    }
}
