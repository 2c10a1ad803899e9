use regionwatch_lib::{
    dashboard::DashboardController,
    feed::FeedStatus,
    query::{HELP_TEXT, NO_DATA_TEXT},
    settings::ReplaySettings,
    source::ReadingSource,
};

fn fast_settings(stride: usize) -> ReplaySettings {
    ReplaySettings {
        interval_ms: 0,
        sample_stride: stride,
        ..ReplaySettings::default()
    }
}

fn dataset() -> String {
    let mut data = String::from("State Name,Date Local,Arithmetic Mean\n");
    for i in 0..60 {
        data.push_str(&format!("Iowa,2021-01-{:02},10.0\n", i % 28 + 1));
        data.push_str(&format!("Ohio,2021-01-{:02},{}\n", i % 28 + 1, i));
    }
    data.push_str("Iowa,2021-02-01,N/A\n");
    data.push_str("Iowa,2021-02-02,1000.0\n");
    data
}

#[tokio::test]
async fn replays_dataset_into_published_state() {
    let dashboard = DashboardController::new(fast_settings(1)).unwrap();
    let rx = dashboard.subscribe();

    dashboard
        .start_feed_from(ReadingSource::from_reader(std::io::Cursor::new(dataset())))
        .await
        .unwrap();
    assert_eq!(dashboard.wait_for_feed().await, FeedStatus::Finished);

    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.feed_status, FeedStatus::Finished);
    assert_eq!(snapshot.regions, vec!["Iowa", "Ohio"]);
    assert_eq!(snapshot.selected_region.as_deref(), Some("Iowa"));
    assert_eq!(snapshot.history.len(), 61);
    assert_eq!(snapshot.history[0].raw_timestamp.as_deref(), Some("2021-01-01"));

    let insight = snapshot.insight;
    assert_eq!(insight.current_value, Some(1000.0));
    assert_eq!(insight.peak_value, Some(1000.0));
    assert!(insight.anomaly_detected);
    assert_eq!(insight.anomalies_count, 1);

    assert_eq!(dashboard.ask("Were there any anomalies?").await, "Anomalies detected: 1");
    assert_eq!(dashboard.ask("hello").await, HELP_TEXT);

    let metrics = dashboard.metrics().await;
    assert_eq!(metrics.readings_consumed, 121);
    assert_eq!(metrics.readings_delivered, 121);
}

#[tokio::test]
async fn switching_regions_rescopes_answers() {
    let dashboard = DashboardController::new(fast_settings(1)).unwrap();
    dashboard
        .start_feed_from(ReadingSource::from_reader(std::io::Cursor::new(dataset())))
        .await
        .unwrap();
    dashboard.wait_for_feed().await;

    dashboard.select_region("Ohio").await;
    assert_eq!(dashboard.ask("max").await, "Peak reading: 59.00 in Ohio");
    assert_eq!(dashboard.insight().await.current_value, Some(59.0));
    assert_eq!(dashboard.history_for_selected().await.len(), 60);

    dashboard.select_region("Texas").await;
    assert_eq!(dashboard.ask("What was the peak reading?").await, NO_DATA_TEXT);
    assert!(dashboard.history_for_selected().await.is_empty());
}

#[tokio::test]
async fn stride_decimates_the_feed() {
    let dashboard = DashboardController::new(fast_settings(5)).unwrap();
    dashboard
        .start_feed_from(ReadingSource::from_reader(std::io::Cursor::new(dataset())))
        .await
        .unwrap();
    dashboard.wait_for_feed().await;

    let metrics = dashboard.metrics().await;
    assert_eq!(metrics.readings_consumed, 121);
    assert_eq!(metrics.readings_delivered, 25);
}

#[tokio::test]
async fn stopping_cancels_the_run() {
    let settings = ReplaySettings {
        interval_ms: 60_000,
        sample_stride: 1,
        ..ReplaySettings::default()
    };
    let dashboard = DashboardController::new(settings).unwrap();
    dashboard
        .start_feed_from(ReadingSource::from_reader(std::io::Cursor::new(dataset())))
        .await
        .unwrap();

    assert_eq!(dashboard.stop_feed().await.unwrap(), FeedStatus::Cancelled);
    assert_eq!(dashboard.wait_for_feed().await, FeedStatus::Cancelled);
    assert!(dashboard.metrics().await.readings_delivered <= 1);
}

#[tokio::test]
async fn missing_dataset_replays_nothing() {
    let settings = ReplaySettings {
        dataset_path: "/no/such/dataset.csv".into(),
        ..fast_settings(1)
    };
    let dashboard = DashboardController::new(settings).unwrap();
    dashboard.start_feed().await.unwrap();

    assert_eq!(dashboard.wait_for_feed().await, FeedStatus::Finished);
    let snapshot = dashboard.snapshot().await;
    assert!(snapshot.regions.is_empty());
    assert_eq!(snapshot.selected_region, None);
    assert_eq!(dashboard.ask("average?").await, NO_DATA_TEXT);
}

#[test]
fn invalid_settings_are_rejected() {
    assert!(DashboardController::new(fast_settings(0)).is_err());
}

#[tokio::test]
async fn waiting_without_a_run_returns_idle() {
    let dashboard = DashboardController::new(fast_settings(1)).unwrap();
    assert_eq!(dashboard.wait_for_feed().await, FeedStatus::Idle);
}
