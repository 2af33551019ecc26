use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::api::StatusSource;
use crate::error::CycleError;
use crate::homework::{check_response, parse_status};
use crate::notifier::Notify;

/// Fixed delay between cycles, which doubles as the backoff after a
/// failed cycle.
pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

/// Owns the poll loop and the fetch-window cursor. The cursor only moves
/// forward after a cycle that actually processed homeworks, so a failed
/// or empty cycle re-covers the same window on the next attempt.
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
}

impl<S: StatusSource, N: Notify> Poller<S, N> {
    pub fn new(source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            retry_period: RETRY_PERIOD,
        }
    }

    /// Poll forever. Nothing inside the loop terminates the process; every
    /// cycle error is reported to the chat and retried after the delay.
    pub async fn run(&self) {
        let mut cursor = Utc::now().timestamp();
        info!("polling every {:?}, cursor starts at {}", self.retry_period, cursor);

        loop {
            cursor = self.step(cursor).await;
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// One cycle plus the cursor-advancement decision. Returns the cursor
    /// to use for the next cycle.
    async fn step(&self, cursor: i64) -> i64 {
        match self.run_cycle(cursor).await {
            Ok(0) => cursor,
            Ok(n) => {
                info!("notified about {} homework(s)", n);
                Utc::now().timestamp()
            }
            Err(e) => {
                error!("poll cycle failed: {}", e);
                self.notifier
                    .send(&format!("Сбой в работе программы: {}", e))
                    .await;
                cursor
            }
        }
    }

    /// Fetch, validate, translate and deliver. Returns how many homeworks
    /// were notified about. A translator error fails the whole cycle
    /// rather than skipping the offending record.
    async fn run_cycle(&self, cursor: i64) -> Result<usize, CycleError> {
        let payload = self.source.fetch(cursor).await?;
        let homeworks = check_response(&payload)?;

        for homework in homeworks {
            let message = parse_status(homework)?;
            self.notifier.send(&message).await;
        }

        Ok(homeworks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeSource {
        responses: Mutex<VecDeque<Result<Value, CycleError>>>,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<Value, CycleError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }

        fn once(payload: Value) -> Self {
            Self::new(vec![Ok(payload)])
        }
    }

    #[async_trait]
    impl StatusSource for FakeSource {
        async fn fetch(&self, _from_date: i64) -> Result<Value, CycleError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("FakeSource ran out of responses")
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notify for &RecordingNotifier {
        async fn send(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }
    }

    fn unavailable() -> CycleError {
        CycleError::HttpStatus {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[tokio::test]
    async fn successful_cycle_notifies_and_advances_cursor() {
        let source = FakeSource::once(json!({
            "homeworks": [{ "homework_name": "X", "status": "reviewing" }],
        }));
        let notifier = RecordingNotifier::default();
        let poller = Poller::new(source, &notifier);

        let before = Utc::now().timestamp();
        let next = poller.step(1_000).await;

        assert_eq!(
            notifier.messages(),
            vec!["Изменился статус проверки работы \"X\". Работа взята на проверку ревьюером."]
        );
        assert!(next >= before);
    }

    #[tokio::test]
    async fn empty_cycle_keeps_cursor_and_stays_silent() {
        let source = FakeSource::once(json!({ "homeworks": [] }));
        let notifier = RecordingNotifier::default();
        let poller = Poller::new(source, &notifier);

        let next = poller.step(1_000).await;

        assert!(notifier.messages().is_empty());
        assert_eq!(next, 1_000);
    }

    #[tokio::test]
    async fn failed_cycle_reports_once_and_keeps_cursor() {
        let source = FakeSource::new(vec![Err(unavailable())]);
        let notifier = RecordingNotifier::default();
        let poller = Poller::new(source, &notifier);

        let next = poller.step(1_000).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Сбой в работе программы: "));
        assert!(messages[0].contains("503"));
        assert_eq!(next, 1_000);
    }

    #[tokio::test]
    async fn bad_record_fails_the_cycle_without_advancing() {
        let source = FakeSource::once(json!({
            "homeworks": [{ "status": "approved" }],
        }));
        let notifier = RecordingNotifier::default();
        let poller = Poller::new(source, &notifier);

        let next = poller.step(1_000).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("homework_name"));
        assert_eq!(next, 1_000);
    }

    #[tokio::test]
    async fn loop_recovers_after_a_failed_cycle() {
        let source = FakeSource::new(vec![
            Err(unavailable()),
            Ok(json!({
                "homeworks": [{ "homework_name": "Y", "status": "approved" }],
            })),
        ]);
        let notifier = RecordingNotifier::default();
        let poller = Poller::new(source, &notifier);

        let cursor = poller.step(1_000).await;
        assert_eq!(cursor, 1_000);

        let before = Utc::now().timestamp();
        let cursor = poller.step(cursor).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].contains("\"Y\""));
        assert!(messages[1].contains("Ура!"));
        assert!(cursor >= before);
    }
}
