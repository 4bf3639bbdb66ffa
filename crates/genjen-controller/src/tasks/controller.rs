//! Controller task: sole owner of the state machine and the panel.

use std::sync::Arc;

use genjen_core::{AlarmRecord, Entry, SecurityMode};
use genjen_hardware::traits::{DisplayDevice, IndicatorDevice};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::panel::Panel;
use crate::state_machine::SecurityStateMachine;
use crate::store::StateStore;

/// Requests handled by the controller task.
#[derive(Debug)]
pub enum Request {
    /// A completed keypad entry. The controller replies with the mode
    /// after the entry has been applied.
    Submit {
        entry: Entry,
        reply: oneshot::Sender<SecurityMode>,
    },

    /// The input buffer changed and row 1 should show `digits`.
    InputChanged(String),

    /// The motion accumulator reached its threshold.
    MotionAlarm,

    /// Re-render the mode row and indicator from the published mode.
    Refresh,
}

/// State owned by the controller task.
pub struct Controller<D, I> {
    machine: SecurityStateMachine,
    panel: Panel<D, I>,
    store: Arc<StateStore>,
    requests: mpsc::Receiver<Request>,
}

impl<D, I> Controller<D, I>
where
    D: DisplayDevice,
    I: IndicatorDevice,
{
    pub fn new(
        machine: SecurityStateMachine,
        panel: Panel<D, I>,
        store: Arc<StateStore>,
        requests: mpsc::Receiver<Request>,
    ) -> Self {
        Self {
            machine,
            panel,
            store,
            requests,
        }
    }

    /// Process requests until cancelled or every sender is gone.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        if let Err(e) = self.panel.show_startup().await {
            warn!(error = %e, "Failed to show startup message");
        }
        self.store.publish(self.machine.mode());
        self.refresh().await;
        info!(mode = %self.machine.mode(), "Controller started");

        loop {
            let request = tokio::select! {
                _ = cancel.cancelled() => break,
                request = self.requests.recv() => request,
            };

            match request {
                Some(request) => self.handle(request).await,
                None => break,
            }
        }

        debug!("Controller stopped");
        Ok(())
    }

    async fn handle(&mut self, request: Request) {
        match request {
            Request::Submit { entry, reply } => {
                match self.machine.apply_entry(&entry) {
                    Some(transition) => {
                        info!(
                            from = %transition.from,
                            to = %transition.to,
                            cause = %transition.cause,
                            "Mode changed"
                        );
                        self.store.publish(transition.to);
                    }
                    None => debug!(digits = entry.len(), "Entry matched no code"),
                }

                self.show_input("").await;
                self.refresh().await;

                // The keypad task may have been cancelled while waiting.
                let _ = reply.send(self.machine.mode());
            }
            Request::InputChanged(digits) => self.show_input(&digits).await,
            Request::MotionAlarm => {
                if let Some(transition) = self.machine.trigger_alarm() {
                    warn!(from = %transition.from, "Alarm raised by motion");
                    self.store.publish(transition.to);
                    self.store
                        .record_alarm(AlarmRecord {
                            raised_at: transition.at,
                        })
                        .await;
                    self.refresh().await;
                } else {
                    debug!(mode = %self.machine.mode(), "Motion alarm ignored");
                }
            }
            Request::Refresh => self.refresh().await,
        }
    }

    async fn refresh(&mut self) {
        if let Err(e) = self.panel.show_mode(self.store.mode_raw()).await {
            warn!(error = %e, "Failed to refresh panel");
        }
    }

    async fn show_input(&mut self, digits: &str) {
        if let Err(e) = self.panel.show_input(digits).await {
            warn!(error = %e, "Failed to show input");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genjen_hardware::mock::{
        MockDisplay, MockDisplayHandle, MockIndicator, MockIndicatorHandle,
    };

    struct Fixture {
        requests: mpsc::Sender<Request>,
        store: Arc<StateStore>,
        display: MockDisplayHandle,
        indicator: MockIndicatorHandle,
        cancel: CancellationToken,
        task: tokio::task::JoinHandle<Result<()>>,
    }

    fn start(machine: SecurityStateMachine) -> Fixture {
        let (display, display_handle) = MockDisplay::new();
        let (indicator, indicator_handle) = MockIndicator::new();
        let (tx, rx) = mpsc::channel(8);
        let store = Arc::new(StateStore::default());
        let cancel = CancellationToken::new();

        let controller = Controller::new(
            machine,
            Panel::new(display, indicator),
            Arc::clone(&store),
            rx,
        );
        let task = tokio::spawn(controller.run(cancel.clone()));

        Fixture {
            requests: tx,
            store,
            display: display_handle,
            indicator: indicator_handle,
            cancel,
            task,
        }
    }

    async fn submit(fixture: &Fixture, digits: &str) -> SecurityMode {
        let (reply, rx) = oneshot::channel();
        fixture
            .requests
            .send(Request::Submit {
                entry: Entry::new(digits).unwrap(),
                reply,
            })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_startup_shows_initial_mode() {
        let mut fixture = start(SecurityStateMachine::default());

        fixture.display.wait_for_line(0, "Aktiveret").await.unwrap();
        fixture.indicator.wait_for_color((50, 50, 0)).await.unwrap();
        assert_eq!(fixture.store.mode(), Some(SecurityMode::Armed));
    }

    #[tokio::test]
    async fn test_submit_disarm_code() {
        let fixture = start(SecurityStateMachine::default());
        fixture
            .requests
            .send(Request::InputChanged("123".to_string()))
            .await
            .unwrap();

        let mode = submit(&fixture, "123").await;

        assert_eq!(mode, SecurityMode::Disarmed);
        assert_eq!(fixture.store.mode(), Some(SecurityMode::Disarmed));
        assert_eq!(fixture.display.line(0).trim_end(), "Deaktiveret");
        assert_eq!(fixture.display.line(1).trim_end(), "");
        assert_eq!(fixture.indicator.color(), (0, 50, 0));
    }

    #[tokio::test]
    async fn test_submit_unknown_code_keeps_mode() {
        let fixture = start(SecurityStateMachine::default());

        let mode = submit(&fixture, "999").await;

        assert_eq!(mode, SecurityMode::Armed);
        assert_eq!(fixture.display.line(0).trim_end(), "Aktiveret");
    }

    #[tokio::test]
    async fn test_motion_alarm_records_alarm() {
        let fixture = start(SecurityStateMachine::default());

        fixture.requests.send(Request::MotionAlarm).await.unwrap();
        // Round trip through the controller so the alarm has been handled
        let mode = submit(&fixture, "").await;

        assert_eq!(mode, SecurityMode::Alarm);
        assert_eq!(fixture.display.line(0).trim_end(), "Alarm");
        assert_eq!(fixture.indicator.color(), (50, 0, 0));
        assert_eq!(fixture.store.alarms().await.len(), 1);
    }

    #[tokio::test]
    async fn test_motion_alarm_ignored_when_disarmed() {
        let machine = SecurityStateMachine::builder()
            .with_initial_mode(SecurityMode::Disarmed)
            .build();
        let fixture = start(machine);

        fixture.requests.send(Request::MotionAlarm).await.unwrap();
        let mode = submit(&fixture, "").await;

        assert_eq!(mode, SecurityMode::Disarmed);
        assert!(fixture.store.alarms().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_renders_invalid_state() {
        let mut fixture = start(SecurityStateMachine::default());
        fixture.display.wait_for_line(0, "Aktiveret").await.unwrap();

        fixture.store.force_raw(7);
        fixture.requests.send(Request::Refresh).await.unwrap();

        fixture
            .display
            .wait_for_line(0, "Invalid state")
            .await
            .unwrap();
        fixture.indicator.wait_for_color((0, 0, 50)).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_stops_controller() {
        let fixture = start(SecurityStateMachine::default());

        fixture.cancel.cancel();

        assert!(fixture.task.await.unwrap().is_ok());
    }
}
