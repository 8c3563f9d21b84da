use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Acknowledgements emitted by the lab for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabNotification {
    ReagentAdded {
        name: &'static str,
        formula: &'static str,
    },
    ReactionStarted,
    ReactionComplete,
    ExperimentComplete,
}

impl LabNotification {
    pub fn title(&self) -> String {
        match self {
            LabNotification::ReagentAdded { name, .. } => format!("{name} Added"),
            LabNotification::ReactionStarted => "Reaction Started".to_string(),
            LabNotification::ReactionComplete => "Reaction Complete".to_string(),
            LabNotification::ExperimentComplete => "Experiment Complete!".to_string(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            LabNotification::ReagentAdded { formula, .. } => {
                format!("{formula} has been added to the reaction vessel")
            }
            LabNotification::ReactionStarted => "Transesterification is in progress...".to_string(),
            LabNotification::ReactionComplete => {
                "The mixture is now separating into layers".to_string()
            }
            LabNotification::ExperimentComplete => {
                "You have successfully produced biodiesel from castor oil".to_string()
            }
        }
    }
}

/// Receives lab notifications.
///
/// The workspace delivers notifications after releasing its state lock, so a
/// handler may query the workspace it is attached to.
pub trait NotificationHandler: Send + Sync {
    fn handle_notification(&self, notification: &LabNotification);
}

/// Writes every notification to the log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl NotificationHandler for TracingNotifier {
    fn handle_notification(&self, notification: &LabNotification) {
        info!(
            title = %notification.title(),
            description = %notification.description(),
            "Lab notification"
        );
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRecord {
    pub notification: LabNotification,
    pub emitted_at: DateTime<Utc>,
}

/// Keeps a timestamped history of notifications
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    records: Mutex<Vec<NotificationRecord>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn notifications(&self) -> Vec<LabNotification> {
        self.records()
            .into_iter()
            .map(|record| record.notification)
            .collect()
    }

    pub fn count(&self, wanted: &LabNotification) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| &record.notification == wanted)
            .count()
    }
}

impl NotificationHandler for RecordingNotifier {
    fn handle_notification(&self, notification: &LabNotification) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NotificationRecord {
                notification: notification.clone(),
                emitted_at: Utc::now(),
            });
    }
}
