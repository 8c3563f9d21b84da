//! Lab Workspace
//!
//! Owns the lab state machine and the one asynchronous piece of the
//! simulation: the timed reaction. The reaction runs as a Tokio task tagged
//! with the workspace generation at the moment it was scheduled. `reset()`
//! aborts that task and bumps the generation, and the task re-checks the
//! generation under the lock before touching state, so a late firing can never
//! reach a bench created by a reset.
//!
//! Notifications raised by the machine are parked in an outbox while the lock
//! is held and handed to the caller's handler once it is released.

use statig::blocking::StateMachine;
use statig::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::action::LabAction;
use super::notifications::{LabNotification, NotificationHandler, TracingNotifier};
use super::state_machine::{LabBench, LabEvent};
use super::types::Reagent;
use super::view::LabSnapshot;

/// Reaction time used by the reference experiment
pub const DEFAULT_REACTION_DELAY: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct Outbox(Mutex<Vec<LabNotification>>);

impl NotificationHandler for Outbox {
    fn handle_notification(&self, notification: &LabNotification) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

impl Outbox {
    fn take(&self) -> Vec<LabNotification> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

struct Bench {
    machine: StateMachine<LabBench>,
    generation: u64,
    pending_reaction: Option<JoinHandle<()>>,
    updates: watch::Sender<LabSnapshot>,
    outbox: Arc<Outbox>,
}

impl Bench {
    fn fresh_machine(outbox: &Arc<Outbox>) -> StateMachine<LabBench> {
        LabBench::new(outbox.clone()).state_machine()
    }

    /// Run one event and return the notifications it raised
    fn dispatch(&mut self, event: &LabEvent) -> Vec<LabNotification> {
        self.machine.handle(event);
        self.publish();
        self.outbox.take()
    }

    fn publish(&self) {
        let snapshot = self.machine.inner().snapshot();
        self.updates.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Interactive biodiesel experiment.
///
/// Operations that violate their preconditions are silent no-ops; use
/// [`LabWorkspace::is_action_available`] to find out what will be accepted.
pub struct LabWorkspace {
    bench: Arc<Mutex<Bench>>,
    notifier: Arc<dyn NotificationHandler>,
    reaction_delay: Duration,
}

impl Default for LabWorkspace {
    fn default() -> Self {
        Self::new(DEFAULT_REACTION_DELAY, Arc::new(TracingNotifier))
    }
}

impl LabWorkspace {
    pub fn new(reaction_delay: Duration, notifier: Arc<dyn NotificationHandler>) -> Self {
        let outbox = Arc::new(Outbox::default());
        let machine = Bench::fresh_machine(&outbox);
        let (updates, _) = watch::channel(machine.inner().snapshot());

        Self {
            bench: Arc::new(Mutex::new(Bench {
                machine,
                generation: 0,
                pending_reaction: None,
                updates,
                outbox,
            })),
            notifier,
            reaction_delay,
        }
    }

    pub fn reaction_delay(&self) -> Duration {
        self.reaction_delay
    }

    pub fn add_reagent(&self, reagent: &Reagent) {
        let raised = lock(&self.bench).dispatch(&LabEvent::AddReagent(*reagent));
        deliver(self.notifier.as_ref(), raised);
    }

    /// Start the reaction and schedule its completion.
    ///
    /// The completion timer runs on the current Tokio runtime. Without one
    /// the request is ignored and the bench stays ready to react.
    pub fn start_reaction(&self) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No Tokio runtime to time the reaction, ignoring start");
            return;
        };

        let raised = {
            let mut bench = lock(&self.bench);
            if bench.machine.inner().is_reacting() {
                debug!("Reaction already running, ignoring start");
                return;
            }

            let raised = bench.dispatch(&LabEvent::StartReaction);
            if bench.machine.inner().is_reacting() {
                let generation = bench.generation;
                let shared = Arc::clone(&self.bench);
                let notifier = Arc::clone(&self.notifier);
                let delay = self.reaction_delay;
                // Deadline is fixed now, not when the task is first polled
                let deadline = Instant::now() + delay;
                bench.pending_reaction = Some(runtime.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    complete_reaction(&shared, notifier.as_ref(), generation);
                }));
                info!(
                    generation,
                    delay_ms = delay.as_millis() as u64,
                    "Reaction scheduled"
                );
            }
            raised
        };
        deliver(self.notifier.as_ref(), raised);
    }

    pub fn finish_experiment(&self) {
        let raised = lock(&self.bench).dispatch(&LabEvent::FinishExperiment);
        deliver(self.notifier.as_ref(), raised);
    }

    /// Discard the current experiment and start over from an empty vessel
    pub fn reset(&self) {
        let mut bench = lock(&self.bench);
        bench.generation = bench.generation.wrapping_add(1);
        if let Some(task) = bench.pending_reaction.take() {
            task.abort();
            debug!(generation = bench.generation, "Pending reaction cancelled");
        }
        bench.machine = Bench::fresh_machine(&bench.outbox);
        bench.publish();
        info!(generation = bench.generation, "Lab workspace reset");
    }

    /// Run a parsed action against the bench
    pub fn apply(&self, action: &LabAction) {
        match action {
            LabAction::AddReagent(reagent) => self.add_reagent(reagent),
            LabAction::StartReaction => self.start_reaction(),
            LabAction::FinishExperiment => self.finish_experiment(),
            LabAction::Reset => self.reset(),
        }
    }

    pub fn snapshot(&self) -> LabSnapshot {
        lock(&self.bench).machine.inner().snapshot()
    }

    pub fn is_action_available(&self, action: &LabAction) -> bool {
        self.snapshot().is_action_available(action)
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<LabSnapshot> {
        lock(&self.bench).updates.subscribe()
    }

    /// Wait until no reaction is running
    pub async fn reaction_settled(&self) -> LabSnapshot {
        let mut updates = self.subscribe();
        let settled = match updates.wait_for(|snapshot| !snapshot.is_reacting).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives as long as the workspace, so this only happens mid-drop
            Err(_) => self.snapshot(),
        };
        settled
    }

    pub fn generation(&self) -> u64 {
        lock(&self.bench).generation
    }
}

impl Drop for LabWorkspace {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.bench).pending_reaction.take() {
            task.abort();
        }
    }
}

fn lock(bench: &Mutex<Bench>) -> MutexGuard<'_, Bench> {
    bench.lock().unwrap_or_else(PoisonError::into_inner)
}

fn deliver(notifier: &dyn NotificationHandler, raised: Vec<LabNotification>) {
    for notification in &raised {
        notifier.handle_notification(notification);
    }
}

/// Deferred half of `start_reaction`; a no-op for superseded generations
fn complete_reaction(bench: &Mutex<Bench>, notifier: &dyn NotificationHandler, generation: u64) {
    let raised = {
        let mut bench = lock(bench);
        if bench.generation != generation {
            debug!(
                scheduled = generation,
                current = bench.generation,
                "Stale reaction timer fired after reset, ignoring"
            );
            return;
        }
        bench.pending_reaction = None;
        bench.dispatch(&LabEvent::ReactionElapsed)
    };
    deliver(notifier, raised);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::catalog::REAGENTS;
    use crate::lab::notifications::RecordingNotifier;
    use std::sync::{OnceLock, Weak};

    fn workspace() -> (Arc<RecordingNotifier>, LabWorkspace) {
        let recorder = Arc::new(RecordingNotifier::new());
        let workspace = LabWorkspace::new(DEFAULT_REACTION_DELAY, recorder.clone());
        (recorder, workspace)
    }

    fn charge(workspace: &LabWorkspace) {
        for reagent in REAGENTS.iter() {
            workspace.add_reagent(reagent);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_cannot_complete_reaction() {
        let (recorder, workspace) = workspace();
        charge(&workspace);
        workspace.start_reaction();
        let stale = workspace.generation();

        workspace.reset();
        charge(&workspace);
        // Drive the new bench into its own reaction window
        workspace.start_reaction();

        complete_reaction(&workspace.bench, recorder.as_ref(), stale);

        let snapshot = workspace.snapshot();
        assert!(snapshot.is_reacting);
        assert_eq!(snapshot.current_step, 3);
        assert_eq!(recorder.count(&LabNotification::ReactionComplete), 0);

        complete_reaction(&workspace.bench, recorder.as_ref(), workspace.generation());
        assert_eq!(workspace.snapshot().current_step, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_pending_task() {
        let (_, workspace) = workspace();
        charge(&workspace);
        workspace.start_reaction();
        assert!(lock(&workspace.bench).pending_reaction.is_some());

        workspace.reset();

        assert!(lock(&workspace.bench).pending_reaction.is_none());
        assert_eq!(workspace.generation(), 1);
        assert_eq!(workspace.snapshot(), LabSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_each_change() {
        let (_, workspace) = workspace();
        let mut updates = workspace.subscribe();

        workspace.add_reagent(&REAGENTS[0]);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().current_step, 1);

        // Rejected actions leave subscribers asleep
        workspace.add_reagent(&REAGENTS[2]);
        assert!(!updates.has_changed().unwrap());
        assert_eq!(updates.borrow().current_step, 1);
    }

    #[test]
    fn test_start_reaction_without_runtime_is_ignored() {
        let (recorder, workspace) = workspace();
        charge(&workspace);

        workspace.start_reaction();

        let snapshot = workspace.snapshot();
        assert!(!snapshot.is_reacting);
        assert_eq!(snapshot.current_step, 3);
        assert!(lock(&workspace.bench).pending_reaction.is_none());
        assert_eq!(recorder.count(&LabNotification::ReactionStarted), 0);
        assert!(workspace.is_action_available(&LabAction::StartReaction));
    }

    /// Reads the workspace back from inside every notification
    #[derive(Default)]
    struct StepReader {
        workspace: OnceLock<Weak<LabWorkspace>>,
        seen: Mutex<Vec<usize>>,
    }

    impl NotificationHandler for StepReader {
        fn handle_notification(&self, _: &LabNotification) {
            if let Some(workspace) = self.workspace.get().and_then(Weak::upgrade) {
                let step = workspace.snapshot().current_step;
                self.seen.lock().unwrap().push(step);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_handlers_can_query_the_workspace() {
        let handler = Arc::new(StepReader::default());
        let workspace = Arc::new(LabWorkspace::new(DEFAULT_REACTION_DELAY, handler.clone()));
        handler.workspace.set(Arc::downgrade(&workspace)).unwrap();

        charge(&workspace);
        workspace.start_reaction();
        workspace.reaction_settled().await;
        workspace.finish_experiment();

        assert_eq!(*handler.seen.lock().unwrap(), vec![1, 2, 3, 3, 4, 4]);
    }
}
