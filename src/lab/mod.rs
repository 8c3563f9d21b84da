// Lab Module - Biodiesel Production Simulation
//
// A linear five-step experiment: three reagent additions, a timed reaction,
// then separation and completion. The state machine gates every action; the
// workspace adds the timer and the read-only view for front-ends.

pub mod types;
pub mod catalog;
pub mod action;
pub mod notifications;
pub mod view;
pub mod state_machine;
pub mod workspace;

pub use action::{ActionParseError, LabAction};
pub use notifications::{LabNotification, NotificationHandler, RecordingNotifier, TracingNotifier};
pub use state_machine::{LabBench, LabEvent};
pub use types::{LabIntro, LabPhase, Product, Reagent, StepDescriptor, StepStatus};
pub use view::{LabSnapshot, VesselView};
pub use workspace::{LabWorkspace, DEFAULT_REACTION_DELAY};
