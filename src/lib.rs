// Biodiesel Lab Library - Virtual Chemistry Lab Simulation
// This exposes the lab state machine, configuration and logging setup

pub mod lab;
pub mod config;
pub mod telemetry;

// Re-export key types for easy access
pub use crate::lab::{
    ActionParseError, LabAction, LabIntro, LabNotification, LabPhase, LabSnapshot, LabWorkspace,
    NotificationHandler, Product, Reagent, RecordingNotifier, StepDescriptor, StepStatus, TracingNotifier,
    VesselView, DEFAULT_REACTION_DELAY,
};
pub use crate::config::{config, LabConfig};
pub use crate::telemetry::{create_session_span, generate_session_id, init_telemetry};
