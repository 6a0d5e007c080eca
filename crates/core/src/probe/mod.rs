mod listeners;
mod target;
mod task;

pub use listeners::{FailureListener, ListenerId, ListenerRegistry, ReportError};
pub use target::ProbeTarget;
pub use task::{LivenessProbe, ProbePhase};
