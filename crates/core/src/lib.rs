//! vigil — keeps a remote peer under periodic liveness observation and a
//! slowly-varying power reading under debounced observation.
//!
//! Two independent subsystems share only a lifecycle pattern:
//! - [`probe::LivenessProbe`] runs one background task per peer, probing on an
//!   adjustable interval and fanning failures out to registered listeners.
//! - [`notifier::StateChangeNotifier`] reacts to feed updates and an explicit
//!   command, emitting through a sink only when state meaningfully changed.

pub mod config;
pub mod io;
pub mod notifier;
pub mod probe;
pub mod shutdown;
pub mod types;

pub use config::VigilCfg;
pub use notifier::StateChangeNotifier;
pub use probe::LivenessProbe;
