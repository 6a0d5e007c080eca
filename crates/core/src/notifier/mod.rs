mod bucket;
mod gating;
mod service;
mod state;

pub use bucket::Bucket;
pub use service::StateChangeNotifier;
pub use state::{NotifierState, PowerState};
