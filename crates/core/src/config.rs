use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// All vigil parameters. Defaults mirror the original agent: 5-point
/// notification steps and a 60 s probe warm-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilCfg {
    /// Width of the value steps used by both the threshold gate and the
    /// coarse bucket rendering. Must be greater than zero.
    pub step_width: u8,
    /// Emit a plain message when the value lands exactly on a step boundary.
    pub notify_on_threshold: bool,
    /// Publish detailed status (exact or bucketed value + category).
    pub notify_detailed: bool,
    /// Extra delay before the first probe, on top of one interval. Gives the
    /// peer handshake time to finish; probing too early reads as failure.
    pub probe_warmup_ms: u64,
    /// Default probe interval handed to `LivenessProbe::start`.
    pub probe_interval_ms: u64,
}

impl Default for VigilCfg {
    fn default() -> Self {
        Self {
            step_width: 5,
            notify_on_threshold: true,
            notify_detailed: true,
            probe_warmup_ms: 60_000,
            probe_interval_ms: 30_000,
        }
    }
}

#[derive(Debug, Error)]
pub enum CfgError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step_width must be greater than zero")]
    ZeroStepWidth,
}

impl VigilCfg {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, CfgError> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), CfgError> {
        if self.step_width == 0 {
            return Err(CfgError::ZeroStepWidth);
        }
        Ok(())
    }
}
