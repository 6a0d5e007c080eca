use async_trait::async_trait;

/// The peer under liveness observation.
///
/// The probe holds this only through a `Weak` handle, so implementors keep
/// full control of the peer's lifetime; once the owner drops its `Arc`, the
/// probe loop notices and self-terminates.
#[async_trait]
pub trait ProbeTarget: Send + Sync {
    /// Readiness predicate — e.g. the session is authenticated and connected.
    /// An unready peer is skipped for the cycle, not treated as failed.
    fn is_ready(&self) -> bool;

    /// Issue one probe. `false` means the peer did not answer in time.
    async fn probe(&self) -> bool;
}
