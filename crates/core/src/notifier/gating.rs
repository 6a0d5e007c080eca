//! The emission-gating policy: three paths, one shared last-sent gate.
//!
//! The plain-message paths (forced, threshold) and the detailed-status path
//! all compare against a snapshot of `last_sent` taken on entry. The snapshot
//! matters for the detailed path: a plain emission earlier in the same call
//! updates `last_sent`, and gating the detailed path on the updated value
//! would swallow, for example, the exact status owed when the category flips
//! to a precise source at a step boundary.

use super::bucket::Bucket;
use super::state::NotifierState;
use crate::config::VigilCfg;
use crate::io::sink::Notification;

/// Evaluate all gating paths against the current state. Returns zero, one, or
/// two notifications (plain and/or detailed) and advances `last_sent`.
pub(crate) fn evaluate(state: &mut NotifierState, cfg: &VigilCfg, force: bool) -> Vec<Notification> {
    let Some(current) = state.last_known else {
        return Vec::new();
    };
    let prev_sent = state.last_sent;
    let changed = prev_sent != Some(current);
    let mut out = Vec::new();

    // Plain message: forced (or first-ever) beats the threshold gate.
    if force || prev_sent.is_none() {
        out.push(Notification::plain(current.value));
        state.last_sent = Some(current);
    } else if cfg.notify_on_threshold && changed && current.value % cfg.step_width == 0 {
        out.push(Notification::plain(current.value));
        state.last_sent = Some(current);
    }

    // Detailed status, gated on the entry snapshot.
    if cfg.notify_detailed && changed {
        if current.category.is_precise() {
            out.push(Notification::detailed(
                format!("{}%", current.value),
                current.category,
            ));
        } else {
            let next = Bucket::of(current.value, cfg.step_width);
            let prev_bucket = prev_sent.map(|p| Bucket::of(p.value, cfg.step_width));
            let prev_category = prev_sent.map(|p| p.category);
            if prev_bucket != Some(next) || prev_category != Some(current.category) {
                out.push(Notification::detailed(
                    format!("{next}%"),
                    current.category,
                ));
            }
        }
        // Advances even when the bucket comparison suppressed the emission,
        // so the threshold gate sees the newest observed state.
        state.last_sent = Some(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn cfg(threshold: bool, detailed: bool) -> VigilCfg {
        VigilCfg {
            step_width: 5,
            notify_on_threshold: threshold,
            notify_detailed: detailed,
            ..VigilCfg::default()
        }
    }

    fn feed(state: &mut NotifierState, cfg: &VigilCfg, value: u8, cat: Category) -> Vec<Notification> {
        if !state.observe(value, cat) {
            return Vec::new();
        }
        evaluate(state, cfg, false)
    }

    #[test]
    fn first_update_emits_regardless_of_alignment() {
        let cfg = cfg(true, false);
        let mut state = NotifierState::new();
        let out = feed(&mut state, &cfg, 3, Category::Battery);
        assert_eq!(out, vec![Notification::plain(3)]);
    }

    #[test]
    fn identical_update_emits_nothing() {
        let cfg = cfg(true, true);
        let mut state = NotifierState::new();
        assert!(!feed(&mut state, &cfg, 50, Category::Battery).is_empty());
        assert!(feed(&mut state, &cfg, 50, Category::Battery).is_empty());
    }

    #[test]
    fn threshold_fires_only_on_step_multiples() {
        let cfg = cfg(true, false);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 50, Category::Battery);

        assert!(feed(&mut state, &cfg, 54, Category::Battery).is_empty());
        assert_eq!(
            feed(&mut state, &cfg, 55, Category::Battery),
            vec![Notification::plain(55)]
        );
    }

    #[test]
    fn threshold_disabled_never_fires() {
        let cfg = cfg(false, false);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 50, Category::Battery);
        assert!(feed(&mut state, &cfg, 55, Category::Battery).is_empty());
    }

    #[test]
    fn precise_category_change_emits_exact_status() {
        let cfg = cfg(false, true);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 53, Category::Battery);

        let out = feed(&mut state, &cfg, 53, Category::Ac);
        assert_eq!(out, vec![Notification::detailed("53%", Category::Ac)]);
    }

    #[test]
    fn coarse_change_within_bucket_is_silent_but_advances_gate() {
        let cfg = cfg(true, true);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 50, Category::Battery);

        assert!(feed(&mut state, &cfg, 54, Category::Battery).is_empty());
        // last_sent advanced to 54, so 55 counts as changed for the threshold.
        let out = feed(&mut state, &cfg, 55, Category::Battery);
        assert!(out.contains(&Notification::plain(55)));
        assert!(out.contains(&Notification::detailed("55-60%", Category::Battery)));
    }

    #[test]
    fn coarse_bucket_crossing_emits_range() {
        let cfg = cfg(false, true);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 42, Category::Battery);

        let out = feed(&mut state, &cfg, 47, Category::Battery);
        assert_eq!(out, vec![Notification::detailed("45-50%", Category::Battery)]);
    }

    #[test]
    fn unknown_category_is_bucketed_like_coarse() {
        let cfg = cfg(false, true);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 10, Category::Battery);

        let out = feed(&mut state, &cfg, 10, Category::Unknown);
        assert_eq!(out, vec![Notification::detailed("10-15%", Category::Unknown)]);
    }

    #[test]
    fn forced_emission_closes_the_gate_for_later_paths() {
        let cfg = cfg(true, true);
        let mut state = NotifierState::new();
        feed(&mut state, &cfg, 55, Category::Battery);

        // Forced re-announce of unchanged state: plain only, no detailed echo.
        let out = evaluate(&mut state, &cfg, true);
        assert_eq!(out, vec![Notification::plain(55)]);

        // The same reading arriving again stays fully gated.
        assert!(feed(&mut state, &cfg, 55, Category::Battery).is_empty());
    }

    #[test]
    fn nothing_observed_yet_emits_nothing_even_forced() {
        let cfg = cfg(true, true);
        let mut state = NotifierState::new();
        assert!(evaluate(&mut state, &cfg, true).is_empty());
    }

    #[test]
    fn first_update_on_precise_source_emits_both_channels() {
        let cfg = cfg(true, true);
        let mut state = NotifierState::new();
        let out = feed(&mut state, &cfg, 80, Category::Usb);
        assert_eq!(
            out,
            vec![
                Notification::plain(80),
                Notification::detailed("80%", Category::Usb),
            ]
        );
    }
}
