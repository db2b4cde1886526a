use crate::event::{classify_signals, validate_run, RunRejection, SequenceVerdict, Signal, ThingEvent};

/// First-stage plan for a smart update, derived from the signal list alone.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePlan {
    /// The run is unusable (gap, unmet minimum, malformed revision);
    /// invalidate and reload.
    Reject(RunRejection),
    /// No usable events; answer from the cache, loading if absent.
    LookupOnly,
    /// The run starts with a lifecycle boundary; fold over the empty
    /// projection without consulting the cache.
    FoldFromEmpty(Vec<ThingEvent>),
    /// A contiguous run of modifications; compare against the cached
    /// revision before deciding.
    CompareWithCached(Vec<ThingEvent>),
}

/// Classifies and validates `signals`, yielding the update plan.
///
/// A negative `min_acceptable_revision` is handled before planning: the
/// decision engine forces an invalidate-and-reload without classifying at
/// all. Here it merely disables the minimum gate.
pub fn plan_update(signals: &[Signal], min_acceptable_revision: i64) -> UpdatePlan {
    let run = classify_signals(signals);
    match validate_run(run.events(), min_acceptable_revision) {
        SequenceVerdict::Rejected(rejection) => UpdatePlan::Reject(rejection),
        SequenceVerdict::Accepted if run.is_empty() => UpdatePlan::LookupOnly,
        SequenceVerdict::Accepted if run.lifecycle_reset() => {
            UpdatePlan::FoldFromEmpty(run.into_events())
        }
        SequenceVerdict::Accepted => UpdatePlan::CompareWithCached(run.into_events()),
    }
}

/// Second-stage decision once the cached revision is known.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedComparison {
    /// Every event is at or behind the cache; the cached projection wins.
    UseCached,
    /// The first newer event is the next expected revision; fold the run.
    FoldFrom(Vec<ThingEvent>),
    /// The events run ahead of the cache with a hole in between; only a
    /// fresh authoritative snapshot is trustworthy.
    Reload,
}

/// Compares a validated run against the cached revision.
///
/// Events at or behind `cached_revision` are dropped first; the survivors
/// either start exactly one past the cache (fold) or prove a gap (reload).
pub fn compare_with_cached(cached_revision: u64, events: Vec<ThingEvent>) -> CachedComparison {
    let newer: Vec<ThingEvent> = events
        .into_iter()
        .filter(|event| event.revision() > cached_revision)
        .collect();
    match newer.first() {
        None => CachedComparison::UseCached,
        Some(first) if first.revision() == cached_revision + 1 => {
            CachedComparison::FoldFrom(newer)
        }
        Some(_) => CachedComparison::Reload,
    }
}
