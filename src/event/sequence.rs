use super::signal::ThingEvent;

/// Reason a classified run cannot be folded and the key must be reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRejection {
    /// A minimum revision is demanded but the run carries no events to
    /// back it.
    EmptyRun { required: u64 },
    /// The run does not reach the revision the caller insists on.
    BelowMinimum { required: u64, reached: u64 },
    /// Two adjacent events are not consecutive revisions.
    RevisionGap { expected: u64, found: u64 },
    /// A supposedly persisted event carries revision 0; the authority
    /// assigns positive revisions, so the whole run is untrustworthy.
    MalformedRevision { position: usize },
}

/// Verdict of the sequence validator. Rejection is a value, not an error:
/// it steers the decision engine towards a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceVerdict {
    Accepted,
    Rejected(RunRejection),
}

impl SequenceVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SequenceVerdict::Accepted)
    }
}

/// Validates a classified run against the caller's minimum acceptable
/// revision and the strict `+1` contiguity invariant.
///
/// A negative `min_acceptable_revision` disables the minimum gate; the
/// decision engine turns it into a forced reload before validation is ever
/// consulted.
pub fn validate_run(events: &[ThingEvent], min_acceptable_revision: i64) -> SequenceVerdict {
    for (position, event) in events.iter().enumerate() {
        if event.revision() == 0 {
            return SequenceVerdict::Rejected(RunRejection::MalformedRevision { position });
        }
    }

    if min_acceptable_revision >= 0 {
        let required = min_acceptable_revision as u64;
        match events.last() {
            None => {
                return SequenceVerdict::Rejected(RunRejection::EmptyRun { required });
            }
            Some(last) if last.revision() < required => {
                return SequenceVerdict::Rejected(RunRejection::BelowMinimum {
                    required,
                    reached: last.revision(),
                });
            }
            Some(_) => {}
        }
    }

    for pair in events.windows(2) {
        let expected = pair[0].revision() + 1;
        let found = pair[1].revision();
        if found != expected {
            return SequenceVerdict::Rejected(RunRejection::RevisionGap { expected, found });
        }
    }

    SequenceVerdict::Accepted
}
