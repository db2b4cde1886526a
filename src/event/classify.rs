use super::signal::{Headers, Signal, ThingEvent};

/// Relevant slice of a caller's signal list, ready for sequence validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRun {
    events: Vec<ThingEvent>,
    lifecycle_reset: bool,
}

impl ClassifiedRun {
    /// The surviving events in input order.
    pub fn events(&self) -> &[ThingEvent] {
        &self.events
    }

    /// Consumes the run, yielding the surviving events.
    pub fn into_events(self) -> Vec<ThingEvent> {
        self.events
    }

    /// True when the run starts with a created/deleted event, meaning the
    /// fold must start from the empty projection instead of the cache.
    pub fn lifecycle_reset(&self) -> bool {
        self.lifecycle_reset
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Partitions a signal list into the persisted thing events that matter.
///
/// Non-event signals and live events are dropped. If a created or deleted
/// event is present, everything strictly before the latest one is discarded:
/// a lifecycle reset makes prior history irrelevant. Modifications are not a
/// reset because they merge at the document root.
pub fn classify_signals(signals: &[Signal]) -> ClassifiedRun {
    let twin_events: Vec<ThingEvent> = signals
        .iter()
        .filter_map(|signal| match signal {
            Signal::Event(event) if !event.is_live() => Some(event.clone()),
            _ => None,
        })
        .collect();

    let boundary = twin_events
        .iter()
        .rposition(ThingEvent::is_lifecycle_boundary);
    let events = match boundary {
        Some(index) => twin_events[index..].to_vec(),
        None => twin_events,
    };

    ClassifiedRun {
        lifecycle_reset: boundary.is_some(),
        events,
    }
}

/// Correlation context for loads triggered by a signal list: the headers of
/// the last signal (nearest in time), empty when the list is empty.
pub fn last_headers(signals: &[Signal]) -> Headers {
    signals
        .last()
        .map(|signal| signal.headers().clone())
        .unwrap_or_default()
}
