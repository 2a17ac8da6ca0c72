use kosa_protocol::{Event, EventKind, PlayerId};

/// Append-only, ordered record of everything that happened in a game.
///
/// Nothing is ever removed or edited; every query is a linear scan, which is
/// fine for the few hundred events a game produces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: Event) -> &mut Self {
        self.events.push(event);
        self
    }

    /// Append only when no structurally equal event is already logged.
    pub fn add_if_new(&mut self, event: Event) -> &mut Self {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
        self
    }

    pub fn filter(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    pub fn filter_by(
        &self,
        player: PlayerId,
        kind: EventKind,
    ) -> impl Iterator<Item = &Event> + '_ {
        self.events
            .iter()
            .filter(move |e| e.player() == player && e.kind() == kind)
    }

    /// Most recent event of one of `kinds` that satisfies `predicate`.
    pub fn last_of(
        &self,
        kinds: &[EventKind],
        predicate: impl Fn(&Event) -> bool,
    ) -> Option<&Event> {
        self.events
            .iter()
            .rev()
            .find(|e| kinds.contains(&e.kind()) && predicate(*e))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl From<Vec<Event>> for EventLog {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
