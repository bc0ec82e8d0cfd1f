//! Nominations on an event's ballot

use crate::core::ids::{EventId, MovieId, NominationId, UserId};
use serde::{Deserialize, Serialize};

/// Where a nominated movie would be watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NominationOrigin {
    /// Watched at home on a streaming service
    #[default]
    Streaming,
    /// A trip to a movie theater
    Theater,
}

impl NominationOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            NominationOrigin::Streaming => "streaming",
            NominationOrigin::Theater => "theater",
        }
    }
}

impl std::fmt::Display for NominationOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a nomination points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Candidate {
    Movie(MovieId),
    /// Decider mode: a person who will make the final call
    Person(UserId),
}

/// A candidate entered into an event's ballot
///
/// Created when a user nominates, destroyed when withdrawn, immutable
/// otherwise.
///
/// # Example
///
/// ```
/// use marquee_domain::{Nomination, NominationOrigin};
///
/// let nom = Nomination::movie("nom-1", "evt-1", "tt0133093", "alice")
///     .with_title("The Matrix")
///     .at_theater("Roxie", Some("7pm show"));
/// assert_eq!(nom.origin, NominationOrigin::Theater);
/// assert_eq!(nom.movie_id().map(|m| m.as_str()), Some("tt0133093"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    pub id: NominationId,
    pub event_id: EventId,
    pub candidate: Candidate,
    #[serde(default)]
    pub origin: NominationOrigin,
    pub nominated_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_notes: Option<String>,
}

impl Nomination {
    pub fn new(
        id: impl Into<NominationId>,
        event_id: impl Into<EventId>,
        candidate: Candidate,
        nominated_by: impl Into<UserId>,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            candidate,
            origin: NominationOrigin::Streaming,
            nominated_by: nominated_by.into(),
            title: None,
            venue_name: None,
            venue_notes: None,
        }
    }

    /// Streaming movie nomination
    pub fn movie(
        id: impl Into<NominationId>,
        event_id: impl Into<EventId>,
        movie_id: impl Into<MovieId>,
        nominated_by: impl Into<UserId>,
    ) -> Self {
        Self::new(id, event_id, Candidate::Movie(movie_id.into()), nominated_by)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Turn this into a theater-trip nomination
    pub fn at_theater(mut self, venue: impl Into<String>, notes: Option<&str>) -> Self {
        self.origin = NominationOrigin::Theater;
        self.venue_name = Some(venue.into());
        self.venue_notes = notes.map(str::to_string);
        self
    }

    /// The nominated movie, if this is a movie nomination
    pub fn movie_id(&self) -> Option<&MovieId> {
        match &self.candidate {
            Candidate::Movie(id) => Some(id),
            Candidate::Person(_) => None,
        }
    }

    /// Title for display, falling back to the candidate id
    pub fn display_title(&self) -> &str {
        if let Some(title) = &self.title {
            return title;
        }
        match &self.candidate {
            Candidate::Movie(id) => id.as_str(),
            Candidate::Person(id) => id.as_str(),
        }
    }

    /// Venue line for theater trips ("Roxie | 7pm show")
    pub fn venue_summary(&self) -> Option<String> {
        if self.origin != NominationOrigin::Theater {
            return None;
        }
        let parts: Vec<&str> = [self.venue_name.as_deref(), self.venue_notes.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_nomination_defaults() {
        let nom = Nomination::movie("n1", "e1", "m1", "alice");
        assert_eq!(nom.origin, NominationOrigin::Streaming);
        assert_eq!(nom.movie_id(), Some(&MovieId::new("m1")));
        assert_eq!(nom.display_title(), "m1");
        assert!(nom.venue_summary().is_none());
    }

    #[test]
    fn test_person_candidate_has_no_movie() {
        let nom = Nomination::new("n2", "e1", Candidate::Person(UserId::new("bob")), "alice");
        assert!(nom.movie_id().is_none());
        assert_eq!(nom.display_title(), "bob");
    }

    #[test]
    fn test_venue_summary() {
        let nom = Nomination::movie("n1", "e1", "m1", "alice").at_theater("Roxie", Some("7pm"));
        assert_eq!(nom.venue_summary().as_deref(), Some("Roxie | 7pm"));

        let bare = Nomination::movie("n1", "e1", "m1", "alice").at_theater("", None);
        assert!(bare.venue_summary().is_none());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "id": "n1",
            "event_id": "e1",
            "candidate": {"kind": "movie", "id": "m1"},
            "nominated_by": "alice"
        }"#;
        let nom: Nomination = serde_json::from_str(json).unwrap();
        assert_eq!(nom.origin, NominationOrigin::Streaming);
        assert!(nom.title.is_none());
    }
}
