//! Attendee roster for decider mode

use crate::core::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A person who may be drawn as the decider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Which source a roster was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSource {
    /// The event's attendee records
    Attendees,
    /// Members of the event's group (event had no attendees)
    GroupMembers,
}

/// People eligible in decider mode, de-duplicated by id
///
/// Attendees take precedence; group members are used only when the event has
/// no attendee records at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeRoster {
    people: Vec<Person>,
    source: RosterSource,
}

impl AttendeeRoster {
    pub fn from_sources(attendees: Vec<Person>, group_members: Vec<Person>) -> Self {
        if attendees.is_empty() {
            Self::build(group_members, RosterSource::GroupMembers)
        } else {
            Self::build(attendees, RosterSource::Attendees)
        }
    }

    fn build(people: Vec<Person>, source: RosterSource) -> Self {
        let mut seen = HashSet::new();
        let people = people
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        Self { people, source }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn source(&self) -> RosterSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
