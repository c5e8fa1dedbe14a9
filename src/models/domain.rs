use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel written in place of a coachee when someone sits a round out
pub const UNPAIRED_MARKER: &str = "UNPAIRED";

/// Which roles a participant may take in a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Coach Only", alias = "CoachOnly")]
    CoachOnly,
    #[serde(rename = "Coachee Only", alias = "CoacheeOnly")]
    CoacheeOnly,
    #[serde(rename = "Both")]
    Both,
}

impl Default for Category {
    fn default() -> Self {
        Category::Both
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::CoachOnly => "Coach Only",
            Category::CoacheeOnly => "Coachee Only",
            Category::Both => "Both",
        };
        f.write_str(label)
    }
}

/// A person on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            location: None,
            category,
            exclusions: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn excluding(mut self, other_id: impl Into<String>) -> Self {
        self.exclusions.push(other_id.into());
        self
    }

    /// Location as a usable value; blank strings count as missing
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    pub fn excludes(&self, other_id: &str) -> bool {
        self.exclusions.iter().any(|id| id == other_id)
    }
}

/// The coachee side of a pairing record
#[derive(Debug, Clone, PartialEq)]
pub enum Partner {
    Paired(Participant),
    Unpaired,
}

impl Partner {
    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Partner::Paired(p) => Some(p),
            Partner::Unpaired => None,
        }
    }

    pub fn is_unpaired(&self) -> bool {
        matches!(self, Partner::Unpaired)
    }
}

impl Serialize for Partner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Partner::Paired(p) => p.serialize(serializer),
            Partner::Unpaired => serializer.serialize_str(UNPAIRED_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Partner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Paired(Participant),
            Marker(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Paired(p) => Ok(Partner::Paired(p)),
            Raw::Marker(m) if m == UNPAIRED_MARKER => Ok(Partner::Unpaired),
            Raw::Marker(other) => Err(serde::de::Error::custom(format!(
                "expected participant or \"{}\", got \"{}\"",
                UNPAIRED_MARKER, other
            ))),
        }
    }
}

/// One role-labelled pair produced by a pairing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub coach: Participant,
    pub coachee: Partner,
}

impl PairingRecord {
    pub fn paired(coach: Participant, coachee: Participant) -> Self {
        Self {
            coach,
            coachee: Partner::Paired(coachee),
        }
    }

    pub fn unpaired(alone: Participant) -> Self {
        Self {
            coach: alone,
            coachee: Partner::Unpaired,
        }
    }

    pub fn is_unpaired(&self) -> bool {
        self.coachee.is_unpaired()
    }

    /// True if this record puts both ids in the same pair
    pub fn joins(&self, a: &str, b: &str) -> bool {
        match self.coachee.participant() {
            Some(coachee) => {
                (self.coach.id == a && coachee.id == b) || (self.coach.id == b && coachee.id == a)
            }
            None => false,
        }
    }
}

/// How the location of two people should influence their pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationPreference {
    #[default]
    Ignore,
    Same,
    Different,
}

impl std::str::FromStr for LocationPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(LocationPreference::Ignore),
            "same" => Ok(LocationPreference::Same),
            "different" => Ok(LocationPreference::Different),
            other => Err(format!(
                "unknown location preference '{}', expected Ignore, Same or Different",
                other
            )),
        }
    }
}

/// A saved round of pairings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistoryEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub pairings: Vec<PairingRecord>,
    #[serde(rename = "locationPreference", default)]
    pub location_preference: LocationPreference,
    #[serde(rename = "participantCount", default)]
    pub participant_count: usize,
}

impl SessionHistoryEntry {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>, pairings: Vec<PairingRecord>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            created_at,
            pairings,
            location_preference: LocationPreference::default(),
            participant_count: 0,
        }
    }

    /// Records that actually pair two people
    pub fn paired_records(&self) -> impl Iterator<Item = (&Participant, &Participant)> {
        self.pairings
            .iter()
            .filter_map(|r| r.coachee.participant().map(|c| (&r.coach, c)))
    }
}

/// Result of one pairing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairingOutcome {
    pub pairings: Vec<PairingRecord>,
    pub warnings: Vec<String>,
}

impl PairingOutcome {
    pub fn paired_count(&self) -> usize {
        self.pairings.iter().filter(|r| !r.is_unpaired()).count()
    }
}
