use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::stats::{PlayerKey, Rotation};

/// Named lineup slot: two each of outside hitter, middle blocker and right side
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Slot {
    OH1,
    OH2,
    MB1,
    MB2,
    RS1,
    RS2,
}

/// Which team a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Side {
    #[default]
    #[serde(alias = "Rams")]
    Home,
    Opponent,
}

/// Player assigned to a slot, stored as `{"number": "12"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl SlotAssignment {
    pub fn new(number: impl Into<String>) -> Self {
        let number = number.into();
        let trimmed = number.trim();
        Self {
            number: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Ledger key for this slot; unassigned slots share the unknown key
    pub fn player_key(&self) -> PlayerKey {
        PlayerKey::from(self.number.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawJersey {
    Text(String),
    Numeric(u64),
}

impl RawJersey {
    fn into_string(self) -> String {
        match self {
            RawJersey::Text(text) => text,
            RawJersey::Numeric(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAssignment {
    Object {
        #[serde(default)]
        number: Option<RawJersey>,
    },
    Bare(RawJersey),
    Empty,
}

impl<'de> Deserialize<'de> for SlotAssignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = match RawAssignment::deserialize(deserializer)? {
            RawAssignment::Object { number } => number.map(RawJersey::into_string),
            RawAssignment::Bare(jersey) => Some(jersey.into_string()),
            RawAssignment::Empty => None,
        };
        Ok(number.map(SlotAssignment::new).unwrap_or_default())
    }
}

/// Six named slots for one team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamLineup {
    #[serde(rename = "OH1")]
    pub oh1: SlotAssignment,
    #[serde(rename = "OH2")]
    pub oh2: SlotAssignment,
    #[serde(rename = "MB1")]
    pub mb1: SlotAssignment,
    #[serde(rename = "MB2")]
    pub mb2: SlotAssignment,
    #[serde(rename = "RS1")]
    pub rs1: SlotAssignment,
    #[serde(rename = "RS2")]
    pub rs2: SlotAssignment,
}

impl TeamLineup {
    pub fn slot(&self, slot: Slot) -> &SlotAssignment {
        match slot {
            Slot::OH1 => &self.oh1,
            Slot::OH2 => &self.oh2,
            Slot::MB1 => &self.mb1,
            Slot::MB2 => &self.mb2,
            Slot::RS1 => &self.rs1,
            Slot::RS2 => &self.rs2,
        }
    }

    pub fn assign(&mut self, slot: Slot, number: impl Into<String>) {
        let assignment = SlotAssignment::new(number);
        match slot {
            Slot::OH1 => self.oh1 = assignment,
            Slot::OH2 => self.oh2 = assignment,
            Slot::MB1 => self.mb1 = assignment,
            Slot::MB2 => self.mb2 = assignment,
            Slot::RS1 => self.rs1 = assignment,
            Slot::RS2 => self.rs2 = assignment,
        }
    }

    pub fn player(&self, slot: Slot) -> PlayerKey {
        self.slot(slot).player_key()
    }
}

/// Rotation each team starts the set in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingRotation {
    #[serde(alias = "rams", deserialize_with = "lenient_rotation")]
    pub home: Rotation,
    #[serde(deserialize_with = "lenient_rotation")]
    pub opponent: Rotation,
}

/// Accepts `3` or `"3"`; anything outside 1-6 falls back to rotation 1
fn lenient_rotation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rotation, D::Error> {
    let raw = Option::<RawJersey>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|raw| raw.into_string().parse::<Rotation>().ok())
        .unwrap_or_default())
}

pub const DEFAULT_OPPONENT_NAME: &str = "Opponent";

/// Both teams' slot assignments and serve configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lineup {
    #[serde(alias = "rams")]
    pub home: TeamLineup,
    pub opponent: TeamLineup,
    pub starting_rotation: StartingRotation,
    pub serving_first: Side,
    pub opponent_name: String,
}

impl Default for Lineup {
    fn default() -> Self {
        Self {
            home: TeamLineup::default(),
            opponent: TeamLineup::default(),
            starting_rotation: StartingRotation::default(),
            serving_first: Side::Home,
            opponent_name: DEFAULT_OPPONENT_NAME.to_string(),
        }
    }
}

impl Lineup {
    /// Team name used for ledger and tendency keys
    pub fn team_name(&self) -> &str {
        let trimmed = self.opponent_name.trim();
        if trimmed.is_empty() {
            DEFAULT_OPPONENT_NAME
        } else {
            trimmed
        }
    }

    /// Replaces a blank opponent name with the default
    pub fn normalized(mut self) -> Self {
        self.opponent_name = self.team_name().to_string();
        self
    }
}
