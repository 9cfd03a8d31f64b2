use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::StatsError;

/// One of the six serve-rotation configurations (1-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const COUNT: usize = 6;

    pub fn new(value: u8) -> Result<Self, StatsError> {
        if (1..=Self::COUNT as u8).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StatsError::InvalidRotation(value.to_string()))
        }
    }

    /// Rotation for a zero-based table index, wrapping past six
    pub fn from_index(index: usize) -> Self {
        Self((index % Self::COUNT) as u8 + 1)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in per-rotation tables
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = Rotation> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = StatsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl FromStr for Rotation {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| StatsError::InvalidRotation(s.to_string()))
            .and_then(Self::new)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key used for unassigned lineup slots
pub const UNKNOWN_PLAYER: &str = "?";

/// Jersey number identifying a player inside a ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Blank numbers collapse to the unknown sentinel
    pub fn new(number: impl AsRef<str>) -> Self {
        let trimmed = number.as_ref().trim();
        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_PLAYER.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_PLAYER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlayerKey {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<String> for PlayerKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PlayerKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Option<&str>> for PlayerKey {
    fn from(value: Option<&str>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl From<PlayerKey> for String {
    fn from(key: PlayerKey) -> Self {
        key.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactType {
    Swing,
    Tip,
    Roll,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MainStat {
    Kills,
    Errors,
    Attempts,
}

/// Court zone 1-6 where an attack landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Zone(u8);

impl Zone {
    pub fn new(value: u8) -> Result<Self, StatsError> {
        if (1..=6).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StatsError::InvalidZone(value.to_string()))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl FromStr for Zone {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| StatsError::InvalidZone(s.to_string()))
            .and_then(Self::new)
    }
}

/// Where a kill or attempt ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Zone(Zone),
    Tool,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Blocked,
    Out,
    Net,
}

/// Terminal choice of a stat entry as the UI sends it: `"1"`..`"6"`, `tool`,
/// `blocked`, `out` or `net`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Detail {
    Zone(Zone),
    Tool,
    Error(ErrorKind),
}

impl FromStr for Detail {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "tool" {
            return Ok(Detail::Tool);
        }
        if let Ok(kind) = ErrorKind::from_str(trimmed) {
            return Ok(Detail::Error(kind));
        }
        trimmed
            .parse::<Zone>()
            .map(Detail::Zone)
            .map_err(|_| StatsError::UnknownDetail(s.to_string()))
    }
}

impl TryFrom<String> for Detail {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self, StatsError> {
        value.parse()
    }
}

impl From<Detail> for String {
    fn from(detail: Detail) -> Self {
        detail.to_string()
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Zone(zone) => write!(f, "{}", zone.get()),
            Detail::Tool => f.write_str("tool"),
            Detail::Error(kind) => f.write_str(kind.as_ref()),
        }
    }
}

/// A fully specified stat entry whose detail always matches its main stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Kill { contact: ContactType, target: Target },
    Error { contact: ContactType, kind: ErrorKind },
    Attempt { contact: ContactType, target: Target },
}

impl Outcome {
    /// Errors take `blocked | out | net`; kills and attempts take a zone or `tool`.
    pub fn from_parts(
        main: MainStat,
        contact: ContactType,
        detail: Detail,
    ) -> Result<Self, StatsError> {
        let target = match detail {
            Detail::Zone(zone) => Some(Target::Zone(zone)),
            Detail::Tool => Some(Target::Tool),
            Detail::Error(_) => None,
        };

        match (main, detail, target) {
            (MainStat::Errors, Detail::Error(kind), _) => Ok(Outcome::Error { contact, kind }),
            (MainStat::Kills, _, Some(target)) => Ok(Outcome::Kill { contact, target }),
            (MainStat::Attempts, _, Some(target)) => Ok(Outcome::Attempt { contact, target }),
            _ => Err(StatsError::InvalidDetail { main, detail }),
        }
    }

    pub fn main_stat(&self) -> MainStat {
        match self {
            Outcome::Kill { .. } => MainStat::Kills,
            Outcome::Error { .. } => MainStat::Errors,
            Outcome::Attempt { .. } => MainStat::Attempts,
        }
    }

    pub fn contact(&self) -> ContactType {
        match self {
            Outcome::Kill { contact, .. }
            | Outcome::Error { contact, .. }
            | Outcome::Attempt { contact, .. } => *contact,
        }
    }

    pub fn detail(&self) -> Detail {
        match self {
            Outcome::Kill { target, .. } | Outcome::Attempt { target, .. } => match target {
                Target::Zone(zone) => Detail::Zone(*zone),
                Target::Tool => Detail::Tool,
            },
            Outcome::Error { kind, .. } => Detail::Error(*kind),
        }
    }

    /// Kills and errors also count as an attempt
    pub fn implies_attempt(&self) -> bool {
        !matches!(self, Outcome::Attempt { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactCounts {
    pub swing: u32,
    pub tip: u32,
    pub roll: u32,
}

impl ContactCounts {
    pub fn get(&self, contact: ContactType) -> u32 {
        match contact {
            ContactType::Swing => self.swing,
            ContactType::Tip => self.tip,
            ContactType::Roll => self.roll,
        }
    }

    fn slot_mut(&mut self, contact: ContactType) -> &mut u32 {
        match contact {
            ContactType::Swing => &mut self.swing,
            ContactType::Tip => &mut self.tip,
            ContactType::Roll => &mut self.roll,
        }
    }

    pub fn sum(&self) -> u64 {
        u64::from(self.swing) + u64::from(self.tip) + u64::from(self.roll)
    }

    fn merge(&mut self, other: &ContactCounts, field: &'static str) -> Result<(), StatsError> {
        add(&mut self.swing, other.swing, field)?;
        add(&mut self.tip, other.tip, field)?;
        add(&mut self.roll, other.roll, field)
    }
}

/// Per-zone counters, stored as `{"1": n, ..., "6": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ZoneCounts([u32; 6]);

impl ZoneCounts {
    pub fn get(&self, zone: Zone) -> u32 {
        self.0[zone.index()]
    }

    pub fn sum(&self) -> u64 {
        self.0.iter().map(|&count| u64::from(count)).sum()
    }

    fn merge(&mut self, other: &ZoneCounts, field: &'static str) -> Result<(), StatsError> {
        for (count, extra) in self.0.iter_mut().zip(other.0) {
            add(count, extra, field)?;
        }
        Ok(())
    }
}

impl Serialize for ZoneCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, count) in self.0.iter().enumerate() {
            map.serialize_entry(&(index + 1).to_string(), count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ZoneCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        let mut counts = [0; 6];
        for (key, count) in raw {
            let zone = key.parse::<Zone>().map_err(de::Error::custom)?;
            counts[zone.index()] = count;
        }
        Ok(Self(counts))
    }
}

/// Kill or attempt counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackLine {
    pub total: u32,
    pub contact: ContactCounts,
    pub zones: ZoneCounts,
    pub tool: u32,
}

impl AttackLine {
    fn target_slot_mut(&mut self, target: Target) -> &mut u32 {
        match target {
            Target::Zone(zone) => &mut self.zones.0[zone.index()],
            Target::Tool => &mut self.tool,
        }
    }

    pub fn target_sum(&self) -> u64 {
        self.zones.sum() + u64::from(self.tool)
    }

    fn merge(&mut self, other: &AttackLine, field: &'static str) -> Result<(), StatsError> {
        add(&mut self.total, other.total, field)?;
        self.contact.merge(&other.contact, field)?;
        self.zones.merge(&other.zones, field)?;
        add(&mut self.tool, other.tool, field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorLine {
    pub total: u32,
    pub contact: ContactCounts,
    pub blocked: u32,
    pub out: u32,
    pub net: u32,
}

impl ErrorLine {
    fn kind_slot_mut(&mut self, kind: ErrorKind) -> &mut u32 {
        match kind {
            ErrorKind::Blocked => &mut self.blocked,
            ErrorKind::Out => &mut self.out,
            ErrorKind::Net => &mut self.net,
        }
    }

    pub fn kind_sum(&self) -> u64 {
        u64::from(self.blocked) + u64::from(self.out) + u64::from(self.net)
    }

    fn merge(&mut self, other: &ErrorLine) -> Result<(), StatsError> {
        add(&mut self.total, other.total, "errors")?;
        self.contact.merge(&other.contact, "errors")?;
        add(&mut self.blocked, other.blocked, "errors")?;
        add(&mut self.out, other.out, "errors")?;
        add(&mut self.net, other.net, "errors")
    }
}

/// All counters for one player in one rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub kills: AttackLine,
    pub errors: ErrorLine,
    pub attempts: AttackLine,
}

impl StatLine {
    pub fn is_blank(&self) -> bool {
        *self == StatLine::default()
    }

    /// Events feeding the attacker share: kills + errors + attempts
    pub fn event_count(&self) -> u64 {
        u64::from(self.kills.total) + u64::from(self.errors.total) + u64::from(self.attempts.total)
    }

    /// Counts one outcome. Leaves `self` partially updated when a counter is
    /// already at its maximum, so callers apply it to a copy.
    pub(crate) fn record(&mut self, outcome: &Outcome) -> Result<(), StatsError> {
        let contact = outcome.contact();

        if outcome.implies_attempt() {
            increment(&mut self.attempts.total, "attempts total")?;
            increment(self.attempts.contact.slot_mut(contact), "attempts contact")?;
        }

        match *outcome {
            Outcome::Kill { target, .. } => {
                increment(&mut self.kills.total, "kills total")?;
                increment(self.kills.contact.slot_mut(contact), "kills contact")?;
                increment(self.kills.target_slot_mut(target), "kills detail")?;
            }
            Outcome::Error { kind, .. } => {
                increment(&mut self.errors.total, "errors total")?;
                increment(self.errors.contact.slot_mut(contact), "errors contact")?;
                increment(self.errors.kind_slot_mut(kind), "errors detail")?;
            }
            Outcome::Attempt { target, .. } => {
                increment(&mut self.attempts.total, "attempts total")?;
                increment(self.attempts.contact.slot_mut(contact), "attempts contact")?;
                increment(self.attempts.target_slot_mut(target), "attempts detail")?;
            }
        }

        Ok(())
    }

    /// Adds every counter of `other` into `self`; partial on error like `record`
    pub(crate) fn merge(&mut self, other: &StatLine) -> Result<(), StatsError> {
        self.kills.merge(&other.kills, "kills")?;
        self.errors.merge(&other.errors)?;
        self.attempts.merge(&other.attempts, "attempts")
    }

    /// Exact inverse of `record`. Leaves `self` partially updated on error,
    /// so callers apply it to a copy.
    pub(crate) fn retract(&mut self, outcome: &Outcome) -> Result<(), StatsError> {
        let contact = outcome.contact();

        match *outcome {
            Outcome::Kill { target, .. } => {
                decrement(self.kills.target_slot_mut(target), "kills detail")?;
                decrement(self.kills.contact.slot_mut(contact), "kills contact")?;
                decrement(&mut self.kills.total, "kills total")?;
            }
            Outcome::Error { kind, .. } => {
                decrement(self.errors.kind_slot_mut(kind), "errors detail")?;
                decrement(self.errors.contact.slot_mut(contact), "errors contact")?;
                decrement(&mut self.errors.total, "errors total")?;
            }
            Outcome::Attempt { target, .. } => {
                decrement(self.attempts.target_slot_mut(target), "attempts detail")?;
                decrement(self.attempts.contact.slot_mut(contact), "attempts contact")?;
                decrement(&mut self.attempts.total, "attempts total")?;
            }
        }

        if outcome.implies_attempt() {
            decrement(self.attempts.contact.slot_mut(contact), "attempts contact")?;
            decrement(&mut self.attempts.total, "attempts total")?;
        }

        Ok(())
    }

    /// Describes the first broken counter relationship, if any.
    ///
    /// Kills and errors each contribute one attempt without a zone, so the
    /// attempt target counters add up to `attempts.total - kills.total - errors.total`.
    pub fn invariant_violation(&self) -> Option<String> {
        let checks = [
            (
                u64::from(self.kills.total) == self.kills.contact.sum(),
                "kills total != kills contact sum",
            ),
            (
                u64::from(self.kills.total) == self.kills.target_sum(),
                "kills total != kills zones + tool",
            ),
            (
                u64::from(self.errors.total) == self.errors.contact.sum(),
                "errors total != errors contact sum",
            ),
            (
                u64::from(self.errors.total) == self.errors.kind_sum(),
                "errors total != blocked + out + net",
            ),
            (
                u64::from(self.attempts.total) == self.attempts.contact.sum(),
                "attempts total != attempts contact sum",
            ),
            (
                u64::from(self.attempts.total)
                    == self.attempts.target_sum()
                        + u64::from(self.kills.total)
                        + u64::from(self.errors.total),
                "attempts total != attempts zones + tool + kills + errors",
            ),
        ];

        checks
            .iter()
            .find(|(holds, _)| !holds)
            .map(|(_, message)| message.to_string())
    }
}

fn increment(counter: &mut u32, field: &'static str) -> Result<(), StatsError> {
    add(counter, 1, field)
}

fn add(counter: &mut u32, value: u32, field: &'static str) -> Result<(), StatsError> {
    *counter = counter
        .checked_add(value)
        .ok_or_else(|| StatsError::Inconsistent(format!("{field} counter overflow")))?;
    Ok(())
}

fn decrement(counter: &mut u32, field: &'static str) -> Result<(), StatsError> {
    *counter = counter
        .checked_sub(1)
        .ok_or_else(|| StatsError::Inconsistent(format!("{field} is already zero")))?;
    Ok(())
}

/// Which ledger (pre-match scouting or in-match live) an operation targets
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Scouting,
    Live,
}

impl Mode {
    /// Prefix used in storage keys
    pub fn storage_prefix(self) -> &'static str {
        match self {
            Mode::Scouting => "scout",
            Mode::Live => "live",
        }
    }
}
