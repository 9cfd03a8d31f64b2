use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::Rotation;

/// Hand-entered attack split by position group for one rotation, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tendency {
    #[serde(rename = "OH")]
    pub oh: u32,
    #[serde(rename = "MB")]
    pub mb: u32,
    #[serde(rename = "RS")]
    pub rs: u32,
}

impl Tendency {
    pub fn new(oh: u32, mb: u32, rs: u32) -> Self {
        Self { oh, mb, rs }
    }
}

/// Tendencies per rotation for one team, stored as `{"<rotation>": Tendency}`
pub type TendencyBook = BTreeMap<Rotation, Tendency>;
