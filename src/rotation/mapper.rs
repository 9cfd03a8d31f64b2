use serde::Serialize;

use super::models::{Lineup, Side, Slot, TeamLineup};
use crate::stats::{PlayerKey, Rotation};

/// Front-row slots for rotations 1 through 6
pub type FrontRowTable = [[Slot; 3]; Rotation::COUNT];

/// Opponent front row, listed OH, MB, RS
pub const OPPONENT_FRONT_ROWS: FrontRowTable = [
    [Slot::OH1, Slot::MB1, Slot::RS1],
    [Slot::OH2, Slot::MB1, Slot::RS1],
    [Slot::OH2, Slot::MB2, Slot::RS1],
    [Slot::OH2, Slot::MB2, Slot::RS2],
    [Slot::OH1, Slot::MB2, Slot::RS2],
    [Slot::OH1, Slot::MB1, Slot::RS2],
];

/// Home front row, listed RS, MB, OH. Kept separate from the opponent table;
/// the two cycles differ and are not meant to be derived from each other.
pub const HOME_FRONT_ROWS: FrontRowTable = [
    [Slot::RS1, Slot::MB1, Slot::OH1],
    [Slot::RS1, Slot::MB1, Slot::OH2],
    [Slot::RS1, Slot::MB2, Slot::OH2],
    [Slot::RS2, Slot::MB2, Slot::OH2],
    [Slot::RS2, Slot::MB2, Slot::OH1],
    [Slot::RS2, Slot::MB1, Slot::OH1],
];

/// The three players eligible to attack, in table order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontRow([PlayerKey; 3]);

impl FrontRow {
    pub fn new(players: [PlayerKey; 3]) -> Self {
        Self(players)
    }

    pub fn players(&self) -> &[PlayerKey; 3] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerKey> {
        self.0.iter()
    }
}

pub fn front_row(team: &TeamLineup, rotation: Rotation, table: &FrontRowTable) -> FrontRow {
    FrontRow(table[rotation.index()].map(|slot| team.player(slot)))
}

pub fn opponent_front_row(lineup: &Lineup, rotation: Rotation) -> FrontRow {
    front_row(&lineup.opponent, rotation, &OPPONENT_FRONT_ROWS)
}

/// Home front row facing the opponent's `rotation`
pub fn home_front_row(lineup: &Lineup, rotation: Rotation) -> FrontRow {
    let adjusted = adjusted_rotation_for(lineup, rotation);
    front_row(&lineup.home, adjusted, &HOME_FRONT_ROWS)
}

/// Maps the opponent's rotation onto the home team's rotation.
///
/// The offset between starting rotations is shifted by one more step when
/// the home team serves first. For fixed inputs this is a cyclic
/// permutation of 1..=6.
pub fn adjusted_rotation(
    home_start: Rotation,
    opponent_start: Rotation,
    serving_first: Side,
    rotation: Rotation,
) -> Rotation {
    let offset = (i32::from(home_start.get()) - i32::from(opponent_start.get())).rem_euclid(6);
    let shift = match serving_first {
        Side::Opponent => -1,
        Side::Home => -2,
    };
    let wrapped = (i32::from(rotation.get()) + offset + shift).rem_euclid(6);
    Rotation::from_index(wrapped as usize)
}

pub fn adjusted_rotation_for(lineup: &Lineup, rotation: Rotation) -> Rotation {
    adjusted_rotation(
        lineup.starting_rotation.home,
        lineup.starting_rotation.opponent,
        lineup.serving_first,
        rotation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn rotation(value: u8) -> Rotation {
        Rotation::new(value).unwrap()
    }

    fn numbered_team() -> TeamLineup {
        let mut team = TeamLineup::default();
        team.assign(Slot::OH1, "1");
        team.assign(Slot::OH2, "2");
        team.assign(Slot::MB1, "3");
        team.assign(Slot::MB2, "4");
        team.assign(Slot::RS1, "5");
        team.assign(Slot::RS2, "6");
        team
    }

    fn numbers(row: &FrontRow) -> Vec<&str> {
        row.iter().map(PlayerKey::as_str).collect()
    }

    #[rstest]
    #[case(1, ["1", "3", "5"])]
    #[case(2, ["2", "3", "5"])]
    #[case(3, ["2", "4", "5"])]
    #[case(4, ["2", "4", "6"])]
    #[case(5, ["1", "4", "6"])]
    #[case(6, ["1", "3", "6"])]
    fn opponent_table_cycles_each_group(#[case] rot: u8, #[case] expected: [&str; 3]) {
        let row = front_row(&numbered_team(), rotation(rot), &OPPONENT_FRONT_ROWS);
        assert_eq!(numbers(&row), expected);
    }

    #[rstest]
    #[case(1, ["5", "3", "1"])]
    #[case(2, ["5", "3", "2"])]
    #[case(3, ["5", "4", "2"])]
    #[case(4, ["6", "4", "2"])]
    #[case(5, ["6", "4", "1"])]
    #[case(6, ["6", "3", "1"])]
    fn home_table_lists_right_side_first(#[case] rot: u8, #[case] expected: [&str; 3]) {
        let row = front_row(&numbered_team(), rotation(rot), &HOME_FRONT_ROWS);
        assert_eq!(numbers(&row), expected);
    }

    #[test]
    fn unassigned_slots_map_to_unknown_player() {
        let mut team = TeamLineup::default();
        team.assign(Slot::MB1, "8");

        let row = front_row(&team, rotation(1), &OPPONENT_FRONT_ROWS);

        assert!(row.players()[0].is_unknown());
        assert_eq!(row.players()[1].as_str(), "8");
        assert!(row.players()[2].is_unknown());
    }

    #[rstest]
    #[case(1, 1, Side::Opponent, 1, 1)]
    #[case(1, 1, Side::Home, 1, 6)]
    #[case(1, 1, Side::Home, 2, 1)]
    #[case(3, 1, Side::Opponent, 1, 3)]
    #[case(1, 3, Side::Opponent, 1, 5)]
    #[case(6, 1, Side::Home, 6, 4)]
    fn adjusts_rotation_by_start_offset_and_server(
        #[case] home_start: u8,
        #[case] opponent_start: u8,
        #[case] serving_first: Side,
        #[case] rot: u8,
        #[case] expected: u8,
    ) {
        let adjusted = adjusted_rotation(
            rotation(home_start),
            rotation(opponent_start),
            serving_first,
            rotation(rot),
        );
        assert_eq!(adjusted.get(), expected);
    }

    #[test]
    fn adjusted_rotation_is_a_cyclic_permutation() {
        for home_start in Rotation::all() {
            for opponent_start in Rotation::all() {
                for serving_first in [Side::Home, Side::Opponent] {
                    let images: Vec<u8> = Rotation::all()
                        .map(|rot| {
                            adjusted_rotation(home_start, opponent_start, serving_first, rot).get()
                        })
                        .collect();

                    let distinct: BTreeSet<u8> = images.iter().copied().collect();
                    assert_eq!(distinct.len(), 6);

                    for window in images.windows(2) {
                        assert_eq!(window[1], window[0] % 6 + 1);
                    }
                }
            }
        }
    }

    #[test]
    fn home_front_row_uses_adjusted_rotation() {
        let mut lineup = Lineup {
            home: numbered_team(),
            opponent: numbered_team(),
            ..Lineup::default()
        };
        lineup.serving_first = Side::Home;

        // home serves first with equal starts: opponent rotation 2 faces home rotation 1
        let row = home_front_row(&lineup, rotation(2));

        assert_eq!(numbers(&row), ["5", "3", "1"]);
    }
}
