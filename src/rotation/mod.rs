pub mod handlers;
pub mod mapper;
pub mod models;
pub mod repository;

pub use mapper::{
    adjusted_rotation, front_row, home_front_row, opponent_front_row, FrontRow, FrontRowTable,
    HOME_FRONT_ROWS, OPPONENT_FRONT_ROWS,
};
pub use models::{Lineup, Side, Slot, SlotAssignment, StartingRotation, TeamLineup};
pub use repository::LineupRepository;
