mod tank;

pub use tank::{Tank, TANK_HEALTH};
