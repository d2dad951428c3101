mod move_instance;

pub use move_instance::MoveInstance;
