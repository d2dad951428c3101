mod move_visitor;

pub use move_visitor::MoveVisitor;
