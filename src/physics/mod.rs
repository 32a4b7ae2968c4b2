//! Falling sand and flowing water

pub mod window;
pub mod rule;
pub mod automaton;

pub use window::PhysicsWindow;
pub use automaton::PhysicsAutomaton;
