//! Decision makers for leaders the host does not steer.

pub mod leader_ai;
