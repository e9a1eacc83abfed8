//! Lifecycle module: loop control and process signals

mod controller;
mod signals;

pub use controller::{ControlError, ListenerController};
pub use signals::{ControlSignal, ControlSignals};
