//! Status delivery module
//!
//! The hotword loop hands events to a [`StatusSender`]; a separate
//! presentation task drains them in order into a status sink.

mod console;
mod dispatch;

pub use console::{ConsoleSink, StatusFormat};
pub use dispatch::{channel, present, StatusSender};

#[cfg(test)]
pub use dispatch::StatusReceiver;
