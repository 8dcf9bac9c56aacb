//! Child process plumbing: command lines, output capture, interrupts, and launching.

pub mod capture;
pub mod command;
pub mod interrupt;
pub mod launcher;

pub use capture::{CapturedOutput, INITIAL_CAPACITY, READ_CHUNK, read_captured};
pub use command::CommandLine;
pub use interrupt::InterruptWatch;
pub use launcher::{ExitOutcome, Launcher, SystemLauncher};
