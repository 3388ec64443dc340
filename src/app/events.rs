//! Command-Enum für den Command-Datenfluss vom Kollaborateur zum Controller.

mod command;

pub use command::EditCommand;
