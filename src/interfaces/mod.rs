//! Input and output adapters for the command-line front end.

pub mod csv;
