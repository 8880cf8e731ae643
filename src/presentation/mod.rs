// Presentation layer - Console output and command line
pub mod cli;
pub mod console;
