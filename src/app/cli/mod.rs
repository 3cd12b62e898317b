//! CLI argument parsing and input loading

pub mod args;
pub mod inputs;

#[cfg(test)]
mod tests;
