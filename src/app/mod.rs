//! Application module

pub mod cli;
pub mod output;
pub mod startup;

#[cfg(test)]
mod tests;
