pub mod alphabet;
pub mod cli;
pub mod freq_count;
