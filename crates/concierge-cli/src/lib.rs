//! Terminal client for the Soccer Referee Concierge

pub mod cli;
pub mod commands;
pub mod context;
pub mod formatting;
pub mod input;
