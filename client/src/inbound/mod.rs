//! Inbound adapters that translate user input into store and workflow calls
//! while keeping framework details at the edge.
//!
//! The command-line front end lives under [`cli`].

pub mod cli;
