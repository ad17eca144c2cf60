//! Provider Abstractions - Entry Point
//!
//! Binary entry point of the `pab` command line. Lives in the `pab` facade
//! crate so every provider module is linked in.

// Force-link pab-providers to ensure linkme registrations are included
extern crate pab_providers;

use clap::Parser;
use pab::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}
