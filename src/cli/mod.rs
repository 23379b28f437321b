// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Fabstir Relight CLI
#[derive(Parser, Debug)]
#[command(name = "relight-cli")]
#[command(version = "0.1.0")]
#[command(about = "Lighting prompts and one-off lighting edits", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the lighting prompt for an angle pair
    Prompt(commands::PromptArgs),

    /// Print the default edit size for an image
    Dimensions(commands::DimensionsArgs),

    /// Relight an image through the diffusion sidecar
    Edit(commands::EditArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Prompt(args) => {
            println!("{}", commands::prompt(&args));
            Ok(())
        }
        Commands::Dimensions(args) => {
            let dims = commands::dimensions(&args)?;
            println!("{}x{}", dims.width, dims.height);
            Ok(())
        }
        Commands::Edit(args) => {
            let summary = commands::edit(&args).await?;
            println!("Output: {}", summary.output.display());
            println!("Size:   {}x{}", summary.width, summary.height);
            println!("Seed:   {}", summary.seed);
            println!("Prompt: {}", summary.prompt);
            Ok(())
        }
    }
}
