//! Command-line interface parsing and validation
//!
//! This module handles CLI argument parsing using clap and validates
//! user inputs for correctness.

use crate::page::Action;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "formset")]
#[command(version = "0.0.1")]
#[command(about = "Add and remove repeatable items in rendered form collections", long_about = None)]
pub struct Cli {
    /// Path to the rendered HTML page
    pub file: PathBuf,

    /// Action to run after initialization: `add`, `remove:<serial>` (repeatable, applied in order)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    pub actions: Vec<Action>,

    /// Index of the collection the actions apply to, in document order
    #[arg(short = 'i', long, value_name = "INDEX", default_value_t = 0)]
    pub collection: usize,

    /// Write the resulting HTML here instead of stdout
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print a JSON summary of every collection to stderr
    #[arg(short = 's', long)]
    pub summary: bool,

    /// Load settings from this file instead of the user config directory
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments
    /// Returns error if the input, output and log file paths collide
    pub fn validate(&self) -> Result<(), String> {
        if let Some(output) = &self.output {
            if output == &self.file {
                return Err("Output path must differ from the input file".to_string());
            }
            if self.log_file.as_ref() == Some(output) {
                return Err("Log file must differ from the output path".to_string());
            }
        }
        if self.log_file.as_ref() == Some(&self.file) {
            return Err("Log file must differ from the input file".to_string());
        }
        Ok(())
    }
}
