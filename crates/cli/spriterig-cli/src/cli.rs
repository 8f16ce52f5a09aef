use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rebuild sprite rigs and animations from an exported timeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file with reconstruction settings (missing keys keep their defaults)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Translation scale factor (overrides the config file)
    #[arg(short = 's', long = "scale", value_name = "FACTOR", global = true)]
    pub scale: Option<f64>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconstruct every model of a tag export and write them as JSON
    Models {
        /// XML tag export
        #[arg(value_name = "XML")]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Folder of exported shape SVGs to check references against
        #[arg(long = "shapes-dir", value_name = "DIR")]
        shapes_dir: Option<PathBuf>,

        /// Id of the sprite whose timeline lists the models
        #[arg(long = "master-sprite", value_name = "ID", conflicts_with = "root_timeline")]
        master_sprite: Option<String>,

        /// Read models from the document's top-level timeline
        #[arg(long = "root-timeline")]
        root_timeline: bool,
    },

    /// Copy a tag export without its shape definitions
    StripShapes {
        #[arg(value_name = "IN")]
        input: PathBuf,
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },

    /// Inline `<use>` shape references in every SVG of a folder
    InlineSvgs {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Set textureSize in every .svg.meta of a folder from its SVG dimensions
    TextureSizes {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}
