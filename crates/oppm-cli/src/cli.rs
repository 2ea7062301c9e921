use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "oppm")]
#[command(about = "Portable application manager", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create an installation root and point the configuration at it
    Init {
        /// Root directory (defaults to the per-user location)
        #[arg(short, long)]
        root_dir: Option<PathBuf>,
    },
    /// List installed applications
    List,
    /// Install an application from a directory, executable, or archive
    Install {
        path: PathBuf,
        /// Install under this name instead of the derived one
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove an installed application and its shims
    Remove { name: String },
    /// Resynchronize metadata with the applications directory
    Update,
    /// Remove every application and shim
    Clean,
    /// Move the entire root to a new location
    Migrate { new_root: PathBuf },
    /// Archive the entire root into a portable .tar.gz
    Pack {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace an existing output file
        #[arg(long)]
        overwrite: bool,
    },
    /// Restore a packed root from an archive
    Rebuild {
        archive: PathBuf,
        /// Target root directory (defaults to the per-user location)
        #[arg(short, long)]
        root_dir: Option<PathBuf>,
        /// Replace a non-empty target without prompting
        #[arg(long)]
        force: bool,
    },
    /// Manage executable shims
    Exe {
        #[command(subcommand)]
        command: ExeCommands,
    },
    /// Show the current configuration
    Config,
    /// Check metadata, applications, and shims for divergence
    Health {
        /// Repair every detected issue
        #[arg(long)]
        fix: bool,
    },
    /// Generate a shell completion script
    Completions { shell: Shell },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ExeCommands {
    /// Create a shim for an installed executable
    Add {
        path: PathBuf,
        /// Shim name (defaults to the executable's stem)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete a shim by name
    Delete { name: String },
    /// List all shims and their targets
    Show,
}
