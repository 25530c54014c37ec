use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for build-xpi
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Sort directory entries by name before writing them
    pub sorted: bool,

    /// Directory to package (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Alternative packaging configuration file
    pub manifest: Option<PathBuf>,
}

impl Args {
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            sorted: matches.get_flag("sorted"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            manifest: matches.get_one::<String>("manifest").map(PathBuf::from),
        }
    }
}

fn command() -> Command {
    Command::new("build-xpi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Package the Zotero plugin sources into an XPI archive")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("DIR")
                .help("Directory containing the plugin sources"),
        )
        .arg(
            Arg::new("manifest")
                .short('m')
                .long("manifest")
                .value_name("FILE")
                .help("Packaging configuration to use instead of xpi.toml"),
        )
        .arg(
            Arg::new("sorted")
                .long("sorted")
                .action(ArgAction::SetTrue)
                .help("Write directory contents in name order for reproducible archives"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
}
