use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{fmt::Display, path::PathBuf};

/// The labels the demo tree is built from when none are supplied.
pub const DEMO_LABELS: [&str; 11] = [
    "etc", "pi", "chi", "pki", "ro", "gdb", "libnl", "gss", "ldap", "opt", "bare",
];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub tree: TreeParams,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the commitment of the tree.
    Commit,
    /// Generate and verify the witness for a single leaf.
    Prove(prove::Params),
    /// Generate and verify a deduplicated witness for several paths at once.
    ProveBatch(prove::BatchParams),
    /// Print the keys of the tree in in-order.
    InOrder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HashKind {
    Sha256,
    Sha512,
    Blake3,
    Keccak256,
    Md5,
}

impl Display for HashKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HashKind::Sha256 => "sha256",
            HashKind::Sha512 => "sha512",
            HashKind::Blake3 => "blake3",
            HashKind::Keccak256 => "keccak256",
            HashKind::Md5 => "md5",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Args)]
pub struct TreeParams {
    /// Hash function used to build the tree and verify witnesses.
    #[clap(default_value_t = HashKind::Sha256)]
    #[arg(long, global = true, value_enum)]
    pub hasher: HashKind,

    /// Labels of the tree, in heap order.
    ///
    /// Use ',' to separate labels.
    ///
    /// Leave this and `--labels-file` empty to use the built-in demo labels.
    #[clap(value_delimiter = ',')]
    #[arg(long, global = true, conflicts_with = "labels_file")]
    pub labels: Vec<String>,

    /// File holding the labels of the tree, one per line, in heap order.
    #[arg(long, global = true)]
    pub labels_file: Option<PathBuf>,
}

pub mod prove {
    use super::Args;

    #[derive(Debug, Args)]
    pub struct Params {
        /// Path to the leaf, keys separated by '/', starting with the root key.
        pub path: String,
    }

    #[derive(Debug, Args)]
    pub struct BatchParams {
        /// Paths to prove, keys separated by '/', each starting with the root key.
        #[arg(required = true)]
        pub paths: Vec<String>,
    }
}
