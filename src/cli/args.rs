//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Compress and decompress files with a Huffman prefix code
#[derive(Parser, Debug)]
#[command(name = "huffcode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a file, writing the code tree and the bit stream separately
    Compress {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Bit stream output (default: <INPUT>.short)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Code tree output (default: <INPUT>.code)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        code: Option<PathBuf>,
    },

    /// Decode a bit stream using a saved code tree
    Decompress {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Code tree written by `compress`
        #[arg(short, long, env = "HUFFCODE_CODE_FILE", value_hint = ValueHint::FilePath)]
        code: PathBuf,

        /// Decoded output (default: <INPUT>.new)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the code table and tree of a saved code file
    Show {
        #[arg(env = "HUFFCODE_CODE_FILE", value_hint = ValueHint::FilePath)]
        code: PathBuf,
    },
}

/// `path` with `ext` appended to its full file name.
pub fn with_suffix(path: &std::path::Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
