//! Command dispatch for the `huffcode` binary.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::cli::args::{with_suffix, Cli, Commands};
use crate::error::Result;
use crate::huffman_codec::HuffmanCodec;
use crate::hufftree::HuffmanTree;

pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Compress { input, output, code } => {
            let output = output.clone().unwrap_or_else(|| with_suffix(input, "short"));
            let code = code.clone().unwrap_or_else(|| with_suffix(input, "code"));
            compress(input, &code, &output)
        }
        Commands::Decompress { input, code, output } => {
            let output = output.clone().unwrap_or_else(|| with_suffix(input, "new"));
            decompress(input, code, &output)
        }
        Commands::Show { code } => show(code),
    }
}

#[instrument(level = "debug")]
fn compress(input: &Path, code: &Path, output: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(input)?);
    let mut code_out = BufWriter::new(File::create(code)?);
    let mut data_out = BufWriter::new(File::create(output)?);

    HuffmanCodec::compress(reader, &mut code_out, &mut data_out)?;
    code_out.flush()?;
    data_out.flush()?;
    debug!(code = %code.display(), output = %output.display(), "wrote compressed files");
    Ok(())
}

#[instrument(level = "debug")]
fn decompress(input: &Path, code: &Path, output: &Path) -> Result<()> {
    let code_in = BufReader::new(File::open(code)?);
    let mut data_in = BufReader::new(File::open(input)?);
    let mut out = BufWriter::new(File::create(output)?);

    HuffmanCodec::decompress(code_in, &mut data_in, &mut out)?;
    out.flush()?;
    Ok(())
}

fn show(code: &Path) -> Result<()> {
    let tree = HuffmanTree::load(BufReader::new(File::open(code)?))?;
    println!("{} symbols, longest code {} bits", tree.leaf_count(), tree.depth());
    for (symbol, path) in tree.code_table() {
        println!("{:>5}  {}", symbol, path);
    }
    tree.print_structure();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn compress_then_decompress_via_cli() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.txt");
        std::fs::write(&input, "she sells sea shells by the sea shore").unwrap();

        let compress = Cli {
            debug: 0,
            command: Commands::Compress { input: input.clone(), output: None, code: None },
        };
        execute_command(&compress).unwrap();
        let code = temp.path().join("input.txt.code");
        let short = temp.path().join("input.txt.short");
        assert!(code.exists());
        assert!(short.exists());

        let decompress = Cli {
            debug: 0,
            command: Commands::Decompress { input: short.clone(), code, output: None },
        };
        execute_command(&decompress).unwrap();
        let restored = std::fs::read_to_string(temp.path().join("input.txt.short.new")).unwrap();
        assert_eq!(restored, "she sells sea shells by the sea shore");
    }

    #[test]
    fn show_reports_malformed_code_file() {
        let temp = TempDir::new().unwrap();
        let code = temp.path().join("bad.code");
        std::fs::write(&code, "97\n0\n98\n").unwrap();
        let cli = Cli { debug: 0, command: Commands::Show { code } };
        assert!(execute_command(&cli).is_err());
    }
}
