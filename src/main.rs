use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tagstream::{parse_file, Mode, StreamParser};

/// Print the tag structure of an XML document, one path per line.
#[derive(Parser, Debug)]
#[command(name = "tagstream", version)]
struct Args {
    /// Document to read
    file: PathBuf,

    /// Fail on the first tag not declared with --declare
    #[arg(long)]
    strict: bool,

    /// Declare a tag path such as `catalog/book/title` before parsing
    #[arg(long, value_name = "PATH")]
    declare: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mode = if args.strict { Mode::Strict } else { Mode::Lenient };
    let mut parser = StreamParser::new(mode);
    for path in &args.declare {
        parser.tree_mut().declare_path(path);
    }

    match parse_file(&args.file, &mut parser) {
        Ok(()) => {
            for path in parser.tree().paths() {
                println!("{}", path);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", args.file.display(), err);
            ExitCode::FAILURE
        }
    }
}
