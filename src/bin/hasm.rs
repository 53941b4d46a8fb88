//! A file-to-file Hack assembler.
//!
//! Reads one assembly source file, translates it, and writes the machine
//! code next to it (or wherever `--output` points). If any line is
//! rejected, every diagnostic is printed and no output file is touched.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use color_print::ceprintln;
use hack_ensemble::asm::assemble;
use hack_ensemble::err::Error as _;
use hack_ensemble::parse::{parse_program, ParseErr};

/// Translates Hack assembly source into Hack machine code.
#[derive(Debug, Parser)]
#[clap(name = "hasm", version, about)]
struct Args {
    /// The assembly source file to translate
    input: PathBuf,

    /// The output file (defaults to the input with a `.hack` extension)
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let src = match std::fs::read_to_string(&args.input) {
        Ok(src) => src,
        Err(e) => {
            ceprintln!("<red,bold>error</>: cannot read {}: {}", args.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let stmts = match parse_program(&src) {
        Ok(stmts) => stmts,
        Err(errs) => {
            report(&errs, &args.input, &src);
            return ExitCode::FAILURE;
        }
    };

    let image = assemble(&stmts);
    let out_path = args.output.unwrap_or_else(|| args.input.with_extension("hack"));
    if let Err(e) = std::fs::write(&out_path, image.to_string()) {
        ceprintln!("<red,bold>error</>: cannot write {}: {}", out_path.display(), e);
        return ExitCode::FAILURE;
    }

    println!("{} -> {} ({} words)", args.input.display(), out_path.display(), image.len());
    ExitCode::SUCCESS
}

/// Prints every diagnostic with the source line it points at and, where one
/// applies, a note on how to fix it.
fn report(errs: &[ParseErr], path: &Path, src: &str) {
    let lines: Vec<&str> = src.lines().collect();
    for err in errs {
        let raw = lines.get(err.line - 1).copied().unwrap_or("");
        ceprintln!("<red,bold>error</>: {}", err);
        ceprintln!("     <blue>--></> <underline>{}:{}</>", path.display(), err.line);
        ceprintln!("      <blue>|</>");
        ceprintln!(" <blue>{:>4} |</> {}", err.line, raw);
        ceprintln!("      <blue>|</>");
        if let Some(help) = err.help() {
            ceprintln!("   <green,bold>help</>: {}", help);
        }
    }
    ceprintln!(
        "<red,bold>error</>: could not assemble {} ({} error{})",
        path.display(),
        errs.len(),
        match errs.len() == 1 {
            true  => "",
            false => "s",
        },
    );
}
