use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use warlang::{ast::Visitor, parser::ast_printer::AstPrinter, translate, EmitOptions};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// WarLang source file
    input: PathBuf,

    /// Where to write the Python output (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spaces per indentation level in the output
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let source_code = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let options = EmitOptions {
        indent_width: args.indent,
    };
    let translation = translate(&source_code, &options)
        .with_context(|| format!("translating {}", args.input.display()))?;

    if args.tokens {
        for token in &translation.tokens {
            println!("{token}");
        }
    }
    if args.ast {
        print!("{}", AstPrinter::default().visit(&translation.ast));
    }

    for diagnostic in &translation.diagnostics {
        eprintln!("{diagnostic}");
    }

    let Some(output) = translation.output else {
        eprintln!("translation failed: {} error(s)", translation.errors().count());
        return Ok(ExitCode::FAILURE);
    };

    match args.output {
        Some(path) => fs::write(&path, output)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(ExitCode::SUCCESS)
}
