use std::{env, fs, path::PathBuf, process};

use clap::Parser as CParser;
use log::{info, Level};

use toyccomp::CompileError;

#[derive(CParser, Debug)]
#[command(version, about)]
struct Cli {
    /// Source file to compile.
    file: PathBuf,

    /// Where to write the generated assembly.
    #[arg(short, long, default_value = "out.s")]
    output: PathBuf,
}

fn log_level() -> Level {
    if env::var_os("TOYC_DEBUG").is_some() {
        Level::Debug
    } else if env::var_os("TOYC_INFO").is_some() {
        Level::Info
    } else {
        Level::Warn
    }
}

fn main() {
    simple_logger::init_with_level(log_level()).unwrap();

    let args = Cli::parse();

    if let Err(error) = run(&args) {
        println!("[ERROR]{error}");
        process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), CompileError> {
    let source = fs::read_to_string(&args.file).map_err(|error| {
        CompileError::Input(format!("could not read '{}': {error}", args.file.display()))
    })?;

    let assembly = toyccomp::compile(&source)?;

    fs::write(&args.output, assembly).map_err(|error| {
        CompileError::Output(format!(
            "could not write '{}': {error}",
            args.output.display()
        ))
    })?;

    info!("wrote '{}'", args.output.display());
    Ok(())
}
