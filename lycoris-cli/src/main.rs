//! Lycoris CLI - command-line front-end for the language runtime.
//!
//! A thin wrapper around lycoris-core: executes a script file, a `-e`
//! one-liner, piped stdin, or an interactive REPL when run from a terminal.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use lycoris_core::Interpreter;

/// Lycoris is a concatenative, stack-based language with a homoiconic
/// vector data model and exact rational arithmetic.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Execute a one-liner and print the resulting stack.
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Script file to execute.
    file: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut interp = Interpreter::new();

    if let Some(code) = args.eval {
        return run_source(&mut interp, &code, true);
    }

    if let Some(path) = args.file {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("failed to read '{}': {}", path, err);
                return ExitCode::FAILURE;
            }
        };
        return run_source(&mut interp, &source, false);
    }

    if !io::stdin().is_terminal() {
        let mut source = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut source) {
            eprintln!("failed to read stdin: {}", err);
            return ExitCode::FAILURE;
        }
        return run_source(&mut interp, &source, false);
    }

    repl(&mut interp)
}

fn run_source(interp: &mut Interpreter, source: &str, show_stack: bool) -> ExitCode {
    match interp.execute(source) {
        Ok(output) => {
            print!("{}", output);
            if show_stack {
                println!("stack: [{}]", interp.stack_snapshot().join(" "));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

// The interpreter (and so the dictionary) lives across lines; errors roll
// back the failing token and the session continues.
fn repl(interp: &mut Interpreter) -> ExitCode {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("failed to read input: {}", err);
                return ExitCode::FAILURE;
            }
            None => return ExitCode::SUCCESS,
        };
        if line.trim().is_empty() {
            continue;
        }
        match interp.execute(&line) {
            Ok(output) => {
                print!("{}", output);
                println!("stack: [{}]", interp.stack_snapshot().join(" "));
            }
            Err(err) => eprintln!("{}", err),
        }
    }
}
