// kons - A small cons-cell Lisp interpreter
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::fs;
use std::process;
use std::sync::Arc;
use std::thread;

use kons_core::{
    DEFAULT_MAX_EVAL_DEPTH, Env, create_root_environment, eval, eval_stack_size, init_stdlib,
    set_max_eval_depth,
};
use kons_reader::{Parser, SymbolTable};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    version: bool,
    no_prelude: bool,
    max_depth: Option<usize>,
    files: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => opts.version = true,
            "--no-prelude" => opts.no_prelude = true,
            "--max-depth" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                let depth = value
                    .parse()
                    .map_err(|_| format!("invalid --max-depth value '{}'", value))?;
                opts.max_depth = Some(depth);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            file => opts.files.push(file.to_string()),
        }
    }
    Ok(opts)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("KONS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Stack size for the interpreter thread.
///
/// `KONS_STACK_MB` overrides the size derived from the depth limit.
fn worker_stack_size(stack_mb: Option<&str>, max_depth: usize) -> Result<usize, String> {
    let Some(value) = stack_mb else {
        return Ok(eval_stack_size(max_depth));
    };
    let invalid = || format!("invalid KONS_STACK_MB value '{}'", value);
    let mb: usize = value.trim().parse().map_err(|_| invalid())?;
    if mb == 0 {
        return Err(invalid());
    }
    mb.checked_mul(1024 * 1024).ok_or_else(invalid)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if opts.version {
        println!("Kons v{}", VERSION);
        return;
    }

    init_logging();

    let max_depth = opts.max_depth.unwrap_or(DEFAULT_MAX_EVAL_DEPTH);
    let stack_mb = env::var("KONS_STACK_MB").ok();
    let stack_size = match worker_stack_size(stack_mb.as_deref(), max_depth) {
        Ok(size) => size,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    tracing::debug!(stack_size, max_depth, "starting interpreter thread");

    // The evaluator recurses on the host stack, so it runs on a thread sized
    // for the depth limit rather than on the main thread.
    let result = thread::Builder::new()
        .name("kons-worker".to_string())
        .stack_size(stack_size)
        .spawn(move || run(opts))
        .map_err(|e| format!("failed to start interpreter thread: {}", e))
        .and_then(|handle| {
            handle
                .join()
                .map_err(|_| "interpreter thread panicked".to_string())
        });

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Build the environment and run the files or the REPL. Returns the exit code.
fn run(opts: Options) -> i32 {
    if let Some(depth) = opts.max_depth {
        set_max_eval_depth(depth);
    }

    let env = create_root_environment(Arc::new(SymbolTable::new()));

    if !opts.no_prelude
        && let Err(e) = init_stdlib(&env)
    {
        eprintln!("Failed to load prelude: {}", e);
        return 1;
    }

    if opts.files.is_empty() {
        run_repl(&env)
    } else {
        run_files(&opts.files, &env)
    }
}

/// Evaluate a sequence of source files
fn run_files(files: &[String], env: &Env) -> i32 {
    for file_path in files {
        if let Err(e) = eval_file(file_path, env) {
            eprintln!("{}", e);
            return 1;
        }
    }
    0
}

/// Evaluate a single source file
fn eval_file(file_path: &str, env: &Env) -> Result<(), String> {
    let source = fs::read_to_string(file_path)
        .map_err(|e| format!("Error reading '{}': {}", file_path, e))?;
    eval_file_source(file_path, &source, env)
}

/// Evaluate the forms of one file's source, stopping at the first error.
fn eval_file_source(file_path: &str, source: &str, env: &Env) -> Result<(), String> {
    tracing::debug!(file = file_path, "evaluating");

    let mut parser = Parser::new(source, env.symbols());
    loop {
        match parser.parse() {
            Ok(Some(expr)) => {
                eval(&expr, env).map_err(|e| format!("Error in '{}': {}", file_path, e))?;
            }
            Ok(None) => break,
            Err(e) => return Err(format!("Error in '{}': {}", file_path, e)),
        }
    }

    Ok(())
}

/// Evaluate every form on one REPL line, printing each value.
fn eval_line(line: &str, env: &Env) {
    let mut parser = Parser::new(line, env.symbols());
    loop {
        match parser.parse() {
            Ok(Some(expr)) => match eval(&expr, env) {
                Ok(result) => println!("{}", result),
                Err(e) => eprintln!("Error: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
}

/// Run the interactive REPL
fn run_repl(env: &Env) -> i32 {
    println!("Kons v{}", VERSION);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Could not start line editor: {}", e);
            return 1;
        }
    };

    loop {
        match rl.readline("kons> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                eval_line(line, env);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
    0
}
