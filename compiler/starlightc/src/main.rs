//! Starlight compiler CLI.

use starlightc::{commands, init_tracing, CliOptions, UsageError};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let options = match CliOptions::parse(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            if matches!(err, UsageError::UnknownCommand(_) | UsageError::MissingInput) {
                eprintln!();
                print_usage();
            }
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = commands::run(&options, &mut stdout) {
        err.report(&options.input.display().to_string(), options.color);
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Starlight compiler");
    eprintln!();
    eprintln!("Usage: starlight <command> <file.sl> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  compile   Compile to JavaScript");
    eprintln!("  tokens    Print the token list");
    eprintln!("  ast       Print the syntax tree");
    eprintln!("  check     Report errors without writing output");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o <path>                Write compiled output to a file (compile only)");
    eprintln!("  --print-binding=<name>   Function that `show` calls (default: console.log)");
    eprintln!("  --indent=<n>             Spaces per indentation level (default: 2)");
    eprintln!("  --color=<when>           auto, always or never (default: auto)");
    eprintln!();
    eprintln!("Set RUST_LOG (for example RUST_LOG=starlightc=debug) for pipeline logs.");
}
