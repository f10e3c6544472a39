//! CLI tool to check Tcl sources and dump their ASTs.

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: tclscan <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  check   Parse Tcl file(s) and report problems");
        eprintln!("  ast     Print the JSON AST of Tcl file(s)");
        eprintln!("  tokens  Print the tokens of Tcl file(s)");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  tclscan check init.tcl");
        eprintln!("  tclscan ast init.tcl");
        eprintln!("  tclscan tokens init.tcl");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "check" => {
                let root = tclscan::build(&content, path);
                if root.had_error {
                    for error in &root.errors {
                        if let Some(diagnostic) = error.as_diagnostic() {
                            eprintln!("{path}: {diagnostic}");
                        }
                    }
                    had_error = true;
                } else {
                    let commands = root.children.len();
                    let comments = root.comments.len();
                    eprintln!("{path}: ok ({commands} command(s), {comments} comment(s))");
                }
            }
            "ast" => {
                let root = tclscan::build(&content, path);
                println!("{}", tclscan::to_json_pretty(&root));
                if root.had_error {
                    had_error = true;
                }
            }
            "tokens" => {
                for token in tclscan::tokenize(&content) {
                    println!("{}\t{}", token.kind, token.text);
                }
            }
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
