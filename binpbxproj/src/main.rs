//! Command-line tool for checking, formatting, and transcoding `.pbxproj` files.
//!
//! Usage: pbxproj [OPTIONS] [FILE]
//!
//! Options:
//!   -f, --from <FORMAT>    Input format (pbxproj, json, yaml, toml) [default: pbxproj]
//!   -t, --to <FORMAT>      Output format (pbxproj, json, yaml, toml) [default: pbxproj]
//!   -w, --write            Write output to file with inferred name
//!                          (rewrites FILE in place when both formats are pbxproj)
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   --max-depth <N>        Maximum nesting depth [default: 128, or PBXPROJ_MAX_DEPTH]
//!   --strict-keys          Reject duplicate keys instead of keeping the last one
//!   -v, --verbose          Log debug output (overridden by RUST_LOG)
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Reads from stdin when FILE is omitted or `-`.

use libpbxproj::{encode, encode_document, Format, ParseContext, ParseOptions, Parser, Value};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

mod transcode;

/// A document syntax the tool can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Pbxproj,
    Json,
    Yaml,
    Toml,
}

impl Syntax {
    fn from_name(s: &str) -> Option<Self> {
        match s {
            "pbxproj" | "plist" => Some(Syntax::Pbxproj),
            "json" => Some(Syntax::Json),
            "yaml" | "yml" => Some(Syntax::Yaml),
            "toml" => Some(Syntax::Toml),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Syntax::Pbxproj => "pbxproj",
            Syntax::Json => "json",
            Syntax::Yaml => "yaml",
            Syntax::Toml => "toml",
        }
    }
}

/// Options collected from the command line.
#[derive(Debug, Clone, PartialEq)]
struct Cli {
    from: Syntax,
    to: Syntax,
    write_back: bool,
    output_file: Option<String>,
    check_only: bool,
    input_path: Option<String>,
    max_depth: Option<usize>,
    strict_keys: bool,
    verbose: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            from: Syntax::Pbxproj,
            to: Syntax::Pbxproj,
            write_back: false,
            output_file: None,
            check_only: false,
            input_path: None,
            max_depth: None,
            strict_keys: false,
            verbose: false,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Cli),
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            println!("pbxproj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Ok(Command::Run(cli)) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    process::exit(run(&cli));
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut cli = Cli::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-f" | "--from" => {
                let name = flag_value(args, &mut i, "-f requires a format argument")?;
                cli.from = Syntax::from_name(name)
                    .ok_or_else(|| format!("Unknown format: {}", name))?;
            }
            "-t" | "--to" => {
                let name = flag_value(args, &mut i, "-t requires a format argument")?;
                cli.to = Syntax::from_name(name)
                    .ok_or_else(|| format!("Unknown format: {}", name))?;
            }
            "-w" | "--write" => cli.write_back = true,
            "-o" | "--output" => {
                let path = flag_value(args, &mut i, "--output requires an argument")?;
                cli.output_file = Some(path.to_string());
            }
            "--check" => cli.check_only = true,
            "--max-depth" => {
                let n = flag_value(args, &mut i, "--max-depth requires a number")?;
                let depth: usize = n
                    .parse()
                    .ok()
                    .filter(|&d: &usize| d > 0)
                    .ok_or_else(|| format!("Invalid depth: {}", n))?;
                cli.max_depth = Some(depth);
            }
            "--strict-keys" => cli.strict_keys = true,
            "-v" | "--verbose" => cli.verbose = true,
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            path => {
                if cli.input_path.is_some() {
                    return Err("Multiple input paths not supported".to_string());
                }
                cli.input_path = Some(path.to_string());
            }
        }
        i += 1;
    }

    if cli.write_back && cli.output_file.is_some() {
        return Err("--write and --output are mutually exclusive".to_string());
    }
    if cli.write_back && cli.input_path.is_none() {
        return Err("--write requires an input file".to_string());
    }

    Ok(Command::Run(cli))
}

/// Advance past a flag and return its argument.
fn flag_value<'a>(args: &'a [String], i: &mut usize, missing: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i).map(String::as_str).ok_or_else(|| missing.to_string())
}

fn parse_options(cli: &Cli) -> ParseOptions {
    let mut options = ParseOptions::from_env();
    if let Some(depth) = cli.max_depth {
        options.max_depth = depth;
    }
    if cli.strict_keys {
        options.reject_duplicate_keys = true;
    }
    options
}

fn run(cli: &Cli) -> i32 {
    let input_path = cli.input_path.as_deref();

    let input = match read_input(input_path) {
        Ok(input) => input,
        Err(e) => {
            match input_path {
                Some(path) => eprintln!("Error reading {}: {}", path, e),
                None => eprintln!("Error reading stdin: {}", e),
            }
            return 1;
        }
    };

    let value = match decode(&input, cli, input_path) {
        Ok(value) => value,
        Err(e) => {
            match input_path {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };
    debug!("decoded {} root", value.kind());

    if cli.check_only {
        match input_path {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return 0;
    }

    let output = match encode_as(&value, cli.to) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Format error: {}", e);
            return 1;
        }
    };

    let destination = if let Some(path) = &cli.output_file {
        Some(PathBuf::from(path))
    } else if cli.write_back {
        input_path.map(|path| inferred_output_path(Path::new(path), cli.to))
    } else {
        None
    };

    match destination {
        Some(path) => {
            if let Err(e) = fs::write(&path, output) {
                eprintln!("Error writing {}: {}", path.display(), e);
                return 1;
            }
            info!("wrote {}", path.display());
        }
        None => print!("{}", output),
    }
    0
}

/// Raw input bytes; text decoding is left to the reader for each syntax.
fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn decode(input: &[u8], cli: &Cli, input_path: Option<&str>) -> Result<Value, String> {
    match cli.from {
        Syntax::Pbxproj => {
            let filename = input_path.map(|p| {
                Path::new(p)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| p.to_string())
            });
            let ctx = ParseContext::new(filename.as_deref());
            Parser::with_options(input, parse_options(cli), ctx)
                .parse()
                .map_err(|e| e.to_string())
        }
        Syntax::Json | Syntax::Yaml => transcode::yaml::decode(utf8(input)?),
        Syntax::Toml => transcode::toml::decode(utf8(input)?),
    }
}

fn utf8(input: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(input).map_err(|e| format!("Invalid UTF-8: {}", e))
}

fn encode_as(value: &Value, syntax: Syntax) -> Result<String, String> {
    match syntax {
        Syntax::Pbxproj => Ok(encode_document(value)),
        Syntax::Json => Ok(format!("{}\n", encode(value, Format::Json))),
        Syntax::Yaml => transcode::yaml::encode(value),
        Syntax::Toml => transcode::toml::encode(value),
    }
}

/// `App.pbxproj` -> `App.json` for `-t json`; unchanged for `-t pbxproj`.
fn inferred_output_path(input: &Path, to: Syntax) -> PathBuf {
    input.with_extension(to.extension())
}

fn print_help() {
    println!(
        "pbxproj - check, format, and transcode Xcode project files

Usage: pbxproj [OPTIONS] [FILE]

Reads FILE (or stdin when omitted or -) and writes the re-encoded document
to stdout.

Options:
  -f, --from <FORMAT>    Input format (pbxproj, json, yaml, toml) [default: pbxproj]
  -t, --to <FORMAT>      Output format (pbxproj, json, yaml, toml) [default: pbxproj]
  -w, --write            Write output to file with inferred name
  -o, --output <FILE>    Write output to specified file
      --check            Check if file is valid (exit 0 if valid, 1 if invalid)
      --max-depth <N>    Maximum nesting depth [env: PBXPROJ_MAX_DEPTH]
      --strict-keys      Reject duplicate keys [env: PBXPROJ_STRICT_KEYS]
  -v, --verbose          Log debug output (RUST_LOG overrides)
  -h, --help             Print help
  -V, --version          Print version"
    );
}
