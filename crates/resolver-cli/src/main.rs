use clap::{Parser, Subcommand};
use colored::Colorize;
use resolver_core::{Parameter, Resolver};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// resolver — declarative parameter resolver CLI
///
/// Check parameter schemas and resolve data records against them.
#[derive(Parser)]
#[command(name = "resolver", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a schema and list its parameter definitions
    Check {
        /// Path to schema file (.json, .yaml, .yml)
        schema: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a data record against a schema
    Resolve {
        /// Path to schema file (.json, .yaml, .yml)
        schema: PathBuf,
        /// JSON data record
        #[arg(long, conflicts_with = "data_file", required_unless_present = "data_file")]
        data: Option<String>,
        /// Path to a JSON data record
        #[arg(long)]
        data_file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single parameter definition
    Show {
        /// Path to schema file (.json, .yaml, .yml)
        schema: PathBuf,
        /// Parameter name
        name: String,
        /// Group the parameter is nested under
        #[arg(long)]
        parent: Option<String>,
    },

    /// Show version information
    Version,
}

/// Exit codes: 0 = success, 1 = validation failure, 2 = error
const EXIT_OK: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check { schema, json } => cmd_check(&schema, json),
        Commands::Resolve {
            schema,
            data,
            data_file,
            json,
        } => cmd_resolve(&schema, data, data_file, json),
        Commands::Show {
            schema,
            name,
            parent,
        } => cmd_show(&schema, &name, parent.as_deref()),
        Commands::Version => {
            println!(
                "resolver {} (resolver-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_check(path: &Path, json: bool) -> i32 {
    let resolver = match load_schema(path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    if json {
        return print_json(&resolver.get_all_parameters());
    }

    println!(
        "{} {} ({} parameters)",
        "✓".green(),
        path.display(),
        resolver.len()
    );
    for param in resolver.get_all_parameters() {
        println!("  {}", describe(param));
    }
    EXIT_OK
}

fn cmd_resolve(path: &Path, data: Option<String>, data_file: Option<PathBuf>, json: bool) -> i32 {
    let resolver = match load_schema(path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let raw = match (data, data_file) {
        (Some(inline), _) => inline,
        (None, Some(file)) => match std::fs::read_to_string(&file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{} {}: {}", "error:".red().bold(), file.display(), e);
                return EXIT_ERROR;
            }
        },
        (None, None) => {
            eprintln!("{} no data provided", "error:".red().bold());
            return EXIT_ERROR;
        }
    };

    let record: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{} data is not valid JSON: {}", "error:".red().bold(), e);
            return EXIT_ERROR;
        }
    };

    resolver.resolve_with(&record, |result| match result {
        Ok(resolved) => print_json(&resolved),
        Err(e) if json => {
            print_json(&serde_json::json!({
                "valid": false,
                "code": e.code(),
                "message": e.to_string(),
            }));
            EXIT_INVALID
        }
        Err(e) => {
            eprintln!("{} [{}] {}", "error:".red().bold(), e.code(), e);
            EXIT_INVALID
        }
    })
}

fn cmd_show(path: &Path, name: &str, parent: Option<&str>) -> i32 {
    let resolver = match load_schema(path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let found = match parent {
        Some(group) => resolver.find_parameter(name, Some(group)),
        None => resolver.get_parameter(name),
    };

    match found {
        Some(param) => print_json(param),
        None => {
            eprintln!("{} parameter \"{}\" not found", "error:".red().bold(), name);
            EXIT_INVALID
        }
    }
}

// ── Helpers ───────────────────────────────────────────────

/// Load a schema file into a resolver, reporting failures to stderr.
/// Returns the exit code on failure.
fn load_schema(path: &Path) -> Result<Resolver, i32> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("{} {}: {}", "error:".red().bold(), path.display(), e);
        EXIT_ERROR
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed: Result<serde_json::Value, String> = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    };
    let doc = parsed.map_err(|e| {
        eprintln!("{} {}: {}", "error:".red().bold(), path.display(), e);
        EXIT_ERROR
    })?;

    tracing::debug!(path = %path.display(), "loaded schema document");

    Resolver::from_json(&doc).map_err(|e| {
        eprintln!(
            "{} {}: [{}] {}",
            "error:".red().bold(),
            path.display(),
            e.code(),
            e
        );
        EXIT_ERROR
    })
}

fn describe(param: &Parameter) -> String {
    let mut line = match param.parent {
        Some(ref group) => format!("{}.{}", group, param.name),
        None => param.name.clone(),
    };
    line.push_str(if param.required {
        " (required)"
    } else {
        " (optional)"
    });
    if let Some(kind) = param.kind {
        line.push_str(&format!(" : {}", kind));
    }
    if let Some(ref default) = param.default {
        line.push_str(&format!(" = {}", default));
    }
    if let Some(ref values) = param.values {
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        line.push_str(&format!(" in [{}]", rendered.join(", ")));
    }
    line
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("{} serialization failed: {}", "error:".red().bold(), e);
            EXIT_ERROR
        }
    }
}
