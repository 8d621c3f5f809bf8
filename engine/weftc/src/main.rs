//! Weft template engine CLI.
//!
//! Templates arrive pre-parsed in the JSON wire form; `run` evaluates one
//! against an optional JSON context, `optimize` prints the rewritten tree.

use std::path::Path;
use std::process::exit;

use weft_eval::{Engine, Resource, ResourceError, ResourceLoader, Value};
use weft_ir::json::encode_template;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        exit(1);
    }

    match args[1].as_str() {
        "run" => run_template(&args[2..]),
        "optimize" => optimize_template(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("unknown command: {other}");
            print_usage();
            exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Weft template engine");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  weftc run <template.json> [options]    Evaluate a template");
    eprintln!("  weftc optimize <template.json>         Print the optimized tree");
    eprintln!();
    eprintln!("Options for run:");
    eprintln!("  --context <file.json>   Data context (default: empty)");
    eprintln!("  --base <uri>            Base URI (default: the template path)");
    eprintln!("  --optimize              Optimize before evaluating");
}

fn run_template(args: &[String]) {
    let Some(template_path) = args.first() else {
        eprintln!("run: missing template file");
        exit(1);
    };

    let mut context = Value::Undefined;
    let mut base_uri: Option<String> = None;
    let mut optimize = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--context" if i + 1 < args.len() => {
                context = Value::from_json(&read_json(&args[i + 1]));
                i += 2;
            }
            "--base" if i + 1 < args.len() => {
                base_uri = Some(args[i + 1].clone());
                i += 2;
            }
            "--optimize" => {
                optimize = true;
                i += 1;
            }
            other => {
                eprintln!("run: unknown option {other}");
                exit(1);
            }
        }
    }

    let source = read_text(template_path);
    let engine = Engine::builder().loader(FileResourceLoader).build();
    let mut nodes = match engine.parse_to_ast(&source) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("{template_path}: {err}");
            exit(1);
        }
    };
    if optimize {
        nodes = weft_opt::optimize(&nodes);
    }
    let base = base_uri.unwrap_or_else(|| template_path.clone());
    print!("{}", engine.evaluate_ast(Some(&base), &nodes, context));
}

fn optimize_template(args: &[String]) {
    let Some(template_path) = args.first() else {
        eprintln!("optimize: missing template file");
        exit(1);
    };
    let source = read_text(template_path);
    let engine = Engine::new();
    match engine.parse_to_ast(&source) {
        Ok(nodes) => {
            let optimized = weft_opt::optimize(&nodes);
            println!("{}", encode_template(&optimized));
        }
        Err(err) => {
            eprintln!("{template_path}: {err}");
            exit(1);
        }
    }
}

fn read_text(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(1);
        }
    }
}

fn read_json(path: &str) -> serde_json::Value {
    match serde_json::from_str(&read_text(path)) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(1);
        }
    }
}

/// Plain filesystem loader: relative paths resolve against the directory
/// of the base (the including template's path).
struct FileResourceLoader;

impl ResourceLoader for FileResourceLoader {
    fn resolve_full_path(&self, href: &str, base: Option<&str>) -> Result<String, ResourceError> {
        if Path::new(href).is_absolute() {
            return Ok(href.to_string());
        }
        match base.and_then(|base| Path::new(base).parent()) {
            Some(dir) => Ok(dir.join(href).to_string_lossy().into_owned()),
            None => Ok(href.to_string()),
        }
    }

    fn load(&self, href: &str, base: Option<&str>) -> Result<Resource, ResourceError> {
        let full = self.resolve_full_path(href, base)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Resource {
                bytes,
                base_href: full,
            }),
            Err(err) => Err(ResourceError::Unreadable {
                href: full,
                reason: err.to_string(),
            }),
        }
    }
}
