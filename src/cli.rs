use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::script::{compile, Record, Script, Val};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tempo - line-oriented script engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a script file
    Run {
        /// Path to the script file
        script: PathBuf,

        /// Seed a variable before the run (NAME=VALUE, repeatable).
        /// Values parse as JSON scalars, falling back to bare strings.
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Seed variables from a TOML table of scalars
        #[arg(long = "vars", value_name = "FILE")]
        vars_file: Option<PathBuf>,

        /// Bind an empty record object under this name (repeatable)
        #[arg(long = "record", value_name = "NAME")]
        records: Vec<String>,

        /// Print variables and record fields after the run
        #[arg(long)]
        dump: bool,
    },

    /// Compile a script and report structural errors without running it
    Check {
        /// Path to the script file
        script: PathBuf,
    },
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            vars,
            vars_file,
            records,
            dump,
        } => run_script(&script, &vars, vars_file.as_deref(), &records, dump),
        Commands::Check { script } => check_script(&script),
    }
}

fn run_script(
    path: &Path,
    vars: &[String],
    vars_file: Option<&Path>,
    records: &[String],
    dump: bool,
) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;

    let mut script = Script::new();

    if let Some(file) = vars_file {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read variable file {}", file.display()))?;
        let table: toml::Table = text
            .parse()
            .with_context(|| format!("invalid TOML in {}", file.display()))?;
        for (name, value) in table {
            script.set_var(&name, toml_to_val(value)?);
        }
    }

    for entry in vars {
        let Some((name, raw)) = entry.split_once('=') else {
            bail!("--var takes NAME=VALUE, got {:?}", entry);
        };
        script.set_var(name, parse_var_value(raw));
    }

    for name in records {
        script.bind(name, Box::new(Record::new()));
    }

    let run_result = script.run(&source);

    // Dump even on failure; it shows the state reached before the failing
    // line.
    if dump {
        print!("{}", render_dump(&script));
    }

    if let Err(err) = run_result {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    Ok(())
}

fn check_script(path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;

    match compile(&source) {
        Ok(program) => {
            println!(
                "OK: {} lines, {} flow nodes",
                program.lines.len(),
                program.flow.len()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

/// `--var` values: JSON scalars (`true`, `3.5`, `"quoted"`, `null`) with a
/// bare-string fallback, so `--var Name=Rossi` just works.
fn parse_var_value(raw: &str) -> Val {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => json_to_val(value),
        Err(_) => Val::Str(raw.to_string()),
    }
}

fn json_to_val(value: serde_json::Value) -> Val {
    match value {
        serde_json::Value::Null => Val::Null,
        serde_json::Value::Bool(b) => Val::Bool(b),
        serde_json::Value::Number(n) => Val::Num(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Val::Str(s),
        other => Val::Str(other.to_string()),
    }
}

fn toml_to_val(value: toml::Value) -> Result<Val> {
    Ok(match value {
        toml::Value::Boolean(b) => Val::Bool(b),
        toml::Value::Integer(i) => Val::Num(i as f64),
        toml::Value::Float(f) => Val::Num(f),
        toml::Value::String(s) => Val::Str(s),
        other => bail!("unsupported seed value type: {}", other.type_str()),
    })
}

fn render_dump(script: &Script) -> String {
    let mut out = String::new();
    for (name, value) in script.evaluator().vars() {
        let rendered = match value {
            Val::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        };
        out.push_str(&format!("{} = {}\n", name, rendered));
    }
    for (name, object) in script.evaluator().objects() {
        for (field, value) in object.snapshot() {
            out.push_str(&format!("{}.{} = {:?}\n", name, field, value));
        }
    }
    out
}
