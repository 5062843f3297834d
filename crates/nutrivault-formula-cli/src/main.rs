//! Formula engine command-line interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use nutrivault_formula::{
    Environment, FormulaDefinition, evaluate_rounded, parse, validate_formula,
};
use std::path::PathBuf;

/// Formula engine command-line tool
#[derive(Parser)]
#[command(name = "nvformula")]
#[command(author, version, about = "NutriVault calculated-field formula tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a formula and print the tree
    Parse {
        /// Formula source, e.g. '{weight} / ({height} * {height})'
        formula: String,
        /// Output format (tree, json)
        #[arg(short, long, default_value = "tree")]
        format: String,
    },
    /// List the variables a formula depends on
    Deps {
        /// Formula source
        formula: String,
    },
    /// Validate a candidate formula against saved definitions
    Validate {
        /// Name the formula would be saved under
        name: String,
        /// Formula source
        formula: String,
        /// JSON file holding the existing definitions in scope
        #[arg(short, long)]
        definitions: Option<PathBuf>,
    },
    /// Evaluate a formula against explicit variable bindings
    Eval {
        /// Formula source
        formula: String,
        /// Variable bindings as name=value
        #[arg(short, long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
        /// Output rounding precision
        #[arg(short, long, default_value_t = 2)]
        decimal_places: u32,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { formula, format } => cmd_parse(&formula, &format),
        Commands::Deps { formula } => cmd_deps(&formula),
        Commands::Validate {
            name,
            formula,
            definitions,
        } => cmd_validate(&name, &formula, definitions.as_deref()),
        Commands::Eval {
            formula,
            vars,
            decimal_places,
        } => cmd_eval(&formula, &vars, decimal_places),
    }
}

fn cmd_parse(formula: &str, format: &str) -> Result<()> {
    match parse(formula) {
        Ok(expr) => {
            match format {
                "json" => println!("{}", serde_json::to_string_pretty(&expr.inner)?),
                _ => println!("{:#?}", expr.inner),
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().render_colored());
            std::process::exit(1);
        }
    }
}

fn cmd_deps(formula: &str) -> Result<()> {
    match parse(formula) {
        Ok(expr) => {
            for name in expr.inner.variables() {
                println!("{name}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().render_colored());
            std::process::exit(1);
        }
    }
}

fn cmd_validate(name: &str, formula: &str, definitions: Option<&std::path::Path>) -> Result<()> {
    let existing: Vec<FormulaDefinition> = match definitions {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Vec::new(),
    };

    let outcome = validate_formula(name, formula, &existing);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if !outcome.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_eval(formula: &str, vars: &[String], decimal_places: u32) -> Result<()> {
    let expr = match parse(formula) {
        Ok(expr) => expr,
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().render_colored());
            std::process::exit(1);
        }
    };

    let mut env = Environment::new();
    for binding in vars {
        let (name, value) = binding
            .split_once('=')
            .with_context(|| format!("binding '{binding}' is not NAME=VALUE"))?;
        let value: f64 = value
            .parse()
            .with_context(|| format!("binding '{binding}' has a non-numeric value"))?;
        env.set(name, value);
    }

    match evaluate_rounded(&expr.inner, &env, decimal_places) {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
