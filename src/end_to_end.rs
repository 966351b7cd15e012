//! Code to configure and run the interpreter on an input source code file.
//! Each non-blank line of the file is an independent expression.

use std::fs;

use clap::Parser;
use log::{debug, warn};
use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::Term;
use crate::box_tree_impl::box_tree_execution::{normalise, normalise_with_limit, ReductionError};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{parse_expression, SyntaxError};

/// Default number of beta steps allowed per expression.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// The input filepath to run on.
    #[arg(short, long)]
    pub src_filepath: String,

    /// Maximum number of beta steps spent normalising a single expression.
    #[arg(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Normalise without any step limit. Divergent terms will not terminate.
    #[arg(long)]
    pub unbounded: bool,
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Input file error: {0}")]
    InputFile(#[from] std::io::Error),
}

/// How evaluating a single expression went.
#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Normalised { parsed: Term, normal_form: Term },
    SyntaxError(SyntaxError),
    StepLimitExceeded { parsed: Term, max_steps: usize },
}

/// Parses and normalises one expression, honouring the step policy in
/// `config`.
pub fn evaluate_line(source: &str, config: &InterpreterConfig) -> LineOutcome {
    let parsed = match parse_expression(source) {
        Ok(parsed) => parsed,
        Err(syntax_error) => {
            debug!("Failed to parse {:?}: {}", source, syntax_error);
            return LineOutcome::SyntaxError(syntax_error);
        }
    };

    if config.unbounded {
        let normal_form = normalise(parsed.clone());
        return LineOutcome::Normalised {
            parsed,
            normal_form,
        };
    }

    match normalise_with_limit(parsed.clone(), config.max_steps) {
        Ok(execution_result) => {
            debug!(
                "Reached normal form of {:?} in {} steps",
                source, execution_result.step_count
            );
            LineOutcome::Normalised {
                parsed,
                normal_form: execution_result.normal_form,
            }
        }
        Err(ReductionError::StepLimitExceeded { max_steps, .. }) => {
            warn!("Gave up normalising {:?} after {} steps", source, max_steps);
            LineOutcome::StepLimitExceeded { parsed, max_steps }
        }
    }
}

// Renders the report for one expression.
fn line_report(expression_idx: usize, source: &str, outcome: &LineOutcome) -> String {
    let mut out = vec![format!("Expression {}: {}", expression_idx, source)];

    match outcome {
        LineOutcome::Normalised {
            parsed,
            normal_form,
        } => {
            out.push(format!("  Parsed: {}", parsed));
            out.push(format!("  Normal form: {}", normal_form));
        }
        LineOutcome::SyntaxError(syntax_error) => {
            out.push(format!(
                "  Syntax error in expression {}: {}",
                expression_idx, syntax_error
            ));
        }
        LineOutcome::StepLimitExceeded { parsed, max_steps } => {
            out.push(format!("  Parsed: {}", parsed));
            out.push(format!("  Normal form not reached within {} steps", max_steps));
        }
    }

    out.join("\n")
}

/// Evaluates every non-blank line of `program_string` and renders the
/// combined report. A bad line never stops the lines after it.
pub fn interpret_source(program_string: &str, config: &InterpreterConfig) -> String {
    let mut reports = vec![];

    let expressions = program_string
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    for (idx, source) in expressions.enumerate() {
        let expression_idx = idx + 1;
        debug!("Evaluating expression {}: {}", expression_idx, source);

        let outcome = evaluate_line(source, config);
        reports.push(line_report(expression_idx, source, &outcome));
    }

    reports.join("\n\n")
}

/// Run the interpreter (i.e. the lexer, parser, and reducer) given an
/// interpreter config.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    // Read the input file into a string.
    let program_string = fs::read_to_string(&config.src_filepath)?;

    Ok(interpret_source(program_string.as_str(), config))
}
