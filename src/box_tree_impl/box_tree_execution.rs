//! Normal-order reduction of lambda-calculus terms given in the box-tree
//! representation.

use log::trace;
use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::Term;
use crate::box_tree_impl::box_tree_substitution::substitute;

/// Represents the result of normalising a term within a step budget.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExecutionResult {
    pub normal_form: Term,
    pub step_count: usize,
}

/// Errors raised by the bounded normaliser.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ReductionError {
    #[error("no normal form reached within {max_steps} steps")]
    StepLimitExceeded { max_steps: usize, last_term: Term },
}

/// Performs a single leftmost-outermost beta step. Returns `None` if the term
/// contains no redex.
pub fn beta_reduction(term: &Term) -> Option<Term> {
    match term {
        Term::Application { func, arg } => {
            // The function being applied is an abstraction, so we are at a
            // redex. This takes priority over anything inside it.
            if let Term::Abstraction { param, body } = &**func {
                return Some(substitute(body, param, arg));
            }

            if let Some(reduced_func) = beta_reduction(func) {
                return Some(Term::Application {
                    func: Box::new(reduced_func),
                    arg: arg.clone(),
                });
            }

            beta_reduction(arg).map(|reduced_arg| Term::Application {
                func: func.clone(),
                arg: Box::new(reduced_arg),
            })
        }

        Term::Abstraction { param, body } => {
            beta_reduction(body)
                .map(|reduced_body| Term::abstraction(param.as_str(), reduced_body))
        }

        Term::Variable { .. } => None,
    }
}

/// Repeatedly applies `beta_reduction` until no redex remains. Does not
/// return for terms without a normal form.
pub fn normalise(mut term: Term) -> Term {
    while let Some(next) = beta_reduction(&term) {
        trace!("Beta step: {}", next);
        term = next;
    }

    term
}

/// Like `normalise`, but gives up after `max_steps` beta steps.
pub fn normalise_with_limit(
    mut term: Term,
    max_steps: usize,
) -> Result<ExecutionResult, ReductionError> {
    let mut step_count = 0;

    loop {
        let Some(next) = beta_reduction(&term) else {
            return Ok(ExecutionResult {
                normal_form: term,
                step_count,
            });
        };

        if step_count == max_steps {
            return Err(ReductionError::StepLimitExceeded {
                max_steps,
                last_term: term,
            });
        }

        step_count += 1;
        trace!("Beta step {}: {}", step_count, next);
        term = next;
    }
}
