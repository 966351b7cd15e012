//! Data structures to represent lambda calculus terms, and some utility
//! functions to display and inspect them.
use std::collections::HashSet;

/// Represents a lambda-calculus term. Equality is syntactic: two abstractions
/// that differ only in the name of their parameter are not equal.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Term {
    Variable {
        name: String,
    },
    Abstraction {
        param: String,
        body: Box<Term>,
    },
    Application {
        func: Box<Term>,
        arg: Box<Term>,
    },
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable { name: name.into() }
    }

    pub fn abstraction(param: impl Into<String>, body: Term) -> Self {
        Term::Abstraction {
            param: param.into(),
            body: Box::new(body),
        }
    }

    pub fn application(func: Term, arg: Term) -> Self {
        Term::Application {
            func: Box::new(func),
            arg: Box::new(arg),
        }
    }
}

// Helper function to produce the canonical string representation of a Term.
// Every abstraction and application is fully parenthesized.
fn term_to_string_helper(term: &Term, string_so_far: &mut String) {
    match term {
        Term::Variable { name } => {
            string_so_far.push_str(name.as_str());
        }
        Term::Abstraction { param, body } => {
            string_so_far.push_str("(λ");
            string_so_far.push_str(param.as_str());
            string_so_far.push('.');
            term_to_string_helper(body, string_so_far);
            string_so_far.push(')');
        }
        Term::Application { func, arg } => {
            string_so_far.push('(');
            term_to_string_helper(func, string_so_far);
            string_so_far.push(' ');
            term_to_string_helper(arg, string_so_far);
            string_so_far.push(')');
        }
    };
}

/// Converts a term to its canonical string form.
pub fn pretty_print(term: &Term) -> String {
    let mut out_string = String::new();
    term_to_string_helper(term, &mut out_string);
    out_string
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(pretty_print(self).as_str())
    }
}

/// Finds all variable names used in the given term, bound or free, including
/// the parameters of abstractions.
pub fn get_all_variables(term: &Term) -> HashSet<&str> {
    match term {
        Term::Variable { name } => HashSet::from([name.as_str()]),
        Term::Application { func, arg } => {
            let func_vars = get_all_variables(func);
            let arg_vars = get_all_variables(arg);

            func_vars.union(&arg_vars).copied().collect()
        }
        Term::Abstraction { param, body } => {
            let mut body_vars = get_all_variables(body);
            body_vars.insert(param.as_str());
            body_vars
        }
    }
}
