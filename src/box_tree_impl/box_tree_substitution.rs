//! Free-variable analysis, capture-avoiding substitution, and alpha-conversion
//! over box-tree terms. None of these mutate their input.

use std::collections::HashSet;

use log::trace;

use crate::box_tree_impl::box_tree_ast::{get_all_variables, Term};

/// Computes the free variables in the given lambda calculus term.
pub fn free_variables(term: &Term) -> HashSet<&str> {
    match term {
        Term::Variable { name } => HashSet::from([name.as_str()]),
        Term::Application { func, arg } => {
            let func_free_vars = free_variables(func);
            let arg_free_vars = free_variables(arg);

            func_free_vars.union(&arg_free_vars).copied().collect()
        }
        Term::Abstraction { param, body } => {
            let mut body_free_vars = free_variables(body);
            body_free_vars.remove(param.as_str());
            body_free_vars
        }
    }
}

/// Picks a name derived from `base` by appending apostrophes until it is not
/// contained in `vars_to_avoid`.
pub fn fresh_variable_name(base: &str, vars_to_avoid: &HashSet<&str>) -> String {
    let mut new_name = String::from(base);

    while vars_to_avoid.contains(new_name.as_str()) {
        new_name.push('\'');
    }

    new_name
}

/// Renames the parameter of an abstraction to `new_param`, substituting every
/// free occurrence of the old parameter in the body. Returns `None` if `term`
/// is not an abstraction.
///
/// The caller must make sure `new_param` does not occur free in the body.
pub fn alpha_conversion(term: &Term, new_param: &str) -> Option<Term> {
    let Term::Abstraction { param, body } = term else {
        return None;
    };

    let renamed_body = substitute(body, param, &Term::variable(new_param));
    Some(Term::abstraction(new_param, renamed_body))
}

// Substitutes `replacement` for free occurrences of `var_name` in `term`.
// `replacement_free_vars` is computed once by the caller.
fn substitute_helper(
    term: &Term,
    var_name: &str,
    replacement: &Term,
    replacement_free_vars: &HashSet<&str>,
) -> Term {
    match term {
        Term::Variable { name } => {
            if name == var_name {
                replacement.clone()
            } else {
                term.clone()
            }
        }

        Term::Application { func, arg } => Term::application(
            substitute_helper(func, var_name, replacement, replacement_free_vars),
            substitute_helper(arg, var_name, replacement, replacement_free_vars),
        ),

        Term::Abstraction { param, body } => {
            // The parameter shadows var_name, and a body without free
            // occurrences of var_name is left as is.
            if param == var_name || !free_variables(body).contains(var_name) {
                return term.clone();
            }

            // To prevent variable capture, rename the parameter if the
            // replacement mentions it freely.
            if replacement_free_vars.contains(param.as_str()) {
                let mut vars_to_avoid = get_all_variables(body);
                vars_to_avoid.extend(replacement_free_vars.iter().copied());

                let new_param = fresh_variable_name(param, &vars_to_avoid);
                trace!("Renaming bound variable {} to {} to avoid capture.", param, new_param);

                let renamed_body = substitute(body, param, &Term::variable(new_param.as_str()));
                return Term::abstraction(
                    new_param,
                    substitute_helper(&renamed_body, var_name, replacement, replacement_free_vars),
                );
            }

            Term::abstraction(
                param.as_str(),
                substitute_helper(body, var_name, replacement, replacement_free_vars),
            )
        }
    }
}

/// Replaces every free occurrence of `var_name` in `term` with `replacement`,
/// renaming bound variables of `term` where they would capture a free
/// variable of `replacement`.
pub fn substitute(term: &Term, var_name: &str, replacement: &Term) -> Term {
    let replacement_free_vars = free_variables(replacement);
    substitute_helper(term, var_name, replacement, &replacement_free_vars)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const NAMES: [&str; 4] = ["x", "y", "z", "w"];

    // Builds a pseudo-random term over a small alphabet so that shadowing and
    // capture situations come up often.
    fn random_term(rng: &mut StdRng, depth: usize) -> Term {
        let name = NAMES[rng.gen_range(0..NAMES.len())];

        if depth == 0 {
            return Term::variable(name);
        }

        match rng.gen_range(0..3) {
            0 => Term::variable(name),
            1 => Term::abstraction(name, random_term(rng, depth - 1)),
            _ => Term::application(random_term(rng, depth - 1), random_term(rng, depth - 1)),
        }
    }

    #[test]
    fn test_free_variables_of_variable() {
        assert_eq!(free_variables(&Term::variable("x")), HashSet::from(["x"]));
    }

    #[test]
    fn test_free_variables_of_abstraction() {
        let term = Term::abstraction(
            "x",
            Term::application(Term::variable("x"), Term::variable("y")),
        );

        assert_eq!(free_variables(&term), HashSet::from(["y"]));
    }

    #[test]
    fn test_free_variables_of_closed_term() {
        let term = Term::abstraction("x", Term::abstraction("y", Term::variable("x")));

        assert!(free_variables(&term).is_empty());
    }

    // (x y)[x := λz.z] => ((λz.z) y)
    #[test]
    fn test_substitute_into_application() {
        let term = Term::application(Term::variable("x"), Term::variable("y"));
        let replacement = Term::abstraction("z", Term::variable("z"));

        assert_eq!(
            substitute(&term, "x", &replacement),
            Term::application(
                Term::abstraction("z", Term::variable("z")),
                Term::variable("y")
            )
        );
    }

    #[test]
    fn test_substitute_leaves_other_variables() {
        let term = Term::variable("y");

        assert_eq!(substitute(&term, "x", &Term::variable("z")), term);
    }

    // Test that a parameter with the same name shadows the substitution target.
    #[test]
    fn test_substitute_shadowed() {
        let term = Term::abstraction("x", Term::variable("x"));

        assert_eq!(substitute(&term, "x", &Term::variable("y")), term);
    }

    // (λx.y)[y := x] must not become λx.x.
    #[test]
    fn test_substitute_avoids_capture() {
        let term = Term::abstraction("x", Term::variable("y"));

        let result = substitute(&term, "y", &Term::variable("x"));

        assert_eq!(result, Term::abstraction("x'", Term::variable("x")));
        assert_eq!(free_variables(&result), HashSet::from(["x"]));
    }

    // The fresh name must also avoid names already used inside the body.
    #[test]
    fn test_substitute_fresh_name_avoids_body_names() {
        // (λx.λx'.y x x')[y := x]
        let term = Term::abstraction(
            "x",
            Term::abstraction(
                "x'",
                Term::application(
                    Term::application(Term::variable("y"), Term::variable("x")),
                    Term::variable("x'"),
                ),
            ),
        );

        let result = substitute(&term, "y", &Term::variable("x"));

        assert_eq!(
            result,
            Term::abstraction(
                "x''",
                Term::abstraction(
                    "x'",
                    Term::application(
                        Term::application(Term::variable("x"), Term::variable("x''")),
                        Term::variable("x'"),
                    ),
                ),
            )
        );
    }

    #[test]
    fn test_fresh_variable_name() {
        let avoid = HashSet::from(["a", "a'"]);

        assert_eq!(fresh_variable_name("a", &avoid), "a''");
        assert_eq!(fresh_variable_name("b", &avoid), "b");
    }

    #[test]
    fn test_alpha_conversion() {
        let original = Term::abstraction(
            "x",
            Term::application(Term::variable("x"), Term::variable("y")),
        );

        let renamed = alpha_conversion(&original, "w").expect("Expected an abstraction.");

        assert_eq!(
            renamed,
            Term::abstraction(
                "w",
                Term::application(Term::variable("w"), Term::variable("y"))
            )
        );
        assert_eq!(free_variables(&renamed), HashSet::from(["y"]));
    }

    // Inner binders that shadow the old parameter keep their own occurrences.
    #[test]
    fn test_alpha_conversion_respects_inner_binder() {
        let original = Term::abstraction(
            "x",
            Term::application(
                Term::variable("x"),
                Term::abstraction("x", Term::variable("x")),
            ),
        );

        let renamed = alpha_conversion(&original, "v").expect("Expected an abstraction.");

        assert_eq!(
            renamed,
            Term::abstraction(
                "v",
                Term::application(
                    Term::variable("v"),
                    Term::abstraction("x", Term::variable("x")),
                ),
            )
        );
    }

    #[test]
    fn test_alpha_conversion_of_non_abstraction() {
        assert_eq!(alpha_conversion(&Term::variable("x"), "y"), None);
    }

    // FV(t[v := r]) ⊆ (FV(t) \ {v}) ∪ FV(r) over many random terms.
    #[test]
    fn test_substitute_never_captures() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..2000 {
            let term = random_term(&mut rng, 5);
            let replacement = random_term(&mut rng, 3);
            let var_name = NAMES[rng.gen_range(0..NAMES.len())];

            let result = substitute(&term, var_name, &replacement);

            let mut allowed: HashSet<&str> = free_variables(&term);
            allowed.remove(var_name);
            allowed.extend(free_variables(&replacement));

            let result_free_vars = free_variables(&result);
            assert!(
                result_free_vars.is_subset(&allowed),
                "{} [{} := {}] = {} has free variables {:?}, allowed {:?}",
                term,
                var_name,
                replacement,
                result,
                result_free_vars,
                allowed
            );

            // When the variable occurs free, every free variable of the
            // replacement must survive.
            if free_variables(&term).contains(var_name) {
                assert!(free_variables(&replacement).is_subset(&result_free_vars));
            }
        }
    }

    #[test]
    fn test_alpha_conversion_preserves_free_variables() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let param = NAMES[rng.gen_range(0..NAMES.len())];
            let abstraction = Term::abstraction(param, random_term(&mut rng, 5));

            let Term::Abstraction { body, .. } = &abstraction else {
                unreachable!();
            };
            let new_param = fresh_variable_name("n", &free_variables(body));

            let renamed =
                alpha_conversion(&abstraction, &new_param).expect("Expected an abstraction.");

            assert_eq!(free_variables(&renamed), free_variables(&abstraction));
        }
    }
}
