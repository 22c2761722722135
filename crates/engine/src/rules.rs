//! Ordered, short-circuiting business rule evaluation.
//!
//! Rules are named closures producing `Ok(())` or an error. They run in
//! the order given and stop at the first failure: a later rule's closure is
//! never executed, so its store reads never happen. The ordering is a
//! design contract relied on by callers, not an implementation accident.

use crate::error::EngineError;

/// A named rule over the current catalog state.
pub struct BusinessRule<'a> {
    name: &'static str,
    check: Box<dyn FnOnce() -> Result<(), EngineError> + 'a>,
}

impl<'a> BusinessRule<'a> {
    pub fn new(
        name: &'static str,
        check: impl FnOnce() -> Result<(), EngineError> + 'a,
    ) -> Self {
        Self {
            name,
            check: Box::new(check),
        }
    }
}

/// Evaluate rules in order, returning the first failure.
pub fn run<'a>(rules: impl IntoIterator<Item = BusinessRule<'a>>) -> Result<(), EngineError> {
    for rule in rules {
        let name = rule.name;
        match (rule.check)() {
            Ok(()) => tracing::trace!(rule = name, "rule passed"),
            Err(err) => {
                if err.is_business() {
                    tracing::info!(rule = name, rejection = %err, "rule rejected the mutation");
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleViolation;

    use std::cell::RefCell;

    #[test]
    fn all_passing_rules_run_in_order() {
        let order = RefCell::new(Vec::new());
        let result = run([
            BusinessRule::new("first", || {
                order.borrow_mut().push("first");
                Ok(())
            }),
            BusinessRule::new("second", || {
                order.borrow_mut().push("second");
                Ok(())
            }),
            BusinessRule::new("third", || {
                order.borrow_mut().push("third");
                Ok(())
            }),
        ]);

        assert!(result.is_ok());
        assert_eq!(*order.borrow(), ["first", "second", "third"]);
    }

    #[test]
    fn first_failure_stops_evaluation() {
        let later_ran = RefCell::new(false);
        let result = run([
            BusinessRule::new("rejecting", || {
                Err(RuleViolation::DuplicateName.into())
            }),
            BusinessRule::new("never-reached", || {
                *later_ran.borrow_mut() = true;
                Ok(())
            }),
        ]);

        assert_eq!(result, Err(RuleViolation::DuplicateName.into()));
        assert!(!*later_ran.borrow());
    }

    #[test]
    fn store_faults_propagate_like_violations() {
        let result = run([BusinessRule::new("reading", || {
            Err(tradegate_store::StoreError::Poisoned.into())
        })]);
        assert_eq!(
            result,
            Err(EngineError::Store(tradegate_store::StoreError::Poisoned))
        );
    }

    #[test]
    fn empty_rule_set_passes() {
        assert!(run([]).is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn evaluation_stops_exactly_at_the_first_failure(
                outcomes in proptest::collection::vec(any::<bool>(), 0..8),
            ) {
                let executed = RefCell::new(0usize);
                let rules: Vec<BusinessRule<'_>> = outcomes
                    .iter()
                    .map(|&passes| {
                        BusinessRule::new("generated", {
                            let executed = &executed;
                            move || {
                                *executed.borrow_mut() += 1;
                                if passes {
                                    Ok(())
                                } else {
                                    Err(RuleViolation::DuplicateName.into())
                                }
                            }
                        })
                    })
                    .collect();

                let result = run(rules);

                match outcomes.iter().position(|&passes| !passes) {
                    None => {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(*executed.borrow(), outcomes.len());
                    }
                    Some(first_failure) => {
                        prop_assert!(result.is_err());
                        prop_assert_eq!(*executed.borrow(), first_failure + 1);
                    }
                }
            }
        }
    }
}
