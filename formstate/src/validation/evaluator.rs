use super::errors::Errors;
use super::registry::ValidatorRegistry;
use super::rules::Rules;
use super::ValidationContext;
use crate::value::Value;

/// Run every enabled rule against `value` and merge the failures.
///
/// There is no short-circuit: all failing validators are reported together.
/// Rules whose validator has since been removed from the registry are skipped.
pub fn evaluate(
    registry: &ValidatorRegistry,
    rules: &Rules,
    value: &Value,
    cx: &ValidationContext<'_>,
) -> Errors {
    let mut errors = Errors::new();

    for rule in rules.iter() {
        if !rule.param().is_enabled() {
            continue;
        }
        let Some(validator) = registry.get(rule.name()) else {
            log::debug!(
                "Skipping rule '{}' on '{}': validator no longer registered",
                rule.name(),
                cx.field()
            );
            continue;
        };
        if let Some(failed) = validator(value, rule.param(), cx) {
            errors.extend(failed);
        }
    }

    log::trace!("Evaluated '{}': [{}]", cx.field(), errors);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Form, FormOptions};
    use crate::validation::Param;

    #[test]
    fn test_reports_every_failure() {
        let form = Form::new(FormOptions::new());
        let registry = ValidatorRegistry::with_builtins();
        let rules = Rules::new().min_length(5).email().try_pattern("^[a-z]+$").unwrap();
        let cx = ValidationContext::new(&form, "foo");

        let errors = evaluate(&registry, &rules, &Value::from("AB"), &cx);
        assert_eq!(errors, Errors::from(["email", "minLength", "pattern"]));
    }

    #[test]
    fn test_skips_disabled_and_unregistered_rules() {
        let form = Form::new(FormOptions::new());
        let registry = ValidatorRegistry::with_builtins();
        registry.add("never", |_, _, _| Some(Errors::single("never")));
        let rules = Rules::new()
            .rule("required", false)
            .rule("never", Param::Flag(true));
        registry.delete("never");
        let cx = ValidationContext::new(&form, "foo");

        assert!(evaluate(&registry, &rules, &Value::Null, &cx).is_empty());
    }

    #[test]
    fn test_custom_validator_keys_are_merged() {
        let form = Form::new(FormOptions::new());
        let registry = ValidatorRegistry::with_builtins();
        registry.add("server", |_, _, _| Some(Errors::from(["taken", "reserved"])));
        let rules = Rules::new().required().rule("server", true);
        let cx = ValidationContext::new(&form, "foo");

        let errors = evaluate(&registry, &rules, &Value::from("admin"), &cx);
        assert_eq!(errors, Errors::from(["reserved", "taken"]));
    }
}
