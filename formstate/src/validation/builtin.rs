//! Built-in validators.
//!
//! Every validator except [`required`] treats `Value::Null` as valid, so
//! presence is only ever enforced by `required`.

use super::errors::Errors;
use super::param::Param;
use super::registry::ValidatorRegistry;
use super::ValidationContext;
use crate::value::Value;

pub const REQUIRED: &str = "required";
pub const MIN_LENGTH: &str = "minLength";
pub const MAX_LENGTH: &str = "maxLength";
pub const PATTERN: &str = "pattern";
pub const EMAIL: &str = "email";
pub const EQUAL_TO_CONTROL: &str = "equalToControl";
pub const CALLBACK: &str = "callback";

/// Register all built-ins into `registry`.
pub fn install(registry: &ValidatorRegistry) {
    registry.add(REQUIRED, required);
    registry.add(MIN_LENGTH, min_length);
    registry.add(MAX_LENGTH, max_length);
    registry.add(PATTERN, pattern);
    registry.add(EMAIL, email);
    registry.add(EQUAL_TO_CONTROL, equal_to_control);
    registry.add(CALLBACK, callback);
}

fn fail(key: &str) -> Option<Errors> {
    Some(Errors::single(key))
}

fn mismatched(name: &str, param: &Param, cx: &ValidationContext<'_>) -> Option<Errors> {
    log::warn!(
        "Validator '{}' on '{}' got a {} parameter; ignoring",
        name,
        cx.field(),
        param.kind()
    );
    None
}

/// Fails on null and on strings that are blank after trimming.
pub fn required(value: &Value, _param: &Param, _cx: &ValidationContext<'_>) -> Option<Errors> {
    match value {
        Value::Null => fail(REQUIRED),
        Value::String(s) if s.trim().is_empty() => fail(REQUIRED),
        _ => None,
    }
}

pub fn min_length(value: &Value, param: &Param, cx: &ValidationContext<'_>) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    match param {
        Param::Length(min) if value.char_len() < *min => fail(MIN_LENGTH),
        Param::Length(_) => None,
        other => mismatched(MIN_LENGTH, other, cx),
    }
}

pub fn max_length(value: &Value, param: &Param, cx: &ValidationContext<'_>) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    match param {
        Param::Length(max) if value.char_len() > *max => fail(MAX_LENGTH),
        Param::Length(_) => None,
        other => mismatched(MAX_LENGTH, other, cx),
    }
}

pub fn pattern(value: &Value, param: &Param, cx: &ValidationContext<'_>) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    match param {
        Param::Pattern(re) if re.is_match(&value.to_string()) => None,
        Param::Pattern(_) => fail(PATTERN),
        other => mismatched(PATTERN, other, cx),
    }
}

/// Checks the address with `email_address`, which follows RFC 5322. Quoted
/// local parts (`"john"@example.com`) and domain literals
/// (`john@[127.0.0.1]`) are accepted, unlike the stricter regex-based checks
/// common in browser form libraries. Use a `pattern` rule alongside it to
/// restrict the accepted shape further.
pub fn email(value: &Value, _param: &Param, _cx: &ValidationContext<'_>) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    if email_address::EmailAddress::is_valid(&value.to_string()) {
        None
    } else {
        fail(EMAIL)
    }
}

/// Compares against the sibling's current form value. A missing sibling
/// never matches.
///
/// Changing the sibling does not re-validate this field; the form only
/// re-validates the field whose value changed.
pub fn equal_to_control(
    value: &Value,
    param: &Param,
    cx: &ValidationContext<'_>,
) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    match param {
        Param::Field(other) if cx.value_of(other).as_ref() == Some(value) => None,
        Param::Field(_) => fail(EQUAL_TO_CONTROL),
        other => mismatched(EQUAL_TO_CONTROL, other, cx),
    }
}

pub fn callback(value: &Value, param: &Param, cx: &ValidationContext<'_>) -> Option<Errors> {
    if value.is_null() {
        return None;
    }
    match param {
        Param::Callback(predicate) if predicate(value, cx) => None,
        Param::Callback(_) => fail(CALLBACK),
        other => mismatched(CALLBACK, other, cx),
    }
}
