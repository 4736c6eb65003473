use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationErrors, ValidationErrorsKind};

lazy_static! {
    /// Regex for validating normalized vehicle number plates
    /// Uppercase alphanumeric groups separated by single spaces or hyphens
    /// - Valid: "KA01AB1234", "KA 01 AB 1234", "KA-01-AB-1234"
    /// - Invalid: "", "-KA01", "KA01--AB", "KA01@AB"
    pub static ref NUMBER_PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]+(?:[ -][A-Z0-9]+)*$").unwrap();

    /// Regex for validating phone numbers
    /// Optional leading '+' followed by 7 to 15 digits
    /// - Valid: "9876543210", "+919876543210"
    /// - Invalid: "98765", "+91 98765 43210", "phone"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

/// Trim and uppercase a number plate as entered by the reporter
pub fn normalize_number_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Pick the first offending field of a validator error set.
///
/// Returns the dotted camelCase path of the field (e.g. `location.address`)
/// and the message attached to its first failure. Fields are visited in
/// lexical order so the result is stable.
pub fn first_invalid_field(errors: &ValidationErrors) -> (String, String) {
    first_in(errors, "").unwrap_or_else(|| ("request".to_string(), errors.to_string()))
}

fn first_in(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(field, _)| field.to_string());

    for (field, kind) in entries {
        let path = if prefix.is_empty() {
            snake_to_camel(&field.to_string())
        } else {
            format!("{}.{}", prefix, snake_to_camel(&field.to_string()))
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                if let Some(failure) = failures.first() {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_in(inner, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    if let Some(found) = first_in(inner, &format!("{}[{}]", path, index)) {
                        return Some(found);
                    }
                }
            }
        }
    }

    None
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_number_plate_regex_valid() {
        assert!(NUMBER_PLATE_REGEX.is_match("KA01AB1234"));
        assert!(NUMBER_PLATE_REGEX.is_match("KA 01 AB 1234"));
        assert!(NUMBER_PLATE_REGEX.is_match("KA-01-AB-1234"));
        assert!(NUMBER_PLATE_REGEX.is_match("DL3C"));
    }

    #[test]
    fn test_number_plate_regex_invalid() {
        assert!(!NUMBER_PLATE_REGEX.is_match("")); // empty
        assert!(!NUMBER_PLATE_REGEX.is_match("-KA01")); // leading separator
        assert!(!NUMBER_PLATE_REGEX.is_match("KA01--AB")); // double separator
        assert!(!NUMBER_PLATE_REGEX.is_match("KA01@AB")); // symbol
        assert!(!NUMBER_PLATE_REGEX.is_match("ka01ab")); // not normalized
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("9876543210"));
        assert!(PHONE_REGEX.is_match("+919876543210"));
        assert!(!PHONE_REGEX.is_match("98765"));
        assert!(!PHONE_REGEX.is_match("+91 98765 43210"));
        assert!(!PHONE_REGEX.is_match("phone"));
    }

    #[test]
    fn test_normalize_number_plate() {
        assert_eq!(normalize_number_plate("  ka01ab1234 "), "KA01AB1234");
        assert_eq!(normalize_number_plate("mh 12 de 1433"), "MH 12 DE 1433");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Number plate is required"))]
        number_plate: String,
        #[validate(length(max = 3))]
        zone: String,
    }

    #[test]
    fn test_first_invalid_field_uses_camel_case_path() {
        let sample = Sample {
            number_plate: String::new(),
            zone: "ok".to_string(),
        };
        let errors = sample.validate().unwrap_err();

        let (field, message) = first_invalid_field(&errors);
        assert_eq!(field, "numberPlate");
        assert_eq!(message, "Number plate is required");
    }

    #[test]
    fn test_first_invalid_field_falls_back_to_code() {
        let sample = Sample {
            number_plate: "KA01".to_string(),
            zone: "toolong".to_string(),
        };
        let errors = sample.validate().unwrap_err();

        let (field, message) = first_invalid_field(&errors);
        assert_eq!(field, "zone");
        assert_eq!(message, "length");
    }
}
