//! Request validation against the book schemas.

use crate::error::AppError;
use chrono::Datelike;
use serde_json::{Map, Value};
use std::fmt;

/// Upper bound of an integer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Fixed(i64),
    /// Current calendar year plus one.
    NextYear,
}

impl Bound {
    fn resolve(self, current_year: i32) -> i64 {
        match self {
            Bound::Fixed(n) => n,
            Bound::NextYear => i64::from(current_year) + 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer { min: i64, max: Bound },
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Closed set of fields. Keys outside `fields` are always rejected.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.name == name)
    }
}

const PAGES: FieldKind = FieldKind::Integer {
    min: 1,
    max: Bound::Fixed(i32::MAX as i64),
};
const YEAR: FieldKind = FieldKind::Integer {
    min: 1000,
    max: Bound::NextYear,
};

const fn field(name: &'static str, kind: FieldKind, required: bool) -> FieldRule {
    FieldRule { name, kind, required }
}

/// POST /books: every field required.
pub static BOOK_CREATE: Schema = Schema {
    name: "create",
    fields: &[
        field("isbn", FieldKind::Text, true),
        field("amazon_url", FieldKind::Text, true),
        field("author", FieldKind::Text, true),
        field("language", FieldKind::Text, true),
        field("pages", PAGES, true),
        field("publisher", FieldKind::Text, true),
        field("title", FieldKind::Text, true),
        field("year", YEAR, true),
    ],
};

/// PUT /books/:isbn: any subset of the known fields.
pub static BOOK_UPDATE: Schema = Schema {
    name: "update",
    fields: &[
        field("isbn", FieldKind::Text, false),
        field("amazon_url", FieldKind::Text, false),
        field("author", FieldKind::Text, false),
        field("language", FieldKind::Text, false),
        field("pages", PAGES, false),
        field("publisher", FieldKind::Text, false),
        field("title", FieldKind::Text, false),
        field("year", YEAR, false),
    ],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    NotAnObject,
    Missing,
    WrongType { expected: &'static str },
    BelowMinimum { min: i64 },
    AboveMaximum { max: i64 },
    Unexpected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

impl Violation {
    fn new(field: &str, kind: ViolationKind) -> Self {
        Violation {
            field: field.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::NotAnObject => write!(f, "body must be a JSON object"),
            ViolationKind::Missing => write!(f, "{} is required", self.field),
            ViolationKind::WrongType { expected } => write!(f, "{} must be {}", self.field, expected),
            ViolationKind::BelowMinimum { min } => write!(f, "{} must be at least {}", self.field, min),
            ViolationKind::AboveMaximum { max } => write!(f, "{} must be at most {}", self.field, max),
            ViolationKind::Unexpected => write!(f, "{} is not an allowed field", self.field),
        }
    }
}

/// Check `body` against `schema`, collecting every violation. `current_year` bounds `Bound::NextYear`.
pub fn validate_at(body: &Value, schema: &Schema, current_year: i32) -> Result<(), Vec<Violation>> {
    let map = match body {
        Value::Object(m) => m,
        _ => return Err(vec![Violation::new("", ViolationKind::NotAnObject)]),
    };
    let mut violations = Vec::new();
    check_fields(map, schema, current_year, &mut violations);
    for key in map.keys() {
        if schema.rule(key).is_none() {
            violations.push(Violation::new(key, ViolationKind::Unexpected));
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Same as [`validate_at`] with the current UTC year.
pub fn validate(body: &Value, schema: &Schema) -> Result<(), Vec<Violation>> {
    validate_at(body, schema, chrono::Utc::now().year())
}

fn check_fields(map: &Map<String, Value>, schema: &Schema, current_year: i32, out: &mut Vec<Violation>) {
    for rule in schema.fields {
        match map.get(rule.name) {
            None if rule.required => out.push(Violation::new(rule.name, ViolationKind::Missing)),
            None => {}
            Some(v) => {
                if let Some(kind) = check_value(v, rule.kind, current_year) {
                    out.push(Violation::new(rule.name, kind));
                }
            }
        }
    }
}

fn check_value(v: &Value, kind: FieldKind, current_year: i32) -> Option<ViolationKind> {
    match kind {
        FieldKind::Text => {
            if v.is_string() {
                None
            } else {
                Some(ViolationKind::WrongType { expected: "a string" })
            }
        }
        FieldKind::Integer { min, max } => {
            let n = match as_integer(v) {
                Some(n) => n,
                None => return Some(ViolationKind::WrongType { expected: "an integer" }),
            };
            let max = max.resolve(current_year);
            if n < min {
                Some(ViolationKind::BelowMinimum { min })
            } else if n > max {
                Some(ViolationKind::AboveMaximum { max })
            } else {
                None
            }
        }
    }
}

/// Integral JSON number as `i64`. Whole floats such as `100.0` or `1e2` count;
/// values beyond the `i64` range saturate so they fail the range check instead.
fn as_integer(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    if v.is_u64() {
        return Some(i64::MAX);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Rewrite whole-float values of integer fields as JSON integers so they
/// deserialize into `i32`. Run after validation.
pub fn normalize_integers(body: &mut Value, schema: &Schema) {
    let Some(map) = body.as_object_mut() else {
        return;
    };
    for rule in schema.fields {
        if !matches!(rule.kind, FieldKind::Integer { .. }) {
            continue;
        }
        if let Some(v) = map.get_mut(rule.name) {
            if v.is_f64() {
                if let Some(n) = as_integer(v) {
                    *v = Value::from(n);
                }
            }
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a request body, mapping violations to `AppError::Validation`.
    pub fn validate(body: &Value, schema: &Schema) -> Result<(), AppError> {
        validate(body, schema).map_err(|violations| {
            tracing::debug!(schema = schema.name, ?violations, "request body rejected");
            AppError::Validation(violations)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YEAR_NOW: i32 = 2026;

    fn full_book() -> Value {
        json!({
            "isbn": "0000000000000",
            "amazon_url": "http://example.com",
            "author": "Test Author",
            "language": "English",
            "pages": 100,
            "publisher": "Test Publisher",
            "title": "Test Book",
            "year": 2023
        })
    }

    fn kinds(r: Result<(), Vec<Violation>>) -> Vec<(String, ViolationKind)> {
        r.unwrap_err().into_iter().map(|v| (v.field, v.kind)).collect()
    }

    #[test]
    fn full_book_passes_create() {
        assert!(validate_at(&full_book(), &BOOK_CREATE, YEAR_NOW).is_ok());
    }

    #[test]
    fn create_reports_each_missing_field() {
        for rule in BOOK_CREATE.fields {
            let mut body = full_book();
            body.as_object_mut().unwrap().remove(rule.name);
            let got = kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW));
            assert_eq!(got, vec![(rule.name.to_string(), ViolationKind::Missing)]);
        }
    }

    #[test]
    fn extra_field_fails_both_schemas() {
        let mut body = full_book();
        body["edition"] = json!("first");
        let expected = vec![("edition".to_string(), ViolationKind::Unexpected)];
        assert_eq!(kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW)), expected);
        assert_eq!(kinds(validate_at(&json!({"edition": 2}), &BOOK_UPDATE, YEAR_NOW)), expected);
    }

    #[test]
    fn pages_must_be_a_positive_integer() {
        for bad in [json!(0), json!(-5), json!(12.5), json!("100"), Value::Null] {
            let mut body = full_book();
            body["pages"] = bad;
            let got = kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW));
            assert_eq!(got.len(), 1);
            assert_eq!(got[0].0, "pages");
        }
    }

    #[test]
    fn whole_floats_count_as_integers() {
        let mut body = full_book();
        body["pages"] = json!(1e2);
        body["year"] = json!(2023.0);
        assert!(validate_at(&body, &BOOK_CREATE, YEAR_NOW).is_ok());
        assert!(validate_at(&json!({"pages": 100.0, "year": 2023.0}), &BOOK_UPDATE, YEAR_NOW).is_ok());

        body["year"] = json!(999.0);
        assert_eq!(kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW))[0].1, ViolationKind::BelowMinimum { min: 1000 });
        body["year"] = json!(2023.0);
        body["pages"] = json!(1e300);
        assert_eq!(
            kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW))[0].1,
            ViolationKind::AboveMaximum { max: i32::MAX as i64 }
        );
    }

    #[test]
    fn normalize_rewrites_whole_floats_only_in_integer_fields() {
        let mut body = json!({"pages": 100.0, "year": 2023, "title": "1.0"});
        normalize_integers(&mut body, &BOOK_UPDATE);
        assert_eq!(body, json!({"pages": 100, "year": 2023, "title": "1.0"}));
        assert!(body["pages"].is_i64());
    }

    #[test]
    fn year_range_follows_the_clock() {
        let check = |year: i64| {
            let mut body = full_book();
            body["year"] = json!(year);
            validate_at(&body, &BOOK_CREATE, YEAR_NOW)
        };
        assert!(check(1000).is_ok());
        assert!(check(2027).is_ok());
        assert_eq!(kinds(check(999))[0].1, ViolationKind::BelowMinimum { min: 1000 });
        assert_eq!(kinds(check(2028))[0].1, ViolationKind::AboveMaximum { max: 2027 });
        assert_eq!(kinds(check(10000))[0].1, ViolationKind::AboveMaximum { max: 2027 });
    }

    #[test]
    fn update_accepts_any_subset() {
        assert!(validate_at(&json!({}), &BOOK_UPDATE, YEAR_NOW).is_ok());
        assert!(validate_at(&json!({"title": "Updated Title"}), &BOOK_UPDATE, YEAR_NOW).is_ok());
        assert!(validate_at(&full_book(), &BOOK_UPDATE, YEAR_NOW).is_ok());
    }

    #[test]
    fn update_still_checks_present_fields() {
        let got = kinds(validate_at(&json!({"year": 10000, "author": 7}), &BOOK_UPDATE, YEAR_NOW));
        assert_eq!(
            got,
            vec![
                ("author".to_string(), ViolationKind::WrongType { expected: "a string" }),
                ("year".to_string(), ViolationKind::AboveMaximum { max: 2027 }),
            ]
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        let got = kinds(validate_at(&json!([1, 2]), &BOOK_UPDATE, YEAR_NOW));
        assert_eq!(got, vec![(String::new(), ViolationKind::NotAnObject)]);
    }

    #[test]
    fn huge_integers_are_out_of_range_not_mistyped() {
        let mut body = full_book();
        body["pages"] = json!(u64::MAX);
        let got = kinds(validate_at(&body, &BOOK_CREATE, YEAR_NOW));
        assert_eq!(got[0].1, ViolationKind::AboveMaximum { max: i32::MAX as i64 });
    }

    #[test]
    fn violations_read_as_sentences() {
        let v = Violation::new("pages", ViolationKind::BelowMinimum { min: 1 });
        assert_eq!(v.to_string(), "pages must be at least 1");
        let v = Violation::new("edition", ViolationKind::Unexpected);
        assert_eq!(v.to_string(), "edition is not an allowed field");
    }
}
