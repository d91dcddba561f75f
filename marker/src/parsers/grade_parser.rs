//! Grade Parser
//!
//! Extracts a numeric grade out of a free-text comparison answer.
//!
//! The comparison prompt asks the model to finish with a JSON object:
//!
//! ```json
//! { "grade": 14, "rationale": "Correct joins, missing the HAVING clause." }
//! ```
//!
//! followed by the line `Note sur 20: 14`. Extraction tries, in order:
//!
//! 1. the last JSON object in the answer that carries a numeric `grade`;
//! 2. the first `Note sur 20: <integer>` line (degraded mode, can be disabled);
//! 3. otherwise the answer is reported as [`GradeExtraction::Unparsed`].
//!
//! Parsed grades are clamped into `[0, 20]`.

use crate::scorer::clamp_grade;
use crate::types::{GradeExtraction, GradeSource};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static NOTE_SUR_20: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Note sur 20\s*:\s*(\d+)").expect("grade pattern is valid"));

/// Parser for comparison answers.
#[derive(Debug, Clone, Copy)]
pub struct GradeParser {
    allow_pattern_fallback: bool,
}

impl Default for GradeParser {
    fn default() -> Self {
        Self {
            allow_pattern_fallback: true,
        }
    }
}

impl GradeParser {
    /// A parser that only accepts the JSON contract.
    pub fn strict() -> Self {
        Self {
            allow_pattern_fallback: false,
        }
    }

    pub fn parse(&self, response: &str) -> GradeExtraction {
        if let Some(extraction) = from_json(response) {
            return extraction;
        }
        if self.allow_pattern_fallback {
            if let Some(grade) = from_pattern(response) {
                debug!(grade, "grade taken from the 'Note sur 20' line");
                return GradeExtraction::Parsed {
                    grade: clamp_grade(grade),
                    source: GradeSource::Pattern,
                    rationale: None,
                };
            }
        }
        GradeExtraction::Unparsed
    }
}

/// Extracts a grade with the default parser.
pub fn parse_grade(response: &str) -> GradeExtraction {
    GradeParser::default().parse(response)
}

fn from_json(response: &str) -> Option<GradeExtraction> {
    // Walk opening braces from the end so the last object wins and an inner object
    // without a grade falls through to its enclosing one.
    response.rmatch_indices('{').find_map(|(start, _)| {
        let mut values =
            serde_json::Deserializer::from_str(&response[start..]).into_iter::<Value>();
        let object = match values.next()? {
            Ok(Value::Object(object)) => object,
            _ => return None,
        };
        let grade = object.get("grade")?.as_f64().filter(|g| g.is_finite())?;
        let rationale = object
            .get("rationale")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(GradeExtraction::Parsed {
            grade: clamp_grade(grade),
            source: GradeSource::Json,
            rationale,
        })
    })
}

fn from_pattern(response: &str) -> Option<f64> {
    NOTE_SUR_20
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(grade: f64, source: GradeSource) -> GradeExtraction {
        GradeExtraction::Parsed {
            grade,
            source,
            rationale: None,
        }
    }

    #[test]
    fn pattern_in_free_text() {
        let response = "The query is mostly right.\nNote sur 20: 14\nKeep it up.";
        assert_eq!(parse_grade(response), parsed(14.0, GradeSource::Pattern));
    }

    #[test]
    fn pattern_tolerates_spacing() {
        assert_eq!(parse_grade("Note sur 20 :  9"), parsed(9.0, GradeSource::Pattern));
    }

    #[test]
    fn first_pattern_wins() {
        assert_eq!(
            parse_grade("Note sur 20: 11 ... corrected: Note sur 20: 13"),
            parsed(11.0, GradeSource::Pattern)
        );
    }

    #[test]
    fn missing_grade_is_unparsed() {
        assert_eq!(parse_grade("Looks fine to me."), GradeExtraction::Unparsed);
        assert_eq!(parse_grade(""), GradeExtraction::Unparsed);
        assert_eq!(parse_grade("Note sur 20: quinze"), GradeExtraction::Unparsed);
    }

    #[test]
    fn json_contract_preferred() {
        let response = r#"Analysis...
{"grade": 17.5, "rationale": "Uses a correlated subquery instead of a join."}
Note sur 20: 12"#;
        assert_eq!(
            parse_grade(response),
            GradeExtraction::Parsed {
                grade: 17.5,
                source: GradeSource::Json,
                rationale: Some("Uses a correlated subquery instead of a join.".into()),
            }
        );
    }

    #[test]
    fn json_inside_code_fence() {
        let response = "```json\n{ \"grade\": 8, \"rationale\": \"wrong table\" }\n```";
        assert_eq!(parse_grade(response).grade(), Some(8.0));
    }

    #[test]
    fn nested_object_falls_through_to_outer() {
        let response = r#"{"grade": 15, "details": {"joins": "ok"}}"#;
        assert_eq!(parse_grade(response).grade(), Some(15.0));
    }

    #[test]
    fn json_without_grade_uses_pattern() {
        let response = r#"{"rationale": "no grade here"} Note sur 20: 6"#;
        assert_eq!(parse_grade(response), parsed(6.0, GradeSource::Pattern));
    }

    #[test]
    fn grades_are_clamped() {
        assert_eq!(parse_grade("Note sur 20: 35").grade(), Some(20.0));
        assert_eq!(parse_grade(r#"{"grade": -4}"#).grade(), Some(0.0));
    }

    #[test]
    fn strict_parser_ignores_pattern() {
        let parser = GradeParser::strict();
        assert_eq!(parser.parse("Note sur 20: 14"), GradeExtraction::Unparsed);
        assert_eq!(parser.parse(r#"{"grade": 14}"#).grade(), Some(14.0));
    }
}
