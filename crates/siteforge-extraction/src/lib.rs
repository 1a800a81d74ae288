//! Lenient extraction of structured data from model output.
//!
//! Backends are asked for strict JSON but routinely wrap it in prose or code
//! fences. The helpers here locate the payload (first `{` to last `}`) and
//! deserialize it, reporting a typed error the caller can recover from.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[a-zA-Z0-9_+\-]*[ \t]*\r?\n(.*?)```").expect("static regex")
});

/// Failure to pull a structured payload out of free-form text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Response JSON did not match the expected shape: {0}")]
    InvalidJson(String),
}

/// Return the substring from the first `{` to the last `}` inclusive.
///
/// The slice is not validated; nested or trailing braces in surrounding prose
/// are the caller's problem.
#[must_use]
pub fn extract_json_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    (start < end).then(|| &input[start..=end])
}

/// Deserialize the JSON object embedded in `input`.
///
/// Tries the whole input first, then the brace-delimited slice, then the same
/// two on the fence-stripped text.
pub fn parse_lenient<T: DeserializeOwned>(input: &str) -> Result<T, ExtractionError> {
    let stripped = strip_code_fences(input);
    let mut last_error = None;

    for candidate in [input.trim(), stripped.as_str()] {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            return Ok(value);
        }
        if let Some(slice) = extract_json_object(candidate) {
            match serde_json::from_str::<T>(slice) {
                Ok(value) => return Ok(value),
                Err(e) => last_error = Some(e.to_string()),
            }
        }
    }

    Err(last_error.map_or(ExtractionError::NoJsonObject, ExtractionError::InvalidJson))
}

/// Remove markdown fences, keeping their contents.
#[must_use]
pub fn strip_code_fences(input: &str) -> String {
    input.replace("```json", "").replace("```", "").trim().to_string()
}

/// Return the body of the first fenced code block, or the trimmed input when
/// there is none.
///
/// Used for code artifacts where the backend may or may not fence its answer.
#[must_use]
pub fn extract_code_block(input: &str) -> String {
    match CODE_FENCE.captures(input).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim_end().to_string(),
        None => input.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_extract_slice_from_prose() {
        let text = "Sure, here you go: {\"name\": \"x\"} hope that helps";
        assert_eq!(extract_json_object(text), Some("{\"name\": \"x\"}"));
    }

    #[test]
    fn test_extract_requires_both_braces() {
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_lenient_with_preamble() {
        let parsed: Named = parse_lenient("Sure, here you go: {\"name\":\"cafe\"}").unwrap();
        assert_eq!(parsed.name, "cafe");
    }

    #[test]
    fn test_parse_lenient_inside_fence() {
        let text = "```json\n{\"name\": \"fenced\"}\n```";
        let parsed: Named = parse_lenient(text).unwrap();
        assert_eq!(parsed.name, "fenced");
    }

    #[test]
    fn test_parse_lenient_reports_shape_mismatch() {
        let err = parse_lenient::<Named>("{\"other\": 1}").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_lenient_no_object() {
        let err = parse_lenient::<Named>("I cannot help with that.").unwrap_err();
        assert_eq!(err, ExtractionError::NoJsonObject);
    }

    #[test]
    fn test_extract_code_block() {
        let text = "Here is the component:\n```tsx\nexport default function Hero() {}\n```\nDone.";
        assert_eq!(extract_code_block(text), "export default function Hero() {}");
    }

    #[test]
    fn test_extract_code_block_without_fence() {
        assert_eq!(extract_code_block("  const x = 1;\n"), "const x = 1;");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_wrapped_object_is_recovered(prefix in "[a-zA-Z ,.:]{0,40}", suffix in "[a-zA-Z ,.!]{0,40}", name in "[a-z]{1,12}") {
                let text = format!("{prefix}{{\"name\":\"{name}\"}}{suffix}");
                let parsed: Named = parse_lenient(&text).unwrap();
                prop_assert_eq!(parsed.name, name);
            }
        }
    }
}
