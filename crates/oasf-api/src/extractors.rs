//! # Request Extraction
//!
//! Maps body rejections to [`AppError::BadRequest`] so every malformed
//! request gets the structured error body.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Split an NDJSON body into requests.
///
/// Blank lines are ignored. Parsing stops at the first malformed line; the
/// requests before it are returned together with the error for that line.
pub fn split_ndjson<T: DeserializeOwned>(body: &str) -> (Vec<T>, Option<AppError>) {
    let mut requests = Vec::new();
    for (line_no, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(request) => requests.push(request),
            Err(e) => {
                let err = AppError::BadRequest(format!(
                    "malformed request on line {}: {e}",
                    line_no + 1
                ));
                return (requests, Some(err));
            }
        }
    }
    (requests, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Line {
        n: u32,
    }

    #[test]
    fn splits_lines_and_skips_blanks() {
        let (lines, err) = split_ndjson::<Line>("{\"n\":1}\n\n{\"n\":2}\r\n");
        assert!(err.is_none());
        assert_eq!(lines, vec![Line { n: 1 }, Line { n: 2 }]);
    }

    #[test]
    fn stops_at_first_malformed_line() {
        let (lines, err) = split_ndjson::<Line>("{\"n\":1}\nnot json\n{\"n\":3}\n");
        assert_eq!(lines, vec![Line { n: 1 }]);
        match err {
            Some(AppError::BadRequest(msg)) => assert!(msg.contains("line 2"), "got: {msg}"),
            other => panic!("expected BadRequest, got: {other:?}"),
        }
    }
}
