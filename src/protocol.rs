//! Line protocol: `starttime=<s>&endtime=<s>` in, `{"results":{"energy":…,"units":"kWh"}}` out.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    core::{QueryError, SampleStore, Timestamp},
    prelude::*,
    quantity::energy::KilowattHours,
};

const QUERY_PREFIX: &str = "starttime=";
const END_PREFIX: &str = "&endtime=";

/// Energy reported for any failed query.
pub const ERROR_SENTINEL: KilowattHours = KilowattHours(-1.0);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct RangeQuery {
    #[serde(rename = "starttime")]
    pub start: Timestamp,

    #[serde(rename = "endtime")]
    pub end: Timestamp,
}

impl FromStr for RangeQuery {
    type Err = QueryError;

    /// Find the query anywhere in the request, skipping any leading framing such as HTTP request line.
    ///
    /// Only `starttime=<int>&endtime=<int>` itself is decoded, whatever follows it is ignored.
    fn from_str(request: &str) -> Result<Self, Self::Err> {
        let offset = request.find(QUERY_PREFIX).ok_or(QueryError::MalformedQuery)?;
        let query = &request[offset..];

        let start_length = QUERY_PREFIX.len() + integer_length(&query[QUERY_PREFIX.len()..]);
        if !query[start_length..].starts_with(END_PREFIX) {
            return Err(QueryError::MalformedQuery);
        }
        let end_offset = start_length + END_PREFIX.len();
        let query = &query[..end_offset + integer_length(&query[end_offset..])];

        serde_qs::from_str(query).map_err(|error| {
            debug!(query, "failed to decode the query: {error:#}");
            QueryError::MalformedQuery
        })
    }
}

/// Length of the optionally negative integer at the start of the text.
fn integer_length(text: &str) -> usize {
    let sign_length = usize::from(text.starts_with('-'));
    let digits = &text[sign_length..];
    sign_length + digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len())
}

#[derive(Serialize)]
struct Response {
    results: Results,
}

#[derive(Serialize)]
struct Results {
    energy: KilowattHours,
    units: &'static str,
}

/// Serialize the query outcome, collapsing every error into [`ERROR_SENTINEL`].
pub fn render(result: Result<KilowattHours, QueryError>) -> serde_json::Result<String> {
    let energy = result.unwrap_or(ERROR_SENTINEL);
    serde_json::to_string(&Response { results: Results { energy, units: "kWh" } })
}

/// Answer a raw request with a response body.
#[instrument(skip_all)]
pub fn answer(store: &SampleStore, request: &str) -> Result<String> {
    let result = request
        .parse::<RangeQuery>()
        .and_then(|query| {
            debug!(%query.start, %query.end, "querying…");
            store.get_energy(query.start, query.end)
        });
    match &result {
        Ok(energy) => info!(%energy, "answered"),
        Err(error) => warn!(kind = ?error, "query failed: {error}"),
    }
    Ok(render(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::tests::store_of;

    #[test]
    fn test_parse_bare() -> Result<(), QueryError> {
        let query: RangeQuery = "starttime=1800&endtime=5400".parse()?;
        assert_eq!(query, RangeQuery { start: Timestamp(1800), end: Timestamp(5400) });
        Ok(())
    }

    #[test]
    fn test_parse_http_request() -> Result<(), QueryError> {
        let request = "GET /?starttime=-10&endtime=20 HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
        let query: RangeQuery = request.parse()?;
        assert_eq!(query, RangeQuery { start: Timestamp(-10), end: Timestamp(20) });
        Ok(())
    }

    #[test]
    fn test_parse_trailing_newline() -> Result<(), QueryError> {
        let query: RangeQuery = "starttime=1&endtime=2\n".parse()?;
        assert_eq!(query.end, Timestamp(2));
        Ok(())
    }

    #[test]
    fn test_parse_ignores_trailing_content() -> Result<(), QueryError> {
        for request in [
            "starttime=0&endtime=3600;",
            "GET /starttime=0&endtime=3600/ HTTP/1.1",
            "starttime=0&endtime=3600&units=kwh",
            "starttime=0&endtime=3600\0\0\0",
        ] {
            let query: RangeQuery = request.parse()?;
            assert_eq!(
                query,
                RangeQuery { start: Timestamp(0), end: Timestamp(3600) },
                "request: {request:?}",
            );
        }
        Ok(())
    }

    #[test]
    fn test_parse_ignores_later_duplicates() -> Result<(), QueryError> {
        let query: RangeQuery = "starttime=0&endtime=3600&starttime=5&endtime=7".parse()?;
        assert_eq!(query, RangeQuery { start: Timestamp(0), end: Timestamp(3600) });
        Ok(())
    }

    #[test]
    fn test_integer_length() {
        assert_eq!(integer_length(""), 0);
        assert_eq!(integer_length("-"), 1);
        assert_eq!(integer_length("123&x"), 3);
        assert_eq!(integer_length("-45;"), 3);
        assert_eq!(integer_length("abc"), 0);
    }

    #[test]
    fn test_parse_malformed() {
        for request in [
            "",
            "hello",
            "endtime=5&starttime",
            "starttime=&endtime=5",
            "starttime=abc&endtime=5",
            "starttime=1",
            "starttime=1.5&endtime=2",
            "starttime=1 &endtime=2",
            "starttime=1&endtime=-",
        ] {
            assert_eq!(
                request.parse::<RangeQuery>(),
                Err(QueryError::MalformedQuery),
                "request: {request:?}",
            );
        }
    }

    #[test]
    fn test_render_ok() -> Result {
        assert_eq!(
            render(Ok(KilowattHours(0.015)))?,
            r#"{"results":{"energy":0.015,"units":"kWh"}}"#,
        );
        Ok(())
    }

    #[test]
    fn test_render_error() -> Result {
        assert_eq!(
            render(Err(QueryError::MalformedQuery))?,
            r#"{"results":{"energy":-1.0,"units":"kWh"}}"#,
        );
        Ok(())
    }

    /// Energy is written in the shortest round-trip form rather than with fixed decimals.
    /// Clients parse the value as a number, so `0.0` and `100.0` keep the trailing `.0`.
    #[test]
    fn test_number_format() -> Result {
        for (energy, expected) in [
            (0.0, "0.0"),
            (0.015, "0.015"),
            (100.0, "100.0"),
            (1.0 / 3.0, "0.3333333333333333"),
            (ERROR_SENTINEL.0, "-1.0"),
        ] {
            assert_eq!(
                render(Ok(KilowattHours(energy)))?,
                format!(r#"{{"results":{{"energy":{expected},"units":"kWh"}}}}"#),
            );
        }
        Ok(())
    }

    #[test]
    fn test_answer() -> Result {
        let store = store_of(&[(0, 10.0), (3600, 20.0), (7200, 10.0)]);
        assert_eq!(
            answer(&store, "GET /?starttime=0&endtime=3600 HTTP/1.1\r\n\r\n")?,
            r#"{"results":{"energy":0.01,"units":"kWh"}}"#,
        );
        assert_eq!(
            answer(&store, "starttime=1800&endtime=5400")?,
            r#"{"results":{"energy":0.015,"units":"kWh"}}"#,
        );
        Ok(())
    }

    #[test]
    fn test_answer_errors_collapse_to_sentinel() -> Result {
        let store = store_of(&[(0, 10.0), (3600, 20.0), (7200, 10.0)]);
        let sentinel = r#"{"results":{"energy":-1.0,"units":"kWh"}}"#;
        for request in [
            "no query here",
            "starttime=10&endtime=5",
            "starttime=-1&endtime=5",
            "starttime=0&endtime=7201",
        ] {
            assert_eq!(answer(&store, request)?, sentinel, "request: {request:?}");
        }
        assert_eq!(answer(&store_of(&[(0, 1.0)]), "starttime=0&endtime=0")?, sentinel);

        let huge = store_of(&[(0, 1e300), (1, 1e300), (i64::MAX, 1e300)]);
        assert_eq!(answer(&huge, "starttime=0&endtime=9223372036854775807")?, sentinel);
        Ok(())
    }
}
