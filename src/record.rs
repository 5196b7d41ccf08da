//! Row and response types for the chart data endpoint.

use serde::Serialize;

/// A single row of `template_data`.
///
/// Field order matches the column order of `SELECT_RECORDS` and the key order
/// of the serialized JSON object. Both integers are 64-bit; the query widens
/// `integer` columns so `serial` and `bigserial` tables decode alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub value: i64,
}

/// Status reported by every successful response
pub const STATUS_OK: &str = "ok";

/// Top-level JSON object wrapping the records.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps `data` in an envelope with status "ok".
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, value: i64) -> Record {
        Record {
            id,
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_envelope_key_order() {
        let body = serde_json::to_string(&Envelope::ok(vec![
            record(1, "a", 10),
            record(2, "b", 20),
        ]))
        .unwrap();
        assert_eq!(
            body,
            r#"{"status":"ok","data":[{"id":1,"name":"a","value":10},{"id":2,"name":"b","value":20}]}"#
        );
    }

    #[test]
    fn test_empty_envelope_has_empty_array() {
        let body = serde_json::to_string(&Envelope::ok(Vec::<Record>::new())).unwrap();
        assert_eq!(body, r#"{"status":"ok","data":[]}"#);
    }

    #[test]
    fn test_ids_beyond_32_bits_serialize_exactly() {
        let body = serde_json::to_string(&record(5_000_000_000, "big", i64::MIN)).unwrap();
        assert_eq!(
            body,
            r#"{"id":5000000000,"name":"big","value":-9223372036854775808}"#
        );
    }

    #[test]
    fn test_name_is_escaped() {
        let body = serde_json::to_string(&record(7, "say \"hi\"", -3)).unwrap();
        assert_eq!(body, r#"{"id":7,"name":"say \"hi\"","value":-3}"#);
    }
}
