use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;

/// Serialize the full collection as a JSON array, preserving order
pub fn encode(reminders: &[Reminder]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(reminders).map_err(|e| AppError::encoding(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> AppResult<Vec<Reminder>> {
    serde_json::from_slice(bytes).map_err(|e| AppError::decoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_collection_roundtrip() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Vec::<Reminder>::new());
    }

    #[test]
    fn test_roundtrip_preserves_order_and_completion() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 9, 15, 30).unwrap();
        let mut done = Reminder::new("done", now).unwrap();
        done.toggle_completion(now + chrono::Duration::minutes(5));
        let open = Reminder::new("open", now - chrono::Duration::days(1)).unwrap();
        let reminders = vec![done, open];

        let decoded = decode(&encode(&reminders).unwrap()).unwrap();
        assert_eq!(decoded, reminders);
    }

    #[test]
    fn test_decode_garbage_is_decoding_error() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Decoding(_)));
    }

    #[test]
    fn test_decode_reads_camel_case_records() {
        let json = r#"[{
            "id": "abc",
            "title": "Water plants",
            "date": "2025-01-20T08:00:00Z",
            "completedDate": "2025-01-20T09:00:00Z",
            "isCompleted": true
        }]"#;
        let decoded = decode(json.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "abc");
        assert!(decoded[0].is_completed);
        assert!(decoded[0].is_consistent());
    }
}
