pub mod meeting;
pub mod user;

pub use meeting::*;
pub use user::*;

use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::utils::AppError;

/// Parse a hex identity taken from a path or body.
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("invalid {} id", what)))
}

pub fn to_chrono(dt: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

pub fn to_bson(dt: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn object_ids_parse_from_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "user").unwrap(), id);
        assert!(parse_object_id("not-an-id", "user").is_err());
    }

    #[test]
    fn bson_and_chrono_times_convert_at_millisecond_precision() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(to_chrono(to_bson(dt)), dt);
    }
}
