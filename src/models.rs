use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Studio {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A scheduled class with its teacher and studio resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub style: String,
    pub teacher: Teacher,
    pub studio: Studio,
    #[serde(with = "local_time")]
    #[schema(value_type = String, format = "date-time", example = "2024-06-01T09:00:00")]
    pub start_time: NaiveDateTime,
    #[serde(with = "local_time")]
    #[schema(value_type = String, format = "date-time", example = "2024-06-01T10:00:00")]
    pub end_time: NaiveDateTime,
    pub heat_level: u32,
    pub spots_left: u32,
    pub max_spots: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    None,
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub upcoming_classes: Vec<Class>,
    #[serde(default)]
    pub past_classes: Vec<Class>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_status: Option<MembershipStatus>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub class_id: String,
    pub user_id: String,
    pub donation_amount: f64,
    pub status: BookingStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Studios, teachers and joined classes as held in memory after a load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleData {
    pub studios: Vec<Studio>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Class>,
}

/// Class timestamps as local wall-clock time.
///
/// Values without an offset are taken as local time; values carrying an
/// offset are converted into the local timezone. Seconds may be omitted.
///
/// Output is always `YYYY-MM-DDTHH:MM:SS` local time: the original offset and
/// any fractional seconds are not written back.
pub(crate) mod local_time {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.with_timezone(&Local).naive_local());
        }
        raw.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use super::*;

    #[test]
    fn test_parse_naive_timestamp() {
        let parsed = local_time::parse("2024-06-01T09:00:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_offset_timestamp_converts_to_local() {
        let parsed = local_time::parse("2024-06-01T09:00:00Z").unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        let parsed = local_time::parse("2024-06-01T09:00").unwrap();
        assert_eq!(parsed, local_time::parse("2024-06-01T09:00:00").unwrap());
    }

    #[test]
    fn test_serialize_drops_offset_and_fraction() {
        #[derive(Serialize)]
        struct Wrapper(#[serde(with = "local_time")] NaiveDateTime);

        let parsed = local_time::parse("2024-06-01T09:00:00.250").unwrap();
        let json = serde_json::to_value(Wrapper(parsed)).unwrap();
        assert_eq!(json, "2024-06-01T09:00:00");
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!(local_time::parse("next tuesday").is_none());
    }

    #[test]
    fn test_class_serializes_camel_case() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let class = Class {
            id: "c1".into(),
            name: "Hot Vinyasa".into(),
            style: "vinyasa".into(),
            teacher: Teacher {
                id: "t1".into(),
                name: "Ana".into(),
                bio: "Teaches flow".into(),
                photo_url: None,
            },
            studio: Studio {
                id: "s1".into(),
                name: "Downtown".into(),
                address: "1 Main St".into(),
                city: "Austin".into(),
                state: "TX".into(),
                zip_code: "78701".into(),
            },
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            heat_level: 95,
            spots_left: 4,
            max_spots: 30,
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["startTime"], "2024-06-01T09:00:00");
        assert_eq!(json["studio"]["zipCode"], "78701");
        assert_eq!(json["spotsLeft"], 4);
        assert!(json["teacher"].get("photoUrl").is_none());
    }

    #[test]
    fn test_booking_and_membership_contracts() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":"b1","classId":"c1","userId":"u1","donationAmount":15.0,"status":"confirmed","createdAt":"2024-06-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.class_id, "c1");

        let user: User =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.c","membershipStatus":"expired"}"#)
                .unwrap();
        assert_eq!(user.membership_status, Some(MembershipStatus::Expired));
        assert!(user.upcoming_classes.is_empty());
    }
}
