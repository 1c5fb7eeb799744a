use chrono::{Local, NaiveDateTime, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

const WITH_FRACTION: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const WHOLE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Local wall-clock time at microsecond precision, the resolution the save
/// file keeps.
pub fn now() -> NaiveDateTime {
    truncate_to_micros(Local::now().naive_local())
}

pub fn truncate_to_micros(timestamp: NaiveDateTime) -> NaiveDateTime {
    let nanos = timestamp.nanosecond();
    timestamp
        .with_nanosecond(nanos - nanos % 1_000)
        .unwrap_or(timestamp)
}

/// ISO-8601 with exactly six fractional digits, or none when the
/// microseconds are zero. Reading accepts any fraction width.
pub struct IsoMicros;

impl SerializeAs<NaiveDateTime> for IsoMicros {
    fn serialize_as<S>(source: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let timestamp = truncate_to_micros(*source);
        let format = if timestamp.nanosecond() == 0 {
            WHOLE_SECONDS
        } else {
            WITH_FRACTION
        };
        serializer.collect_str(&timestamp.format(format))
    }
}

impl<'de> DeserializeAs<'de, NaiveDateTime> for IsoMicros {
    fn deserialize_as<D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse::<NaiveDateTime>().map_err(D::Error::custom)
    }
}
