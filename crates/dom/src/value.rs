/// Hundred-nanosecond ticks: the internal unit for durations and for the
/// fractional-second part of a `DateTime` (see the glossary).
pub type Hnsecs = i64;

/// A calendar date with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CivilDate {
    /// Constructs a date, rejecting a month or day outside its valid range
    /// ("out-of-range components are rejected by the construction of
    /// the civil date/time value").
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, &'static str> {
        if !(1..=12).contains(&month) {
            return Err("month out of range");
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err("day out of range");
        }
        Ok(CivilDate { year, month, day })
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// A time-of-day with second resolution; sub-second precision lives
/// alongside it in [`DateTimeValue::fractional_hnsecs`], not here, so that
/// durations and date-times can share the same fractional-ticks handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilTime {
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self, &'static str> {
        if hour > 23 {
            return Err("hour out of range");
        }
        if minute > 59 {
            return Err("minute out of range");
        }
        if second > 59 {
            return Err("second out of range");
        }
        Ok(CivilTime { hour, minute, second })
    }
}

/// A date plus a time-of-day, with no fractional seconds or timezone
/// attached (those live on [`DateTimeValue`] itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    pub date: CivilDate,
    pub time: CivilTime,
}

/// The timezone a [`DateTimeValue`] is expressed in.
///
/// `Utc` is the single round-tripping spelling for `-UTC`/`-GMT` with no
/// trailing offset; a `-GMT±HH:MM` offset (including a literal zero
/// offset) always decodes to `FixedOffset`, never to `Utc` — see the first
/// "open question" resolution in `DESIGN.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timezone {
    Local,
    Utc,
    FixedOffset(i32),
    Named(Box<str>),
}

/// A date, time-of-day, fractional seconds, and timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeValue {
    pub datetime: CivilDateTime,
    /// `0..10_000_000` hundred-nanosecond ticks past `datetime`'s second.
    pub fractional_hnsecs: u32,
    pub timezone: Timezone,
}

/// A fully decoded SDLang scalar.
///
/// The variant discriminator and payload are set exactly once at
/// construction; nothing mutates a `Value` in place afterwards.
///
/// `Decimal` is carried in the tag set even though the decoder never
/// constructs it — a `bd`-suffixed number token decodes to `Value::Null`,
/// not `Value::Decimal` — so that a future
/// arbitrary-precision decimal type can be slotted in without reshuffling
/// this enum's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(Box<str>),
    Binary(Box<[u8]>),
    I32(i32),
    I64(i64),
    Decimal,
    F32(f32),
    F64(f64),
    Bool(bool),
    DateTime(DateTimeValue),
    Date(CivilDate),
    Duration(Hnsecs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_february_30() {
        assert!(CivilDate::new(2021, 2, 30).is_err());
    }

    #[test]
    fn accepts_leap_day() {
        assert!(CivilDate::new(2020, 2, 29).is_ok());
        assert!(CivilDate::new(2021, 2, 29).is_err());
    }

    #[test]
    fn rejects_hour_24() {
        assert!(CivilTime::new(24, 0, 0).is_err());
    }
}
