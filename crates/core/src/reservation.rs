//! Table reservation requests.
//!
//! Reservations are not stored anywhere; validation is the whole of the
//! domain logic. The storefront simulates the booking once a request passes.

use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Allowed party sizes.
pub const GUESTS: RangeInclusive<u8> = 1..=20;

/// Errors that can occur when validating a [`ReservationRequest`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("please choose a date")]
    MissingDate,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("unknown time slot: {0}")]
    UnknownTimeSlot(String),
    #[error("number of guests must be a whole number")]
    InvalidGuests,
    #[error("number of guests must be between {min} and {max}")]
    GuestsOutOfRange { min: u8, max: u8 },
    #[error("please enter your name")]
    MissingName,
    #[error("please enter a phone number")]
    MissingPhone,
}

/// Evening seatings offered on the reservation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "7:00 PM")]
    SevenPm,
    #[serde(rename = "8:00 PM")]
    EightPm,
    #[serde(rename = "9:00 PM")]
    NinePm,
}

impl TimeSlot {
    pub const ALL: [Self; 3] = [Self::SevenPm, Self::EightPm, Self::NinePm];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SevenPm => "7:00 PM",
            Self::EightPm => "8:00 PM",
            Self::NinePm => "9:00 PM",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|slot| slot.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReservationError::UnknownTimeSlot(s.to_owned()))
    }
}

/// Reservation form input as submitted.
///
/// Every field is raw text so that a half-filled form still deserializes and
/// gets a field-specific error from [`ReservationRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Optional party size; blank means unspecified.
    #[serde(default)]
    pub guests: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// A validated reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub guests: Option<u8>,
    pub name: String,
    pub phone: String,
}

impl ReservationRequest {
    /// Check the request and produce a [`Reservation`].
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking date, time, guests, name and
    /// phone in that order.
    pub fn validate(self) -> Result<Reservation, ReservationError> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(ReservationError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ReservationError::InvalidDate(date.to_owned()))?;

        let time = self.time.parse::<TimeSlot>()?;

        let guests = match self.guests.trim() {
            "" => None,
            raw => {
                let count = raw
                    .parse::<u32>()
                    .map_err(|_| ReservationError::InvalidGuests)?;
                let count = u8::try_from(count)
                    .ok()
                    .filter(|count| GUESTS.contains(count))
                    .ok_or(ReservationError::GuestsOutOfRange {
                        min: *GUESTS.start(),
                        max: *GUESTS.end(),
                    })?;
                Some(count)
            }
        };

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ReservationError::MissingName);
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(ReservationError::MissingPhone);
        }

        Ok(Reservation {
            date,
            time,
            guests,
            name: name.to_owned(),
            phone: phone.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReservationRequest {
        ReservationRequest {
            date: "2026-11-01".to_string(),
            time: "8:00 PM".to_string(),
            guests: "4".to_string(),
            name: " Asha Verma ".to_string(),
            phone: "+91 98765 43210".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let reservation = request().validate().expect("valid");
        assert_eq!(
            reservation.date,
            NaiveDate::from_ymd_opt(2026, 11, 1).expect("date")
        );
        assert_eq!(reservation.time, TimeSlot::EightPm);
        assert_eq!(reservation.guests, Some(4));
        assert_eq!(reservation.name, "Asha Verma");
    }

    #[test]
    fn test_guests_optional() {
        let reservation = ReservationRequest {
            guests: "  ".to_string(),
            ..request()
        }
        .validate()
        .expect("valid");
        assert_eq!(reservation.guests, None);
    }

    #[test]
    fn test_guests_range() {
        for guests in ["0", "21", "300"] {
            let result = ReservationRequest {
                guests: guests.to_string(),
                ..request()
            }
            .validate();
            assert_eq!(
                result,
                Err(ReservationError::GuestsOutOfRange { min: 1, max: 20 }),
                "guests = {guests}"
            );
        }

        let result = ReservationRequest {
            guests: "a few".to_string(),
            ..request()
        }
        .validate();
        assert_eq!(result, Err(ReservationError::InvalidGuests));
    }

    #[test]
    fn test_required_fields() {
        let missing_date = ReservationRequest {
            date: String::new(),
            ..request()
        };
        assert_eq!(missing_date.validate(), Err(ReservationError::MissingDate));

        let bad_date = ReservationRequest {
            date: "01/11/2026".to_string(),
            ..request()
        };
        assert!(matches!(
            bad_date.validate(),
            Err(ReservationError::InvalidDate(_))
        ));

        let missing_name = ReservationRequest {
            name: "   ".to_string(),
            ..request()
        };
        assert_eq!(missing_name.validate(), Err(ReservationError::MissingName));

        let missing_phone = ReservationRequest {
            phone: String::new(),
            ..request()
        };
        assert_eq!(missing_phone.validate(), Err(ReservationError::MissingPhone));
    }

    #[test]
    fn test_unknown_time_slot() {
        let result = ReservationRequest {
            time: "6:00 PM".to_string(),
            ..request()
        }
        .validate();
        assert_eq!(
            result,
            Err(ReservationError::UnknownTimeSlot("6:00 PM".to_string()))
        );
    }
}
