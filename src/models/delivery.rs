//! Delivery records and address categories.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::error::Error;

/// Address category of a delivery, which fixes the time spent at the stop.
///
/// Encoded on the wire as its integer code (0–4).
///
/// # Examples
///
/// ```
/// use courier_routing::models::AddressType;
///
/// assert_eq!(AddressType::Industrial.service_minutes(), 10.0);
/// assert_eq!(AddressType::try_from(1).unwrap(), AddressType::Commercial);
/// assert!(AddressType::try_from(9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AddressType {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Educational,
    Government,
}

impl AddressType {
    /// Service time at a stop of this category, in minutes.
    pub fn service_minutes(self) -> f64 {
        match self {
            Self::Residential => 5.0,
            Self::Commercial => 7.0,
            Self::Industrial => 10.0,
            Self::Educational => 5.0,
            Self::Government => 8.0,
        }
    }

    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Self::Residential => 0,
            Self::Commercial => 1,
            Self::Industrial => 2,
            Self::Educational => 3,
            Self::Government => 4,
        }
    }
}

impl TryFrom<u8> for AddressType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Residential),
            1 => Ok(Self::Commercial),
            2 => Ok(Self::Industrial),
            3 => Ok(Self::Educational),
            4 => Ok(Self::Government),
            other => Err(Error::invalid_argument(format!(
                "unknown address_type {other} (expected 0-4)"
            ))),
        }
    }
}

impl From<AddressType> for u8 {
    fn from(t: AddressType) -> Self {
        t.code()
    }
}

/// A single stop to be delivered.
///
/// Deliveries are immutable once handed to the engine; routes refer back to
/// them by reference.
///
/// # Examples
///
/// ```
/// use courier_routing::models::{AddressType, Coordinate, Delivery};
///
/// let d = Delivery::new("ORD1", Coordinate::new(17.5, 78.5), AddressType::Commercial)
///     .with_time_slot("10-11");
/// assert_eq!(d.id(), "ORD1");
/// assert_eq!(d.time_slot(), Some("10-11"));
/// assert_eq!(d.service_minutes(), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    id: String,
    #[serde(flatten)]
    location: Coordinate,
    address_type: AddressType,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_slot: Option<String>,
}

impl Delivery {
    pub fn new(id: impl Into<String>, location: Coordinate, address_type: AddressType) -> Self {
        Self {
            id: id.into(),
            location,
            address_type,
            time_slot: None,
        }
    }

    /// Sets the requested time-slot label.
    pub fn with_time_slot(mut self, slot: impl Into<String>) -> Self {
        self.time_slot = Some(slot.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn time_slot(&self) -> Option<&str> {
        self.time_slot.as_deref()
    }

    /// Minutes spent at this stop.
    pub fn service_minutes(&self) -> f64 {
        self.address_type.service_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_time_table() {
        assert_eq!(AddressType::Residential.service_minutes(), 5.0);
        assert_eq!(AddressType::Commercial.service_minutes(), 7.0);
        assert_eq!(AddressType::Industrial.service_minutes(), 10.0);
        assert_eq!(AddressType::Educational.service_minutes(), 5.0);
        assert_eq!(AddressType::Government.service_minutes(), 8.0);
    }

    #[test]
    fn test_code_conversion() {
        for code in 0..5u8 {
            let t = AddressType::try_from(code).expect("known code");
            assert_eq!(t.code(), code);
        }
        assert!(AddressType::try_from(5).is_err());
    }

    #[test]
    fn test_address_type_serde() {
        let t: AddressType = serde_json::from_str("4").expect("valid code");
        assert_eq!(t, AddressType::Government);
        assert_eq!(serde_json::to_string(&t).expect("serializes"), "4");
        assert!(serde_json::from_str::<AddressType>("7").is_err());
    }

    #[test]
    fn test_delivery_without_slot() {
        let d = Delivery::new("A", Coordinate::new(1.0, 2.0), AddressType::default());
        assert!(d.time_slot().is_none());
        assert_eq!(d.location(), Coordinate::new(1.0, 2.0));
        assert_eq!(d.address_type(), AddressType::Residential);
    }
}
