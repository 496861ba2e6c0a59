//! Port types and port allocation.
//!
//! [`Port`] is a validated TCP port number and [`PortRange`] an inclusive
//! range of them. The submodules discover which ports the host already uses
//! ([`registry`]) and pick fresh ones for `auto_port()` placeholders
//! ([`allocator`]).

pub mod allocator;
pub mod registry;

#[cfg(test)]
mod proptests;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A valid TCP port number (1-65535).
///
/// # Examples
///
/// ```
/// use sprout::Port;
///
/// let port = Port::try_from(8080).unwrap();
/// assert_eq!(port.value(), 8080);
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// The lowest port `auto_port()` hands out by default.
    pub const FIRST_UNPRIVILEGED: u16 = 1024;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value,
                reason: "port 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The invalid port value.
    pub value: u16,
    /// The reason the port is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// An inclusive range of ports.
///
/// # Examples
///
/// ```
/// use sprout::{Port, PortRange};
///
/// let range = PortRange::new(
///     Port::try_from(5000).unwrap(),
///     Port::try_from(5010).unwrap(),
/// ).unwrap();
///
/// assert_eq!(range.len(), 11);
/// assert!(range.contains(Port::try_from(5005).unwrap()));
/// assert!(!range.contains(Port::try_from(4999).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    min: Port,
    max: Port,
}

impl PortRange {
    /// Creates a new port range.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is less than `min`.
    pub fn new(min: Port, max: Port) -> Result<Self, InvalidPortRangeError> {
        if max < min {
            Err(InvalidPortRangeError {
                min,
                max,
                reason: "max must be greater than or equal to min".into(),
            })
        } else {
            Ok(Self { min, max })
        }
    }

    /// The range `auto_port()` draws from by default: 1024-65535.
    ///
    /// ```
    /// use sprout::PortRange;
    ///
    /// let range = PortRange::unprivileged();
    /// assert_eq!(range.min().value(), 1024);
    /// assert_eq!(range.max().value(), 65535);
    /// ```
    #[must_use]
    pub const fn unprivileged() -> Self {
        Self {
            min: Port(Port::FIRST_UNPRIVILEGED),
            max: Port(Port::MAX),
        }
    }

    /// Returns the minimum port in the range.
    #[must_use]
    pub const fn min(&self) -> Port {
        self.min
    }

    /// Returns the maximum port in the range.
    #[must_use]
    pub const fn max(&self) -> Port {
        self.max
    }

    /// Returns `true` if the range contains the given port.
    #[must_use]
    pub const fn contains(&self, port: Port) -> bool {
        port.value() >= self.min.value() && port.value() <= self.max.value()
    }

    /// Returns the number of ports in the range.
    #[must_use]
    pub const fn len(&self) -> u16 {
        self.max.value() - self.min.value() + 1
    }

    /// Always `false`: a constructed range holds at least one port.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the port at `offset` from the start of the range, wrapping
    /// around at the end.
    ///
    /// ```
    /// use sprout::{Port, PortRange};
    ///
    /// let range = PortRange::new(
    ///     Port::try_from(5000).unwrap(),
    ///     Port::try_from(5002).unwrap(),
    /// ).unwrap();
    /// assert_eq!(range.nth_wrapping(1).value(), 5001);
    /// assert_eq!(range.nth_wrapping(4).value(), 5001);
    /// ```
    #[must_use]
    pub fn nth_wrapping(&self, offset: u32) -> Port {
        let step = offset % u32::from(self.len());
        // step < len <= 65535, so the sum never exceeds max
        let value = u32::from(self.min.value()) + step;
        Port(u16::try_from(value).unwrap_or(self.max.value()))
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Error type for invalid port ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortRangeError {
    /// The minimum port.
    pub min: Port,
    /// The maximum port.
    pub max: Port,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid port range {}-{}: {}",
            self.min, self.max, self.reason
        )
    }
}

impl std::error::Error for InvalidPortRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: u16, max: u16) -> PortRange {
        PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::try_from(0).is_err());
        assert!(Port::try_from(1).is_ok());
        assert!(Port::try_from(65535).is_ok());
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        let port: Port = serde_json::from_str("8080").unwrap();
        assert_eq!(port.value(), 8080);
        assert_eq!(serde_json::to_string(&port).unwrap(), "8080");
        assert!(serde_json::from_str::<Port>("0").is_err());
    }

    #[test]
    fn test_port_range_invalid() {
        let result = PortRange::new(Port::try_from(5010).unwrap(), Port::try_from(5000).unwrap());
        let err = result.unwrap_err();
        assert!(err.reason.contains("greater than or equal"));
    }

    #[test]
    fn test_port_range_display_and_len() {
        let r = range(5000, 5010);
        assert_eq!(format!("{r}"), "5000-5010");
        assert_eq!(r.len(), 11);
    }

    #[test]
    fn test_unprivileged_range() {
        let r = PortRange::unprivileged();
        assert_eq!(r.len(), 64512);
        assert!(r.contains(Port::try_from(1024).unwrap()));
        assert!(!r.contains(Port::try_from(1023).unwrap()));
    }

    #[test]
    fn test_nth_wrapping() {
        let r = range(65534, 65535);
        assert_eq!(r.nth_wrapping(0).value(), 65534);
        assert_eq!(r.nth_wrapping(1).value(), 65535);
        assert_eq!(r.nth_wrapping(2).value(), 65534);
        assert_eq!(r.nth_wrapping(u32::MAX).value(), 65535);
    }
}
