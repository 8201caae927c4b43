//! Trusted network ranges.
//!
//! Administrative operations are only honoured from inside the registry's own
//! network. The engine asks a [`TrustedNetwork`]; [`IpRanges`] answers from a
//! list of CIDR prefixes.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Predicate over source addresses.
pub trait TrustedNetwork: Send + Sync {
    /// Whether `address` lies inside the trusted network. Unparsable input
    /// is never trusted.
    fn is_trusted(&self, address: &str) -> bool;
}

/// A single CIDR prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    network: IpAddr,
    prefix_len: u8,
}

impl IpRange {
    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &IpRange) -> bool {
        if other.prefix_len < self.prefix_len {
            return false;
        }
        match (self.network, other.network) {
            (IpAddr::V4(a), IpAddr::V4(b)) => {
                let mask = mask_v4(self.prefix_len);
                u32::from(a) & mask == u32::from(b) & mask
            }
            (IpAddr::V6(a), IpAddr::V6(b)) => {
                let mask = mask_v6(self.prefix_len);
                u128::from(a) & mask == u128::from(b) & mask
            }
            _ => false,
        }
    }

    fn max_prefix(addr: &IpAddr) -> u8 {
        match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }
}

fn mask_v4(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n => u32::MAX << (32 - u32::from(n)),
    }
}

fn mask_v6(prefix_len: u8) -> u128 {
    match prefix_len {
        0 => 0,
        n => u128::MAX << (128 - u32::from(n)),
    }
}

impl FromStr for IpRange {
    type Err = CoreError;

    /// Accepts `addr/len` or a bare address (a host prefix).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (addr, len) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (s, None),
        };

        let network: IpAddr = addr
            .parse()
            .map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        let max = Self::max_prefix(&network);
        let prefix_len = match len {
            Some(len) => len
                .parse::<u8>()
                .ok()
                .filter(|l| *l <= max)
                .ok_or_else(|| CoreError::InvalidRange(s.to_string()))?,
            None => max,
        };

        Ok(Self {
            network,
            prefix_len,
        })
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// The registry's trusted ranges.
#[derive(Debug, Clone, Default)]
pub struct IpRanges {
    ranges: Vec<IpRange>,
}

impl IpRanges {
    /// Parse a list of CIDR prefixes. Fails on the first malformed entry.
    pub fn parse<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let ranges = prefixes
            .iter()
            .map(|p| p.as_ref().parse::<IpRange>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl TrustedNetwork for IpRanges {
    fn is_trusted(&self, address: &str) -> bool {
        match address.parse::<IpRange>() {
            Ok(candidate) => self.ranges.iter().any(|r| r.contains(&candidate)),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> IpRanges {
        IpRanges::parse(&["193.0.0.0/20", "2001:67c:2e8::/48"]).unwrap()
    }

    #[test]
    fn test_ipv4_membership() {
        let r = ranges();
        assert!(r.is_trusted("193.0.0.1"));
        assert!(r.is_trusted("193.0.15.255"));
        assert!(!r.is_trusted("193.0.16.0"));
        assert!(!r.is_trusted("10.0.0.1"));
    }

    #[test]
    fn test_ipv6_membership() {
        let r = ranges();
        assert!(r.is_trusted("2001:67c:2e8:1::1"));
        assert!(!r.is_trusted("2001:db8::1"));
    }

    #[test]
    fn test_range_must_be_fully_contained() {
        let r = ranges();
        assert!(r.is_trusted("193.0.1.0/24"));
        assert!(!r.is_trusted("193.0.0.0/16"));
    }

    #[test]
    fn test_unparsable_is_untrusted() {
        let r = ranges();
        assert!(!r.is_trusted("user@example.net"));
        assert!(!r.is_trusted(""));
    }

    #[test]
    fn test_zero_prefix_matches_family() {
        let r = IpRanges::parse(&["0.0.0.0/0"]).unwrap();
        assert!(r.is_trusted("8.8.8.8"));
        assert!(!r.is_trusted("::1"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(IpRanges::parse(&["10.0.0.0/33"]).is_err());
        assert!(IpRanges::parse(&["not-an-ip"]).is_err());
        assert!(IpRanges::parse(&["10.0.0.0/x"]).is_err());
    }
}
