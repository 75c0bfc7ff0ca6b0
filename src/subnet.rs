//! Expansion of IPv4 subnets into their host addresses.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};

const MAX_PREFIX: u8 = 32;

/// An IPv4 block given as a base address and a prefix length.
///
/// The base does not have to be the network address, `10.0.0.7/24` is
/// accepted and describes the same block as `10.0.0.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    base: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > MAX_PREFIX {
            return Err(Error::InvalidSubnet(format!("{}/{}", base, prefix)));
        }
        Ok(Self { base, prefix })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (MAX_PREFIX - p),
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) & self.mask())
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) | !self.mask())
    }

    /// Every address of the block in ascending order, network and broadcast
    /// included.
    pub fn range(&self) -> impl Iterator<Item = Ipv4Addr> {
        let first = u32::from(self.network());
        let last = u32::from(self.broadcast());
        (first..=last).map(Ipv4Addr::from)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = Error;

    /// Parses `a.b.c.d/N` or `a.b.c.d/w.x.y.z`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSubnet(s.to_string());

        let (addr, mask) = s.split_once('/').ok_or_else(invalid)?;
        if !is_ipv4_literal(addr) {
            return Err(invalid());
        }
        let base: Ipv4Addr = addr.parse().map_err(|_| invalid())?;

        let prefix = if mask.contains('.') {
            dotted_prefix(mask)
        } else {
            decimal_prefix(mask)
        }
        .ok_or_else(invalid)?;

        Ok(Self { base, prefix })
    }
}

fn decimal_prefix(mask: &str) -> Option<u8> {
    if mask.is_empty() || mask.len() > 2 || !mask.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    mask.parse().ok().filter(|p| *p <= MAX_PREFIX)
}

// Only contiguous masks (ones followed by zeros) describe a block.
fn dotted_prefix(mask: &str) -> Option<u8> {
    if !is_ipv4_literal(mask) {
        return None;
    }
    let bits = u32::from(mask.parse::<Ipv4Addr>().ok()?);
    let ones = bits.leading_ones();
    if bits.checked_shl(ones).unwrap_or(0) != 0 {
        return None;
    }
    Some(ones as u8)
}

/// Host addresses of `subnet`.
///
/// When the block holds at least two addresses the first (network) and last
/// (broadcast) are dropped, so a /31 yields nothing. A /32 yields its only
/// address.
pub fn expand(subnet: &Subnet) -> Vec<Ipv4Addr> {
    let mut ips: Vec<Ipv4Addr> = subnet.range().collect();
    if ips.len() < 2 {
        return ips;
    }
    ips.pop();
    ips.remove(0);
    ips
}

/// Parses `cidr` and returns its host addresses as strings.
pub fn hosts(cidr: &str) -> Result<Vec<String>> {
    let subnet: Subnet = cidr.parse()?;
    Ok(expand(&subnet).iter().map(Ipv4Addr::to_string).collect())
}

/// True for a plain dotted-quad such as `192.0.2.1`.
///
/// Rejects IPv6, IPv4-mapped IPv6, leading zeros and anything that does not
/// format back to the same text.
pub fn is_ipv4_literal(s: &str) -> bool {
    let octets: Vec<&str> = s.split('.').collect();
    if octets.len() != 4 {
        return false;
    }
    if !octets
        .iter()
        .all(|o| !o.is_empty() && o.len() <= 3 && o.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }
    match s.parse::<Ipv4Addr>() {
        Ok(ip) => ip.to_string() == s,
        Err(_) => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(ips: Vec<Ipv4Addr>) -> Vec<String> {
        ips.iter().map(Ipv4Addr::to_string).collect()
    }

    #[test]
    fn expands_slash_24() {
        let ips = hosts("10.0.0.0/24").unwrap();

        assert_eq!(254, ips.len());
        assert_eq!("10.0.0.1", ips[0]);
        assert_eq!("10.0.0.254", ips[253]);
        for (i, ip) in ips.iter().enumerate() {
            assert_eq!(format!("10.0.0.{}", i + 1), *ip);
        }
    }

    #[test]
    fn host_count_follows_prefix() {
        for prefix in 16..=30u8 {
            let subnet = Subnet::new(Ipv4Addr::new(172, 16, 0, 0), prefix).unwrap();
            let ips = expand(&subnet);

            assert_eq!((1usize << (32 - prefix)) - 2, ips.len(), "/{}", prefix);
            assert!(ips.windows(2).all(|w| u32::from(w[0]) + 1 == u32::from(w[1])));
            assert!(!ips.contains(&subnet.network()));
            assert!(!ips.contains(&subnet.broadcast()));
        }
    }

    #[test]
    fn slash_30_keeps_middle_pair() {
        assert_eq!(
            vec!["192.0.2.5", "192.0.2.6"],
            hosts("192.0.2.4/30").unwrap()
        );
    }

    #[test]
    fn slash_31_is_empty() {
        assert!(hosts("192.0.2.4/31").unwrap().is_empty());
    }

    #[test]
    fn slash_32_is_unchanged() {
        assert_eq!(vec!["192.0.2.9"], hosts("192.0.2.9/32").unwrap());
    }

    #[test]
    fn base_is_masked_to_network() {
        assert_eq!(hosts("10.1.2.0/29").unwrap(), hosts("10.1.2.5/29").unwrap());
    }

    #[test]
    fn carries_into_higher_octets() {
        let ips = hosts("10.0.0.0/23").unwrap();

        assert_eq!(510, ips.len());
        assert!(ips.contains(&"10.0.0.255".to_string()));
        assert!(ips.contains(&"10.0.1.0".to_string()));
        assert_eq!("10.0.1.254", ips[509]);
    }

    #[test]
    fn top_of_address_space() {
        let subnet: Subnet = "255.255.255.252/30".parse().unwrap();
        assert_eq!(
            vec!["255.255.255.253", "255.255.255.254"],
            strings(expand(&subnet))
        );
    }

    #[test]
    fn dotted_mask_matches_prefix() {
        assert_eq!(
            hosts("10.0.0.0/27").unwrap(),
            hosts("10.0.0.0/255.255.255.224").unwrap()
        );
        let subnet: Subnet = "10.0.0.0/0.0.0.0".parse().unwrap();
        assert_eq!(0, subnet.prefix());
    }

    #[test]
    fn rejects_malformed_subnets() {
        for input in &[
            "not-a-subnet",
            "10.0.0.0",
            "10.0.0.0/",
            "10.0.0.0/33",
            "10.0.0.0/+8",
            "10.0.0.0/-1",
            "10.0.0/24",
            "10.0.0.256/24",
            "010.0.0.0/24",
            "2001:db8::/64",
            "10.0.0.0/255.0.255.0",
            "10.0.0.0/255.255.255",
        ] {
            match hosts(input) {
                Err(Error::InvalidSubnet(s)) => assert_eq!(*input, s),
                other => panic!("{} gave {:?}", input, other),
            }
        }
    }

    #[test]
    fn rejects_prefix_over_32() {
        assert!(Subnet::new(Ipv4Addr::LOCALHOST, 33).is_err());
    }

    #[test]
    fn ipv4_literal_check() {
        assert!(is_ipv4_literal("192.0.2.1"));
        assert!(is_ipv4_literal("0.0.0.0"));
        assert!(is_ipv4_literal("255.255.255.255"));

        assert!(!is_ipv4_literal(""));
        assert!(!is_ipv4_literal("192.0.2"));
        assert!(!is_ipv4_literal("192.0.2.1.5"));
        assert!(!is_ipv4_literal("192.0.2.01"));
        assert!(!is_ipv4_literal("192.0.2.300"));
        assert!(!is_ipv4_literal(" 192.0.2.1"));
        assert!(!is_ipv4_literal("2a01:4f8::"));
        assert!(!is_ipv4_literal("::ffff:192.0.2.1"));
    }

    #[test]
    fn display_round_trips() {
        let subnet: Subnet = "198.51.100.0/24".parse().unwrap();
        assert_eq!("198.51.100.0/24", subnet.to_string());
    }
}
