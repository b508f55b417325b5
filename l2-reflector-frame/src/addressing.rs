//! Link-layer addresses and the octet order conversions between the stack
//! and the air.
//!
//! The stack keeps addresses most significant octet first. On the air the
//! MHR carries them least significant octet first.

use super::{Error, Result};
use super::{LONG_ADDRESS_LEN, SHORT_ADDRESS_LEN};

/// Copy an address from stack order into on-air order.
///
/// # Errors
///
/// Returns an error when `host` and `wire` differ in length.
pub fn host_to_wire(host: &[u8], wire: &mut [u8]) -> Result<()> {
    reverse_into(host, wire)
}

/// Copy an address from on-air order into stack order.
///
/// # Errors
///
/// Returns an error when `wire` and `host` differ in length.
pub fn wire_to_host(wire: &[u8], host: &mut [u8]) -> Result<()> {
    reverse_into(wire, host)
}

fn reverse_into(src: &[u8], dst: &mut [u8]) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error);
    }

    for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
        *d = *s;
    }

    Ok(())
}

/// A link-layer address, octets in stack order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// No address.
    #[default]
    Absent,
    /// A 16-bit short address.
    Short([u8; 2]),
    /// A 64-bit extended address.
    Extended([u8; 8]),
}

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address::Short([0xff; 2]);

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast()
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Create an address from octets in stack order.
    ///
    /// # Errors
    ///
    /// Only lengths 0, 2 and 8 are addresses.
    pub fn from_bytes(a: &[u8]) -> Result<Self> {
        match a.len() {
            0 => Ok(Address::Absent),
            SHORT_ADDRESS_LEN => {
                let mut b = [0u8; 2];
                b.copy_from_slice(a);
                Ok(Address::Short(b))
            }
            LONG_ADDRESS_LEN => {
                let mut b = [0u8; 8];
                b.copy_from_slice(a);
                Ok(Address::Extended(b))
            }
            _ => Err(Error),
        }
    }

    /// Create an address from octets in on-air order.
    ///
    /// # Errors
    ///
    /// Only lengths 0, 2 and 8 are addresses.
    pub fn from_wire(a: &[u8]) -> Result<Self> {
        let mut raw = [0u8; LONG_ADDRESS_LEN];
        let raw = &mut raw[..a.len().min(LONG_ADDRESS_LEN)];
        wire_to_host(a, raw)?;
        Self::from_bytes(raw)
    }

    /// Write the address in on-air order into `wire`.
    ///
    /// # Errors
    ///
    /// Returns an error when `wire` is not exactly [`Address::len`] octets.
    pub fn write_wire(&self, wire: &mut [u8]) -> Result<()> {
        host_to_wire(self.as_bytes(), wire)
    }

    /// Return the octets of the address in stack order.
    pub const fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Absent => &[],
            Address::Short(value) => value,
            Address::Extended(value) => value,
        }
    }

    /// Return the length of the address in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Address::Absent => 0,
            Address::Short(_) => SHORT_ADDRESS_LEN,
            Address::Extended(_) => LONG_ADDRESS_LEN,
        }
    }

    /// Query whether the address is absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Address::Absent)
    }

    /// Derive the IPv6 interface identifier for this address.
    ///
    /// An extended address becomes a modified EUI-64 (universal/local bit
    /// flipped). A short address `XX:YY` becomes `0000:00ff:fe00:XXYY`.
    pub fn iid(&self) -> Option<[u8; 8]> {
        match self {
            Address::Absent => None,
            Address::Short(value) => Some([0, 0, 0, 0xff, 0xfe, 0, value[0], value[1]]),
            Address::Extended(value) => {
                let mut bytes = *value;
                bytes[0] ^= 1 << 1;
                Some(bytes)
            }
        }
    }
}

impl From<Address> for AddressingMode {
    fn from(value: Address) -> Self {
        match value {
            Address::Absent => AddressingMode::Absent,
            Address::Short(_) => AddressingMode::Short,
            Address::Extended(_) => AddressingMode::Extended,
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Absent => write!(f, "absent"),
            Address::Short(value) => write!(f, "{:02x}:{:02x}", value[0], value[1]),
            Address::Extended(value) => write!(
                f,
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                value[0], value[1], value[2], value[3], value[4], value[5], value[6], value[7]
            ),
        }
    }
}

/// Addressing mode as carried in the frame control field.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// No address field.
    Absent = 0b00,
    /// 2-octet address field.
    Short = 0b10,
    /// 8-octet address field.
    Extended = 0b11,
    /// The reserved mode `0b01`.
    Unknown,
}

impl AddressingMode {
    /// Return the size of the address in octets, `None` for the reserved mode.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Absent => Some(0),
            Self::Short => Some(SHORT_ADDRESS_LEN),
            Self::Extended => Some(LONG_ADDRESS_LEN),
            Self::Unknown => None,
        }
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Absent,
            0b10 => Self::Short,
            0b11 => Self::Extended,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_broadcast() {
        assert!(Address::BROADCAST.is_broadcast());
        assert!(Address::Short([0xff, 0xff]).is_broadcast());
        assert!(!Address::Short([0xff, 0xfe]).is_broadcast());

        assert!(!Address::BROADCAST.is_unicast());
        assert!(Address::Short([0xff, 0xfe]).is_unicast());
    }

    #[test]
    fn host_wire_pair() {
        let host = [0x12, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        let mut wire = [0u8; 8];
        host_to_wire(&host, &mut wire).unwrap();
        assert_eq!(wire, [0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x12]);

        let mut back = [0u8; 8];
        wire_to_host(&wire, &mut back).unwrap();
        assert_eq!(back, host);

        let mut short = [0u8; 2];
        host_to_wire(&[0x02, 0x30], &mut short).unwrap();
        assert_eq!(short, [0x30, 0x02]);
    }

    #[test]
    fn host_wire_length_mismatch() {
        let mut wire = [0u8; 2];
        assert_eq!(host_to_wire(&[1, 2, 3], &mut wire), Err(Error));
        assert_eq!(wire_to_host(&[1], &mut wire), Err(Error));
    }

    #[test]
    fn from_bytes() {
        assert_eq!(
            Address::from_bytes(&[0xff, 0xfe]),
            Ok(Address::Short([0xff, 0xfe]))
        );
        assert_eq!(
            Address::from_bytes(&[0x01; 8]),
            Ok(Address::Extended([0x01; 8]))
        );
        assert_eq!(Address::from_bytes(&[]), Ok(Address::Absent));
        assert_eq!(Address::from_bytes(&[0xff, 0xff, 0xff]), Err(Error));
    }

    #[test]
    fn from_wire() {
        assert_eq!(
            Address::from_wire(&[0x34, 0x12]),
            Ok(Address::Short([0x12, 0x34]))
        );
        assert_eq!(Address::from_wire(&[]), Ok(Address::Absent));
        assert_eq!(Address::from_wire(&[0; 9]), Err(Error));
    }

    #[test]
    fn iid() {
        assert_eq!(
            Address::Short([0x02, 0x30]).iid(),
            Some([0x00, 0x00, 0x00, 0xff, 0xfe, 0x00, 0x02, 0x30])
        );
        assert_eq!(
            Address::Extended([0x12, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]).iid(),
            Some([0x10, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88])
        );
        assert_eq!(Address::Absent.iid(), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Address::Short([0x02, 0x30])), "02:30");
        assert_eq!(format!("{}", Address::Absent), "absent");
    }
}
