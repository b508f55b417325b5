//! The MAC header of a data frame.
//!
//! Layout: frame control (2), sequence number (1), destination PAN ID (2),
//! destination address (0/2/8), source PAN ID (0/2, elided when the PAN ID
//! compression bit is set), source address (0/2/8).

use super::{Address, FrameControl, FrameType, FrameVersion};
use super::{Error, Result};

const SEQUENCE_NUMBER_OFFSET: usize = 2;
const DST_PAN_ID_OFFSET: usize = 3;
const DST_ADDRESS_OFFSET: usize = 5;

/// A high-level representation of a data frame MHR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct DataHeaderRepr {
    /// Set the acknowledgment request bit.
    pub ack_request: bool,
    /// The sequence number.
    pub sequence_number: u8,
    /// The destination PAN ID.
    pub dst_pan_id: u16,
    /// The destination address in stack order; written reversed.
    pub dst_address: Address,
    /// The source PAN ID. `None` sets the PAN ID compression bit.
    pub src_pan_id: Option<u16>,
    /// The source address; its octets are written as given.
    pub src_address: Address,
}

impl DataHeaderRepr {
    /// Validate the representation.
    ///
    /// A data frame built by the reflector always carries both addresses.
    pub fn validate(&self) -> Result<()> {
        if self.dst_address.is_empty() || self.src_address.is_empty() {
            return Err(Error);
        }

        Ok(())
    }

    /// Return the length of the MHR when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        DST_ADDRESS_OFFSET
            + self.dst_address.len()
            + if self.src_pan_id.is_some() { 2 } else { 0 }
            + self.src_address.len()
    }

    /// Emit the MHR into `buffer` and return the number of octets written.
    ///
    /// # Errors
    ///
    /// Fails without touching `buffer` when the representation is invalid or
    /// `buffer` is shorter than [`DataHeaderRepr::buffer_len`].
    pub fn emit(&self, buffer: &mut [u8]) -> Result<usize> {
        self.validate()?;

        let len = self.buffer_len();
        if buffer.len() < len {
            return Err(Error);
        }

        let mut fc = FrameControl::new_unchecked(&mut buffer[..2]);
        fc.clear();
        fc.set_frame_type(FrameType::Data);
        fc.set_frame_version(FrameVersion::Ieee802154_2006);
        fc.set_ack_request(self.ack_request);
        fc.set_pan_id_compression(self.src_pan_id.is_none());
        fc.set_dst_addressing_mode(self.dst_address.into());
        fc.set_src_addressing_mode(self.src_address.into());

        buffer[SEQUENCE_NUMBER_OFFSET] = self.sequence_number;
        buffer[DST_PAN_ID_OFFSET..][..2].copy_from_slice(&self.dst_pan_id.to_le_bytes());

        let mut offset = DST_ADDRESS_OFFSET;
        let dst_len = self.dst_address.len();
        self.dst_address
            .write_wire(&mut buffer[offset..][..dst_len])?;
        offset += dst_len;

        if let Some(id) = self.src_pan_id {
            buffer[offset..][..2].copy_from_slice(&id.to_le_bytes());
            offset += 2;
        }

        let src = self.src_address.as_bytes();
        buffer[offset..][..src.len()].copy_from_slice(src);
        offset += src.len();

        Ok(offset)
    }
}

/// A reader for a data frame MHR, optionally followed by its payload.
pub struct Mhr<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Mhr<T> {
    /// Create a new [`Mhr`] reader from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error when an addressing mode is reserved or the buffer is
    /// too short for the fields announced by the frame control.
    pub fn new(buffer: T) -> Result<Self> {
        let mhr = Self::new_unchecked(buffer);

        if !mhr.check_len() {
            return Err(Error);
        }

        Ok(mhr)
    }

    fn check_len(&self) -> bool {
        if self.buffer.as_ref().len() < DST_PAN_ID_OFFSET {
            return false;
        }

        match self.header_len_checked() {
            Some(len) => self.buffer.as_ref().len() >= len,
            None => false,
        }
    }

    /// Create a new [`Mhr`] reader without checking the buffer.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return a [`FrameControl`] reader.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        FrameControl::new_unchecked(&self.buffer.as_ref()[..2])
    }

    /// Return the sequence number.
    pub fn sequence_number(&self) -> u8 {
        self.buffer.as_ref()[SEQUENCE_NUMBER_OFFSET]
    }

    fn dst_len(&self) -> Option<usize> {
        self.frame_control().dst_addressing_mode().size()
    }

    fn src_len(&self) -> Option<usize> {
        self.frame_control().src_addressing_mode().size()
    }

    fn src_pan_id_offset(&self) -> Option<usize> {
        Some(match self.dst_len()? {
            0 => DST_PAN_ID_OFFSET,
            len => DST_ADDRESS_OFFSET + len,
        })
    }

    fn src_address_offset(&self) -> Option<usize> {
        let offset = self.src_pan_id_offset()?;
        if self.frame_control().pan_id_compression() {
            Some(offset)
        } else {
            Some(offset + 2)
        }
    }

    fn header_len_checked(&self) -> Option<usize> {
        Some(self.src_address_offset()? + self.src_len()?)
    }

    /// Return the length of the MHR in octets.
    pub fn header_len(&self) -> usize {
        self.header_len_checked().unwrap_or(0)
    }

    /// Return the destination PAN ID, present whenever a destination address is.
    pub fn dst_pan_id(&self) -> Option<u16> {
        match self.dst_len()? {
            0 => None,
            _ => {
                let b = &self.buffer.as_ref()[DST_PAN_ID_OFFSET..][..2];
                Some(u16::from_le_bytes([b[0], b[1]]))
            }
        }
    }

    /// Return the destination address in stack order.
    pub fn dst_address(&self) -> Address {
        let Some(len) = self.dst_len() else {
            return Address::Absent;
        };
        Address::from_wire(&self.buffer.as_ref()[DST_ADDRESS_OFFSET..][..len])
            .unwrap_or_default()
    }

    /// Return the source PAN ID if not elided.
    pub fn src_pan_id(&self) -> Option<u16> {
        if self.frame_control().pan_id_compression() {
            return None;
        }
        let b = &self.buffer.as_ref()[self.src_pan_id_offset()?..][..2];
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Return the source address in stack order.
    pub fn src_address(&self) -> Address {
        let (Some(offset), Some(len)) = (self.src_address_offset(), self.src_len()) else {
            return Address::Absent;
        };
        Address::from_wire(&self.buffer.as_ref()[offset..][..len]).unwrap_or_default()
    }

    /// Return the octets following the MHR.
    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[self.header_len()..]
    }
}

impl<T: AsRef<[u8]>> core::fmt::Display for Mhr<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.frame_control())?;
        writeln!(f, "Sequence Number")?;
        writeln!(f, "  sequence number: {}", self.sequence_number())?;
        writeln!(f, "Addressing Fields")?;

        if let Some(id) = self.dst_pan_id() {
            writeln!(f, "  dst pan id: {:0x}", id)?;
        }

        writeln!(f, "  dst address: {}", self.dst_address())?;

        if let Some(id) = self.src_pan_id() {
            writeln!(f, "  src pan id: {:0x}", id)?;
        }

        writeln!(f, "  src address: {}", self.src_address())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(dst_address: Address, src_pan_id: Option<u16>, src_address: Address) -> DataHeaderRepr {
        DataHeaderRepr {
            ack_request: false,
            sequence_number: 0x2a,
            dst_pan_id: 0xabcd,
            dst_address,
            src_pan_id,
            src_address,
        }
    }

    #[test]
    fn absent_addresses_are_rejected() {
        let mut buffer = [0u8; 32];
        let r = repr(Address::Absent, None, Address::Short([1, 2]));
        assert_eq!(r.emit(&mut buffer), Err(Error));
        let r = repr(Address::Short([1, 2]), None, Address::Absent);
        assert_eq!(r.emit(&mut buffer), Err(Error));
        assert_eq!(buffer, [0u8; 32]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let r = repr(Address::Short([1, 2]), None, Address::Short([3, 4]));
        let mut buffer = [0u8; 8];
        assert_eq!(r.buffer_len(), 9);
        assert_eq!(r.emit(&mut buffer), Err(Error));
    }

    #[test]
    fn uncompressed_source_pan_id() {
        let r = repr(
            Address::Short([0x12, 0x34]),
            Some(0xabcd),
            Address::Short([0x02, 0x30]),
        );
        let mut buffer = [0u8; 11];
        assert_eq!(r.emit(&mut buffer), Ok(11));
        assert_eq!(
            buffer,
            [0x01, 0x98, 0x2a, 0xcd, 0xab, 0x34, 0x12, 0xcd, 0xab, 0x02, 0x30]
        );

        let mhr = Mhr::new(&buffer[..]).unwrap();
        assert!(!mhr.frame_control().pan_id_compression());
        assert_eq!(mhr.src_pan_id(), Some(0xabcd));
        assert_eq!(mhr.header_len(), 11);
        assert!(mhr.payload().is_empty());
    }

    #[test]
    fn reserved_addressing_mode() {
        // destination addressing mode 0b01
        let buffer = [0x41, 0x94, 0x00, 0xcd, 0xab, 0x00, 0x00, 0x00, 0x00];
        assert!(Mhr::new(&buffer[..]).is_err());
    }

    #[test]
    fn truncated_header() {
        // short/long announced but only the short destination present
        let buffer = [0x41, 0xc8, 0x00, 0xcd, 0xab, 0x34, 0x12];
        assert!(Mhr::new(&buffer[..]).is_err());
        assert!(Mhr::new(&buffer[..2]).is_err());
    }

    #[test]
    fn no_destination() {
        // source only, PAN ID not compressed: source PAN at offset 3
        let buffer = [0x01, 0x80, 0x05, 0x23, 0x00, 0x30, 0x02];
        let mhr = Mhr::new(&buffer[..]).unwrap();
        assert_eq!(mhr.dst_pan_id(), None);
        assert_eq!(mhr.dst_address(), Address::Absent);
        assert_eq!(mhr.src_pan_id(), Some(0x0023));
        assert_eq!(mhr.src_address(), Address::Short([0x02, 0x30]));
        assert_eq!(mhr.header_len(), 7);
    }
}
