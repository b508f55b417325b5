//! The Frame Check Sequence trailer.

use super::Mhr;
use super::{Error, Result};

/// Length of the Frame Check Sequence in octets.
pub const FCS_LEN: usize = 2;

// A 16-bit ITU-T CRC over x^16 + x^12 + x^5 + 1 with initial and final values
// of 0x0000 instead of the 0xFFFF of the ITU-T standard.
const CRC_16_IEEE802154: crc::Algorithm<u16> = crc::Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x2189,
    residue: 0x0000,
};

/// Calculate the Frame Check Sequence of `content`.
#[inline]
pub fn calculate_fcs(content: &[u8]) -> u16 {
    crc::Crc::<u16>::new(&CRC_16_IEEE802154).checksum(content)
}

/// A frame followed by its Frame Check Sequence.
pub struct FrameWithFcs<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> FrameWithFcs<T> {
    /// Create a new [`FrameWithFcs`] from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot hold an FCS or the FCS does not
    /// match.
    pub fn new(buffer: T) -> Result<Self> {
        let frame = Self::new_unchecked(buffer);

        if !frame.check_len() {
            return Err(Error);
        }

        if !frame.check_fcs() {
            return Err(Error);
        }

        Ok(frame)
    }

    fn check_len(&self) -> bool {
        self.buffer.as_ref().len() >= FCS_LEN
    }

    /// Create a new [`FrameWithFcs`] without checking length or FCS.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the frame without its FCS.
    pub fn content(&self) -> &[u8] {
        let b = self.buffer.as_ref();
        &b[..b.len() - FCS_LEN]
    }

    /// Return the received FCS.
    pub fn fcs(&self) -> u16 {
        let b = self.buffer.as_ref();
        u16::from_le_bytes([b[b.len() - 2], b[b.len() - 1]])
    }

    /// Check the received FCS against the content.
    #[inline]
    pub fn check_fcs(&self) -> bool {
        calculate_fcs(self.content()) == self.fcs()
    }

    /// Return an [`Mhr`] reader over the content.
    pub fn frame(&self) -> Result<Mhr<&'_ [u8]>> {
        Mhr::new(self.content())
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> FrameWithFcs<T> {
    /// Compute the FCS over the content and write it into the last two octets.
    pub fn fill_fcs(&mut self) {
        let fcs = calculate_fcs(self.content());
        let b = self.buffer.as_mut();
        let len = b.len();
        b[len - FCS_LEN..].copy_from_slice(&fcs.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(calculate_fcs(b"123456789"), 0x2189);
    }

    #[test]
    fn fill_then_check() {
        let mut buffer = [0x41, 0x88, 0x00, 0x23, 0x00, 0xff, 0xff, 0x02, 0x30, 0xaa, 0, 0];
        let mut frame = FrameWithFcs::new_unchecked(&mut buffer[..]);
        frame.fill_fcs();
        assert!(frame.check_fcs());

        let frame = FrameWithFcs::new(&buffer[..]).unwrap();
        assert_eq!(frame.frame().unwrap().payload(), &[0xaa]);

        buffer[9] = 0xab;
        assert!(FrameWithFcs::new(&buffer[..]).is_err());
    }

    #[test]
    fn too_short() {
        assert!(FrameWithFcs::new(&[0x00][..]).is_err());
    }
}
