//! The network interface header handed to the stack together with a received
//! payload.
//!
//! ```notrust
//! +---------+---------+--------+-------+-----+------+---------+---------+
//! | src len | dst len | if pid | flags | lqi | rssi | src     | dst     |
//! +---------+---------+--------+-------+-----+------+---------+---------+
//!      1         1        2        1      1     1     src len   dst len
//! ```

use l2_reflector_macros::frame;

use super::{Address, Mhr};
use super::{Error, Result};

bitflags::bitflags! {
    /// Flags of a [`NetifHeader`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct NetifFlags: u8 {
        /// The destination was the broadcast address.
        const BROADCAST = 0x80;
        /// The destination was a multicast group.
        const MULTICAST = 0x40;
    }
}

#[cfg(feature = "fuzz")]
impl<'a> arbitrary::Arbitrary<'a> for NetifFlags {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::from_bits_truncate(u8::arbitrary(u)?))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NetifFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:#x}", self.bits())
    }
}

#[frame(no_constructor)]
/// A reader/writer for the network interface header.
pub struct NetifHeader {
    /// Length of the source link-layer address.
    src_l2addr_len: u8,
    /// Length of the destination link-layer address.
    dst_l2addr_len: u8,
    /// Identifier of the interface the packet was received on.
    if_pid: u16,
    /// Raw [`NetifFlags`].
    flags: u8,
    /// Link quality indicator.
    lqi: u8,
    /// Received signal strength.
    rssi: u8,
}

impl<T: AsRef<[u8]>> NetifHeader<T> {
    /// Create a new [`NetifHeader`] reader/writer from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short for the fixed part plus
    /// both addresses.
    pub fn new(buffer: T) -> Result<Self> {
        let hdr = Self::new_unchecked(buffer);

        if !hdr.check_len() {
            return Err(Error);
        }

        Ok(hdr)
    }

    /// Returns `false` if the buffer is too short to contain the header.
    fn check_len(&self) -> bool {
        let len = self.buffer.as_ref().len();
        len >= Self::size() && len >= self.header_len()
    }

    /// Create a new [`NetifHeader`] reader/writer without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the total length of the header, addresses included.
    pub fn header_len(&self) -> usize {
        Self::size() + self.src_l2addr_len() as usize + self.dst_l2addr_len() as usize
    }

    /// Return the source address octets in stack order.
    pub fn src_addr(&self) -> &[u8] {
        &self.buffer.as_ref()[Self::size()..][..self.src_l2addr_len() as usize]
    }

    /// Return the destination address octets in stack order.
    pub fn dst_addr(&self) -> &[u8] {
        let offset = Self::size() + self.src_l2addr_len() as usize;
        &self.buffer.as_ref()[offset..][..self.dst_l2addr_len() as usize]
    }

    /// Return the [`NetifFlags`], unknown bits dropped.
    pub fn netif_flags(&self) -> NetifFlags {
        NetifFlags::from_bits_truncate(self.flags())
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> NetifHeader<T> {
    /// Write the source address. The length field must already be set.
    pub fn set_src_addr(&mut self, addr: &[u8]) {
        let size = Self::size();
        self.buffer.as_mut()[size..][..addr.len()].copy_from_slice(addr);
    }

    /// Write the destination address. Both length fields must already be set.
    pub fn set_dst_addr(&mut self, addr: &[u8]) {
        let offset = Self::size() + self.src_l2addr_len() as usize;
        self.buffer.as_mut()[offset..][..addr.len()].copy_from_slice(addr);
    }
}

impl<T: AsRef<[u8]>> core::fmt::Display for NetifHeader<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match NetifHeaderRepr::parse(self) {
            Ok(repr) => write!(f, "{repr}"),
            Err(_) => writeln!(f, "Netif Header (invalid)"),
        }
    }
}

/// A high-level representation of a [`NetifHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetifHeaderRepr {
    /// Source link-layer address.
    pub src_address: Address,
    /// Destination link-layer address.
    pub dst_address: Address,
    /// Interface identifier.
    pub if_pid: u16,
    /// Broadcast/multicast flags.
    pub flags: NetifFlags,
    /// Link quality indicator.
    pub lqi: u8,
    /// Received signal strength.
    pub rssi: u8,
}

impl NetifHeaderRepr {
    /// Parse a network interface header.
    ///
    /// # Errors
    ///
    /// Fails when an address length is not 0, 2 or 8.
    pub fn parse(reader: &NetifHeader<impl AsRef<[u8]>>) -> Result<Self> {
        Ok(Self {
            src_address: Address::from_bytes(reader.src_addr())?,
            dst_address: Address::from_bytes(reader.dst_addr())?,
            if_pid: reader.if_pid(),
            flags: reader.netif_flags(),
            lqi: reader.lqi(),
            rssi: reader.rssi(),
        })
    }

    /// Derive the network interface header of a received MHR.
    ///
    /// Addresses come back in stack order. A broadcast destination sets
    /// [`NetifFlags::BROADCAST`]. The interface identifier is left at zero for
    /// the caller to stamp.
    pub fn from_mhr<T: AsRef<[u8]>>(mhr: &Mhr<T>) -> Self {
        let dst_address = mhr.dst_address();
        let mut flags = NetifFlags::empty();
        if dst_address.is_broadcast() {
            flags |= NetifFlags::BROADCAST;
        }

        Self {
            src_address: mhr.src_address(),
            dst_address,
            if_pid: 0,
            flags,
            lqi: 0,
            rssi: 0,
        }
    }

    /// Query whether the broadcast flag is set.
    pub fn is_broadcast(&self) -> bool {
        self.flags.contains(NetifFlags::BROADCAST)
    }

    /// Query whether the multicast flag is set.
    pub fn is_multicast(&self) -> bool {
        self.flags.contains(NetifFlags::MULTICAST)
    }

    /// Return the length of the header when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        NetifHeader::<&[u8]>::size() + self.src_address.len() + self.dst_address.len()
    }

    /// Emit the header into `buffer` and return the number of octets written.
    ///
    /// # Errors
    ///
    /// Returns an error if `buffer` is shorter than
    /// [`NetifHeaderRepr::buffer_len`].
    pub fn emit(&self, buffer: &mut [u8]) -> Result<usize> {
        let len = self.buffer_len();
        if buffer.len() < len {
            return Err(Error);
        }

        let mut w = NetifHeader::new_unchecked(&mut buffer[..len]);
        w.set_src_l2addr_len(self.src_address.len() as u8);
        w.set_dst_l2addr_len(self.dst_address.len() as u8);
        w.set_if_pid(self.if_pid);
        w.set_flags(self.flags.bits());
        w.set_lqi(self.lqi);
        w.set_rssi(self.rssi);
        w.set_src_addr(self.src_address.as_bytes());
        w.set_dst_addr(self.dst_address.as_bytes());

        Ok(len)
    }
}

impl core::fmt::Display for NetifHeaderRepr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Netif Header")?;
        writeln!(f, "  if pid: {}", self.if_pid)?;
        writeln!(f, "  broadcast: {}", self.is_broadcast() as usize)?;
        writeln!(f, "  multicast: {}", self.is_multicast() as usize)?;
        writeln!(f, "  src address: {}", self.src_address)?;
        writeln!(f, "  dst address: {}", self.dst_address)?;
        Ok(())
    }
}
