//! Addressing and option state of one reflector instance.

use l2_reflector_frame::{Address, DataHeaderRepr, NetifFlags, LONG_ADDRESS_LEN};

use crate::config::*;
use crate::netdev::{Channel, NetType};

bitflags::bitflags! {
    /// Option flags of a [`DeviceState`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Options: u16 {
        /// Request acknowledgments for unicast frames.
        const AUTOACK = 0x0001;
        /// Send from the long address instead of the short one.
        const SRC_ADDR_LONG = 0x0200;
        /// Put the source PAN ID into outgoing frames.
        const USE_SRC_PAN = 0x0400;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Options {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u16:#x}", self.bits())
    }
}

/// Fold a platform unique identifier into a long address.
///
/// Identifiers shorter than 8 octets are zero padded, octets beyond the eighth
/// are XORed into the first eight. The result is marked unicast and locally
/// administered.
pub fn long_address_from_unique_id(id: &[u8]) -> [u8; LONG_ADDRESS_LEN] {
    let mut addr = [0u8; LONG_ADDRESS_LEN];
    for (i, b) in id.iter().enumerate() {
        addr[i & 0x07] ^= *b;
    }

    addr[0] &= !0x01;
    addr[0] |= 0x02;
    addr
}

/// Addressing, PAN, channel and option configuration of a reflector.
///
/// Addresses are stored most significant octet first and exchanged as host
/// integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    short_address: [u8; 2],
    long_address: [u8; 8],
    pan_id: u16,
    channel: Channel,
    sequence_number: u8,
    options: Options,
    proto: NetType,
}

impl DeviceState {
    /// Create the state of a freshly initialized device.
    ///
    /// With a unique identifier the long address is derived from it and the
    /// short address is its first two octets. Otherwise the configured
    /// defaults are used.
    pub fn new(unique_id: Option<&[u8]>) -> Self {
        let mut state = Self {
            short_address: DEFAULT_ADDR_SHORT.to_be_bytes(),
            long_address: DEFAULT_ADDR_LONG.to_be_bytes(),
            pan_id: DEFAULT_PAN_ID,
            channel: Channel::try_from(DEFAULT_CHANNEL as u16).unwrap_or_default(),
            sequence_number: 0,
            options: Options::AUTOACK,
            proto: NetType::RECEIVE,
        };

        if let Some(id) = unique_id {
            let long = long_address_from_unique_id(id);
            state.long_address = long;
            state.short_address = [long[0], long[1]];
        }

        state
    }

    /// Return the short address.
    pub fn short_address(&self) -> u16 {
        u16::from_be_bytes(self.short_address)
    }

    /// Set the short address.
    pub fn set_short_address(&mut self, addr: u16) {
        self.short_address = addr.to_be_bytes();
    }

    /// Return the long address.
    pub fn long_address(&self) -> u64 {
        u64::from_be_bytes(self.long_address)
    }

    /// Set the long address.
    pub fn set_long_address(&mut self, addr: u64) {
        self.long_address = addr.to_be_bytes();
    }

    /// Return the PAN ID.
    pub fn pan_id(&self) -> u16 {
        self.pan_id
    }

    /// Set the PAN ID.
    pub fn set_pan_id(&mut self, pan_id: u16) {
        self.pan_id = pan_id;
    }

    /// Return the channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Set the channel.
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Return the sequence number the next frame is sent with.
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Return the option flags.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Set or clear `option`.
    pub fn set_option(&mut self, option: Options, enabled: bool) {
        self.options.set(option, enabled);
    }

    /// Return the protocol received frames are tagged with.
    pub fn proto(&self) -> NetType {
        self.proto
    }

    /// Return the address frames are sent from.
    pub fn src_address(&self) -> Address {
        if self.options.contains(Options::SRC_ADDR_LONG) {
            Address::Extended(self.long_address)
        } else {
            Address::Short(self.short_address)
        }
    }

    /// Return the IPv6 interface identifier of the source address.
    pub fn ipv6_iid(&self) -> [u8; 8] {
        match self.src_address() {
            Address::Extended(addr) => {
                let mut iid = addr;
                iid[0] ^= 0x02;
                iid
            }
            Address::Short([a, b]) => [0, 0, 0, 0xff, 0xfe, 0, a, b],
            Address::Absent => [0; 8],
        }
    }

    /// Describe the MHR of the next data frame to `dst`.
    ///
    /// A broadcast or multicast destination becomes the broadcast short
    /// address whatever `dst` holds. Otherwise `dst` must be a 2 or 8 octet
    /// address in stack order.
    pub fn header_repr(
        &self,
        dst: &[u8],
        flags: NetifFlags,
    ) -> l2_reflector_frame::Result<DataHeaderRepr> {
        let group = flags.intersects(NetifFlags::BROADCAST | NetifFlags::MULTICAST);

        let dst_address = if group {
            Address::BROADCAST
        } else {
            match Address::from_bytes(dst)? {
                Address::Absent => return Err(l2_reflector_frame::Error),
                addr => addr,
            }
        };

        Ok(DataHeaderRepr {
            ack_request: !group && self.options.contains(Options::AUTOACK),
            sequence_number: self.sequence_number,
            dst_pan_id: self.pan_id,
            dst_address,
            src_pan_id: self
                .options
                .contains(Options::USE_SRC_PAN)
                .then_some(self.pan_id),
            src_address: self.src_address(),
        })
    }

    /// Build the MHR of the next data frame to `dst` into `buf`.
    ///
    /// The sequence number advances only when a header is written.
    pub fn build_header(
        &mut self,
        dst: &[u8],
        flags: NetifFlags,
        buf: &mut [u8],
    ) -> l2_reflector_frame::Result<usize> {
        let len = self.header_repr(dst, flags)?.emit(buf)?;
        self.sequence_number = self.sequence_number.wrapping_add(1);
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use l2_reflector_frame::{Mhr, MAX_HDR_LEN};

    use super::*;

    #[test]
    fn defaults() {
        let state = DeviceState::new(None);
        assert_eq!(state.short_address(), 0x0230);
        assert_eq!(state.long_address(), 0x1222_3344_5566_7788);
        assert_eq!(state.pan_id(), 0x0023);
        assert_eq!(state.channel(), Channel::_26);
        assert_eq!(state.sequence_number(), 0);
        assert_eq!(state.options(), Options::AUTOACK);
        assert_eq!(state.src_address(), Address::Short([0x02, 0x30]));
    }

    #[test]
    fn unique_id_padding_and_folding() {
        assert_eq!(
            long_address_from_unique_id(&[0x01, 0x02, 0x03]),
            [0x02, 0x02, 0x03, 0, 0, 0, 0, 0]
        );

        let id = [
            0xf1, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x01, 0x01, 0x02,
        ];
        assert_eq!(
            long_address_from_unique_id(&id),
            [0xf2, 0x11, 0x22, 0x30, 0x40, 0x50, 0x60, 0x70]
        );

        let state = DeviceState::new(Some(&id));
        assert_eq!(state.long_address(), 0xf211_2230_4050_6070);
        assert_eq!(state.short_address(), 0xf211);
    }

    #[test]
    fn address_round_trips() {
        let mut state = DeviceState::new(None);

        for addr in [0u16, 1, 0x00ff, 0xff00, 0x1234, u16::MAX] {
            state.set_short_address(addr);
            assert_eq!(state.short_address(), addr);
        }

        for _ in 0..1000 {
            let short: u16 = rand::random();
            state.set_short_address(short);
            assert_eq!(state.short_address(), short);

            let long: u64 = rand::random();
            state.set_long_address(long);
            assert_eq!(state.long_address(), long);
        }

        state.set_long_address(0x0102_0304_0506_0708);
        state.set_option(Options::SRC_ADDR_LONG, true);
        assert_eq!(
            state.src_address(),
            Address::Extended([1, 2, 3, 4, 5, 6, 7, 8])
        );
    }

    #[test]
    fn ipv6_iid() {
        let mut state = DeviceState::new(None);
        assert_eq!(state.ipv6_iid(), [0, 0, 0, 0xff, 0xfe, 0, 0x02, 0x30]);

        state.set_option(Options::SRC_ADDR_LONG, true);
        assert_eq!(
            state.ipv6_iid(),
            [0x10, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
        );
    }

    #[test]
    fn header_short_unicast() {
        let mut state = DeviceState::new(None);
        let mut buf = [0u8; MAX_HDR_LEN];

        let len = state
            .build_header(&[0x12, 0x34], NetifFlags::empty(), &mut buf)
            .unwrap();
        assert_eq!(&buf[..len], &[0x61, 0x98, 0x00, 0x23, 0x00, 0x34, 0x12, 0x02, 0x30]);
        assert_eq!(state.sequence_number(), 1);
    }

    #[test]
    fn header_long_with_src_pan() {
        let mut state = DeviceState::new(None);
        state.set_option(Options::SRC_ADDR_LONG, true);
        state.set_option(Options::USE_SRC_PAN, true);
        state.set_option(Options::AUTOACK, false);
        let mut buf = [0u8; MAX_HDR_LEN];

        let dst = [0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7];
        let len = state
            .build_header(&dst, NetifFlags::empty(), &mut buf)
            .unwrap();
        assert_eq!(len, MAX_HDR_LEN);
        assert_eq!(
            buf,
            [
                0x01, 0xdc, 0x00, 0x23, 0x00, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12, 0x00,
                0x23, 0x00, 0x12, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88
            ]
        );
    }

    #[test]
    fn group_destination_is_broadcast() {
        let mut state = DeviceState::new(None);
        let mut buf = [0u8; MAX_HDR_LEN];

        for flags in [NetifFlags::BROADCAST, NetifFlags::MULTICAST] {
            for dst in [&[][..], &[0x12, 0x34][..], &[1, 2, 3, 4, 5, 6, 7, 8][..]] {
                let len = state.build_header(dst, flags, &mut buf).unwrap();
                let mhr = Mhr::new(&buf[..len]).unwrap();
                assert_eq!(&buf[5..7], &[0xff, 0xff]);
                assert_eq!(mhr.dst_address(), Address::BROADCAST);
                assert!(!mhr.frame_control().ack_request());
            }
        }
    }

    #[test]
    fn builder_parser_lengths() {
        let mut state = DeviceState::new(None);
        let mut buf = [0u8; MAX_HDR_LEN];

        let len = state.build_header(&[1, 2], NetifFlags::empty(), &mut buf).unwrap();
        let mhr = Mhr::new(&buf[..len]).unwrap();
        assert_eq!(mhr.dst_address().len(), 2);
        assert_eq!(mhr.src_address().len(), 2);
        assert_eq!(mhr.dst_address(), Address::Short([1, 2]));

        state.set_option(Options::SRC_ADDR_LONG, true);
        let dst = [1, 2, 3, 4, 5, 6, 7, 8];
        let len = state.build_header(&dst, NetifFlags::empty(), &mut buf).unwrap();
        let mhr = Mhr::new(&buf[..len]).unwrap();
        assert_eq!(mhr.dst_address().len(), 8);
        assert_eq!(mhr.src_address().len(), 8);
        assert_eq!(mhr.dst_address(), Address::Extended(dst));
    }

    #[test]
    fn rejected_header_keeps_sequence_number() {
        let mut state = DeviceState::new(None);
        let mut buf = [0u8; MAX_HDR_LEN];

        for dst in [&[][..], &[1][..], &[1, 2, 3][..], &[0; 9][..]] {
            assert!(state.build_header(dst, NetifFlags::empty(), &mut buf).is_err());
        }
        assert!(state
            .build_header(&[1, 2], NetifFlags::empty(), &mut buf[..4])
            .is_err());
        assert_eq!(state.sequence_number(), 0);
    }

    #[test]
    fn sequence_number_wraps() {
        let mut state = DeviceState::new(None);
        let mut buf = [0u8; MAX_HDR_LEN];

        for i in 0..256u16 {
            state.build_header(&[1, 2], NetifFlags::empty(), &mut buf).unwrap();
            assert_eq!(buf[2], i as u8);
        }
        assert_eq!(state.sequence_number(), 0);
    }
}
