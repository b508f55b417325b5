/// Options reachable through [`NetDevice::get`](super::NetDevice::get) and
/// [`NetDevice::set`](super::NetDevice::set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum NetOpt {
    /// Short address, `u16`.
    Address,
    /// Long address, `u64`.
    AddressLong,
    /// Length of the default link-layer address, `u16`, read-only.
    AddrLen,
    /// Length of the source address put into outgoing frames, `u16`.
    SrcLen,
    /// PAN ID, `u16`.
    Nid,
    /// Channel, `u16`.
    Channel,
    /// IPv6 interface identifier, 8 octets, read-only.
    Ipv6Iid,
    /// Protocol tag of received frames, one octet, read-only.
    Proto,
    /// Largest payload a frame can carry, `u16`, read-only.
    MaxPacketSize,
    /// Request acknowledgments for unicast frames, one octet.
    AutoAck,
    /// Put the source PAN ID into outgoing frames, one octet.
    UseSrcPan,
    /// Transmit power.
    TxPower,
    /// Device state.
    State,
    /// Last RSSI.
    Rssi,
    /// Promiscuous mode.
    Promiscuous,
    /// Frame preloading.
    Preloading,
}

impl NetOpt {
    /// Return the natural size of the option value in octets, `None` when the
    /// reflector does not support the option.
    pub const fn size(&self) -> Option<usize> {
        match self {
            Self::Address | Self::AddrLen | Self::SrcLen | Self::Nid => Some(2),
            Self::Channel | Self::MaxPacketSize => Some(2),
            Self::AddressLong | Self::Ipv6Iid => Some(8),
            Self::Proto | Self::AutoAck | Self::UseSrcPan => Some(1),
            Self::TxPower | Self::State | Self::Rssi | Self::Promiscuous | Self::Preloading => None,
        }
    }

    /// Query whether the option can be written.
    pub const fn is_writable(&self) -> bool {
        matches!(
            self,
            Self::Address
                | Self::AddressLong
                | Self::SrcLen
                | Self::Nid
                | Self::Channel
                | Self::AutoAck
                | Self::UseSrcPan
        )
    }
}

/// Protocol tag of a packet buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NetType {
    /// No protocol.
    #[default]
    Undefined = 0,
    /// Network interface header.
    Netif = 1,
    /// 6LoWPAN.
    SixLowpan = 2,
    /// IPv6.
    Ipv6 = 3,
}

impl NetType {
    /// The tag frames are handed to the stack with.
    #[cfg(feature = "sixlowpan")]
    pub const RECEIVE: Self = Self::SixLowpan;
    /// The tag frames are handed to the stack with.
    #[cfg(not(feature = "sixlowpan"))]
    pub const RECEIVE: Self = Self::Undefined;
}

impl From<u8> for NetType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Netif,
            2 => Self::SixLowpan,
            3 => Self::Ipv6,
            _ => Self::Undefined,
        }
    }
}

/// IEEE 802.15.4 channels of the 2.4 GHz band.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    /// 2_405 MHz
    _11 = 11,
    /// 2_410 MHz
    _12,
    /// 2_415 MHz
    _13,
    /// 2_420 MHz
    _14,
    /// 2_425 MHz
    _15,
    /// 2_430 MHz
    _16,
    /// 2_435 MHz
    _17,
    /// 2_440 MHz
    _18,
    /// 2_445 MHz
    _19,
    /// 2_450 MHz
    _20,
    /// 2_455 MHz
    _21,
    /// 2_460 MHz
    _22,
    /// 2_465 MHz
    _23,
    /// 2_470 MHz
    _24,
    /// 2_475 MHz
    _25,
    /// 2_480 MHz
    #[default]
    _26,
}

impl TryFrom<u16> for Channel {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            11 => Ok(Channel::_11),
            12 => Ok(Channel::_12),
            13 => Ok(Channel::_13),
            14 => Ok(Channel::_14),
            15 => Ok(Channel::_15),
            16 => Ok(Channel::_16),
            17 => Ok(Channel::_17),
            18 => Ok(Channel::_18),
            19 => Ok(Channel::_19),
            20 => Ok(Channel::_20),
            21 => Ok(Channel::_21),
            22 => Ok(Channel::_22),
            23 => Ok(Channel::_23),
            24 => Ok(Channel::_24),
            25 => Ok(Channel::_25),
            26 => Ok(Channel::_26),
            _ => Err(()),
        }
    }
}

impl From<Channel> for u16 {
    fn from(ch: Channel) -> u16 {
        ch as u16
    }
}
