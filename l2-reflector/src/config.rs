//! Compile-time configuration.
//!
//! Every constant can be overridden at build time through an environment
//! variable carrying the `L2_REFLECTOR_` prefix, for example
//! `L2_REFLECTOR_DEFAULT_PAN_ID=0xbeef`. Tests always use the defaults.

pub use customizable::*;

const _: () = assert!(MAX_MHR_OVERHEAD < MAX_PKT_LENGTH);
const _: () = assert!(MAX_PKT_LENGTH <= l2_reflector_frame::FRAME_LEN_MAX);

#[cfg(test)]
mod customizable {
    #![allow(dead_code)]

    /// Largest frame the reflector accepts, FCS trailer included.
    pub const MAX_PKT_LENGTH: usize = 127;
    /// Room reserved for the MHR when reporting the maximum payload size.
    pub const MAX_MHR_OVERHEAD: usize = 25;
    /// PAN ID after initialization.
    pub const DEFAULT_PAN_ID: u16 = 0x0023;
    /// Channel after initialization.
    pub const DEFAULT_CHANNEL: u8 = 26;
    /// Short address used when no unique identifier is available.
    pub const DEFAULT_ADDR_SHORT: u16 = 0x0230;
    /// Long address used when no unique identifier is available.
    pub const DEFAULT_ADDR_LONG: u64 = 0x1222_3344_5566_7788;
}

#[cfg(not(test))]
mod customizable {
    #![allow(unused)]
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
