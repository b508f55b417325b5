//! Zero-copy readers and writers for the MAC header (MHR) spoken by the
//! l2 reflector.
//!
//! The reflector only ever builds data frames, so this crate covers the part
//! of IEEE 802.15.4 that such a frame needs:
//! - [`FrameControl`]: reader/writer for the two frame control octets.
//! - [`Address`] and [`AddressingMode`], plus the pure [`host_to_wire`] /
//!   [`wire_to_host`] pair that swaps address octets between stack order and
//!   on-air order.
//! - [`DataHeaderRepr`]: builds a data frame MHR.
//! - [`Mhr`]: reads an MHR back.
//! - [`NetifHeader`] / [`NetifHeaderRepr`]: the network interface header
//!   handed to the stack on receive.
//! - [`FrameWithFcs`]: a frame followed by its 16-bit Frame Check Sequence.
//!
//! ## Building a header
//!
//! ```
//! # use l2_reflector_frame::{Address, DataHeaderRepr, Mhr};
//! let repr = DataHeaderRepr {
//!     ack_request: true,
//!     sequence_number: 7,
//!     dst_pan_id: 0x0023,
//!     dst_address: Address::Short([0x12, 0x34]),
//!     src_pan_id: None,
//!     src_address: Address::Short([0x02, 0x30]),
//! };
//!
//! let mut buffer = [0u8; 9];
//! let len = repr.emit(&mut buffer[..]).unwrap();
//! assert_eq!(len, 9);
//! assert_eq!(buffer, [0x61, 0x98, 0x07, 0x23, 0x00, 0x34, 0x12, 0x02, 0x30]);
//!
//! let mhr = Mhr::new(&buffer[..]).unwrap();
//! assert_eq!(mhr.sequence_number(), 7);
//! assert_eq!(mhr.dst_address(), Address::Short([0x12, 0x34]));
//! ```
#![no_std]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod frame_control;
pub use frame_control::*;

mod addressing;
pub use addressing::*;

mod mhr;
pub use mhr::*;

mod netif;
pub use netif::*;

mod fcs;
pub use fcs::*;

/// Largest PSDU a frame may occupy, FCS included.
pub const FRAME_LEN_MAX: usize = 127;

/// Largest MHR of a data frame without security: frame control, sequence
/// number, two PAN IDs and two extended addresses.
pub const MAX_HDR_LEN: usize = 23;

/// Length of a short address in octets.
pub const SHORT_ADDRESS_LEN: usize = 2;

/// Length of an extended (long) address in octets.
pub const LONG_ADDRESS_LEN: usize = 8;

/// An error that can occur when reading or writing a MAC header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error;

/// A type alias for `Result<T, frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
