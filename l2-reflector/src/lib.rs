//! A link-layer reflector: a virtual IEEE 802.15.4 radio that hands every
//! transmitted frame straight back as received, so a network stack can be
//! exercised without radio hardware.
//!
//! - [`L2Reflector`] implements the [`NetDevice`] contract on top of a single
//!   frame slot and signals its events synchronously from inside `send`.
//! - [`DeviceState`] holds the addressing, PAN, channel and option
//!   configuration and builds the MAC header of outgoing data frames.
//! - [`L2Reflector::send_packet`] is the packet-level path: a network interface
//!   header plus payload in, the received packet out.
//! - [`SharedReflector`] puts a reflector behind a critical section.
//!
//! Defaults can be changed at build time, see [`config`].
#![no_std]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
pub(crate) mod utils;

pub use l2_reflector_frame as frame;

pub mod config;
pub mod netdev;
pub mod netif;
pub mod reflector;
pub mod shared;
pub mod state;

pub use netdev::{Channel, Error, Event, EventCallback, NetDevice, NetOpt, NetType, Result};
pub use netif::{PacketBuffer, ReceivedPacket, Reflected};
pub use reflector::{L2Reflector, PENDING_EVENTS};
pub use shared::SharedReflector;
pub use state::{DeviceState, Options};
