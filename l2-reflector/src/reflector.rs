//! The loopback device.

use heapless::{Deque, Vec};
use l2_reflector_frame::FCS_LEN;

use crate::config::{MAX_MHR_OVERHEAD, MAX_PKT_LENGTH};
use crate::netdev::{Channel, Error, Event, EventCallback, NetDevice, NetOpt, Result};
use crate::state::{DeviceState, Options};

/// Events raised while a callback runs are held here until it returns. A
/// send raises at most one nested event (`RxComplete` from `isr`).
pub const PENDING_EVENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Lifecycle {
    Uninitialized,
    Ready,
}

/// A radio that hands every transmitted frame straight back as received.
///
/// Sending fills a single frame slot and signals [`Event::Isr`]. The event
/// callback is expected to call [`NetDevice::isr`], which signals
/// [`Event::RxComplete`], and then read the frame with [`NetDevice::recv`].
/// All of this happens before [`NetDevice::send`] returns.
///
/// Events raised from inside the callback are queued, up to
/// [`PENDING_EVENTS`] of them. Further events raised before the callback
/// returns are dropped with a warning.
///
/// ```
/// use l2_reflector::{Event, L2Reflector, NetDevice};
///
/// let mut dev = L2Reflector::new(None);
/// dev.set_event_callback(|dev: &mut dyn NetDevice, event: Event| {
///     if event == Event::Isr {
///         dev.isr();
///     }
/// })
/// .unwrap();
/// dev.init().unwrap();
///
/// assert_eq!(dev.send(&[b"hello", b" world"]), Ok(11));
///
/// let mut buf = [0u8; 16];
/// assert_eq!(dev.recv(Some(&mut buf[..])), Ok(11));
/// assert_eq!(&buf[..11], b"hello world");
/// ```
pub struct L2Reflector<C = fn(&mut dyn NetDevice, Event)> {
    pub(crate) state: DeviceState,
    lifecycle: Lifecycle,
    frame: Vec<u8, MAX_PKT_LENGTH>,
    pub(crate) if_pid: u16,
    callback: Option<C>,
    dispatching: bool,
    pending: Deque<Event, PENDING_EVENTS>,
}

impl<C: EventCallback> L2Reflector<C> {
    /// Create an uninitialized reflector.
    ///
    /// `unique_id` is the platform unique identifier the long address is
    /// derived from, when the platform has one.
    pub fn new(unique_id: Option<&[u8]>) -> Self {
        Self {
            state: DeviceState::new(unique_id),
            lifecycle: Lifecycle::Uninitialized,
            frame: Vec::new(),
            if_pid: 0,
            callback: None,
            dispatching: false,
            pending: Deque::new(),
        }
    }

    /// Return the device state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Return the device state for modification.
    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    /// Query whether [`NetDevice::init`] ran.
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Set the identifier stamped into received network interface headers.
    pub fn set_if_pid(&mut self, if_pid: u16) {
        self.if_pid = if_pid;
    }

    /// Register the event callback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBuffers`] when a callback is already registered.
    pub fn set_event_callback(&mut self, callback: C) -> Result<()> {
        if self.callback.is_some() {
            return Err(Error::NoBuffers);
        }

        self.callback = Some(callback);
        debug!("l2 reflector: added callback");
        Ok(())
    }

    /// Unregister the event callback and hand it back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no callback is registered. While an
    /// event is being delivered the callback counts as unregistered.
    pub fn remove_event_callback(&mut self) -> Result<C> {
        let callback = self.callback.take().ok_or(Error::NotFound)?;
        debug!("l2 reflector: removed callback");
        Ok(callback)
    }

    pub(crate) fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            warn!("l2 reflector: device not initialized");
            Err(Error::NoDevice)
        }
    }

    /// Deliver `event` to the callback.
    ///
    /// Events raised from inside the callback are queued and delivered in
    /// order once it returns.
    fn signal(&mut self, event: Event) {
        if self.dispatching {
            if self.pending.push_back(event).is_err() {
                warn!("l2 reflector: event queue full, dropping event");
            }
            return;
        }

        let Some(mut callback) = self.callback.take() else {
            trace!("l2 reflector: no callback registered");
            return;
        };

        self.dispatching = true;
        callback.on_event(self, event);
        while let Some(event) = self.pending.pop_front() {
            callback.on_event(self, event);
        }
        self.dispatching = false;

        if self.callback.is_none() {
            self.callback = Some(callback);
        }
    }
}

impl<C: EventCallback> NetDevice for L2Reflector<C> {
    fn init(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Uninitialized {
            info!("l2 reflector: init complete");
        }
        self.lifecycle = Lifecycle::Ready;
        Ok(())
    }

    fn send(&mut self, frags: &[&[u8]]) -> Result<usize> {
        self.ensure_ready()?;

        let len: usize = frags.iter().map(|frag| frag.len()).sum();
        if len + FCS_LEN > MAX_PKT_LENGTH {
            warn!("l2 reflector: packet too large ({} bytes) to be sent", len + FCS_LEN);
            return Err(Error::Overflow);
        }

        self.frame.clear();
        for frag in frags {
            self.frame
                .extend_from_slice(frag)
                .map_err(|_| Error::Overflow)?;
        }

        debug!("l2 reflector: send packet of size {}", len);

        self.signal(Event::Isr);
        self.signal(Event::TxComplete);

        Ok(len)
    }

    fn recv(&mut self, buf: Option<&mut [u8]>) -> Result<usize> {
        let len = self.frame.len();

        let Some(buf) = buf else {
            return Ok(len);
        };

        if buf.len() < len {
            return Err(Error::NoBuffers);
        }

        buf[..len].copy_from_slice(&self.frame);
        debug!("l2 reflector: recv packet of size {}", len);
        Ok(len)
    }

    fn isr(&mut self) {
        self.signal(Event::RxComplete);
    }

    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize> {
        let size = opt.size().ok_or(Error::NotSupported)?;
        if value.len() < size {
            return Err(Error::Overflow);
        }

        let state = &self.state;
        match opt {
            NetOpt::Address => value[..2].copy_from_slice(&state.short_address().to_ne_bytes()),
            NetOpt::AddressLong => value[..8].copy_from_slice(&state.long_address().to_ne_bytes()),
            NetOpt::AddrLen => value[..2].copy_from_slice(&2u16.to_ne_bytes()),
            NetOpt::SrcLen => {
                let len = state.src_address().len() as u16;
                value[..2].copy_from_slice(&len.to_ne_bytes())
            }
            NetOpt::Nid => value[..2].copy_from_slice(&state.pan_id().to_ne_bytes()),
            NetOpt::Channel => {
                value[..2].copy_from_slice(&u16::from(state.channel()).to_ne_bytes())
            }
            NetOpt::Ipv6Iid => value[..8].copy_from_slice(&state.ipv6_iid()),
            NetOpt::Proto => value[0] = state.proto() as u8,
            NetOpt::MaxPacketSize => {
                let max = (MAX_PKT_LENGTH - MAX_MHR_OVERHEAD) as u16;
                value[..2].copy_from_slice(&max.to_ne_bytes())
            }
            NetOpt::AutoAck => value[0] = state.options().contains(Options::AUTOACK) as u8,
            NetOpt::UseSrcPan => value[0] = state.options().contains(Options::USE_SRC_PAN) as u8,
            _ => return Err(Error::NotSupported),
        }

        Ok(size)
    }

    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize> {
        let size = opt.size().ok_or(Error::NotSupported)?;
        if !opt.is_writable() {
            return Err(Error::NotSupported);
        }
        if value.len() != size {
            return Err(Error::Overflow);
        }

        let state = &mut self.state;
        match opt {
            NetOpt::Address => state.set_short_address(u16::from_ne_bytes([value[0], value[1]])),
            NetOpt::AddressLong => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(value);
                state.set_long_address(u64::from_ne_bytes(raw));
            }
            NetOpt::SrcLen => match u16::from_ne_bytes([value[0], value[1]]) {
                2 => state.set_option(Options::SRC_ADDR_LONG, false),
                8 => state.set_option(Options::SRC_ADDR_LONG, true),
                _ => return Err(Error::NotSupported),
            },
            NetOpt::Nid => state.set_pan_id(u16::from_ne_bytes([value[0], value[1]])),
            NetOpt::Channel => {
                let channel = Channel::try_from(u16::from_ne_bytes([value[0], value[1]]))
                    .map_err(|_| Error::Invalid)?;
                state.set_channel(channel);
            }
            NetOpt::AutoAck => state.set_option(Options::AUTOACK, value[0] != 0),
            NetOpt::UseSrcPan => state.set_option(Options::USE_SRC_PAN, value[0] != 0),
            _ => return Err(Error::NotSupported),
        }

        debug!("l2 reflector: option set");
        Ok(size)
    }
}
