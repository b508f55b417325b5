//! The network device contract the stack drives a radio through.

mod opt;
pub use opt::*;

/// Errors a [`NetDevice`] operation can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The device is not initialized.
    NoDevice,
    /// The frame header could not be built.
    NoMessage,
    /// The frame or value does not fit.
    Overflow,
    /// The caller's buffer is too small, or a callback is already registered.
    NoBuffers,
    /// The option or value is not supported.
    NotSupported,
    /// The value is outside its valid range.
    Invalid,
    /// No callback is registered.
    NotFound,
    /// The device is already borrowed.
    Busy,
}

impl Error {
    /// Return the negative POSIX error code of this error.
    pub const fn errno(&self) -> i32 {
        match self {
            Self::NoDevice => -19,
            Self::NoMessage => -42,
            Self::Overflow => -75,
            Self::NoBuffers => -105,
            Self::NotSupported => -95,
            Self::Invalid => -22,
            Self::NotFound => -2,
            Self::Busy => -16,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::NoDevice => "no such device",
            Self::NoMessage => "no message of desired type",
            Self::Overflow => "value too large",
            Self::NoBuffers => "no buffer space available",
            Self::NotSupported => "operation not supported",
            Self::Invalid => "invalid argument",
            Self::NotFound => "no such entry",
            Self::Busy => "device busy",
        };
        write!(f, "{msg} ({})", self.errno())
    }
}

/// A type alias for `Result<T, netdev::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Events a device signals to its upper layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The device wants its [`NetDevice::isr`] to run.
    Isr,
    /// A frame is ready to be read with [`NetDevice::recv`].
    RxComplete,
    /// The last frame passed to [`NetDevice::send`] went out.
    TxComplete,
}

/// The operations a network stack uses to drive a device.
///
/// Option values are exchanged as octets in host byte order. The typed
/// helpers wrap the conversions.
pub trait NetDevice {
    /// Initialize the device. Calling it again has no further effect.
    fn init(&mut self) -> Result<()>;

    /// Transmit the concatenation of `frags` and return the number of octets
    /// accepted.
    fn send(&mut self, frags: &[&[u8]]) -> Result<usize>;

    /// Copy the pending frame into `buf` and return its length.
    ///
    /// Without a buffer the length of the pending frame is returned and the
    /// frame stays pending.
    fn recv(&mut self, buf: Option<&mut [u8]>) -> Result<usize>;

    /// Service the device after an [`Event::Isr`].
    fn isr(&mut self);

    /// Write the value of `opt` into `value` and return its length.
    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize>;

    /// Set `opt` from `value` and return the number of octets consumed.
    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize>;

    /// Read a 16-bit option.
    fn get_u16(&self, opt: NetOpt) -> Result<u16> {
        let mut raw = [0u8; 2];
        self.get(opt, &mut raw)?;
        Ok(u16::from_ne_bytes(raw))
    }

    /// Write a 16-bit option.
    fn set_u16(&mut self, opt: NetOpt, value: u16) -> Result<()> {
        self.set(opt, &value.to_ne_bytes()).map(|_| ())
    }

    /// Read a 64-bit option.
    fn get_u64(&self, opt: NetOpt) -> Result<u64> {
        let mut raw = [0u8; 8];
        self.get(opt, &mut raw)?;
        Ok(u64::from_ne_bytes(raw))
    }

    /// Write a 64-bit option.
    fn set_u64(&mut self, opt: NetOpt, value: u64) -> Result<()> {
        self.set(opt, &value.to_ne_bytes()).map(|_| ())
    }

    /// Read a boolean option.
    fn get_bool(&self, opt: NetOpt) -> Result<bool> {
        let mut raw = [0u8; 1];
        self.get(opt, &mut raw)?;
        Ok(raw[0] != 0)
    }

    /// Write a boolean option.
    fn set_bool(&mut self, opt: NetOpt, value: bool) -> Result<()> {
        self.set(opt, &[value as u8]).map(|_| ())
    }
}

/// Receives the events of a device.
///
/// The device passes itself back so the callback can call [`NetDevice::isr`]
/// and [`NetDevice::recv`] from inside the event.
pub trait EventCallback {
    /// Handle `event` signalled by `dev`.
    fn on_event(&mut self, dev: &mut dyn NetDevice, event: Event);
}

impl<F> EventCallback for F
where
    F: FnMut(&mut dyn NetDevice, Event),
{
    fn on_event(&mut self, dev: &mut dyn NetDevice, event: Event) {
        self(dev, event)
    }
}
