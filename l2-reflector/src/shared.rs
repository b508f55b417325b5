//! A reflector that can be reached from several execution contexts.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::netdev::{Error, EventCallback, NetDevice, NetOpt, Result};
use crate::reflector::L2Reflector;

/// An [`L2Reflector`] behind a critical section.
///
/// Every operation holds the critical section for its whole duration, so a
/// send and the event chain it triggers are never interleaved with another
/// context. The event callback receives the inner device and must not go
/// through the [`SharedReflector`] again; doing so yields [`Error::Busy`].
pub struct SharedReflector<C> {
    inner: Mutex<RefCell<L2Reflector<C>>>,
}

impl<C: EventCallback> SharedReflector<C> {
    /// Wrap `dev`.
    pub const fn new(dev: L2Reflector<C>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(dev)),
        }
    }

    /// Run `f` on the device inside a critical section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] when the device is already borrowed.
    pub fn lock<R>(&self, f: impl FnOnce(&mut L2Reflector<C>) -> R) -> Result<R> {
        critical_section::with(|cs| {
            let mut dev = self
                .inner
                .borrow(cs)
                .try_borrow_mut()
                .map_err(|_| Error::Busy)?;
            Ok(f(&mut *dev))
        })
    }

    /// See [`NetDevice::init`].
    pub fn init(&self) -> Result<()> {
        self.lock(|dev| dev.init())?
    }

    /// See [`NetDevice::send`].
    pub fn send(&self, frags: &[&[u8]]) -> Result<usize> {
        self.lock(|dev| dev.send(frags))?
    }

    /// See [`NetDevice::recv`].
    pub fn recv(&self, buf: Option<&mut [u8]>) -> Result<usize> {
        self.lock(|dev| dev.recv(buf))?
    }

    /// See [`NetDevice::isr`].
    pub fn isr(&self) -> Result<()> {
        self.lock(|dev| dev.isr())
    }

    /// See [`NetDevice::get`].
    pub fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize> {
        self.lock(|dev| dev.get(opt, value))?
    }

    /// See [`NetDevice::set`].
    pub fn set(&self, opt: NetOpt, value: &[u8]) -> Result<usize> {
        self.lock(|dev| dev.set(opt, value))?
    }

    /// Unwrap the device.
    pub fn into_inner(self) -> L2Reflector<C> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::netdev::Event;

    #[test]
    fn send_from_threads() {
        let mut dev: L2Reflector = L2Reflector::new(None);
        dev.init().unwrap();
        let shared = Arc::new(SharedReflector::new(dev));

        let handles: std::vec::Vec<_> = (0..4u8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let frame = [i; 8];
                        assert_eq!(shared.send(&[&frame]), Ok(8));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut buf = [0u8; 8];
        assert_eq!(shared.recv(Some(&mut buf[..])), Ok(8));
        assert!(buf.iter().all(|b| *b == buf[0]));
    }

    #[test]
    fn options_through_lock() {
        let shared = SharedReflector::new(L2Reflector::<fn(&mut dyn NetDevice, Event)>::new(None));
        assert_eq!(shared.set(NetOpt::Nid, &0xbeefu16.to_ne_bytes()), Ok(2));

        let mut raw = [0u8; 2];
        assert_eq!(shared.get(NetOpt::Nid, &mut raw), Ok(2));
        assert_eq!(u16::from_ne_bytes(raw), 0xbeef);

        assert_eq!(shared.send(&[b"x"]), Err(Error::NoDevice));
        assert_eq!(shared.init(), Ok(()));
        assert_eq!(shared.lock(|dev| dev.is_ready()), Ok(true));
        assert!(shared.into_inner().is_ready());
    }

    #[test]
    fn nested_lock_is_busy() {
        let shared: SharedReflector<fn(&mut dyn NetDevice, Event)> =
            SharedReflector::new(L2Reflector::new(None));
        let nested = shared.lock(|_| shared.lock(|_| ()));
        assert_eq!(nested, Ok(Err(Error::Busy)));
    }
}
