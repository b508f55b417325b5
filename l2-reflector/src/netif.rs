//! Packet-level transmission: a network interface header plus payload goes
//! in, the received packet comes straight back out.

use l2_reflector_frame::{Mhr, NetifHeaderRepr, FCS_LEN, MAX_HDR_LEN};

use crate::config::MAX_PKT_LENGTH;
use crate::netdev::{Error, EventCallback, NetType, Result};
use crate::reflector::L2Reflector;

/// The packet buffer received packets are allocated from.
pub trait PacketBuffer {
    /// A buffer handed out by [`PacketBuffer::allocate`].
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Allocate `len` octets tagged with `kind`, `None` when out of memory.
    fn allocate(&mut self, len: usize, kind: NetType) -> Option<Self::Buffer>;

    /// Give `buffer` back.
    fn release(&mut self, buffer: Self::Buffer);
}

/// A received packet: a network interface header and its payload.
#[derive(Debug)]
pub struct ReceivedPacket<B> {
    /// The emitted network interface header, tagged [`NetType::Netif`].
    pub header: B,
    /// The payload, tagged with the device protocol.
    pub payload: B,
}

/// The outcome of [`L2Reflector::send_packet`].
#[derive(Debug)]
pub struct Reflected<B> {
    /// Octets sent, payload plus MHR.
    pub sent: usize,
    /// The MHR the frame went out with.
    pub mhr: heapless::Vec<u8, MAX_HDR_LEN>,
    /// The packet handed back to the stack.
    pub packet: ReceivedPacket<B>,
}

impl<C: EventCallback> L2Reflector<C> {
    /// Send `payload` to the destination described by `hdr` and return the
    /// packet the stack receives for it.
    ///
    /// # Errors
    ///
    /// - [`Error::NoDevice`] when the device is not initialized.
    /// - [`Error::Overflow`] when payload, MHR and FCS exceed the maximum frame
    ///   size or the packet buffer runs out. Buffers allocated so far are released.
    /// - [`Error::NoMessage`] when no MHR can be built for the destination.
    ///
    /// The sequence number is left untouched unless an MHR was built.
    pub fn send_packet<P: PacketBuffer>(
        &mut self,
        pktbuf: &mut P,
        hdr: &NetifHeaderRepr,
        payload: &[&[u8]],
    ) -> Result<Reflected<P::Buffer>> {
        self.ensure_ready()?;

        let payload_len: usize = payload.iter().map(|frag| frag.len()).sum();
        if payload_len > MAX_PKT_LENGTH {
            warn!(
                "l2 reflector: packet too large ({} bytes) to be sent",
                payload_len
            );
            return Err(Error::Overflow);
        }

        let repr = self
            .state
            .header_repr(hdr.dst_address.as_bytes(), hdr.flags)
            .map_err(|_| {
                warn!("l2 reflector: unable to create 802.15.4 header");
                Error::NoMessage
            })?;
        if payload_len + repr.buffer_len() + FCS_LEN > MAX_PKT_LENGTH {
            warn!(
                "l2 reflector: frame too large ({} bytes) to be sent",
                payload_len + repr.buffer_len() + FCS_LEN
            );
            return Err(Error::Overflow);
        }

        let mut mhr = [0u8; MAX_HDR_LEN];
        let hdr_len = self
            .state
            .build_header(hdr.dst_address.as_bytes(), hdr.flags, &mut mhr)
            .map_err(|_| Error::NoMessage)?;
        let mhr = &mhr[..hdr_len];

        let mut netif = Mhr::new(mhr)
            .map(|mhr| NetifHeaderRepr::from_mhr(&mhr))
            .map_err(|_| Error::NoMessage)?;
        netif.if_pid = self.if_pid;

        let Some(mut header) = pktbuf.allocate(netif.buffer_len(), NetType::Netif) else {
            warn!("l2 reflector: unable to allocate netif header");
            return Err(Error::Overflow);
        };
        if netif.emit(header.as_mut()).is_err() {
            pktbuf.release(header);
            return Err(Error::Overflow);
        }

        let Some(mut data) = pktbuf.allocate(payload_len, self.state.proto()) else {
            warn!("l2 reflector: unable to allocate incoming payload");
            pktbuf.release(header);
            return Err(Error::Overflow);
        };
        if data.as_ref().len() < payload_len {
            pktbuf.release(data);
            pktbuf.release(header);
            return Err(Error::Overflow);
        }

        let mut offset = 0;
        for frag in payload {
            data.as_mut()[offset..][..frag.len()].copy_from_slice(frag);
            offset += frag.len();
        }

        debug!(
            "l2 reflector: reflected packet, {} payload and {} header bytes",
            payload_len, hdr_len
        );

        Ok(Reflected {
            sent: payload_len + hdr_len,
            mhr: heapless::Vec::from_slice(mhr).map_err(|_| Error::Overflow)?,
            packet: ReceivedPacket {
                header,
                payload: data,
            },
        })
    }
}
