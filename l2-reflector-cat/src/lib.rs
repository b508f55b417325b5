use colored::*;
use l2_reflector::frame::*;
use l2_reflector::{L2Reflector, NetDevice, NetOpt, NetType, PacketBuffer};

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.writeln(title.underline().bold().to_string());
    }
}

/// Errors of the `l2-reflector` tool.
#[derive(Debug)]
pub enum Error {
    /// The input is not valid hex.
    Hex(hex::FromHexError),
    /// The input is not a valid frame.
    Frame,
    /// The destination address is not 0, 2 or 8 octets.
    Destination(usize),
    /// The reflector rejected the request.
    Device(l2_reflector::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Hex(err) => write!(f, "invalid hex input: {err}"),
            Error::Frame => write!(f, "invalid frame"),
            Error::Destination(len) => write!(f, "unsupported destination address length {len}"),
            Error::Device(err) => write!(f, "reflector error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Hex(err)
    }
}

impl From<l2_reflector::frame::Error> for Error {
    fn from(_: l2_reflector::frame::Error) -> Self {
        Error::Frame
    }
}

impl From<l2_reflector::Error> for Error {
    fn from(err: l2_reflector::Error) -> Self {
        Error::Device(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct FrameParser {}

impl FrameParser {
    pub fn parse_hex(input: &str, fcs: bool) -> Result<String> {
        let data = hex::decode(input)?;
        Self::parse(&data, fcs)
    }

    pub fn parse(input: &[u8], fcs: bool) -> Result<String> {
        let mut buffer = String::new();
        let mut w = Writer::new(&mut buffer);

        if fcs {
            if input.len() < FCS_LEN {
                return Err(Error::Frame);
            }
            let frame = FrameWithFcs::new_unchecked(input);
            write_mhr(&mut w, &frame.frame()?);

            w.section("FCS");
            w.increase_indent();
            w.writeln(format!(
                "{}: {:#06x} {}",
                "fcs".bold(),
                frame.fcs(),
                if frame.check_fcs() {
                    "(valid)".green()
                } else {
                    "(invalid)".red()
                }
            ));
            w.decrease_indent();
        } else {
            write_mhr(&mut w, &Mhr::new(input)?);
        }

        Ok(buffer)
    }
}

fn write_mhr(w: &mut Writer, mhr: &Mhr<&[u8]>) {
    let fc = mhr.frame_control();

    // -----------------------------------------------------------------
    // Frame Control
    // -----------------------------------------------------------------
    w.section("Frame Control");
    w.increase_indent();
    w.writeln(format!(
        "{}: {}",
        "frame type".bold(),
        format!("{:?}", fc.frame_type()).bright_blue()
    ));
    w.writeln(format!(
        "{}: {}",
        "security".bold(),
        fc.security_enabled() as usize
    ));
    w.writeln(format!(
        "{}: {}",
        "frame pending".bold(),
        fc.frame_pending() as usize
    ));
    w.writeln(format!(
        "{}: {}",
        "ack request".bold(),
        fc.ack_request() as usize
    ));
    w.writeln(format!(
        "{}: {}",
        "pan id compression".bold(),
        fc.pan_id_compression() as usize
    ));
    w.writeln(format!(
        "{}: {:?}",
        "dst addressing mode".bold(),
        fc.dst_addressing_mode()
    ));
    w.writeln(format!(
        "{}: {:?}",
        "src addressing mode".bold(),
        fc.src_addressing_mode()
    ));
    w.writeln(format!(
        "{}: {} ({:?})",
        "frame version".bold(),
        fc.frame_version() as usize,
        fc.frame_version()
    ));
    w.decrease_indent();

    // -----------------------------------------------------------------
    // Sequence Number
    // -----------------------------------------------------------------
    w.section("Sequence Number");
    w.increase_indent();
    w.writeln(format!(
        "{}: {}",
        "sequence number".bold(),
        mhr.sequence_number()
    ));
    w.decrease_indent();

    // -----------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------
    w.section("Addressing");
    w.increase_indent();
    if let Some(dst_pan_id) = mhr.dst_pan_id() {
        w.writeln(format!("{}: {:x}", "dst pan id".bold(), dst_pan_id));
    }
    write_address(w, "dst addr", mhr.dst_address());
    if let Some(src_pan_id) = mhr.src_pan_id() {
        w.writeln(format!("{}: {:x}", "src pan id".bold(), src_pan_id));
    }
    write_address(w, "src addr", mhr.src_address());
    w.decrease_indent();

    // -----------------------------------------------------------------
    // Payload
    // -----------------------------------------------------------------
    if !mhr.payload().is_empty() {
        w.section("Payload");
        w.increase_indent();
        w.writeln(format!("{:x?}", mhr.payload()));
        w.decrease_indent();
    }
}

fn write_address(w: &mut Writer, name: &str, addr: Address) {
    if addr.is_empty() {
        return;
    }

    w.writeln(format!(
        "{}: {}{}",
        name.bold(),
        addr,
        if addr.is_broadcast() {
            " (broadcast)"
        } else {
            ""
        }
    ));
}

fn write_netif(w: &mut Writer, netif: &NetifHeaderRepr) {
    w.section("Netif Header");
    w.increase_indent();
    w.writeln(format!("{}: {}", "if pid".bold(), netif.if_pid));
    w.writeln(format!(
        "{}: {}",
        "broadcast".bold(),
        netif.is_broadcast() as usize
    ));
    w.writeln(format!(
        "{}: {}",
        "multicast".bold(),
        netif.is_multicast() as usize
    ));
    write_address(w, "src addr", netif.src_address);
    write_address(w, "dst addr", netif.dst_address);
    w.decrease_indent();
}

/// Packet buffer backed by the heap. Allocation never fails.
struct HeapBuffer;

impl PacketBuffer for HeapBuffer {
    type Buffer = Vec<u8>;

    fn allocate(&mut self, len: usize, _kind: NetType) -> Option<Vec<u8>> {
        Some(vec![0; len])
    }

    fn release(&mut self, _buffer: Vec<u8>) {}
}

/// How [`reflect`] configures its reflector.
#[derive(Debug, Clone, Default)]
pub struct ReflectOptions {
    /// Destination address, most significant octet first.
    pub dst: Vec<u8>,
    /// Send to the broadcast address.
    pub broadcast: bool,
    /// Send from the long address.
    pub src_long: bool,
    /// Carry the source PAN ID.
    pub src_pan: bool,
    /// PAN ID to use instead of the default.
    pub pan_id: Option<u16>,
    /// Do not request acknowledgments.
    pub no_ack: bool,
}

/// Run `payload` through a fresh reflector and describe what comes back.
pub fn reflect(payload: &[u8], opts: &ReflectOptions) -> Result<String> {
    let mut dev: L2Reflector = L2Reflector::new(None);
    dev.init()?;

    if let Some(pan_id) = opts.pan_id {
        dev.set_u16(NetOpt::Nid, pan_id)?;
    }
    dev.set_u16(NetOpt::SrcLen, if opts.src_long { 8 } else { 2 })?;
    dev.set_bool(NetOpt::UseSrcPan, opts.src_pan)?;
    dev.set_bool(NetOpt::AutoAck, !opts.no_ack)?;

    let hdr = NetifHeaderRepr {
        dst_address: Address::from_bytes(&opts.dst)
            .map_err(|_| Error::Destination(opts.dst.len()))?,
        flags: if opts.broadcast {
            NetifFlags::BROADCAST
        } else {
            NetifFlags::empty()
        },
        ..Default::default()
    };

    let out = dev.send_packet(&mut HeapBuffer, &hdr, &[payload])?;

    let mut frame = out.mhr.to_vec();
    frame.extend_from_slice(&out.packet.payload);

    let mut buffer = String::new();
    let mut w = Writer::new(&mut buffer);

    w.section("Reflected");
    w.increase_indent();
    w.writeln(format!("{}: {}", "sent".bold(), out.sent));
    w.writeln(format!("{}: {}", "frame".bold(), hex::encode(&frame)));
    w.decrease_indent();

    write_mhr(&mut w, &Mhr::new(&frame[..])?);

    let netif = NetifHeader::new(&out.packet.header[..])?;
    write_netif(&mut w, &NetifHeaderRepr::parse(&netif)?);

    Ok(buffer)
}
