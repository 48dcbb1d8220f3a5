//! EDNS0 payload negotiation on the raw wire bytes.

/// Plain-UDP payload limit when the client did not negotiate more.
pub const MAX_UDP_PAYLOAD: usize = 512;

/// Largest payload we answer with, whatever the client advertises.
pub const SERVER_MAX_PAYLOAD: u16 = 1232;

const HEADER_LEN: usize = 12;
const RR_FIXED_LEN: usize = 10;
const TYPE_OPT: u16 = 41;

/// OPT pseudo-record: root owner, type 41, class = our payload size,
/// extended rcode 0, version 0, no flags, no options.
const OPT_RECORD: [u8; 11] = [
    0x00,
    0x00,
    0x29,
    (SERVER_MAX_PAYLOAD >> 8) as u8,
    SERVER_MAX_PAYLOAD as u8,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00,
];

/// What the requester said about its UDP buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEdns {
    pub has_edns: bool,
    pub client_max_size: u16,
}

impl Default for ClientEdns {
    fn default() -> Self {
        Self {
            has_edns: false,
            client_max_size: MAX_UDP_PAYLOAD as u16,
        }
    }
}

impl ClientEdns {
    /// Scans the additional section for an OPT record. Anything that does not
    /// parse cleanly is treated as a plain, non-EDNS request.
    pub fn from_wire(buf: &[u8]) -> Self {
        parse_opt(buf).unwrap_or_default()
    }

    /// Bytes a response may occupy, OPT record included.
    pub fn payload_limit(&self) -> usize {
        if self.has_edns {
            self.client_max_size.clamp(MAX_UDP_PAYLOAD as u16, SERVER_MAX_PAYLOAD) as usize
        } else {
            MAX_UDP_PAYLOAD
        }
    }

    pub fn opt_len(&self) -> usize {
        if self.has_edns {
            OPT_RECORD.len()
        } else {
            0
        }
    }

    /// Appends our OPT record to an encoded response and bumps ARCOUNT.
    pub fn append_opt(&self, response: &mut Vec<u8>) {
        if !self.has_edns || response.len() < HEADER_LEN {
            return;
        }
        let arcount = u16::from_be_bytes([response[10], response[11]]).saturating_add(1);
        response[10..12].copy_from_slice(&arcount.to_be_bytes());
        response.extend_from_slice(&OPT_RECORD);
    }
}

fn parse_opt(buf: &[u8]) -> Option<ClientEdns> {
    if buf.len() < HEADER_LEN {
        return None;
    }
    let count = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]) as usize;
    let (qdcount, ancount, nscount, arcount) = (count(4), count(6), count(8), count(10));

    let mut pos = HEADER_LEN;
    for _ in 0..qdcount {
        pos = skip_name(buf, pos)? + 4;
    }
    for _ in 0..ancount + nscount {
        pos = skip_record(buf, pos)?;
    }

    for _ in 0..arcount {
        let name_end = skip_name(buf, pos)?;
        if name_end + RR_FIXED_LEN > buf.len() {
            return None;
        }
        let rr_type = u16::from_be_bytes([buf[name_end], buf[name_end + 1]]);
        if rr_type == TYPE_OPT {
            let udp_size = u16::from_be_bytes([buf[name_end + 2], buf[name_end + 3]]);
            return Some(ClientEdns {
                has_edns: true,
                client_max_size: udp_size.max(MAX_UDP_PAYLOAD as u16),
            });
        }
        pos = skip_record(buf, pos)?;
    }

    None
}

fn skip_name(buf: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *buf.get(pos)? as usize;
        match len {
            0 => return Some(pos + 1),
            l if l & 0xC0 == 0xC0 => {
                buf.get(pos + 1)?;
                return Some(pos + 2);
            }
            l if l & 0xC0 != 0 => return None,
            l => pos += 1 + l,
        }
    }
}

fn skip_record(buf: &[u8], pos: usize) -> Option<usize> {
    let fixed = skip_name(buf, pos)?;
    if fixed + RR_FIXED_LEN > buf.len() {
        return None;
    }
    let rdlen = u16::from_be_bytes([buf[fixed + 8], buf[fixed + 9]]) as usize;
    let end = fixed + RR_FIXED_LEN + rdlen;
    if end > buf.len() {
        return None;
    }
    Some(end)
}
