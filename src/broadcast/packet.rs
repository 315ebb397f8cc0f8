// src/broadcast/packet.rs
//! LAN discovery datagram framing.
//!
//! ```text
//! +--------+--------+-----------------+------------------------------------+
//! | 0x00   | 0x00   | len (i16, BE)   | "[MOTD]<motd>[/MOTD][AD]<port>[/AD]" |
//! +--------+--------+-----------------+------------------------------------+
//! ```
//!
//! `len` counts the UTF-8 bytes of the announcement.
use std::io::{Cursor, Read};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::broadcast::BroadcastError;

pub const HEADER_LEN: usize = 4;

const MOTD_OPEN: &str = "[MOTD]";
const MOTD_CLOSE: &str = "[/MOTD]";
const AD_OPEN: &str = "[AD]";
const AD_CLOSE: &str = "[/AD]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub motd: String,
    pub port: u16,
}

pub fn announcement_text(motd: &str, port: u16) -> String {
    format!("{}{}{}{}{}{}", MOTD_OPEN, motd, MOTD_CLOSE, AD_OPEN, port, AD_CLOSE)
}

pub fn encode_announcement(motd: &str, port: u16) -> Result<Vec<u8>, BroadcastError> {
    if port == 0 {
        return Err(BroadcastError::Encoding("port must be between 1 and 65535".to_string()));
    }

    let text = announcement_text(motd, port);
    let body = text.as_bytes();
    let len = i16::try_from(body.len()).map_err(|_| {
        BroadcastError::Encoding(format!("announcement is {} bytes, limit is {}", body.len(), i16::MAX))
    })?;

    let mut datagram = Vec::with_capacity(HEADER_LEN + body.len());
    datagram.write_u16::<BigEndian>(0)?;
    datagram.write_i16::<BigEndian>(len)?;
    datagram.extend_from_slice(body);
    Ok(datagram)
}

pub fn decode_announcement(datagram: &[u8]) -> Result<Announcement, BroadcastError> {
    let mut cursor = Cursor::new(datagram);
    let header = cursor.read_u16::<BigEndian>().map_err(|_| decode_err("truncated header"))?;
    if header != 0 {
        return Err(decode_err("non-zero header"));
    }
    let len = cursor.read_i16::<BigEndian>().map_err(|_| decode_err("truncated length"))?;
    let len = usize::try_from(len).map_err(|_| decode_err("negative length"))?;

    let mut body = vec![0u8; len];
    cursor.read_exact(&mut body).map_err(|_| decode_err("body shorter than length"))?;
    if (cursor.position() as usize) != datagram.len() {
        return Err(decode_err("trailing bytes after announcement"));
    }
    let text = String::from_utf8(body).map_err(|_| decode_err("announcement is not UTF-8"))?;

    parse_announcement(&text)
}

fn parse_announcement(text: &str) -> Result<Announcement, BroadcastError> {
    let rest = text.strip_prefix(MOTD_OPEN).ok_or_else(|| decode_err("missing [MOTD]"))?;
    let (motd, rest) = rest.rsplit_once(MOTD_CLOSE).ok_or_else(|| decode_err("missing [/MOTD]"))?;
    let port = rest
        .strip_prefix(AD_OPEN)
        .and_then(|r| r.strip_suffix(AD_CLOSE))
        .ok_or_else(|| decode_err("missing [AD] section"))?;
    let port = port.parse().map_err(|_| decode_err("port is not a number"))?;

    Ok(Announcement {
        motd: motd.to_string(),
        port,
    })
}

fn decode_err(reason: &str) -> BroadcastError {
    BroadcastError::Decode(reason.to_string())
}
