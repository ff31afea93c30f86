//! A2S_INFO wire format.
//!
//! Request: `FF FF FF FF 'T' "Source Engine Query\0"`.
//! Response: `FF FF FF FF 'I'` followed by little-endian fields and null-terminated strings, with an optional extra-data block gated by a flag byte.

use bytes::Buf;

use crate::error::DecodeError;
use crate::info::{Environment, ExtraData, ServerProbeResult, ServerType};

/// Out-of-band prefix carried by every single-packet message.
pub const SIMPLE_PREFIX: u32 = 0xFFFF_FFFF;
/// A2S_INFO request type.
pub const INFO_REQUEST: u8 = b'T';
/// A2S_INFO response type.
pub const INFO_RESPONSE: u8 = b'I';

const INFO_PAYLOAD: &[u8] = b"Source Engine Query\0";

const EDF_PORT: u8 = 0x80;
const EDF_STEAM_ID: u8 = 0x10;
const EDF_SPECTATOR: u8 = 0x40;
const EDF_KEYWORDS: u8 = 0x20;
const EDF_GAME_ID: u8 = 0x01;

/// The fixed request datagram.
pub fn info_request() -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + INFO_PAYLOAD.len());
    out.extend_from_slice(&SIMPLE_PREFIX.to_le_bytes());
    out.push(INFO_REQUEST);
    out.extend_from_slice(INFO_PAYLOAD);
    out
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn need(&self, n: usize, field: &'static str) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::Truncated(field));
        }
        Ok(())
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        self.need(1, field)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.need(2, field)?;
        Ok(self.buf.get_u16_le())
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.need(4, field)?;
        Ok(self.buf.get_u32_le())
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        self.need(8, field)?;
        Ok(self.buf.get_u64_le())
    }

    fn bool(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        match self.u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::UnexpectedByte { field, value }),
        }
    }

    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let end = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::Truncated(field))?;
        let s = String::from_utf8_lossy(&self.buf[..end]).into_owned();
        self.buf.advance(end + 1);
        Ok(s)
    }

    fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }
}

/// Decode one A2S_INFO response datagram.
pub fn decode_info(datagram: &[u8]) -> Result<ServerProbeResult, DecodeError> {
    let mut r = Reader::new(datagram);

    let prefix = r.u32("prefix")?;
    if prefix != SIMPLE_PREFIX {
        return Err(DecodeError::UnexpectedPrefix(prefix));
    }
    let header = r.u8("header")?;
    if header != INFO_RESPONSE {
        return Err(DecodeError::UnexpectedHeader(header));
    }

    let protocol = r.u8("protocol")?;
    let name = r.string("name")?;
    let map = r.string("map")?;
    let folder = r.string("folder")?;
    let game = r.string("game")?;
    let app_id = r.u16("app id")?;
    let players = r.u8("players")?;
    let max_players = r.u8("max players")?;
    let bots = r.u8("bots")?;

    let value = r.u8("server type")?;
    let server_type = ServerType::from_byte(value).ok_or(DecodeError::UnexpectedByte {
        field: "server type",
        value,
    })?;
    let value = r.u8("environment")?;
    let environment = Environment::from_byte(value).ok_or(DecodeError::UnexpectedByte {
        field: "environment",
        value,
    })?;

    let password_protected = r.bool("visibility")?;
    let vac_secured = r.bool("vac")?;
    let version = r.string("version")?;

    let extra = if r.is_empty() {
        None
    } else {
        Some(decode_extra(&mut r)?)
    };

    Ok(ServerProbeResult {
        ready: true,
        protocol,
        name,
        map,
        folder,
        game,
        app_id,
        players,
        max_players,
        bots,
        server_type,
        environment,
        password_protected,
        vac_secured,
        version,
        extra,
    })
}

fn decode_extra(r: &mut Reader<'_>) -> Result<ExtraData, DecodeError> {
    let flags = r.u8("extra data flag")?;
    let mut extra = ExtraData::default();

    if flags & EDF_PORT != 0 {
        extra.port = Some(r.u16("port")?);
    }
    if flags & EDF_STEAM_ID != 0 {
        extra.steam_id = Some(r.u64("steam id")?);
    }
    if flags & EDF_SPECTATOR != 0 {
        extra.spectator_port = Some(r.u16("spectator port")?);
        extra.spectator_name = Some(r.string("spectator name")?);
    }
    if flags & EDF_KEYWORDS != 0 {
        extra.keywords = Some(r.string("keywords")?);
    }
    if flags & EDF_GAME_ID != 0 {
        extra.game_id = Some(r.u64("game id")?);
    }
    Ok(extra)
}


#[cfg(test)]
mod tests {
    use super::fixture::info_response;
    use super::*;

    #[test]
    fn request_has_prefix_and_type() {
        let req = info_request();
        assert_eq!(&req[..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(req[4], b'T');
        assert!(req.ends_with(b"Source Engine Query\0"));
    }

    #[test]
    fn decodes_well_formed_reply() {
        let info = decode_info(&info_response("de_dust2", 4, false)).unwrap();

        assert!(info.ready);
        assert_eq!(info.map, "de_dust2");
        assert_eq!(info.name, "prac server");
        assert_eq!(info.folder, "csgo");
        assert_eq!(info.app_id, 730);
        assert_eq!(info.players, 4);
        assert_eq!(info.max_players, 10);
        assert_eq!(info.bots, 2);
        assert_eq!(info.server_type, ServerType::Dedicated);
        assert_eq!(info.environment, Environment::Linux);
        assert!(info.password_protected);
        assert!(info.vac_secured);
        assert_eq!(info.version, "1.38.2.2");
        assert!(info.extra.is_none());
    }

    #[test]
    fn decodes_extra_data_block() {
        let info = decode_info(&info_response("de_inferno", 0, true)).unwrap();
        let extra = info.extra.expect("extra data present");

        assert_eq!(extra.port, Some(27015));
        assert_eq!(extra.keywords.as_deref(), Some("secure,valve_ds"));
        assert_eq!(extra.game_id, Some(730));
        assert!(extra.steam_id.is_none());
        assert!(extra.spectator_name.is_none());
    }

    #[test]
    fn every_truncation_is_rejected() {
        let full = info_response("de_dust2", 1, false);
        for len in 0..full.len() {
            assert!(
                decode_info(&full[..len]).is_err(),
                "prefix of {len} bytes decoded"
            );
        }

        let with_extra = info_response("de_dust2", 1, true);
        assert_eq!(
            decode_info(&with_extra[..with_extra.len() - 1]),
            Err(DecodeError::Truncated("game id"))
        );
    }

    #[test]
    fn rejects_challenge_and_split_packets() {
        let challenge = [0xFF, 0xFF, 0xFF, 0xFF, 0x41, 1, 2, 3, 4];
        assert_eq!(
            decode_info(&challenge),
            Err(DecodeError::UnexpectedHeader(0x41))
        );

        let split = [0xFE, 0xFF, 0xFF, 0xFF, 0x49];
        assert_eq!(
            decode_info(&split),
            Err(DecodeError::UnexpectedPrefix(0xFFFF_FFFE))
        );
    }

    #[test]
    fn rejects_unknown_server_type() {
        let mut pkt = info_response("de_dust2", 1, false);
        // type, environment, visibility, vac, then the version string
        let server_type = pkt.len() - "1.38.2.2\0".len() - 4;
        pkt[server_type] = b'x';
        assert!(matches!(
            decode_info(&pkt),
            Err(DecodeError::UnexpectedByte { field: "server type", value: b'x' })
        ));
    }

    #[test]
    fn type_and_environment_bytes_ignore_case() {
        let mut pkt = info_response("de_dust2", 1, false);
        let server_type = pkt.len() - "1.38.2.2\0".len() - 4;
        pkt[server_type] = b'P';
        pkt[server_type + 1] = b'W';

        let info = decode_info(&pkt).unwrap();
        assert_eq!(info.server_type, ServerType::Proxy);
        assert_eq!(info.environment, Environment::Windows);
    }
}
