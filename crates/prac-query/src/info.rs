/// `d` dedicated, `l` listen, `p` SourceTV relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    Dedicated,
    Listen,
    Proxy,
}

impl ServerType {
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_lowercase() {
            b'd' => Some(ServerType::Dedicated),
            b'l' => Some(ServerType::Listen),
            b'p' => Some(ServerType::Proxy),
            _ => None,
        }
    }
}

/// Operating system the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Linux,
    Windows,
    Mac,
}

impl Environment {
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_lowercase() {
            b'l' => Some(Environment::Linux),
            b'w' => Some(Environment::Windows),
            b'm' | b'o' => Some(Environment::Mac),
            _ => None,
        }
    }
}

/// Optional trailing block announced by the extra-data flag byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraData {
    pub port: Option<u16>,
    pub steam_id: Option<u64>,
    pub spectator_port: Option<u16>,
    pub spectator_name: Option<String>,
    pub keywords: Option<String>,
    pub game_id: Option<u64>,
}

/// Decoded A2S_INFO reply.
///
/// Only ever constructed from a well-formed response, so `ready` is always `true`; a server that is not ready yields no value at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProbeResult {
    pub ready: bool,
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    pub app_id: u16,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: ServerType,
    pub environment: Environment,
    pub password_protected: bool,
    pub vac_secured: bool,
    pub version: String,
    pub extra: Option<ExtraData>,
}
