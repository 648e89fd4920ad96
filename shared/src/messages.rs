//! The message vocabulary exchanged over the host game's custom-payload
//! channel. Transport and delivery belong to the host; only the envelope
//! and its byte layout live here.

use crate::wire::{ByteReader, ByteWriter, Wire, WireError};

/// Client -> server: the fully serialized document of an edited config.
/// `data` is the whole document, not a diff; the server re-validates it
/// before committing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfigMessage {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Client -> server: ask for the current document of a server-scoped config
/// that is not pushed automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfigMessage {
    pub file_name: String,
}

/// Server -> client: the serialized document answering a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseConfigMessage {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Server -> client, on join: the session flags the client mirrors for UI
/// gating. Never trusted back by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDataMessage {
    pub developer: bool,
    pub lan: bool,
}

// Payload

const TAG_SYNC_CONFIG: u8 = 0;
const TAG_REQUEST_CONFIG: u8 = 1;
const TAG_RESPONSE_CONFIG: u8 = 2;
const TAG_SESSION_DATA: u8 = 3;

/// Tagged envelope for everything that crosses the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    SyncConfig(SyncConfigMessage),
    RequestConfig(RequestConfigMessage),
    ResponseConfig(ResponseConfigMessage),
    SessionData(SessionDataMessage),
}

impl Wire for SyncConfigMessage {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.file_name);
        writer.write_bytes(&self.data);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            file_name: reader.read_string()?,
            data: reader.read_bytes()?,
        })
    }
}

impl Wire for RequestConfigMessage {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.file_name);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            file_name: reader.read_string()?,
        })
    }
}

impl Wire for ResponseConfigMessage {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.file_name);
        writer.write_bytes(&self.data);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            file_name: reader.read_string()?,
            data: reader.read_bytes()?,
        })
    }
}

impl Wire for SessionDataMessage {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bool(self.developer);
        writer.write_bool(self.lan);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        Ok(Self {
            developer: reader.read_bool()?,
            lan: reader.read_bool()?,
        })
    }
}

impl Wire for Payload {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Payload::SyncConfig(message) => {
                writer.write_u8(TAG_SYNC_CONFIG);
                message.ser(writer);
            }
            Payload::RequestConfig(message) => {
                writer.write_u8(TAG_REQUEST_CONFIG);
                message.ser(writer);
            }
            Payload::ResponseConfig(message) => {
                writer.write_u8(TAG_RESPONSE_CONFIG);
                message.ser(writer);
            }
            Payload::SessionData(message) => {
                writer.write_u8(TAG_SESSION_DATA);
                message.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, WireError> {
        match reader.read_u8()? {
            TAG_SYNC_CONFIG => Ok(Payload::SyncConfig(SyncConfigMessage::de(reader)?)),
            TAG_REQUEST_CONFIG => Ok(Payload::RequestConfig(RequestConfigMessage::de(reader)?)),
            TAG_RESPONSE_CONFIG => Ok(Payload::ResponseConfig(ResponseConfigMessage::de(reader)?)),
            TAG_SESSION_DATA => Ok(Payload::SessionData(SessionDataMessage::de(reader)?)),
            tag => Err(WireError::UnknownTag { tag }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(payload: Payload) {
        let mut writer = ByteWriter::new();
        payload.ser(&mut writer);
        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(Payload::de(&mut reader), Ok(payload));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_payload_round_trips() {
        round_trip(Payload::SyncConfig(SyncConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
            data: b"[general]\nlevel = 3\n".to_vec(),
        }));
        round_trip(Payload::RequestConfig(RequestConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
        }));
        round_trip(Payload::ResponseConfig(ResponseConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
            data: Vec::new(),
        }));
        round_trip(Payload::SessionData(SessionDataMessage {
            developer: true,
            lan: false,
        }));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut reader = ByteReader::new(&[9]);
        assert_eq!(
            Payload::de(&mut reader),
            Err(WireError::UnknownTag { tag: 9 })
        );
    }
}
