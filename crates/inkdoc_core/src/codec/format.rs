//! Byte container for ink documents.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 4    | magic `INKD`          |
//! | 4      | 2    | format version        |
//! | 6      | 2    | flags (must be 0)     |
//! | 8      | 4    | body length           |
//! | 12     | 4    | CRC-32C of body       |
//! | 16     | n    | JSON document body    |

use crate::codec::error::{EncodeError, EncodeResult, FormatError, FormatResult};
use crate::codec::options::DecodeOptions;
use crate::model::document::Document;
use crc32c::crc32c;

pub const MAGIC: [u8; 4] = *b"INKD";
pub const FORMAT_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 16;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub flags: u16,
    pub body_len: u32,
    pub checksum: u32,
}

impl Header {
    fn for_body(body: &[u8]) -> EncodeResult<Self> {
        let body_len =
            u32::try_from(body.len()).map_err(|_| EncodeError::BodyTooLarge(body.len()))?;
        Ok(Self {
            version: FORMAT_VERSION,
            flags: 0,
            body_len,
            checksum: crc32c(body),
        })
    }

    fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.flags.to_le_bytes());
        buf[8..12].copy_from_slice(&self.body_len.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Parses and checks the header at the start of `bytes`.
    pub fn decode(bytes: &[u8]) -> FormatResult<Self> {
        if bytes.len() >= MAGIC.len() && bytes[..MAGIC.len()] != MAGIC {
            let mut got = [0u8; 4];
            got.copy_from_slice(&bytes[..MAGIC.len()]);
            return Err(FormatError::BadMagic(got));
        }
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let header = Self {
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            flags: u16::from_le_bytes([bytes[6], bytes[7]]),
            body_len: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            checksum: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        };
        if header.version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: header.version,
                supported: FORMAT_VERSION,
            });
        }
        if header.flags != 0 {
            return Err(FormatError::UnsupportedFlags(header.flags));
        }
        Ok(header)
    }
}

/// Serializes `document` into a complete, self-checking byte buffer.
pub fn document_to_bytes(document: &Document) -> EncodeResult<Vec<u8>> {
    let body = serde_json::to_vec(document)?;
    let header = Header::for_body(&body)?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Parses a complete byte buffer into a structurally valid document.
pub fn document_from_bytes(bytes: &[u8], options: &DecodeOptions) -> FormatResult<Document> {
    let header = Header::decode(bytes)?;
    let body_len = header.body_len as usize;
    if body_len > options.max_body_bytes {
        return Err(FormatError::BodyTooLarge {
            len: body_len,
            max: options.max_body_bytes,
        });
    }

    let expected_total = HEADER_LEN + body_len;
    if bytes.len() < expected_total {
        return Err(FormatError::Truncated {
            expected: expected_total,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected_total {
        return Err(FormatError::TrailingBytes(bytes.len() - expected_total));
    }

    let body = &bytes[HEADER_LEN..];
    let actual = crc32c(body);
    if actual != header.checksum {
        return Err(FormatError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let document: Document = serde_json::from_slice(body)?;
    document.validate()?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::{document_from_bytes, document_to_bytes, Header, FORMAT_VERSION, HEADER_LEN};
    use crate::codec::error::FormatError;
    use crate::codec::options::DecodeOptions;
    use crate::model::document::Document;

    fn encoded_empty() -> Vec<u8> {
        document_to_bytes(&Document::with_main_group()).unwrap()
    }

    #[test]
    fn header_carries_length_and_version() {
        let bytes = encoded_empty();
        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.body_len as usize, bytes.len() - HEADER_LEN);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = encoded_empty();
        bytes[0] = b'X';
        let err = document_from_bytes(&bytes, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::BadMagic(got) if &got == b"XNKD"));
    }

    #[test]
    fn rejects_truncated_body_and_header() {
        let bytes = encoded_empty();
        let err = document_from_bytes(&bytes[..bytes.len() - 1], &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));

        let err = document_from_bytes(&bytes[..10], &DecodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Truncated {
                expected: HEADER_LEN,
                actual: 10
            }
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = encoded_empty();
        bytes[4..6].copy_from_slice(&7u16.to_le_bytes());
        let err = document_from_bytes(&bytes, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnsupportedVersion {
                found: 7,
                supported: FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn rejects_corrupted_body() {
        let mut bytes = encoded_empty();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = document_from_bytes(&bytes, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::ChecksumMismatch { .. }));
    }

    #[test]
    fn rejects_body_over_limit_before_parsing() {
        let bytes = encoded_empty();
        let options = DecodeOptions { max_body_bytes: 4 };
        let err = document_from_bytes(&bytes, &options).unwrap_err();
        assert!(matches!(err, FormatError::BodyTooLarge { max: 4, .. }));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encoded_empty();
        bytes.push(0);
        let err = document_from_bytes(&bytes, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::TrailingBytes(1)));
    }
}
