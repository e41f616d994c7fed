//! Binary file envelope: header constants and persisted-file helpers.
//!
//! The node-level encoding is envelope-free; this module wraps it for
//! storage. Persisted blobs carry a fixed header so a reader can refuse
//! data from a newer schema version instead of attempting a best-effort
//! parse.
//!
//! # File structure
//!
//! ```text
//! +------------------+
//! |     HEADER       |  64 bytes (fixed)
//! +------------------+
//! |   FILTER LIST    |  node-level encoding, variable
//! +------------------+
//! ```

use std::fs::File;
use std::path::Path;

use bitflags::bitflags;
use memmap2::Mmap;
use sha2::{Digest, Sha256};

use crate::ast::FilterList;
use crate::error::{Error, Result};

use super::buffer::{InputByteBuffer, OutputByteBuffer};
use super::filter_list::{deserialize_filter_list, serialize_filter_list};

/// Magic bytes identifying fltree binary files.
pub const MAGIC: [u8; 8] = *b"FLTREE\x00\x01";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 64;

bitflags! {
    /// Format flags for binary files.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FormatFlags: u32 {
        /// Header checksum field is populated.
        const HAS_CHECKSUM = 0b00000001;
    }
}

/// Binary file header (64 bytes).
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// Magic bytes: "FLTREE\x00\x01"
    pub magic: [u8; 8],
    /// Format version
    pub version: u32,
    /// Format flags
    pub flags: u32,
    /// Unix timestamp when the file was generated
    pub timestamp: i64,
    /// SHA-256 checksum of the filter-list payload
    pub checksum: [u8; 32],
    /// Number of top-level rules in the payload
    pub rule_count: u32,
    /// Reserved for future use
    pub reserved: [u8; 4],
}

impl FileHeader {
    /// Create a header with default values.
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            flags: FormatFlags::HAS_CHECKSUM.bits(),
            timestamp: 0,
            checksum: [0; 32],
            rule_count: 0,
            reserved: [0; 4],
        }
    }

    /// Validate the header magic and version.
    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::InvalidMagic);
        }
        if self.version > FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    /// Get format flags.
    pub fn format_flags(&self) -> FormatFlags {
        FormatFlags::from_bits_truncate(self.flags)
    }

    fn encode(&self, buf: &mut OutputByteBuffer) {
        buf.write_bytes(&self.magic);
        buf.write_u32(self.version);
        buf.write_u32(self.flags);
        buf.write_bytes(&self.timestamp.to_le_bytes());
        buf.write_bytes(&self.checksum);
        buf.write_u32(self.rule_count);
        buf.write_bytes(&self.reserved);
    }

    fn decode(buf: &mut InputByteBuffer<'_>) -> Result<Self> {
        let mut magic = [0u8; 8];
        magic.copy_from_slice(buf.read_bytes(8)?);
        let version = buf.read_u32()?;
        let flags = buf.read_u32()?;
        let mut ts = [0u8; 8];
        ts.copy_from_slice(buf.read_bytes(8)?);
        let mut checksum = [0u8; 32];
        checksum.copy_from_slice(buf.read_bytes(32)?);
        let rule_count = buf.read_u32()?;
        let mut reserved = [0u8; 4];
        reserved.copy_from_slice(buf.read_bytes(4)?);

        Ok(Self {
            magic,
            version,
            flags,
            timestamp: i64::from_le_bytes(ts),
            checksum,
            rule_count,
            reserved,
        })
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a filter list into a complete binary file (header + payload).
pub fn write_filter_list_file(list: &FilterList) -> Result<Vec<u8>> {
    let mut payload = OutputByteBuffer::with_capacity(64 * 1024);
    serialize_filter_list(list, &mut payload)?;

    let mut header = FileHeader::new();
    header.timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    header.rule_count = list.children.len() as u32;

    let mut hasher = Sha256::new();
    hasher.update(payload.as_slice());
    header.checksum.copy_from_slice(&hasher.finalize());

    let mut out = OutputByteBuffer::with_capacity(HEADER_SIZE + payload.len());
    header.encode(&mut out);
    out.write_bytes(payload.as_slice());

    log::debug!(
        "wrote filter list file: {} rules, {} bytes",
        header.rule_count,
        out.len()
    );

    Ok(out.into_bytes())
}

/// Parse and validate the header of a binary file, without touching the
/// payload.
pub fn read_header(data: &[u8]) -> Result<FileHeader> {
    if data.len() < HEADER_SIZE {
        return Err(Error::InvalidHeaderSize {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let mut buf = InputByteBuffer::new(&data[..HEADER_SIZE]);
    let header = FileHeader::decode(&mut buf)?;
    header.validate()?;
    Ok(header)
}

/// Deserialize a filter list from a complete binary file.
pub fn read_filter_list_file(data: &[u8]) -> Result<FilterList> {
    let header = read_header(data)?;
    let payload = &data[HEADER_SIZE..];

    if header.format_flags().contains(FormatFlags::HAS_CHECKSUM) {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        if header.checksum != *hasher.finalize() {
            return Err(Error::ChecksumMismatch);
        }
    }

    let mut buf = InputByteBuffer::new(payload);
    deserialize_filter_list(&mut buf)
}

/// Open a binary file via memory mapping and deserialize it.
pub fn open_filter_list(path: &Path) -> Result<FilterList> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    read_filter_list_file(&mmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{EmptyRule, RuleNode};

    fn sample_list() -> FilterList {
        FilterList {
            children: vec![RuleNode::Empty(EmptyRule::default())],
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let list = sample_list();
        let data = write_filter_list_file(&list).unwrap();
        assert!(data.len() > HEADER_SIZE);
        assert_eq!(&data[0..8], &MAGIC);

        let decoded = read_filter_list_file(&data).unwrap();
        assert_eq!(decoded, list);
    }

    #[test]
    fn test_header_fields() {
        let data = write_filter_list_file(&sample_list()).unwrap();
        let header = read_header(&data).unwrap();
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.rule_count, 1);
        assert!(header.format_flags().contains(FormatFlags::HAS_CHECKSUM));
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut data = write_filter_list_file(&sample_list()).unwrap();
        data[0] = 0xFF;
        assert!(matches!(
            read_filter_list_file(&data),
            Err(Error::InvalidMagic)
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut data = write_filter_list_file(&sample_list()).unwrap();
        // Version lives right after the 8 magic bytes, little-endian.
        data[8..12].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            read_filter_list_file(&data),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let mut data = write_filter_list_file(&sample_list()).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        assert!(matches!(
            read_filter_list_file(&data),
            Err(Error::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let data = vec![0u8; 10];
        assert!(matches!(
            read_filter_list_file(&data),
            Err(Error::InvalidHeaderSize { .. })
        ));
    }
}
