//! Tag directory
//!
//! The directory follows the header: `tag_count` entries of signature,
//! offset and size. Entries are validated once when the profile is parsed;
//! lookups afterwards only index into already-checked ranges.

use super::error::TagError;
use super::header::{Header, HEADER_SIZE, TAG_ENTRY_SIZE};
use super::reader::read_u32;
use super::types::{TagSignature, TypeSignature};

/// A view of one tag body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub signature: TagSignature,
    /// First four bytes of the body
    pub type_signature: TypeSignature,
    pub size: u32,
    /// The whole body, including the type signature
    pub data: &'a [u8],
}

/// Validated directory over a profile buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TagDirectory<'a> {
    bytes: &'a [u8],
    count: u32,
}

impl<'a> TagDirectory<'a> {
    /// A directory with no entries, for profiles built without a buffer
    pub(crate) const EMPTY: Self = Self { bytes: &[], count: 0 };

    /// Check every entry against the declared profile size
    ///
    /// `header` must already have been validated against `bytes`, so the
    /// directory itself is known to be in range.
    pub(crate) fn parse(bytes: &'a [u8], header: &Header) -> Result<Self, TagError> {
        let directory = Self {
            bytes,
            count: header.tag_count,
        };

        for i in 0..header.tag_count as usize {
            let (signature, offset, size) = directory.entry(i);
            if size < 4 {
                return Err(TagError::Undersized {
                    tag: signature,
                    size,
                });
            }
            if offset as u64 + size as u64 > header.size as u64 {
                return Err(TagError::OutOfBounds {
                    tag: signature,
                    offset,
                    size,
                    profile_size: header.size,
                });
            }
        }

        Ok(directory)
    }

    #[inline]
    pub(crate) fn len(&self) -> u32 {
        self.count
    }

    #[inline]
    fn entry(&self, idx: usize) -> (TagSignature, u32, u32) {
        let base = HEADER_SIZE + idx * TAG_ENTRY_SIZE;
        (
            TagSignature(read_u32(self.bytes, base)),
            read_u32(self.bytes, base + 4),
            read_u32(self.bytes, base + 8),
        )
    }

    /// Tag at `idx`, or `None` when `idx` is past the last entry
    pub(crate) fn get(&self, idx: u32) -> Option<Tag<'a>> {
        if idx >= self.count {
            return None;
        }
        let (signature, offset, size) = self.entry(idx as usize);
        let start = offset as usize;
        let data = self.bytes.get(start..start.checked_add(size as usize)?)?;
        Some(Tag {
            signature,
            type_signature: TypeSignature(read_u32(data, 0)),
            size,
            data,
        })
    }

    /// First tag with the given signature
    pub(crate) fn find(&self, signature: TagSignature) -> Option<Tag<'a>> {
        (0..self.count)
            .find(|&i| self.entry(i as usize).0 == signature)
            .and_then(|i| self.get(i))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Tag<'a>> + '_ {
        (0..self.count).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_tags(tags: &[(&[u8; 4], u32, u32)], total: usize) -> Vec<u8> {
        let mut data = vec![0u8; total];
        data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
        data[128..132].copy_from_slice(&(tags.len() as u32).to_be_bytes());
        for (i, (sig, offset, size)) in tags.iter().enumerate() {
            let base = HEADER_SIZE + i * TAG_ENTRY_SIZE;
            data[base..base + 4].copy_from_slice(*sig);
            data[base + 4..base + 8].copy_from_slice(&offset.to_be_bytes());
            data[base + 8..base + 12].copy_from_slice(&size.to_be_bytes());
        }
        data
    }

    fn header_for(data: &[u8]) -> Header {
        Header {
            size: read_u32(data, 0),
            tag_count: read_u32(data, 128),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup() {
        let mut data = profile_with_tags(&[(b"rXYZ", 180, 20), (b"gXYZ", 200, 20), (b"rXYZ", 200, 20)], 220);
        data[180..184].copy_from_slice(b"XYZ ");
        data[200..204].copy_from_slice(b"curv");
        let dir = TagDirectory::parse(&data, &header_for(&data)).unwrap();

        assert_eq!(dir.len(), 3);
        let tag = dir.get(1).unwrap();
        assert_eq!(tag.signature, TagSignature::GREEN_COLORANT);
        assert_eq!(tag.type_signature, TypeSignature::CURVE);
        assert_eq!(tag.data.len(), 20);

        // First match wins
        let tag = dir.find(TagSignature::RED_COLORANT).unwrap();
        assert_eq!(tag.type_signature, TypeSignature::XYZ);
        assert!(dir.find(TagSignature::BLUE_COLORANT).is_none());
        assert_eq!(dir.iter().count(), 3);
    }

    #[test]
    fn test_index_past_end() {
        let data = profile_with_tags(&[(b"rXYZ", 144, 4)], 148);
        let dir = TagDirectory::parse(&data, &header_for(&data)).unwrap();
        assert!(dir.get(0).is_some());
        assert!(dir.get(1).is_none());
        assert!(dir.get(u32::MAX).is_none());
    }

    #[test]
    fn test_undersized_tag() {
        let data = profile_with_tags(&[(b"rXYZ", 144, 3)], 148);
        assert!(matches!(
            TagDirectory::parse(&data, &header_for(&data)),
            Err(TagError::Undersized { size: 3, .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_tag() {
        let data = profile_with_tags(&[(b"rXYZ", 144, 8)], 148);
        assert!(matches!(
            TagDirectory::parse(&data, &header_for(&data)),
            Err(TagError::OutOfBounds { .. })
        ));

        // offset + size overflows u32
        let data = profile_with_tags(&[(b"rXYZ", u32::MAX, 8)], 148);
        assert!(matches!(
            TagDirectory::parse(&data, &header_for(&data)),
            Err(TagError::OutOfBounds { .. })
        ));
    }
}
