use crate::errors::{LoadCause, LoadError};
use crate::reader::ClassReader;

/// One `u1` tag value per JVMS §4.4. Kept as a `#[repr(u8)]` enum with a
/// fallible conversion, in the style of the class's other flag/tag tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    Fieldref = 9,
    Methodref = 10,
    InterfaceMethodref = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    InvokeDynamic = 18,
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        Ok(match value {
            1 => Tag::Utf8,
            3 => Tag::Integer,
            4 => Tag::Float,
            5 => Tag::Long,
            6 => Tag::Double,
            7 => Tag::Class,
            8 => Tag::String,
            9 => Tag::Fieldref,
            10 => Tag::Methodref,
            11 => Tag::InterfaceMethodref,
            12 => Tag::NameAndType,
            15 => Tag::MethodHandle,
            16 => Tag::MethodType,
            18 => Tag::InvokeDynamic,
            other => return Err(other),
        })
    }
}

/// A decoded constant-pool entry. `Phantom` marks the unused slot that follows
/// a `Long`/`Double` entry so subsequent 1-based indices stay correct.
#[derive(Debug, Clone)]
pub enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Phantom,
}

impl ConstantPoolEntry {
    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            ConstantPoolEntry::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Decodes `constant_pool_count - 1` logical entries into a 1-based pool
/// (index 0 holds an unused placeholder, matching the on-disk convention
/// that real entries start at index 1).
pub fn read_constant_pool(
    reader: &mut ClassReader,
    constant_pool_count: u16,
) -> Result<Vec<ConstantPoolEntry>, LoadError> {
    let mut pool = Vec::with_capacity(constant_pool_count as usize);
    pool.push(ConstantPoolEntry::Phantom);

    let mut i = 1u16;
    while i < constant_pool_count {
        let tag_byte = reader.u1()?;
        let tag = Tag::try_from(tag_byte).map_err(|b| {
            LoadError::new(
                LoadCause::UnknownConstantTag(b),
                format!("unknown constant-pool tag {b} at index {i}"),
            )
        })?;
        let entry = match tag {
            Tag::Utf8 => {
                let len = reader.u2()? as usize;
                let bytes = reader.read(len)?;
                ConstantPoolEntry::Utf8(String::from_utf8_lossy(&bytes).into_owned())
            }
            Tag::Integer => ConstantPoolEntry::Integer(reader.i4()?),
            Tag::Float => ConstantPoolEntry::Float(reader.f4()?),
            Tag::Long => {
                let high = reader.u4()? as u64;
                let low = reader.u4()? as u64;
                ConstantPoolEntry::Long(((high << 32) | low) as i64)
            }
            Tag::Double => {
                let high = reader.u4()? as u64;
                let low = reader.u4()? as u64;
                ConstantPoolEntry::Double(f64::from_bits((high << 32) | low))
            }
            Tag::Class => ConstantPoolEntry::Class {
                name_index: reader.u2()?,
            },
            Tag::String => ConstantPoolEntry::String {
                string_index: reader.u2()?,
            },
            Tag::Fieldref => ConstantPoolEntry::Fieldref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            },
            Tag::Methodref => ConstantPoolEntry::Methodref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            },
            Tag::InterfaceMethodref => ConstantPoolEntry::InterfaceMethodref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            },
            Tag::NameAndType => ConstantPoolEntry::NameAndType {
                name_index: reader.u2()?,
                descriptor_index: reader.u2()?,
            },
            Tag::MethodHandle => ConstantPoolEntry::MethodHandle {
                reference_kind: reader.u1()?,
                reference_index: reader.u2()?,
            },
            Tag::MethodType => ConstantPoolEntry::MethodType {
                descriptor_index: reader.u2()?,
            },
            Tag::InvokeDynamic => ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            },
        };

        let is_wide = matches!(entry, ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_));
        pool.push(entry);
        i += 1;
        if is_wide {
            pool.push(ConstantPoolEntry::Phantom);
            i += 1;
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_for(bytes: &[u8]) -> ClassReader {
        ClassReader::new(bytes)
    }

    #[test]
    fn decodes_utf8_and_integer() {
        let mut bytes = vec![];
        bytes.push(Tag::Utf8 as u8);
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(b"abc");
        bytes.push(Tag::Integer as u8);
        bytes.extend_from_slice(&42i32.to_be_bytes());

        let mut reader = reader_for(&bytes);
        let pool = read_constant_pool(&mut reader, 3).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[1].as_utf8(), Some("abc"));
        matches!(pool[2], ConstantPoolEntry::Integer(42));
    }

    #[test]
    fn long_entry_reserves_phantom_slot() {
        let mut bytes = vec![Tag::Long as u8];
        bytes.extend_from_slice(&1i64.to_be_bytes());
        bytes.push(Tag::Integer as u8);
        bytes.extend_from_slice(&7i32.to_be_bytes());

        let mut reader = reader_for(&bytes);
        // constant_pool_count = 4: index 1 = Long, index 2 = phantom, index 3 = Integer
        let pool = read_constant_pool(&mut reader, 4).unwrap();
        assert_eq!(pool.len(), 4);
        assert!(matches!(pool[2], ConstantPoolEntry::Phantom));
        assert!(matches!(pool[3], ConstantPoolEntry::Integer(7)));
    }

    #[test]
    fn unknown_tag_is_fatal() {
        let bytes = vec![0xFFu8];
        let mut reader = reader_for(&bytes);
        let err = read_constant_pool(&mut reader, 2).unwrap_err();
        assert!(matches!(err.cause, LoadCause::UnknownConstantTag(0xFF)));
    }
}
