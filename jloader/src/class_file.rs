use std::collections::HashMap;

use crate::access_flags::{ClassAccessFlag, MethodAccessFlag};
use crate::attributes::{read_attributes, Attribute};
use crate::constants::{read_constant_pool, ConstantPoolEntry};
use crate::errors::{LoadCause, LoadError};
use crate::reader::ClassReader;

const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

impl MethodInfo {
    pub fn is_static(&self) -> bool {
        self.access_flags & (MethodAccessFlag::Static as u16) != 0
    }

    pub fn code(&self) -> Option<&crate::attributes::Code> {
        self.attributes.iter().find_map(Attribute::as_code)
    }
}

#[derive(Debug, Clone)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: Vec<ConstantPoolEntry>,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<Attribute>,
    method_lookup: HashMap<(String, String), usize>,
    field_lookup: HashMap<(String, String), usize>,
}

fn read_member(
    reader: &mut ClassReader,
    pool: &[ConstantPoolEntry],
) -> Result<(u16, u16, u16, Vec<Attribute>), LoadError> {
    let access_flags = reader.u2()?;
    let name_index = reader.u2()?;
    let descriptor_index = reader.u2()?;
    let attributes_count = reader.u2()?;
    let attributes = read_attributes(reader, pool, attributes_count)?;
    Ok((access_flags, name_index, descriptor_index, attributes))
}

fn utf8_at(pool: &[ConstantPoolEntry], index: u16) -> Result<String, LoadError> {
    pool.get(index as usize)
        .and_then(ConstantPoolEntry::as_utf8)
        .map(str::to_owned)
        .ok_or_else(|| {
            LoadError::new(
                LoadCause::InvalidPoolIndex {
                    index,
                    pool_len: pool.len(),
                },
                "expected a Utf8 constant-pool entry",
            )
        })
}

impl ClassFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<ClassFile, LoadError> {
        let mut reader = ClassReader::new(bytes);

        let magic = reader.u4()?;
        if magic != MAGIC {
            return Err(LoadError::new(
                LoadCause::InvalidMagic(magic),
                format!("expected magic 0x{MAGIC:08X}, found 0x{magic:08X}"),
            ));
        }

        let minor_version = reader.u2()?;
        let major_version = reader.u2()?;

        let constant_pool_count = reader.u2()?;
        let constant_pool = read_constant_pool(&mut reader, constant_pool_count)?;

        let access_flags = reader.u2()?;
        let this_class = reader.u2()?;
        let super_class = reader.u2()?;

        let interfaces_count = reader.u2()?;
        let mut interfaces = Vec::with_capacity(interfaces_count as usize);
        for _ in 0..interfaces_count {
            interfaces.push(reader.u2()?);
        }

        let fields_count = reader.u2()?;
        let mut fields = Vec::with_capacity(fields_count as usize);
        for _ in 0..fields_count {
            let (access_flags, name_index, descriptor_index, attributes) =
                read_member(&mut reader, &constant_pool)?;
            fields.push(FieldInfo {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
            });
        }

        let methods_count = reader.u2()?;
        let mut methods = Vec::with_capacity(methods_count as usize);
        for _ in 0..methods_count {
            let (access_flags, name_index, descriptor_index, attributes) =
                read_member(&mut reader, &constant_pool)?;
            methods.push(MethodInfo {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
            });
        }

        let attributes_count = reader.u2()?;
        let attributes = read_attributes(&mut reader, &constant_pool, attributes_count)?;

        if !reader.is_empty() {
            return Err(LoadError::new(
                LoadCause::TrailingBytes(reader.remaining()),
                format!("{} unexpected trailing byte(s) after class file", reader.remaining()),
            ));
        }

        let mut method_lookup = HashMap::with_capacity(methods.len());
        for (i, m) in methods.iter().enumerate() {
            let name = utf8_at(&constant_pool, m.name_index)?;
            let descriptor = utf8_at(&constant_pool, m.descriptor_index)?;
            method_lookup.insert((name, descriptor), i);
        }

        let mut field_lookup = HashMap::with_capacity(fields.len());
        for (i, f) in fields.iter().enumerate() {
            let name = utf8_at(&constant_pool, f.name_index)?;
            let descriptor = utf8_at(&constant_pool, f.descriptor_index)?;
            field_lookup.insert((name, descriptor), i);
        }

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
            method_lookup,
            field_lookup,
        })
    }

    pub fn access_flag_names(&self) -> Vec<&'static str> {
        ClassAccessFlag::from_bitmask(self.access_flags)
            .into_iter()
            .map(ClassAccessFlag::name)
            .collect()
    }

    pub fn this_class_name(&self) -> Result<String, LoadError> {
        match self.constant_pool.get(self.this_class as usize) {
            Some(ConstantPoolEntry::Class { name_index }) => utf8_at(&self.constant_pool, *name_index),
            _ => Err(LoadError::new(
                LoadCause::WrongPoolEntryKind {
                    index: self.this_class,
                    expected: "Class",
                },
                "this_class does not resolve to a Class entry",
            )),
        }
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.method_lookup
            .get(&(name.to_owned(), descriptor.to_owned()))
            .map(|&i| &self.methods[i])
    }

    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&FieldInfo> {
        self.field_lookup
            .get(&(name.to_owned(), descriptor.to_owned()))
            .map(|&i| &self.fields[i])
    }

    pub fn bootstrap_methods(&self) -> Option<&[crate::attributes::BootstrapMethod]> {
        self.attributes.iter().find_map(Attribute::as_bootstrap_methods)
    }

    pub fn name_of(&self, utf8_index: u16) -> Result<String, LoadError> {
        utf8_at(&self.constant_pool, utf8_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_magic_is_fatal() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 52, 0, 1];
        let err = ClassFile::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err.cause, LoadCause::InvalidMagic(0xDEADBEEF)));
    }
}
