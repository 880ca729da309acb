use crate::constants::ConstantPoolEntry;
use crate::errors::{LoadCause, LoadError};
use crate::reader::ClassReader;

#[derive(Debug, Clone)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, Clone)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct BootstrapMethod {
    pub bootstrap_method_ref: u16,
    pub bootstrap_arguments: Vec<u16>,
}

#[derive(Debug, Clone)]
pub struct InnerClass {
    pub inner_class_info_index: u16,
    pub outer_class_info_index: u16,
    pub inner_name_index: u16,
    pub inner_class_access_flags: u16,
}

#[derive(Debug, Clone)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

/// One decoded `attribute_info`. Names not represented here are a fatal
/// `UnsupportedAttribute` at load time (§4.C): the named subset is meant to
/// be exhaustive for the class files this VM loads, not a best-effort parse.
#[derive(Debug, Clone)]
pub enum Attribute {
    Code(Code),
    BootstrapMethods(Vec<BootstrapMethod>),
    SourceFile { sourcefile_index: u16 },
    InnerClasses(Vec<InnerClass>),
    LineNumberTable(Vec<LineNumberEntry>),
    StackMapTable(Vec<u8>),
    ConstantValue { constant_value_index: u16 },
    Signature { signature_index: u16 },
    RuntimeVisibleAnnotations(Vec<u8>),
    Exceptions(Vec<u16>),
    NestMembers(Vec<u16>),
    LocalVariableTable(Vec<u8>),
    LocalVariableTypeTable(Vec<u8>),
}

fn resolve_name(pool: &[ConstantPoolEntry], name_index: u16) -> Result<String, LoadError> {
    pool.get(name_index as usize)
        .and_then(ConstantPoolEntry::as_utf8)
        .map(str::to_owned)
        .ok_or_else(|| {
            LoadError::new(
                LoadCause::InvalidPoolIndex {
                    index: name_index,
                    pool_len: pool.len(),
                },
                "attribute_name_index does not resolve to a Utf8 entry",
            )
        })
}

pub fn read_attributes(
    reader: &mut ClassReader,
    pool: &[ConstantPoolEntry],
    count: u16,
) -> Result<Vec<Attribute>, LoadError> {
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = reader.u2()?;
        let length = reader.u4()? as usize;
        let name = resolve_name(pool, name_index)?;
        let body = reader.read(length)?;
        attributes.push(parse_attribute_body(&name, &body, pool)?);
    }
    Ok(attributes)
}

fn parse_attribute_body(
    name: &str,
    body: &[u8],
    pool: &[ConstantPoolEntry],
) -> Result<Attribute, LoadError> {
    let mut r = ClassReader::new(body);
    Ok(match name {
        "Code" => {
            let max_stack = r.u2()?;
            let max_locals = r.u2()?;
            let code_length = r.u4()? as usize;
            let code = r.read(code_length)?;
            let exception_table_length = r.u2()?;
            let mut exception_table = Vec::with_capacity(exception_table_length as usize);
            for _ in 0..exception_table_length {
                exception_table.push(ExceptionTableEntry {
                    start_pc: r.u2()?,
                    end_pc: r.u2()?,
                    handler_pc: r.u2()?,
                    catch_type: r.u2()?,
                });
            }
            let nested_count = r.u2()?;
            let attributes = read_attributes(&mut r, pool, nested_count)?;
            Attribute::Code(Code {
                max_stack,
                max_locals,
                code,
                exception_table,
                attributes,
            })
        }
        "BootstrapMethods" => {
            let num = r.u2()?;
            let mut methods = Vec::with_capacity(num as usize);
            for _ in 0..num {
                let bootstrap_method_ref = r.u2()?;
                let num_args = r.u2()?;
                let mut bootstrap_arguments = Vec::with_capacity(num_args as usize);
                for _ in 0..num_args {
                    bootstrap_arguments.push(r.u2()?);
                }
                methods.push(BootstrapMethod {
                    bootstrap_method_ref,
                    bootstrap_arguments,
                });
            }
            Attribute::BootstrapMethods(methods)
        }
        "SourceFile" => Attribute::SourceFile {
            sourcefile_index: r.u2()?,
        },
        "InnerClasses" => {
            let num = r.u2()?;
            let mut classes = Vec::with_capacity(num as usize);
            for _ in 0..num {
                classes.push(InnerClass {
                    inner_class_info_index: r.u2()?,
                    outer_class_info_index: r.u2()?,
                    inner_name_index: r.u2()?,
                    inner_class_access_flags: r.u2()?,
                });
            }
            Attribute::InnerClasses(classes)
        }
        "LineNumberTable" => {
            let num = r.u2()?;
            let mut entries = Vec::with_capacity(num as usize);
            for _ in 0..num {
                entries.push(LineNumberEntry {
                    start_pc: r.u2()?,
                    line_number: r.u2()?,
                });
            }
            Attribute::LineNumberTable(entries)
        }
        "StackMapTable" => Attribute::StackMapTable(body.to_vec()),
        "ConstantValue" => Attribute::ConstantValue {
            constant_value_index: r.u2()?,
        },
        "Signature" => Attribute::Signature {
            signature_index: r.u2()?,
        },
        "RuntimeVisibleAnnotations" => Attribute::RuntimeVisibleAnnotations(body.to_vec()),
        "Exceptions" => {
            let num = r.u2()?;
            let mut indices = Vec::with_capacity(num as usize);
            for _ in 0..num {
                indices.push(r.u2()?);
            }
            Attribute::Exceptions(indices)
        }
        "NestMembers" => {
            let num = r.u2()?;
            let mut indices = Vec::with_capacity(num as usize);
            for _ in 0..num {
                indices.push(r.u2()?);
            }
            Attribute::NestMembers(indices)
        }
        "LocalVariableTable" => Attribute::LocalVariableTable(body.to_vec()),
        "LocalVariableTypeTable" => Attribute::LocalVariableTypeTable(body.to_vec()),
        other => {
            return Err(LoadError::new(
                LoadCause::UnknownAttribute(other.to_owned()),
                format!("attribute '{other}' is not supported by this VM"),
            ))
        }
    })
}

impl Attribute {
    pub fn as_code(&self) -> Option<&Code> {
        match self {
            Attribute::Code(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bootstrap_methods(&self) -> Option<&[BootstrapMethod]> {
        match self {
            Attribute::BootstrapMethods(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_source_file_attribute() {
        let pool = vec![
            ConstantPoolEntry::Phantom,
            ConstantPoolEntry::Utf8("SourceFile".to_string()),
        ];
        let mut bytes = vec![];
        bytes.extend_from_slice(&1u16.to_be_bytes()); // attribute_name_index
        bytes.extend_from_slice(&2u32.to_be_bytes()); // attribute_length
        bytes.extend_from_slice(&7u16.to_be_bytes()); // sourcefile_index

        let mut reader = ClassReader::new(&bytes);
        let attrs = read_attributes(&mut reader, &pool, 1).unwrap();
        assert!(matches!(
            attrs[0],
            Attribute::SourceFile { sourcefile_index: 7 }
        ));
    }

    #[test]
    fn unknown_attribute_name_is_fatal() {
        let pool = vec![
            ConstantPoolEntry::Phantom,
            ConstantPoolEntry::Utf8("TotallyMadeUp".to_string()),
        ];
        let mut bytes = vec![];
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());

        let mut reader = ClassReader::new(&bytes);
        let err = read_attributes(&mut reader, &pool, 1).unwrap_err();
        assert!(matches!(err.cause, LoadCause::UnknownAttribute(_)));
    }
}
