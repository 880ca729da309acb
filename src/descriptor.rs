use crate::errors::{VmError, VmErrorKind};
use crate::operand::OperandType;

/// Parses a field descriptor (`I`, `[I`, `Ljava/lang/String;`, ...) into its
/// `OperandType`. Array descriptors descend to their base type per §4.E:
/// an array is always represented as a `REFERENCE`, regardless of element
/// type.
pub fn parse_field_type(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<OperandType, VmError> {
    match chars.next() {
        Some('B') | Some('C') | Some('S') | Some('Z') | Some('I') => Ok(OperandType::Int),
        Some('J') => Ok(OperandType::Long),
        Some('F') => Ok(OperandType::Float),
        Some('D') => Ok(OperandType::Double),
        Some('L') => {
            for c in chars.by_ref() {
                if c == ';' {
                    return Ok(OperandType::Reference);
                }
            }
            Err(invalid("unterminated object type, missing ';'"))
        }
        Some('[') => {
            parse_field_type(chars)?;
            Ok(OperandType::Reference)
        }
        other => Err(invalid(&format!("unexpected descriptor character {other:?}"))),
    }
}

fn invalid(msg: &str) -> VmError {
    VmError::without_diagnostic(VmErrorKind::InvalidDescriptor(msg.to_owned()))
}

/// Parses a field descriptor string end-to-end; trailing characters are an error.
pub fn parse_field_descriptor(descriptor: &str) -> Result<OperandType, VmError> {
    let mut chars = descriptor.chars().peekable();
    let ty = parse_field_type(&mut chars)?;
    if chars.next().is_some() {
        return Err(invalid(&format!("trailing characters in field descriptor '{descriptor}'")));
    }
    Ok(ty)
}

/// Parses a method descriptor `(ArgTypes)ReturnType` into the operand-type
/// tuple the interpreter needs to pop arguments and type the return value.
pub fn parse_method_descriptor(descriptor: &str) -> Result<(Vec<OperandType>, OperandType), VmError> {
    let mut chars = descriptor.chars().peekable();
    if chars.next() != Some('(') {
        return Err(invalid(&format!("method descriptor '{descriptor}' must start with '('")));
    }
    let mut args = Vec::new();
    loop {
        match chars.peek() {
            Some(')') => {
                chars.next();
                break;
            }
            Some(_) => args.push(parse_field_type(&mut chars)?),
            None => return Err(invalid(&format!("method descriptor '{descriptor}' missing ')'"))),
        }
    }
    let return_type = match chars.peek() {
        Some('V') => {
            chars.next();
            OperandType::Void
        }
        Some(_) => parse_field_type(&mut chars)?,
        None => return Err(invalid(&format!("method descriptor '{descriptor}' missing return type"))),
    };
    if chars.next().is_some() {
        return Err(invalid(&format!("trailing characters in method descriptor '{descriptor}'")));
    }
    Ok((args, return_type))
}
