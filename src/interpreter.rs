use jloader::attributes::Code;
use jloader::class_file::ClassFile;
use jloader::constants::ConstantPoolEntry;
use jloader::reader::ClassReader;

use crate::descriptor::parse_method_descriptor;
use crate::errors::{VmError, VmErrorKind};
use crate::frame::Frame;
use crate::host::PrintSink;
use crate::operand::{ArrayType, Operand, OperandType, Reference};
use crate::opcode::Opcode;
use crate::registry::ClassRegistry;

/// How a frame's dispatch loop terminated (§4.H state machine: `Running` is
/// implicit while this function is on the stack, `Failed` is the `Err` arm
/// of the `Result` this function returns).
pub enum Outcome {
    Returned(Option<Operand>),
}

/// Runs `code` in a fresh frame seeded with `args`, recursing into this same
/// function for every `invokestatic`. `class_name` and `method_name` are
/// carried purely for diagnostics; the class itself is looked up once, up
/// front, as an owned clone so the dispatch loop never needs to re-borrow
/// `registry` while it already holds a reference into it (`registry` is
/// mutated for class init and `putstatic` as the loop runs).
pub fn run(
    registry: &mut ClassRegistry,
    class_name: &str,
    method_name: &str,
    code: &Code,
    args: Vec<Operand>,
    sink: &mut dyn PrintSink,
) -> Result<Outcome, VmError> {
    let class_file = registry
        .get(class_name)
        .ok_or_else(|| {
            VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "class {class_name} is not loaded"
            )))
        })?
        .class_file
        .clone();

    let mut frame = Frame::new(code.max_stack, code.max_locals);
    for (i, arg) in args.into_iter().enumerate() {
        frame.set_local(i as u16, arg)?;
    }

    let mut reader = ClassReader::new(&code.code);

    loop {
        let pc = reader.position() as usize;
        match step(
            &mut frame,
            &mut reader,
            &class_file,
            registry,
            class_name,
            sink,
        ) {
            Ok(Some(outcome)) => return Ok(outcome),
            Ok(None) => continue,
            Err(mut err) => {
                err.diagnostic.pc = pc;
                err.diagnostic.class = Some(class_name.to_owned());
                err.diagnostic.method = Some(method_name.to_owned());
                err.diagnostic.operand_stack = frame.snapshot_stack();
                err.diagnostic.locals = frame.snapshot_locals();
                return Err(err);
            }
        }
    }
}

/// Executes exactly one instruction. `Ok(Some(outcome))` ends the frame,
/// `Ok(None)` means keep looping, `Err` is fatal with `diagnostic.opcode`
/// already filled in (the PC/class/method/stack/locals fields are filled
/// by the caller, `run`, which also knows the method this frame belongs to).
fn step(
    frame: &mut Frame,
    reader: &mut ClassReader,
    class_file: &ClassFile,
    registry: &mut ClassRegistry,
    class_name: &str,
    sink: &mut dyn PrintSink,
) -> Result<Option<Outcome>, VmError> {
    let pc_at_opcode = reader.position() as usize;
    let opcode_byte = reader.u1()?;
    let opcode = Opcode::decode(opcode_byte).map_err(|mut err| {
        err.diagnostic.opcode = Some(format!("0x{opcode_byte:02X} (unknown)"));
        err
    })?;
    log::trace!("pc={pc_at_opcode} op={}", opcode.mnemonic());

    execute(opcode, pc_at_opcode, frame, reader, class_file, registry, class_name, sink).map_err(|mut err| {
        err.diagnostic.opcode = Some(opcode.mnemonic().to_owned());
        err
    })
}

/// The opcode dispatch proper, split out from [`step`] so every exit from
/// the match (there are dozens of `?`-propagated ones) passes through one
/// place that stamps `diagnostic.opcode` before the error reaches `run`.
#[allow(clippy::too_many_arguments)]
fn execute(
    opcode: Opcode,
    pc_at_opcode: usize,
    frame: &mut Frame,
    reader: &mut ClassReader,
    class_file: &ClassFile,
    registry: &mut ClassRegistry,
    class_name: &str,
    sink: &mut dyn PrintSink,
) -> Result<Option<Outcome>, VmError> {
    use Opcode::*;
    match opcode {
        Nop => {}
        AconstNull => frame.push(Operand::Reference(Reference::Null))?,
        IconstM1 => frame.push(Operand::Int(-1))?,
        Iconst0 => frame.push(Operand::Int(0))?,
        Iconst1 => frame.push(Operand::Int(1))?,
        Iconst2 => frame.push(Operand::Int(2))?,
        Iconst3 => frame.push(Operand::Int(3))?,
        Iconst4 => frame.push(Operand::Int(4))?,
        Iconst5 => frame.push(Operand::Int(5))?,
        Lconst0 => frame.push(Operand::Long(0))?,
        Lconst1 => frame.push(Operand::Long(1))?,
        Fconst0 => frame.push(Operand::Float(0.0))?,
        Fconst1 => frame.push(Operand::Float(1.0))?,
        Fconst2 => frame.push(Operand::Float(2.0))?,
        Bipush => {
            let v = reader.i1()?;
            frame.push(Operand::Int(v as i32))?;
        }
        Sipush => {
            let v = reader.i2()?;
            frame.push(Operand::Int(v as i32))?;
        }
        Ldc => {
            let index = reader.u1()? as u16;
            let operand = load_constant(&class_file.constant_pool, index)?;
            frame.push(operand)?;
        }
        Iload => {
            let index = reader.u1()? as u16;
            frame.push(frame_local(frame, index, OperandType::Int)?)?;
        }
        Fload => {
            let index = reader.u1()? as u16;
            frame.push(frame_local(frame, index, OperandType::Float)?)?;
        }
        Aload => {
            let index = reader.u1()? as u16;
            frame.push(frame_local(frame, index, OperandType::Reference)?)?;
        }
        Iload0 => frame.push(frame_local(frame, 0, OperandType::Int)?)?,
        Iload1 => frame.push(frame_local(frame, 1, OperandType::Int)?)?,
        Iload2 => frame.push(frame_local(frame, 2, OperandType::Int)?)?,
        Iload3 => frame.push(frame_local(frame, 3, OperandType::Int)?)?,
        Fload0 => frame.push(frame_local(frame, 0, OperandType::Float)?)?,
        Fload1 => frame.push(frame_local(frame, 1, OperandType::Float)?)?,
        Fload2 => frame.push(frame_local(frame, 2, OperandType::Float)?)?,
        Fload3 => frame.push(frame_local(frame, 3, OperandType::Float)?)?,
        Aload0 => frame.push(frame_local(frame, 0, OperandType::Reference)?)?,
        Aload1 => frame.push(frame_local(frame, 1, OperandType::Reference)?)?,
        Aload2 => frame.push(frame_local(frame, 2, OperandType::Reference)?)?,
        Aload3 => frame.push(frame_local(frame, 3, OperandType::Reference)?)?,
        Iaload => {
            let value = array_load(frame)?;
            frame.push(value)?;
        }
        Istore => {
            let index = reader.u1()? as u16;
            let v = frame.pop_expected(OperandType::Int)?;
            frame.set_local(index, v)?;
        }
        Fstore => {
            let index = reader.u1()? as u16;
            let v = frame.pop_expected(OperandType::Float)?;
            frame.set_local(index, v)?;
        }
        Astore => {
            let index = reader.u1()? as u16;
            let v = frame.pop_expected(OperandType::Reference)?;
            frame.set_local(index, v)?;
        }
        Istore0 => {
            let v = frame.pop_expected(OperandType::Int)?;
            frame.set_local(0, v)?;
        }
        Istore1 => {
            let v = frame.pop_expected(OperandType::Int)?;
            frame.set_local(1, v)?;
        }
        Istore2 => {
            let v = frame.pop_expected(OperandType::Int)?;
            frame.set_local(2, v)?;
        }
        Istore3 => {
            let v = frame.pop_expected(OperandType::Int)?;
            frame.set_local(3, v)?;
        }
        Fstore0 => {
            let v = frame.pop_expected(OperandType::Float)?;
            frame.set_local(0, v)?;
        }
        Fstore1 => {
            let v = frame.pop_expected(OperandType::Float)?;
            frame.set_local(1, v)?;
        }
        Fstore2 => {
            let v = frame.pop_expected(OperandType::Float)?;
            frame.set_local(2, v)?;
        }
        Fstore3 => {
            let v = frame.pop_expected(OperandType::Float)?;
            frame.set_local(3, v)?;
        }
        Astore1 => {
            let v = frame.pop_expected(OperandType::Reference)?;
            frame.set_local(1, v)?;
        }
        Iastore => array_store(frame)?,
        Pop => {
            frame.pop()?;
        }
        Dup => {
            let top = frame.pop()?;
            if matches!(top, Operand::Long(_) | Operand::Double(_)) {
                return Err(VmError::without_diagnostic(VmErrorKind::TypeMismatch {
                    expected: OperandType::Int,
                    found: top.kind(),
                }));
            }
            frame.push(top.clone())?;
            frame.push(top)?;
        }
        Iadd => int_binop(frame, i32::wrapping_add)?,
        Isub => int_binop(frame, i32::wrapping_sub)?,
        Imul => int_binop(frame, i32::wrapping_mul)?,
        Idiv => {
            let b = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            let a = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            if b == 0 {
                return Err(VmError::without_diagnostic(VmErrorKind::DivideByZero));
            }
            frame.push(Operand::Int(a.wrapping_div(b)))?;
        }
        Fadd => float_binop(frame, |a, b| a + b)?,
        Fsub => float_binop(frame, |a, b| a - b)?,
        Fmul => float_binop(frame, |a, b| a * b)?,
        Fdiv => float_binop(frame, |a, b| a / b)?,
        Iinc => {
            let index = reader.u1()? as u16;
            let delta = reader.i1()? as i32;
            let current = frame.get_local(index)?;
            let current = current
                .as_int()
                .ok_or_else(|| VmError::without_diagnostic(VmErrorKind::TypeMismatch {
                    expected: OperandType::Int,
                    found: current.kind(),
                }))?;
            frame.set_local(index, Operand::Int(current.wrapping_add(delta)))?;
        }
        I2f => {
            let v = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            frame.push(Operand::Float(v as f32))?;
        }
        F2i => {
            let v = frame.pop_expected(OperandType::Float)?.as_float().unwrap();
            frame.push(Operand::Int(v as i32))?;
        }
        IfIcmpeq | IfIcmpne | IfIcmplt | IfIcmpge | IfIcmpgt | IfIcmple => {
            let offset = reader.i2()?;
            let v2 = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            let v1 = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            let taken = match opcode {
                IfIcmpeq => v1 == v2,
                IfIcmpne => v1 != v2,
                IfIcmplt => v1 < v2,
                IfIcmpge => v1 >= v2,
                IfIcmpgt => v1 > v2,
                IfIcmple => v1 <= v2,
                _ => unreachable!(),
            };
            if taken {
                branch_to(reader, pc_at_opcode, offset)?;
            }
        }
        Goto => {
            let offset = reader.i2()?;
            branch_to(reader, pc_at_opcode, offset)?;
        }
        Ireturn => return Ok(Some(Outcome::Returned(Some(frame.pop_expected(OperandType::Int)?)))),
        Freturn => return Ok(Some(Outcome::Returned(Some(frame.pop_expected(OperandType::Float)?)))),
        Lreturn => return Ok(Some(Outcome::Returned(Some(frame.pop_expected(OperandType::Long)?)))),
        Dreturn => return Ok(Some(Outcome::Returned(Some(frame.pop_expected(OperandType::Double)?)))),
        Areturn => return Ok(Some(Outcome::Returned(Some(frame.pop_expected(OperandType::Reference)?)))),
        Return => return Ok(Some(Outcome::Returned(None))),
        Getstatic => {
            let index = reader.u2()?;
            let (owner, field_name, _descriptor) = resolve_fieldref(&class_file.constant_pool, index)?;
            if owner == "java/lang/System" && field_name == "out" {
                frame.push(Operand::Reference(Reference::PrintStreamSentinel))?;
            } else {
                ensure_same_class(&owner, class_name)?;
                let value = registry.get_static(class_name, &field_name)?;
                frame.push(value)?;
            }
        }
        Putstatic => {
            let index = reader.u2()?;
            let (owner, field_name, _descriptor) = resolve_fieldref(&class_file.constant_pool, index)?;
            ensure_same_class(&owner, class_name)?;
            let value = frame.pop()?;
            registry.put_static(class_name, &field_name, value)?;
        }
        Invokestatic => {
            let index = reader.u2()?;
            let (owner, name, descriptor) = resolve_methodref(&class_file.constant_pool, index)?;
            ensure_same_class(&owner, class_name)?;
            let (arg_types, return_type) = parse_method_descriptor(&descriptor)?;
            let args = pop_args(frame, &arg_types)?;
            let method = class_file.find_method(&name, &descriptor).ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                    "static method {owner}.{name}{descriptor}"
                )))
            })?;
            let target_code = method.code().ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::UnsupportedHostCall(format!(
                    "{owner}.{name}{descriptor} has no Code attribute"
                )))
            })?;
            match run(registry, class_name, &name, target_code, args, sink)? {
                Outcome::Returned(Some(v)) if return_type != OperandType::Void => frame.push(v)?,
                Outcome::Returned(_) => {}
            }
        }
        Invokevirtual => {
            let index = reader.u2()?;
            let (owner, name, descriptor) = resolve_methodref(&class_file.constant_pool, index)?;
            if owner == "java/io/PrintStream" && (name == "print" || name == "println") {
                let arg = frame.pop()?;
                let receiver = frame.pop_expected(OperandType::Reference)?;
                if !matches!(receiver, Operand::Reference(Reference::PrintStreamSentinel)) {
                    return Err(VmError::without_diagnostic(VmErrorKind::UnsupportedHostCall(
                        "invokevirtual receiver is not System.out".to_owned(),
                    )));
                }
                let text = render_for_print(&arg, &class_file.constant_pool)?;
                if name == "println" {
                    sink.writeln(&text);
                } else {
                    sink.write(&text);
                }
            } else {
                return Err(VmError::without_diagnostic(VmErrorKind::UnsupportedHostCall(format!(
                    "invokevirtual {owner}.{name}{descriptor}"
                ))));
            }
        }
        Invokespecial => {
            let index = reader.u2()?;
            let (_owner, _name, descriptor) = resolve_methodref(&class_file.constant_pool, index)?;
            let (arg_types, _return_type) = parse_method_descriptor(&descriptor)?;
            for ty in arg_types.iter().rev() {
                frame.pop_expected(*ty)?;
            }
            frame.pop_expected(OperandType::Reference)?;
        }
        Invokedynamic => {
            let index = reader.u2()?;
            let _padding = reader.u2()?;
            match class_file.constant_pool.get(index as usize) {
                Some(ConstantPoolEntry::InvokeDynamic { bootstrap_method_attr_index, .. }) => {
                    let bootstrap = class_file.bootstrap_methods().and_then(|methods| {
                        methods.get(*bootstrap_method_attr_index as usize)
                    });
                    if bootstrap.is_none() {
                        return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(
                            "invokedynamic bootstrap method not found".to_owned(),
                        )));
                    }
                }
                _ => {
                    return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                        "pool index {index} is not an InvokeDynamic entry"
                    ))))
                }
            }
            return Err(VmError::without_diagnostic(VmErrorKind::UnsupportedHostCall(
                "invokedynamic execution is not implemented".to_owned(),
            )));
        }
        Newarray => {
            let atype = reader.u1()?;
            let array_type = ArrayType::from_atype(atype).ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::InvalidDescriptor(format!(
                    "unknown newarray atype {atype}"
                )))
            })?;
            let count = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
            if count < 0 {
                return Err(VmError::without_diagnostic(VmErrorKind::OutOfBoundsArrayAccess {
                    index: count,
                    length: 0,
                }));
            }
            let array = crate::operand::JvmArray::new(array_type, count as usize);
            frame.push(Operand::Reference(Reference::Array(std::rc::Rc::new(
                std::cell::RefCell::new(array),
            ))))?;
        }
        Arraylength => {
            let arrayref = frame.pop_expected(OperandType::Reference)?;
            let Operand::Reference(Reference::Array(array)) = &arrayref else {
                return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(
                    "arraylength on a non-array or null reference".to_owned(),
                )));
            };
            frame.push(Operand::Int(array.borrow().elements.len() as i32))?;
        }
    }

    Ok(None)
}

fn frame_local(frame: &Frame, index: u16, expected: OperandType) -> Result<Operand, VmError> {
    let value = frame.get_local(index)?;
    if value.kind() != expected {
        return Err(VmError::without_diagnostic(VmErrorKind::TypeMismatch {
            expected,
            found: value.kind(),
        }));
    }
    Ok(value.clone())
}

fn int_binop(frame: &mut Frame, op: fn(i32, i32) -> i32) -> Result<(), VmError> {
    let b = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
    let a = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
    frame.push(Operand::Int(op(a, b)))
}

fn float_binop(frame: &mut Frame, op: fn(f32, f32) -> f32) -> Result<(), VmError> {
    let b = frame.pop_expected(OperandType::Float)?.as_float().unwrap();
    let a = frame.pop_expected(OperandType::Float)?.as_float().unwrap();
    frame.push(Operand::Float(op(a, b)))
}

fn array_load(frame: &mut Frame) -> Result<Operand, VmError> {
    let index = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
    let arrayref = frame.pop_expected(OperandType::Reference)?;
    let Operand::Reference(Reference::Array(array)) = &arrayref else {
        return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(
            "iaload on a non-array or null reference".to_owned(),
        )));
    };
    let array = array.borrow();
    if array.element_type != ArrayType::Int {
        return Err(VmError::without_diagnostic(VmErrorKind::TypeMismatch {
            expected: OperandType::Int,
            found: OperandType::Int,
        }));
    }
    let elements = &array.elements;
    if index < 0 || index as usize >= elements.len() {
        return Err(VmError::without_diagnostic(VmErrorKind::OutOfBoundsArrayAccess {
            index,
            length: elements.len(),
        }));
    }
    Ok(elements[index as usize].clone())
}

fn array_store(frame: &mut Frame) -> Result<(), VmError> {
    let value = frame.pop_expected(OperandType::Int)?;
    let index = frame.pop_expected(OperandType::Int)?.as_int().unwrap();
    let arrayref = frame.pop_expected(OperandType::Reference)?;
    let Operand::Reference(Reference::Array(array)) = &arrayref else {
        return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(
            "iastore on a non-array or null reference".to_owned(),
        )));
    };
    let mut array = array.borrow_mut();
    let len = array.elements.len();
    if index < 0 || index as usize >= len {
        return Err(VmError::without_diagnostic(VmErrorKind::OutOfBoundsArrayAccess {
            index,
            length: len,
        }));
    }
    array.elements[index as usize] = value;
    Ok(())
}

fn branch_to(reader: &mut ClassReader, pc_at_opcode: usize, offset: i16) -> Result<(), VmError> {
    let target = pc_at_opcode as i64 + offset as i64;
    if target < 0 {
        return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "branch target {target} is negative"
        ))));
    }
    reader.seek_to(target as u64);
    Ok(())
}

fn load_constant(pool: &[ConstantPoolEntry], index: u16) -> Result<Operand, VmError> {
    match pool.get(index as usize) {
        Some(ConstantPoolEntry::String { string_index }) => {
            Ok(Operand::Reference(Reference::StringConst(*string_index)))
        }
        Some(ConstantPoolEntry::Integer(v)) => Ok(Operand::Int(*v)),
        Some(ConstantPoolEntry::Float(v)) => Ok(Operand::Float(*v)),
        other => Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "ldc of unsupported constant-pool entry {other:?} at index {index}"
        )))),
    }
}

fn utf8_of(pool: &[ConstantPoolEntry], index: u16) -> Result<String, VmError> {
    pool.get(index as usize)
        .and_then(ConstantPoolEntry::as_utf8)
        .map(str::to_owned)
        .ok_or_else(|| {
            VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "pool index {index} does not resolve to a Utf8 entry"
            )))
        })
}

fn class_name_of(pool: &[ConstantPoolEntry], class_index: u16) -> Result<String, VmError> {
    match pool.get(class_index as usize) {
        Some(ConstantPoolEntry::Class { name_index }) => utf8_of(pool, *name_index),
        other => Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "pool index {class_index} is not a Class entry, found {other:?}"
        )))),
    }
}

fn resolve_fieldref(pool: &[ConstantPoolEntry], index: u16) -> Result<(String, String, String), VmError> {
    match pool.get(index as usize) {
        Some(ConstantPoolEntry::Fieldref { class_index, name_and_type_index }) => {
            let owner = class_name_of(pool, *class_index)?;
            let (name, descriptor) = resolve_name_and_type(pool, *name_and_type_index)?;
            Ok((owner, name, descriptor))
        }
        other => Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "pool index {index} is not a Fieldref entry, found {other:?}"
        )))),
    }
}

fn resolve_methodref(pool: &[ConstantPoolEntry], index: u16) -> Result<(String, String, String), VmError> {
    match pool.get(index as usize) {
        Some(ConstantPoolEntry::Methodref { class_index, name_and_type_index })
        | Some(ConstantPoolEntry::InterfaceMethodref { class_index, name_and_type_index }) => {
            let owner = class_name_of(pool, *class_index)?;
            let (name, descriptor) = resolve_name_and_type(pool, *name_and_type_index)?;
            Ok((owner, name, descriptor))
        }
        other => Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "pool index {index} is not a Methodref entry, found {other:?}"
        )))),
    }
}

fn resolve_name_and_type(pool: &[ConstantPoolEntry], index: u16) -> Result<(String, String), VmError> {
    match pool.get(index as usize) {
        Some(ConstantPoolEntry::NameAndType { name_index, descriptor_index }) => {
            Ok((utf8_of(pool, *name_index)?, utf8_of(pool, *descriptor_index)?))
        }
        other => Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "pool index {index} is not a NameAndType entry, found {other:?}"
        )))),
    }
}

fn ensure_same_class(owner: &str, class_name: &str) -> Result<(), VmError> {
    if owner != class_name {
        return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
            "class {owner} is not loaded (only {class_name} was loaded for this run)"
        ))));
    }
    Ok(())
}

fn pop_args(frame: &mut Frame, arg_types: &[OperandType]) -> Result<Vec<Operand>, VmError> {
    let mut reversed = Vec::with_capacity(arg_types.len());
    for ty in arg_types.iter().rev() {
        reversed.push(frame.pop_expected(*ty)?);
    }
    reversed.reverse();
    Ok(reversed)
}

/// Renders an operand the way `java/io/PrintStream.print`/`println` would
/// (§4.I): strings decode from the pool, ints print as decimal, floats
/// round to 5 fractional digits with trailing zeros trimmed (Java's actual
/// `Float.toString` prints the shortest round-tripping decimal; this subset
/// approximates that by capping precision and dropping the padding rather
/// than reimplementing Grisu/Ryu).
fn render_for_print(value: &Operand, pool: &[ConstantPoolEntry]) -> Result<String, VmError> {
    Ok(match value {
        Operand::Int(v) => v.to_string(),
        Operand::Float(v) => format_float(*v),
        Operand::Reference(Reference::StringConst(index)) => utf8_of(pool, *index)?,
        other => {
            return Err(VmError::without_diagnostic(VmErrorKind::UnsupportedHostCall(format!(
                "PrintStream.print/println of {other}"
            ))))
        }
    })
}

fn format_float(v: f32) -> String {
    let rendered = format!("{v:.5}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting_trims_trailing_zeros() {
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(0.0), "0");
    }
}
