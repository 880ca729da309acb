use std::fmt;

use jloader::errors::LoadError;

use crate::operand::OperandType;

/// The full error-kind taxonomy this VM's error handling design uses (§7).
/// `MalformedClassFile` carries the loader's own cause so a fault discovered
/// while reading the class file keeps its original detail.
#[derive(Debug)]
pub enum VmErrorKind {
    MalformedClassFile(LoadError),
    UnsupportedAttribute(String),
    UnsupportedOpcode(u8),
    StackUnderflow,
    TypeMismatch { expected: OperandType, found: OperandType },
    DivideByZero,
    OutOfBoundsArrayAccess { index: i32, length: usize },
    UnresolvedSymbol(String),
    UnsupportedHostCall(String),
    InvalidDescriptor(String),
    ClassInitFailure(String),
}

impl fmt::Display for VmErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmErrorKind::MalformedClassFile(e) => write!(f, "malformed class file: {e}"),
            VmErrorKind::UnsupportedAttribute(name) => write!(f, "unsupported attribute: {name}"),
            VmErrorKind::UnsupportedOpcode(op) => write!(f, "unsupported opcode: 0x{op:02X}"),
            VmErrorKind::StackUnderflow => write!(f, "operand stack underflow"),
            VmErrorKind::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            VmErrorKind::DivideByZero => write!(f, "divide by zero"),
            VmErrorKind::OutOfBoundsArrayAccess { index, length } => {
                write!(f, "array index {index} out of bounds for length {length}")
            }
            VmErrorKind::UnresolvedSymbol(sym) => write!(f, "unresolved symbol: {sym}"),
            VmErrorKind::UnsupportedHostCall(call) => write!(f, "unsupported host call: {call}"),
            VmErrorKind::InvalidDescriptor(desc) => write!(f, "invalid descriptor: {desc}"),
            VmErrorKind::ClassInitFailure(class) => write!(f, "class initialization failed: {class}"),
        }
    }
}

/// A frame-level snapshot taken at the point of failure, so the outer entry
/// point can print the required PC/opcode/stack/locals diagnostic
/// without re-deriving it from a (by-then-unwound) frame.
#[derive(Debug, Default)]
pub struct Diagnostic {
    pub pc: usize,
    pub opcode: Option<String>,
    pub class: Option<String>,
    pub method: Option<String>,
    pub operand_stack: Vec<String>,
    pub locals: Vec<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  at pc={}", self.pc)?;
        if let Some(op) = &self.opcode {
            writeln!(f, "  opcode: {op}")?;
        }
        if let (Some(class), Some(method)) = (&self.class, &self.method) {
            writeln!(f, "  in: {class}.{method}")?;
        }
        writeln!(f, "  operand_stack: [{}]", self.operand_stack.join(", "))?;
        write!(f, "  locals: [{}]", self.locals.join(", "))
    }
}

#[derive(Debug)]
pub struct VmError {
    pub kind: VmErrorKind,
    pub diagnostic: Diagnostic,
}

impl VmError {
    pub fn new(kind: VmErrorKind, diagnostic: Diagnostic) -> Self {
        log::error!("{kind} (pc={})", diagnostic.pc);
        Self { kind, diagnostic }
    }

    pub fn without_diagnostic(kind: VmErrorKind) -> Self {
        log::error!("{kind}");
        Self {
            kind,
            diagnostic: Diagnostic::default(),
        }
    }
}

impl From<LoadError> for VmError {
    fn from(e: LoadError) -> Self {
        VmError::without_diagnostic(VmErrorKind::MalformedClassFile(e))
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for VmError {}
