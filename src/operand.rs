use std::cell::RefCell;
use std::rc::Rc;

/// The closed set of operand kinds from the data model (§3). `Object` and
/// `ReturnAddr` exist for completeness with the full operand type lattice; this
/// subset's opcodes only ever produce `ReturnAddr` implicitly (it has no
/// surface syntax here) and treat `Object` as synonymous with `Reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    Object,
    Int,
    Long,
    Float,
    Double,
    Reference,
    ReturnAddr,
    Void,
}

impl std::fmt::Display for OperandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperandType::Object => "OBJECT",
            OperandType::Int => "INT",
            OperandType::Long => "LONG",
            OperandType::Float => "FLOAT",
            OperandType::Double => "DOUBLE",
            OperandType::Reference => "REFERENCE",
            OperandType::ReturnAddr => "RETURN_ADDR",
            OperandType::Void => "VOID",
        };
        write!(f, "{name}")
    }
}

/// The element type of a `newarray`-allocated array, one case per JVMS §6.5
/// `newarray` atype code (Table 6.5.newarray-A). This subset only requires
/// `Int`, but the remaining codes cost nothing extra once the array is
/// atype-polymorphic, so all eight are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    Boolean,
    Char,
    Float,
    Double,
    Byte,
    Short,
    Int,
    Long,
}

impl ArrayType {
    pub fn from_atype(atype: u8) -> Option<ArrayType> {
        Some(match atype {
            4 => ArrayType::Boolean,
            5 => ArrayType::Char,
            6 => ArrayType::Float,
            7 => ArrayType::Double,
            8 => ArrayType::Byte,
            9 => ArrayType::Short,
            10 => ArrayType::Int,
            11 => ArrayType::Long,
            _ => return None,
        })
    }

    pub fn default_value(self) -> Operand {
        match self {
            ArrayType::Float => Operand::Float(0.0),
            ArrayType::Double => Operand::Double(0.0),
            ArrayType::Long => Operand::Long(0),
            ArrayType::Boolean | ArrayType::Char | ArrayType::Byte | ArrayType::Short | ArrayType::Int => {
                Operand::Int(0)
            }
        }
    }
}

/// A runtime array cell. Shared via `Rc<RefCell<_>>` so that a `Reference`
/// operand copied onto several stacks still observes the same storage, and
/// never freed mid-run per the §5 arena/heap discipline.
#[derive(Debug)]
pub struct JvmArray {
    pub element_type: ArrayType,
    pub elements: Vec<Operand>,
}

impl JvmArray {
    pub fn new(element_type: ArrayType, length: usize) -> Self {
        Self {
            element_type,
            elements: vec![element_type.default_value(); length],
        }
    }
}

/// A `REFERENCE` operand's payload: the null reference, a stable pool index
/// (for strings resolved lazily on use, per the Design Notes' "keep a stable
/// pool index rather than a raw reference"), a runtime array, or the
/// `System.out` print-sink sentinel.
#[derive(Debug, Clone)]
pub enum Reference {
    Null,
    StringConst(u16),
    Array(Rc<RefCell<JvmArray>>),
    PrintStreamSentinel,
}

/// A tagged operand-stack/local-variable value (§3 `Operand`).
#[derive(Debug, Clone)]
pub enum Operand {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Reference(Reference),
}

impl Operand {
    pub fn kind(&self) -> OperandType {
        match self {
            Operand::Int(_) => OperandType::Int,
            Operand::Long(_) => OperandType::Long,
            Operand::Float(_) => OperandType::Float,
            Operand::Double(_) => OperandType::Double,
            Operand::Reference(_) => OperandType::Reference,
        }
    }

    pub fn default_for(kind: OperandType) -> Operand {
        match kind {
            OperandType::Int => Operand::Int(0),
            OperandType::Long => Operand::Long(0),
            OperandType::Float => Operand::Float(0.0),
            OperandType::Double => Operand::Double(0.0),
            OperandType::Reference | OperandType::Object => Operand::Reference(Reference::Null),
            OperandType::ReturnAddr => Operand::Int(0),
            OperandType::Void => Operand::Reference(Reference::Null),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Operand::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Operand::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Operand::Reference(r) => Some(r),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Int(v) => write!(f, "int({v})"),
            Operand::Long(v) => write!(f, "long({v})"),
            Operand::Float(v) => write!(f, "float({v})"),
            Operand::Double(v) => write!(f, "double({v})"),
            Operand::Reference(Reference::Null) => write!(f, "null"),
            Operand::Reference(Reference::StringConst(i)) => write!(f, "string#{i}"),
            Operand::Reference(Reference::Array(a)) => {
                write!(f, "array[{}]", a.borrow().elements.len())
            }
            Operand::Reference(Reference::PrintStreamSentinel) => write!(f, "System.out"),
        }
    }
}
