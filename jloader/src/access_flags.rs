/// Class-level access flags, JVMS §4.1 Table 4.1-A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ClassAccessFlag {
    Public = 0x0001,
    Final = 0x0010,
    Super = 0x0020,
    Interface = 0x0200,
    Abstract = 0x0400,
    Synthetic = 0x1000,
    Annotation = 0x2000,
    Enum = 0x4000,
}

impl ClassAccessFlag {
    const ALL: [ClassAccessFlag; 8] = [
        Self::Public,
        Self::Final,
        Self::Super,
        Self::Interface,
        Self::Abstract,
        Self::Synthetic,
        Self::Annotation,
        Self::Enum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Public => "ACC_PUBLIC",
            Self::Final => "ACC_FINAL",
            Self::Super => "ACC_SUPER",
            Self::Interface => "ACC_INTERFACE",
            Self::Abstract => "ACC_ABSTRACT",
            Self::Synthetic => "ACC_SYNTHETIC",
            Self::Annotation => "ACC_ANNOTATION",
            Self::Enum => "ACC_ENUM",
        }
    }

    pub fn from_bitmask(value: u16) -> Vec<ClassAccessFlag> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }
}

/// Method-level access flags, JVMS §4.6 Table 4.6-A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MethodAccessFlag {
    Public = 0x0001,
    Private = 0x0002,
    Protected = 0x0004,
    Static = 0x0008,
    Final = 0x0010,
    Synchronized = 0x0020,
    Bridge = 0x0040,
    Varargs = 0x0080,
    Native = 0x0100,
    Abstract = 0x0400,
    Strict = 0x0800,
    Synthetic = 0x1000,
}

impl MethodAccessFlag {
    const ALL: [MethodAccessFlag; 12] = [
        Self::Public,
        Self::Private,
        Self::Protected,
        Self::Static,
        Self::Final,
        Self::Synchronized,
        Self::Bridge,
        Self::Varargs,
        Self::Native,
        Self::Abstract,
        Self::Strict,
        Self::Synthetic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Public => "ACC_PUBLIC",
            Self::Private => "ACC_PRIVATE",
            Self::Protected => "ACC_PROTECTED",
            Self::Static => "ACC_STATIC",
            Self::Final => "ACC_FINAL",
            Self::Synchronized => "ACC_SYNCHRONIZED",
            Self::Bridge => "ACC_BRIDGE",
            Self::Varargs => "ACC_VARARGS",
            Self::Native => "ACC_NATIVE",
            Self::Abstract => "ACC_ABSTRACT",
            Self::Strict => "ACC_STRICT",
            Self::Synthetic => "ACC_SYNTHETIC",
        }
    }

    pub fn is_static(self) -> bool {
        matches!(self, Self::Static)
    }

    pub fn from_bitmask(value: u16) -> Vec<MethodAccessFlag> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }
}

/// Field-level access flags, JVMS §4.5 Table 4.5-A. Only the subset this VM
/// surfaces (the class/method tables cover the rest of §6's flag table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldAccessFlag {
    Public = 0x0001,
    Private = 0x0002,
    Protected = 0x0004,
    Static = 0x0008,
    Final = 0x0010,
    Volatile = 0x0040,
    Transient = 0x0080,
    Synthetic = 0x1000,
    Enum = 0x4000,
}

impl FieldAccessFlag {
    const ALL: [FieldAccessFlag; 9] = [
        Self::Public,
        Self::Private,
        Self::Protected,
        Self::Static,
        Self::Final,
        Self::Volatile,
        Self::Transient,
        Self::Synthetic,
        Self::Enum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Public => "ACC_PUBLIC",
            Self::Private => "ACC_PRIVATE",
            Self::Protected => "ACC_PROTECTED",
            Self::Static => "ACC_STATIC",
            Self::Final => "ACC_FINAL",
            Self::Volatile => "ACC_VOLATILE",
            Self::Transient => "ACC_TRANSIENT",
            Self::Synthetic => "ACC_SYNTHETIC",
            Self::Enum => "ACC_ENUM",
        }
    }

    pub fn is_static(self) -> bool {
        matches!(self, Self::Static)
    }

    pub fn from_bitmask(value: u16) -> Vec<FieldAccessFlag> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }
}
