use std::fmt;

/// Everything that can go wrong while turning raw bytes into a [`crate::class_file::ClassFile`].
#[derive(Debug)]
pub enum LoadCause {
    UnexpectedEof { wanted: usize, remaining: usize },
    InvalidMagic(u32),
    UnknownConstantTag(u8),
    UnknownAttribute(String),
    InvalidDescriptor(String),
    TrailingBytes(usize),
    InvalidPoolIndex { index: u16, pool_len: usize },
    WrongPoolEntryKind { index: u16, expected: &'static str },
    InvalidReferenceKind(u8),
    MissingBootstrapMethods,
}

#[derive(Debug)]
pub struct LoadError {
    pub cause: LoadCause,
    pub msg: String,
}

impl LoadError {
    pub fn new(cause: LoadCause, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        log::error!("{cause:?}: {msg}");
        Self { cause, msg }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.cause, self.msg)
    }
}

impl std::error::Error for LoadError {}
