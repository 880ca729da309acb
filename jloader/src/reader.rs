use std::io::Cursor;

use byteorder::{ReadBytesExt, BE};

use crate::errors::{LoadCause, LoadError};

/// Cursor over a `.class` file's bytes with the big-endian primitive reads the format
/// uses throughout. Reading past the end is always fatal, never a short read.
pub struct ClassReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ClassReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    fn eof(&self, wanted: usize) -> LoadError {
        let remaining = self.remaining();
        LoadError::new(
            LoadCause::UnexpectedEof { wanted, remaining },
            format!("wanted {wanted} bytes, {remaining} remaining"),
        )
    }

    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        (len - self.cursor.position().min(len)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn seek_to(&mut self, pos: u64) {
        self.cursor.set_position(pos);
    }

    pub fn u1(&mut self) -> Result<u8, LoadError> {
        self.cursor.read_u8().map_err(|_| self.eof(1))
    }

    pub fn i1(&mut self) -> Result<i8, LoadError> {
        self.cursor.read_i8().map_err(|_| self.eof(1))
    }

    pub fn u2(&mut self) -> Result<u16, LoadError> {
        self.cursor.read_u16::<BE>().map_err(|_| self.eof(2))
    }

    pub fn i2(&mut self) -> Result<i16, LoadError> {
        self.cursor.read_i16::<BE>().map_err(|_| self.eof(2))
    }

    pub fn u4(&mut self) -> Result<u32, LoadError> {
        self.cursor.read_u32::<BE>().map_err(|_| self.eof(4))
    }

    pub fn i4(&mut self) -> Result<i32, LoadError> {
        self.cursor.read_i32::<BE>().map_err(|_| self.eof(4))
    }

    pub fn f4(&mut self) -> Result<f32, LoadError> {
        self.cursor.read_f32::<BE>().map_err(|_| self.eof(4))
    }

    pub fn f8(&mut self) -> Result<f64, LoadError> {
        self.cursor.read_f64::<BE>().map_err(|_| self.eof(8))
    }

    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, LoadError> {
        if self.remaining() < n {
            return Err(self.eof(n));
        }
        let mut buf = vec![0u8; n];
        std::io::Read::read_exact(&mut self.cursor, &mut buf).map_err(|_| self.eof(n))?;
        Ok(buf)
    }
}
