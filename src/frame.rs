use crate::errors::{VmError, VmErrorKind};
use crate::operand::{Operand, OperandType};

/// A per-invocation activation record (§3 `Frame`, §4.G): a bounded operand
/// stack and a fixed-length local-variable array. Created per method
/// invocation and destroyed on return; never shared across frames.
pub struct Frame {
    operand_stack: Vec<Operand>,
    max_stack: usize,
    locals: Vec<Option<Operand>>,
}

impl Frame {
    pub fn new(max_stack: u16, max_locals: u16) -> Self {
        Self {
            operand_stack: Vec::with_capacity(max_stack as usize),
            max_stack: max_stack as usize,
            locals: vec![None; max_locals as usize],
        }
    }

    pub fn push(&mut self, op: Operand) -> Result<(), VmError> {
        if self.operand_stack.len() >= self.max_stack {
            return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "operand stack overflow: pushing past max_stack={}",
                self.max_stack
            ))));
        }
        self.operand_stack.push(op);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Operand, VmError> {
        self.operand_stack
            .pop()
            .ok_or_else(|| VmError::without_diagnostic(VmErrorKind::StackUnderflow))
    }

    pub fn pop_expected(&mut self, expected: OperandType) -> Result<Operand, VmError> {
        let op = self.pop()?;
        if op.kind() != expected {
            return Err(VmError::without_diagnostic(VmErrorKind::TypeMismatch {
                expected,
                found: op.kind(),
            }));
        }
        Ok(op)
    }

    pub fn depth(&self) -> usize {
        self.operand_stack.len()
    }

    pub fn get_local(&self, index: u16) -> Result<&Operand, VmError> {
        self.locals
            .get(index as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                    "local variable {index} is not addressable"
                )))
            })
    }

    pub fn set_local(&mut self, index: u16, value: Operand) -> Result<(), VmError> {
        let slot = self.locals.get_mut(index as usize).ok_or_else(|| {
            VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "local variable index {index} out of [0, max_locals) range"
            )))
        })?;
        *slot = Some(value);
        Ok(())
    }

    pub fn snapshot_stack(&self) -> Vec<String> {
        self.operand_stack.iter().map(ToString::to_string).collect()
    }

    pub fn snapshot_locals(&self) -> Vec<String> {
        self.locals
            .iter()
            .map(|slot| slot.as_ref().map(ToString::to_string).unwrap_or_else(|| "<empty>".to_string()))
            .collect()
    }
}
