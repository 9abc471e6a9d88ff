//! Minimal EVM assembler for the fixture contracts
//!
//! Jump targets are symbolic labels resolved in [`Assembler::finish`]. Label
//! references always use a two-byte push so code offsets never shift.

use std::collections::HashMap;

use alloy::primitives::Bytes;
use revm::interpreter::opcode;

use crate::error::CheckError;

/// Length of the init-code prefix emitted by [`wrap_runtime`]
const WRAPPER_LEN: usize = 13;

#[derive(Debug, Default)]
pub struct Assembler {
    code: Vec<u8>,
    labels: HashMap<&'static str, usize>,
    references: Vec<(usize, &'static str)>,
    errors: Vec<String>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single opcode
    pub fn op(&mut self, byte: u8) -> &mut Self {
        self.code.push(byte);
        self
    }

    /// Append several opcodes
    pub fn ops(&mut self, bytes: &[u8]) -> &mut Self {
        self.code.extend_from_slice(bytes);
        self
    }

    /// Push a big-endian value using the narrowest `PUSHn`
    ///
    /// Zero is pushed as `PUSH1 0x00` so the code runs on pre-Shanghai nodes.
    pub fn push(&mut self, value: &[u8]) -> &mut Self {
        let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
        let trimmed = &value[start..];
        match trimmed.len() {
            0 => self.ops(&[opcode::PUSH1, 0x00]),
            len @ 1..=32 => {
                self.code.push(opcode::PUSH1 + (len as u8 - 1));
                self.code.extend_from_slice(trimmed);
                self
            }
            len => {
                self.errors.push(format!("push of {len} bytes exceeds PUSH32"));
                self
            }
        }
    }

    pub fn push_u64(&mut self, value: u64) -> &mut Self {
        self.push(&value.to_be_bytes())
    }

    /// Push a fixed two-byte value
    pub fn push2(&mut self, value: u16) -> &mut Self {
        self.code.push(opcode::PUSH2);
        self.code.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Push the offset of `label`, resolved later
    pub fn push_label(&mut self, label: &'static str) -> &mut Self {
        self.code.push(opcode::PUSH2);
        self.references.push((self.code.len(), label));
        self.code.extend_from_slice(&[0, 0]);
        self
    }

    /// Mark the current offset as `label` and emit its `JUMPDEST`
    pub fn label(&mut self, label: &'static str) -> &mut Self {
        if self.labels.insert(label, self.code.len()).is_some() {
            self.errors.push(format!("label `{label}` defined twice"));
        }
        self.op(opcode::JUMPDEST)
    }

    /// Route on the 4-byte function selector, reverting on anything unknown
    ///
    /// Each target label is entered with the selector still on the stack.
    pub fn dispatch(&mut self, routes: &[([u8; 4], &'static str)]) -> &mut Self {
        self.push_u64(0)
            .op(opcode::CALLDATALOAD)
            .push_u64(0xe0)
            .op(opcode::SHR);
        for &(selector, label) in routes {
            self.op(opcode::DUP1)
                .push(&selector)
                .op(opcode::EQ)
                .push_label(label)
                .op(opcode::JUMPI);
        }
        self.revert_empty()
    }

    /// `revert(0, 0)`
    pub fn revert_empty(&mut self) -> &mut Self {
        self.push_u64(0).op(opcode::DUP1).op(opcode::REVERT)
    }

    /// Current code length
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Resolve labels and return the finished bytecode
    pub fn finish(&self) -> Result<Bytes, CheckError> {
        if let Some(first) = self.errors.first() {
            return Err(CheckError::Fixture(first.clone()));
        }
        let mut code = self.code.clone();
        for (position, label) in &self.references {
            let target = self
                .labels
                .get(label)
                .ok_or_else(|| CheckError::Fixture(format!("unknown label `{label}`")))?;
            let target = u16::try_from(*target)
                .map_err(|_| CheckError::Fixture(format!("label `{label}` out of PUSH2 range")))?;
            code[*position..*position + 2].copy_from_slice(&target.to_be_bytes());
        }
        Ok(Bytes::from(code))
    }
}

/// Build init code that deploys `runtime` unchanged
///
/// The prefix copies everything after itself into memory and returns it.
pub fn wrap_runtime(runtime: &[u8]) -> Result<Bytes, CheckError> {
    let len = u16::try_from(runtime.len())
        .map_err(|_| CheckError::Fixture(format!("runtime of {} bytes is too large", runtime.len())))?;

    let mut asm = Assembler::new();
    asm.push2(len)
        .op(opcode::DUP1)
        .push2(WRAPPER_LEN as u16)
        .push_u64(0)
        .op(opcode::CODECOPY)
        .push_u64(0)
        .op(opcode::RETURN);
    if asm.len() != WRAPPER_LEN {
        return Err(CheckError::Fixture(format!(
            "init prefix is {} bytes, expected {WRAPPER_LEN}",
            asm.len()
        )));
    }
    asm.ops(runtime);
    asm.finish()
}
