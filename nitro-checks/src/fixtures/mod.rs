//! Helper contracts deployed by the scenarios
//!
//! ABIs are declared with `sol!`; bytecode is assembled here so the fixtures
//! need no compiler toolchain.

pub mod asm;

use alloy::{
    primitives::{Address, Bytes, B256},
    sol,
    sol_types::{SolCall, SolValue},
};
use revm::interpreter::opcode;

use crate::error::CheckError;
use asm::{wrap_runtime, Assembler};

sol! {
    /// Counter with a single mutating entry point.
    contract NitroTest {
        function foo() external;
        function counter() external view returns (uint256 value);
    }

    /// Deploys a fixed child with CREATE2 and returns its address.
    contract CreateTwo {
        function create2(bytes32 salt) external returns (address child);
    }

    /// Writes `count` to storage slots `0..count`.
    contract StorageSpam {
        function spam(uint256 count) external;
    }

    /// Thin wrapper over the ecrecover precompile.
    contract ECRecover {
        function recover(bytes32 hash, uint8 v, bytes32 r, bytes32 s) external view returns (address signer);
    }
}

/// Init code of the contract `CreateTwo` deploys: returns one zero byte
pub const CREATE_TWO_CHILD_INIT_CODE: [u8; 5] =
    [opcode::PUSH1, 0x01, opcode::PUSH1, 0x00, opcode::RETURN];

/// Runtime code left at the CREATE2 address
pub const CREATE_TWO_CHILD_RUNTIME: [u8; 1] = [opcode::STOP];

/// Init code that fails on its first instruction (`ADD` on an empty stack)
pub fn malformed_init_code() -> Bytes {
    Bytes::from_static(&[opcode::ADD])
}

/// `NitroTest` init code
pub fn nitro_test() -> Result<Bytes, CheckError> {
    let mut asm = Assembler::new();
    asm.dispatch(&[
        (NitroTest::fooCall::SELECTOR, "foo"),
        (NitroTest::counterCall::SELECTOR, "counter"),
    ]);

    // slot0 += 1
    asm.label("foo")
        .push_u64(0)
        .op(opcode::SLOAD)
        .push_u64(1)
        .op(opcode::ADD)
        .push_u64(0)
        .op(opcode::SSTORE)
        .op(opcode::STOP);

    asm.label("counter")
        .push_u64(0)
        .op(opcode::SLOAD)
        .push_u64(0)
        .op(opcode::MSTORE)
        .push_u64(0x20)
        .push_u64(0)
        .op(opcode::RETURN);

    wrap_runtime(&asm.finish()?)
}

/// `SuicideTo(target)` init code with its constructor argument appended
///
/// The constructor reads `target` from the last 32 bytes of its own code and
/// self-destructs to it, forwarding the deployment value.
pub fn suicide_to(target: Address) -> Result<Bytes, CheckError> {
    let mut asm = Assembler::new();
    asm.push_u64(0x20)
        .push_u64(0x20)
        .op(opcode::CODESIZE)
        .op(opcode::SUB)
        .push_u64(0)
        .op(opcode::CODECOPY)
        .push_u64(0)
        .op(opcode::MLOAD)
        .op(opcode::SELFDESTRUCT);

    let mut code = asm.finish()?.to_vec();
    code.extend_from_slice(&target.abi_encode());
    Ok(Bytes::from(code))
}

/// `CreateTwo` init code
pub fn create_two() -> Result<Bytes, CheckError> {
    let mut asm = Assembler::new();
    asm.dispatch(&[(CreateTwo::create2Call::SELECTOR, "create2")]);

    asm.label("create2")
        .push_u64(4)
        .op(opcode::CALLDATALOAD)
        // child init code lands in memory[27..32]
        .push(&CREATE_TWO_CHILD_INIT_CODE)
        .push_u64(0)
        .op(opcode::MSTORE)
        .push_u64(CREATE_TWO_CHILD_INIT_CODE.len() as u64)
        .push_u64(32 - CREATE_TWO_CHILD_INIT_CODE.len() as u64)
        .push_u64(0)
        .op(opcode::CREATE2)
        .op(opcode::DUP1)
        .op(opcode::ISZERO)
        .push_label("failed")
        .op(opcode::JUMPI)
        .push_u64(0)
        .op(opcode::MSTORE)
        .push_u64(0x20)
        .push_u64(0)
        .op(opcode::RETURN);

    asm.label("failed").revert_empty();

    wrap_runtime(&asm.finish()?)
}

/// `StorageSpam` init code
pub fn storage_spam() -> Result<Bytes, CheckError> {
    let mut asm = Assembler::new();
    asm.dispatch(&[(StorageSpam::spamCall::SELECTOR, "spam")]);

    // stack: [count, i]
    asm.label("spam")
        .push_u64(4)
        .op(opcode::CALLDATALOAD)
        .push_u64(0);
    asm.label("loop")
        .op(opcode::DUP2)
        .op(opcode::DUP2)
        .op(opcode::LT)
        .op(opcode::ISZERO)
        .push_label("done")
        .op(opcode::JUMPI)
        .op(opcode::DUP2)
        .op(opcode::DUP2)
        .op(opcode::SSTORE)
        .push_u64(1)
        .op(opcode::ADD)
        .push_label("loop")
        .op(opcode::JUMP);
    asm.label("done").op(opcode::STOP);

    wrap_runtime(&asm.finish()?)
}

/// `ECRecover` init code
pub fn ec_recover() -> Result<Bytes, CheckError> {
    let mut asm = Assembler::new();
    asm.dispatch(&[(ECRecover::recoverCall::SELECTOR, "recover")]);

    // The (hash, v, r, s) arguments are laid out exactly as the precompile
    // expects, so they are copied straight into memory[0..0x80].
    asm.label("recover")
        .push_u64(0x80)
        .push_u64(4)
        .push_u64(0)
        .op(opcode::CALLDATACOPY)
        .push_u64(0x20)
        .push_u64(0x80)
        .push_u64(0x80)
        .push_u64(0)
        .push_u64(1)
        .op(opcode::GAS)
        .op(opcode::STATICCALL)
        .op(opcode::ISZERO)
        .push_label("failed")
        .op(opcode::JUMPI)
        .push_u64(0x20)
        .push_u64(0x80)
        .op(opcode::RETURN);

    asm.label("failed").revert_empty();

    wrap_runtime(&asm.finish()?)
}

/// ethers' `formatBytes32String`: UTF-8 bytes, zero padded, at most 31 long
pub fn format_bytes32_string(text: &str) -> Result<B256, CheckError> {
    let bytes = text.as_bytes();
    if bytes.len() > 31 {
        return Err(CheckError::Fixture(format!(
            "bytes32 string `{text}` is longer than 31 bytes"
        )));
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(word))
}
