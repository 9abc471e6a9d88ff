use alloy::primitives::{Address, Bytes, TxKind, U256};
use revm::{
    db::{CacheDB, EmptyDB},
    primitives::{
        AccountInfo, Address as RevmAddress, Bytes as RevmBytes, ExecutionResult, Output, SpecId,
        TxKind as RevmTxKind, KECCAK_EMPTY, U256 as RevmU256,
    },
    Database, Evm,
};
use tracing::{debug, error};

use crate::error::CheckError;

/// Gas limit used when a caller does not pick one
pub const SANDBOX_GAS_LIMIT: u64 = 30_000_000;

/// Result of one sandboxed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub gas_used: u64,
    /// Return or revert data; runtime code for a successful create
    pub output: Bytes,
    /// Address of the contract a successful create left behind
    pub created: Option<Address>,
}

/// In-process EVM for running fixture bytecode without a node
///
/// State persists across transactions. Gas is free (zero gas price and base
/// fee), so balances only move by the value transferred.
pub struct Sandbox {
    evm: Evm<'static, (), CacheDB<EmptyDB>>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Create an empty Cancun-rules sandbox
    pub fn new() -> Self {
        let evm = Evm::builder()
            .with_db(CacheDB::new(EmptyDB::default()))
            .with_spec_id(SpecId::CANCUN)
            .build();
        Self { evm }
    }

    /// Give a fresh account a balance
    pub fn fund(&mut self, address: Address, balance: U256) {
        self.evm
            .db_mut()
            .insert_account_info(convert_address(address), AccountInfo::from_balance(convert_u256(balance)));
    }

    /// Run a contract creation
    pub fn deploy(
        &mut self,
        caller: Address,
        init_code: Bytes,
        value: U256,
        gas_limit: u64,
    ) -> Result<Outcome, CheckError> {
        self.transact(caller, TxKind::Create, init_code, value, gas_limit)
    }

    /// Run a message call and commit its state changes
    pub fn call(
        &mut self,
        caller: Address,
        to: Address,
        input: Bytes,
        value: U256,
    ) -> Result<Outcome, CheckError> {
        self.transact(caller, TxKind::Call(to), input, value, SANDBOX_GAS_LIMIT)
    }

    pub fn balance(&mut self, address: Address) -> U256 {
        self.account(address)
            .map(|info| U256::from_be_bytes(info.balance.to_be_bytes::<32>()))
            .unwrap_or_default()
    }

    /// Runtime code at an address, empty for accounts without code
    pub fn code(&mut self, address: Address) -> Bytes {
        let Some(info) = self.account(address) else {
            return Bytes::new();
        };
        if let Some(code) = info.code.filter(|code| !code.is_empty()) {
            return Bytes::from(code.original_bytes().to_vec());
        }
        if info.code_hash == KECCAK_EMPTY {
            return Bytes::new();
        }
        match self.evm.db_mut().code_by_hash(info.code_hash) {
            Ok(code) => Bytes::from(code.original_bytes().to_vec()),
            Err(never) => match never {},
        }
    }

    pub fn storage(&mut self, address: Address, slot: U256) -> U256 {
        match self
            .evm
            .db_mut()
            .storage(convert_address(address), convert_u256(slot))
        {
            Ok(value) => U256::from_be_bytes(value.to_be_bytes::<32>()),
            Err(never) => match never {},
        }
    }

    fn account(&mut self, address: Address) -> Option<AccountInfo> {
        match self.evm.db_mut().basic(convert_address(address)) {
            Ok(info) => info,
            Err(never) => match never {},
        }
    }

    fn transact(
        &mut self,
        caller: Address,
        kind: TxKind,
        data: Bytes,
        value: U256,
        gas_limit: u64,
    ) -> Result<Outcome, CheckError> {
        let tx = self.evm.tx_mut();
        tx.caller = convert_address(caller);
        tx.transact_to = match kind {
            TxKind::Create => RevmTxKind::Create,
            TxKind::Call(to) => RevmTxKind::Call(convert_address(to)),
        };
        tx.data = RevmBytes::from(data.to_vec());
        tx.value = convert_u256(value);
        tx.gas_limit = gas_limit;
        tx.gas_price = RevmU256::ZERO;
        tx.gas_priority_fee = None;
        tx.nonce = None;
        debug!(?kind, %value, gas_limit, "Running sandbox transaction");

        let result = self.evm.transact_commit().map_err(|e| {
            error!("Sandbox transaction failed: {:?}", e);
            CheckError::Sandbox(format!("{e:?}"))
        })?;

        let outcome = match result {
            ExecutionResult::Success { gas_used, output, .. } => match output {
                Output::Create(code, created) => Outcome {
                    success: true,
                    gas_used,
                    output: Bytes::from(code.to_vec()),
                    created: created.map(|address| Address::from_slice(address.as_slice())),
                },
                Output::Call(data) => Outcome {
                    success: true,
                    gas_used,
                    output: Bytes::from(data.to_vec()),
                    created: None,
                },
            },
            ExecutionResult::Revert { gas_used, output } => {
                debug!(gas_used, "Sandbox transaction reverted");
                Outcome {
                    success: false,
                    gas_used,
                    output: Bytes::from(output.to_vec()),
                    created: None,
                }
            }
            ExecutionResult::Halt { reason, gas_used } => {
                debug!(?reason, gas_used, "Sandbox transaction halted");
                Outcome {
                    success: false,
                    gas_used,
                    output: Bytes::new(),
                    created: None,
                }
            }
        };
        Ok(outcome)
    }
}

/// Convert an Alloy Address to a REVM Address
fn convert_address(address: Address) -> RevmAddress {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(address.as_slice());
    RevmAddress::from(bytes)
}

/// Convert an Alloy U256 to a REVM U256
fn convert_u256(value: U256) -> RevmU256 {
    let bytes = value.to_be_bytes::<32>();
    RevmU256::from_be_bytes(bytes)
}
