//! EIP-191 message signing for the ecrecover checks

use alloy::{
    primitives::{eip191_hash_message, Address, B256},
    signers::{local::PrivateKeySigner, SignerSync},
};

use crate::error::CheckError;

/// Message signed in the ecrecover check, ethers' `arrayify(0x1234567890)`
pub const PROBE_MESSAGE: [u8; 5] = [0x12, 0x34, 0x56, 0x78, 0x90];

/// A signed message split into the arguments `ecrecover` takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    /// EIP-191 hash of the message
    pub hash: B256,
    /// Recovery id as 27 or 28
    pub v: u8,
    pub r: B256,
    pub s: B256,
    /// Signer recovered off-chain from the message and signature
    pub recovered: Address,
}

/// Sign `message` with EIP-191 and split the signature like ethers'
/// `splitSignature`
pub fn sign_probe(signer: &PrivateKeySigner, message: &[u8]) -> Result<SplitSignature, CheckError> {
    let signature = signer
        .sign_message_sync(message)
        .map_err(|e| CheckError::Signer(e.to_string()))?;
    let recovered = signature
        .recover_address_from_msg(message)
        .map_err(|e| CheckError::Signer(e.to_string()))?;

    // r || s || v, with v already normalized to 27/28
    let raw = signature.as_bytes();
    Ok(SplitSignature {
        hash: eip191_hash_message(message),
        v: raw[64],
        r: B256::from_slice(&raw[..32]),
        s: B256::from_slice(&raw[32..64]),
        recovered,
    })
}
