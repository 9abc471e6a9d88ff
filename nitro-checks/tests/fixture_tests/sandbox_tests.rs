//! Every fixture contract behaves as the scenarios expect, checked in the
//! in-process EVM

use crate::{caller, caller_funds};

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use nitro_checks::{
    fixtures::{
        self, CreateTwo, ECRecover, NitroTest, StorageSpam, CREATE_TWO_CHILD_INIT_CODE,
        CREATE_TWO_CHILD_RUNTIME,
    },
    sandbox::{Sandbox, SANDBOX_GAS_LIMIT},
    signature::{sign_probe, PROBE_MESSAGE},
};

/// Fresh sandbox with a funded caller and `init_code` deployed
fn deployed(init_code: Bytes) -> (Sandbox, Address) {
    let mut sandbox = Sandbox::new();
    sandbox.fund(caller(), caller_funds());
    let outcome = sandbox
        .deploy(caller(), init_code, U256::ZERO, SANDBOX_GAS_LIMIT)
        .unwrap();
    assert!(outcome.success, "deployment failed: {outcome:?}");
    let address = outcome.created.expect("create returned no address");
    (sandbox, address)
}

#[test]
fn test_nitro_test_deploys_its_runtime() {
    let init_code = fixtures::nitro_test().unwrap();
    let (mut sandbox, contract) = deployed(init_code.clone());

    // Everything after the 13-byte wrapper is runtime
    assert_eq!(sandbox.code(contract), Bytes::copy_from_slice(&init_code[13..]));
}

#[test]
fn test_nitro_test_foo_increments_counter() {
    let (mut sandbox, contract) = deployed(fixtures::nitro_test().unwrap());

    for expected in 1..=2u64 {
        let outcome = sandbox
            .call(caller(), contract, NitroTest::fooCall {}.abi_encode().into(), U256::ZERO)
            .unwrap();
        assert!(outcome.success);
        assert_eq!(sandbox.storage(contract, U256::ZERO), U256::from(expected));
    }

    let outcome = sandbox
        .call(caller(), contract, NitroTest::counterCall {}.abi_encode().into(), U256::ZERO)
        .unwrap();
    assert!(outcome.success);
    let counter = NitroTest::counterCall::abi_decode_returns(&outcome.output, true)
        .unwrap()
        .value;
    assert_eq!(counter, U256::from(2));
}

#[test]
fn test_unknown_selector_reverts() {
    let (mut sandbox, contract) = deployed(fixtures::nitro_test().unwrap());

    let outcome = sandbox
        .call(caller(), contract, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]), U256::ZERO)
        .unwrap();
    assert!(!outcome.success);

    let outcome = sandbox.call(caller(), contract, Bytes::new(), U256::ZERO).unwrap();
    assert!(!outcome.success);
}

#[test]
fn test_suicide_to_forwards_value_and_leaves_nothing() {
    let mut sandbox = Sandbox::new();
    sandbox.fund(caller(), caller_funds());
    let target = Address::repeat_byte(0x77);
    assert_eq!(sandbox.balance(target), U256::ZERO);

    let outcome = sandbox
        .deploy(
            caller(),
            fixtures::suicide_to(target).unwrap(),
            U256::from(1337),
            SANDBOX_GAS_LIMIT,
        )
        .unwrap();
    assert!(outcome.success, "deployment failed: {outcome:?}");

    assert_eq!(sandbox.balance(target), U256::from(1337));
    assert_eq!(sandbox.balance(caller()), caller_funds() - U256::from(1337));
    if let Some(contract) = outcome.created {
        assert_eq!(sandbox.balance(contract), U256::ZERO);
        assert!(sandbox.code(contract).is_empty());
    }
}

#[test]
fn test_create_two_deploys_child_at_create2_address() {
    let (mut sandbox, factory) = deployed(fixtures::create_two().unwrap());
    let salt = fixtures::format_bytes32_string("salt").unwrap();
    let expected = factory.create2_from_code(salt, CREATE_TWO_CHILD_INIT_CODE);

    let outcome = sandbox
        .call(caller(), factory, CreateTwo::create2Call { salt }.abi_encode().into(), U256::ZERO)
        .unwrap();
    assert!(outcome.success, "create2 failed: {outcome:?}");
    let child = CreateTwo::create2Call::abi_decode_returns(&outcome.output, true)
        .unwrap()
        .child;
    assert_eq!(child, expected);
    assert_eq!(sandbox.code(child), Bytes::from_static(&CREATE_TWO_CHILD_RUNTIME));

    // Same salt again collides and the factory reverts
    let outcome = sandbox
        .call(caller(), factory, CreateTwo::create2Call { salt }.abi_encode().into(), U256::ZERO)
        .unwrap();
    assert!(!outcome.success);
}

#[test]
fn test_storage_spam_writes_count_into_each_slot() {
    let (mut sandbox, contract) = deployed(fixtures::storage_spam().unwrap());
    let count = U256::from(12);

    let outcome = sandbox
        .call(caller(), contract, StorageSpam::spamCall { count }.abi_encode().into(), U256::ZERO)
        .unwrap();
    assert!(outcome.success);

    for slot in 0..12u64 {
        assert_eq!(sandbox.storage(contract, U256::from(slot)), count, "slot {slot}");
    }
    assert_eq!(sandbox.storage(contract, U256::from(12)), U256::ZERO);
}

#[test]
fn test_storage_spam_gas_grows_with_count() {
    let (mut sandbox, contract) = deployed(fixtures::storage_spam().unwrap());

    let small = sandbox
        .call(
            caller(),
            contract,
            StorageSpam::spamCall { count: U256::from(1) }.abi_encode().into(),
            U256::ZERO,
        )
        .unwrap();
    let (mut sandbox, contract) = deployed(fixtures::storage_spam().unwrap());
    let large = sandbox
        .call(
            caller(),
            contract,
            StorageSpam::spamCall { count: U256::from(20) }.abi_encode().into(),
            U256::ZERO,
        )
        .unwrap();

    // Each fresh slot costs at least a cold SSTORE
    assert!(large.gas_used >= small.gas_used + 19 * 20_000);
}

#[test]
fn test_ec_recover_returns_signer() {
    let (mut sandbox, contract) = deployed(fixtures::ec_recover().unwrap());
    let signer = PrivateKeySigner::random();
    let probe = sign_probe(&signer, &PROBE_MESSAGE).unwrap();

    let recover = |sandbox: &mut Sandbox, hash: B256| {
        let input = ECRecover::recoverCall {
            hash,
            v: probe.v,
            r: probe.r,
            s: probe.s,
        }
        .abi_encode();
        let outcome = sandbox.call(caller(), contract, input.into(), U256::ZERO).unwrap();
        assert!(outcome.success);
        ECRecover::recoverCall::abi_decode_returns(&outcome.output, true)
            .unwrap()
            .signer
    };

    assert_eq!(recover(&mut sandbox, probe.hash), signer.address());
    assert_ne!(recover(&mut sandbox, B256::repeat_byte(0x01)), signer.address());
}

#[test]
fn test_malformed_init_code_burns_gas_limit_and_refunds_value() {
    let mut sandbox = Sandbox::new();
    sandbox.fund(caller(), caller_funds());
    let gas_limit = 1_000_000;

    let outcome = sandbox
        .deploy(caller(), fixtures::malformed_init_code(), U256::from(1), gas_limit)
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.gas_used, gas_limit);
    assert_eq!(outcome.created, None);
    // Gas is free in the sandbox, so only a kept value would show up here
    assert_eq!(sandbox.balance(caller()), caller_funds());
}
