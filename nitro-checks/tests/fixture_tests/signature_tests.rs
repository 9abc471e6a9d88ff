use alloy::{primitives::eip191_hash_message, signers::local::PrivateKeySigner};
use nitro_checks::signature::{sign_probe, PROBE_MESSAGE};

#[test]
fn test_probe_signature_splits_like_ethers() {
    let signer = PrivateKeySigner::random();
    let split = sign_probe(&signer, &PROBE_MESSAGE).unwrap();

    assert!(split.v == 27 || split.v == 28, "unexpected v {}", split.v);
    assert_eq!(split.hash, eip191_hash_message(PROBE_MESSAGE));
    assert_eq!(split.recovered, signer.address());
}

#[test]
fn test_different_messages_hash_differently() {
    let signer = PrivateKeySigner::random();
    let a = sign_probe(&signer, &PROBE_MESSAGE).unwrap();
    let b = sign_probe(&signer, b"another message").unwrap();

    assert_ne!(a.hash, b.hash);
    assert_eq!(b.recovered, signer.address());
}
