use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use proptest::prelude::*;
use purecrypt::encryption::chacha20::{XChaCha20, block, hchacha20, xor_with_keystream};

fn sequential_key() -> [u8; 32] {
    core::array::from_fn(|i| i as u8)
}

/// RFC 8439 §2.3.2.
#[test]
fn chacha20_block_rfc8439() {
    let nonce: [u8; 12] = hex::decode("000000090000004a00000000").unwrap().try_into().unwrap();

    assert_eq!(
        hex::encode(block(&sequential_key(), 1, &nonce)),
        "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
         d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e"
    );
}

/// draft-irtf-cfrg-xchacha §2.2.1.
#[test]
fn hchacha20_draft_vector() {
    let nonce: [u8; 16] = hex::decode("000000090000004a0000000031415927")
        .unwrap()
        .try_into()
        .unwrap();

    assert_eq!(
        hex::encode(hchacha20(&sequential_key(), &nonce)),
        "82413b4227b27bfed30e42508a877d73a0f9e4d58a74a853c12ec41326d3ecdc"
    );
}

#[test]
fn keystream_matches_reference_aead_body() {
    let key = [0x42u8; 32];
    let nonce = [0x24u8; 24];
    let message = b"XChaCha20 under an HChaCha20 subkey, starting at block one.";

    let reference = XChaCha20Poly1305::new_from_slice(&key)
        .unwrap()
        .encrypt(XNonce::from_slice(&nonce), &message[..])
        .unwrap();

    let ours = xor_with_keystream(&key, &nonce, message, 1);
    assert_eq!(ours[..], reference[..message.len()]);
}

#[test]
fn processed_bytes_counts_every_call() {
    let mut session = XChaCha20::new(&[1u8; 32], &[2u8; 24], 0);
    session.xor_with_keystream(&[0u8; 7]);
    session.xor_with_keystream(&[]);
    session.xor_with_keystream(&[0u8; 130]);

    assert_eq!(session.processed_bytes(), 137);
}

#[test]
fn applying_twice_restores_plaintext() {
    let key = [9u8; 32];
    let nonce = [8u8; 24];
    let message = b"stream ciphers are their own inverse".to_vec();

    let ciphertext = xor_with_keystream(&key, &nonce, &message, 0);
    assert_ne!(ciphertext, message);

    let mut session = XChaCha20::new(&key, &nonce, 0);
    let mut buffer = ciphertext.clone();
    session.apply_keystream(&mut buffer);
    assert_eq!(buffer, message);
}

proptest! {
    #[test]
    fn split_points_do_not_change_output(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
        message in proptest::collection::vec(any::<u8>(), 0..400),
        cuts in proptest::collection::vec(0usize..400, 0..6),
    ) {
        let whole = xor_with_keystream(&key, &nonce, &message, 0);

        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(message.len())).collect();
        cuts.sort_unstable();

        let mut session = XChaCha20::new(&key, &nonce, 0);
        let mut pieces = Vec::new();
        let mut start = 0;
        for cut in cuts.into_iter().chain(core::iter::once(message.len())) {
            pieces.extend(session.xor_with_keystream(&message[start..cut]));
            start = cut;
        }

        prop_assert_eq!(pieces, whole);
    }
}

#[test]
fn aead_payload_with_associated_data_matches_reference() {
    use purecrypt::encryption::poly1305::xchacha20poly1305;

    let key = [7u8; 32];
    let nonce = [3u8; 24];

    let reference = XChaCha20Poly1305::new_from_slice(&key)
        .unwrap()
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: b"payload",
                aad: b"header",
            },
        )
        .unwrap();

    assert_eq!(
        xchacha20poly1305::encrypt(&key, &nonce, b"payload", b"header"),
        reference
    );
}
