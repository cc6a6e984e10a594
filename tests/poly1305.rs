use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use proptest::prelude::*;
use purecrypt::Error;
use purecrypt::encryption::poly1305::{Poly1305, poly1305, xchacha20poly1305};

const RFC_KEY: &str = "85d6be7857556d337f4452fe42d506a80103808afb0db2fd4abff6af4149f51b";
const RFC_MESSAGE: &[u8] = b"Cryptographic Forum Research Group";
const RFC_TAG: &str = "a8061dc1305136c6c22b8baf0c0127a9";

fn rfc_key() -> [u8; 32] {
    hex::decode(RFC_KEY).unwrap().try_into().unwrap()
}

/// RFC 8439 §2.5.2.
#[test]
fn poly1305_rfc8439() {
    assert_eq!(hex::encode(poly1305(&rfc_key(), RFC_MESSAGE)), RFC_TAG);
}

#[test]
fn poly1305_incremental_rfc8439() {
    let mut mac = Poly1305::new(&rfc_key());
    for piece in RFC_MESSAGE.chunks(5) {
        mac.update(piece);
    }
    assert_eq!(hex::encode(mac.finalize()), RFC_TAG);
}

#[test]
fn aead_round_trip() {
    let key = [1u8; 32];
    let nonce = [2u8; 24];

    let sealed = xchacha20poly1305::encrypt(&key, &nonce, b"attack at dawn", b"v1");
    assert_eq!(sealed.len(), 14 + xchacha20poly1305::ABYTES);

    let opened = xchacha20poly1305::decrypt(&key, &nonce, &sealed, b"v1").unwrap();
    assert_eq!(opened, b"attack at dawn");
}

#[test]
fn aead_rejects_tampering() {
    let key = [1u8; 32];
    let nonce = [2u8; 24];
    let sealed = xchacha20poly1305::encrypt(&key, &nonce, b"attack at dawn", b"v1");

    for i in 0..sealed.len() {
        let mut forged = sealed.clone();
        forged[i] ^= 0x80;
        assert_eq!(
            xchacha20poly1305::decrypt(&key, &nonce, &forged, b"v1"),
            Err(Error::AuthenticationFailure)
        );
    }

    assert_eq!(
        xchacha20poly1305::decrypt(&key, &nonce, &sealed, b"v2"),
        Err(Error::AuthenticationFailure)
    );
}

#[test]
fn aead_rejects_short_input() {
    assert!(matches!(
        xchacha20poly1305::decrypt(&[0u8; 32], &[0u8; 24], &[0u8; 15], b""),
        Err(Error::Format(_))
    ));
}

proptest! {
    #[test]
    fn aead_matches_reference_crate(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
        message in proptest::collection::vec(any::<u8>(), 0..200),
        ad in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let reference = XChaCha20Poly1305::new_from_slice(&key)
            .unwrap()
            .encrypt(XNonce::from_slice(&nonce), Payload { msg: &message, aad: &ad })
            .unwrap();

        let ours = xchacha20poly1305::encrypt(&key, &nonce, &message, &ad);
        prop_assert_eq!(&ours, &reference);
        prop_assert_eq!(xchacha20poly1305::decrypt(&key, &nonce, &ours, &ad).unwrap(), message);
    }
}
