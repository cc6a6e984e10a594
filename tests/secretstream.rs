use proptest::prelude::*;
use purecrypt::Error;
use purecrypt::encryption::secretstream::{self, ABYTES, HEADER_BYTES, Tag};
use purecrypt::rng::Csprng;
use rand::SeedableRng;

fn open() -> (
    secretstream::SecretStreamState,
    secretstream::SecretStreamState,
) {
    let mut rng = Csprng::from_seed([0x5eu8; 32]);
    let key = secretstream::keygen(&mut rng);
    let (tx, header) = secretstream::init_push(&key, &mut rng);
    let rx = secretstream::init_pull(&key, &header);
    (tx, rx)
}

#[test]
fn multi_chunk_round_trip() {
    let (mut tx, mut rx) = open();

    let chunks: [(&[u8], Tag); 4] = [
        (b"first chunk", Tag::Message),
        (b"", Tag::Push),
        (b"after the push", Tag::Rekey),
        (b"the end", Tag::Final),
    ];

    let sealed: Vec<Vec<u8>> = chunks
        .iter()
        .map(|(m, tag)| tx.push(m, b"", *tag).unwrap())
        .collect();

    for ((message, tag), ciphertext) in chunks.iter().zip(&sealed) {
        assert_eq!(ciphertext.len(), message.len() + ABYTES);

        let (opened, opened_tag) = rx.pull(ciphertext, b"").unwrap();
        assert_eq!(&opened[..], *message);
        assert_eq!(opened_tag, *tag);
    }
}

fn fixed_key_and_header() -> ([u8; 32], [u8; HEADER_BYTES]) {
    let mut key = [0u8; 32];
    let mut header = [0u8; HEADER_BYTES];
    for (i, b) in key.iter_mut().enumerate() {
        *b = i as u8;
    }
    for (i, b) in header.iter_mut().enumerate() {
        *b = 0x64 + i as u8;
    }
    (key, header)
}

// Chunks produced by libsodium's crypto_secretstream_xchacha20poly1305_push
// from key 00..1f and header 64..7b.
const LIBSODIUM_CHUNKS: [(&[u8], &[u8], Tag, &str); 5] = [
    (
        b"first chunk",
        b"",
        Tag::Message,
        "5f3a73c4351a33d554bba72be0f24e61f4263be74e208b4c6fa48d7c",
    ),
    (b"", b"", Tag::Push, "4c3664181d12a402cf28807ec0c7b04f71"),
    (
        b"after the push",
        b"header-ad",
        Tag::Rekey,
        "281448c1e88f9a42799d35eaf372e92404ac4056600219ff5b8fe685abdb2b",
    ),
    (
        b"0123456789abcdef0123",
        b"",
        Tag::Message,
        "8fbb8bc588a8ec0d5fb68cdcf54f79ffb176b80d182eb8f57bd857ddee37abfeef84c430a1",
    ),
    (
        b"the end",
        b"",
        Tag::Final,
        "257217107ea543430229c878b603042b9cc14967a4a86ca5",
    ),
];

#[test]
fn push_matches_libsodium() {
    let (key, header) = fixed_key_and_header();
    let mut tx = secretstream::init_pull(&key, &header);

    for (message, ad, tag, expected) in LIBSODIUM_CHUNKS {
        let chunk = tx.push(message, ad, tag).unwrap();
        assert_eq!(hex::encode(chunk), expected);
    }
}

#[test]
fn pull_reads_libsodium_chunks() {
    let (key, header) = fixed_key_and_header();
    let mut rx = secretstream::init_pull(&key, &header);

    for (message, ad, tag, chunk) in LIBSODIUM_CHUNKS {
        let (opened, opened_tag) = rx.pull(&hex::decode(chunk).unwrap(), ad).unwrap();
        assert_eq!(opened, message);
        assert_eq!(opened_tag, tag);
    }
}

#[test]
fn explicit_rekey_matches_libsodium() {
    let (key, header) = fixed_key_and_header();
    let mut tx = secretstream::init_pull(&key, &header);
    tx.rekey();

    let chunk = tx.push(b"abc", b"", Tag::Message).unwrap();
    assert_eq!(hex::encode(chunk), "6ff5bf92b6b899fd968bdb631552a3d211555d9b");
}

#[test]
fn header_has_the_documented_size() {
    let mut rng = Csprng::from_seed([1u8; 32]);
    let (_, header) = secretstream::init_push(&[0u8; 32], &mut rng);
    assert_eq!(header.len(), HEADER_BYTES);
}

#[test]
fn every_ciphertext_bit_is_authenticated() {
    let (mut tx, _) = open();
    let sealed = tx.push(b"integrity", b"ad", Tag::Message).unwrap();

    for byte in 0..sealed.len() {
        for bit in 0..8 {
            let (_, mut rx) = open();
            let mut forged = sealed.clone();
            forged[byte] ^= 1 << bit;

            assert_eq!(rx.pull(&forged, b"ad"), Err(Error::AuthenticationFailure));
        }
    }
}

#[test]
fn associated_data_is_authenticated() {
    let (mut tx, mut rx) = open();
    let sealed = tx.push(b"payload", b"context-a", Tag::Message).unwrap();

    assert_eq!(
        rx.pull(&sealed, b"context-b"),
        Err(Error::AuthenticationFailure)
    );
    assert_eq!(rx.pull(&sealed, b"").map(|(m, _)| m), Err(Error::AuthenticationFailure));

    // The failed attempts left the receiver where it was.
    let (message, tag) = rx.pull(&sealed, b"context-a").unwrap();
    assert_eq!(message, b"payload");
    assert_eq!(tag, Tag::Message);
}

#[test]
fn reordered_chunks_fail() {
    let (mut tx, mut rx) = open();
    let first = tx.push(b"one", b"", Tag::Message).unwrap();
    let second = tx.push(b"two", b"", Tag::Message).unwrap();

    assert_eq!(rx.pull(&second, b""), Err(Error::AuthenticationFailure));
    assert!(rx.pull(&first, b"").is_ok());
    assert!(rx.pull(&second, b"").is_ok());
}

#[test]
fn replayed_chunk_fails() {
    let (mut tx, mut rx) = open();
    let chunk = tx.push(b"once", b"", Tag::Message).unwrap();

    assert!(rx.pull(&chunk, b"").is_ok());
    assert_eq!(rx.pull(&chunk, b""), Err(Error::AuthenticationFailure));
}

#[test]
fn truncated_chunk_is_a_format_error() {
    let (_, mut rx) = open();
    for len in 0..ABYTES {
        assert!(matches!(rx.pull(&vec![0u8; len], b""), Err(Error::Format(_))));
    }
}

#[test]
fn explicit_rekey_must_happen_on_both_sides() {
    let (mut tx, mut rx) = open();

    tx.rekey();
    let chunk = tx.push(b"after rekey", b"", Tag::Message).unwrap();
    assert_eq!(rx.pull(&chunk, b""), Err(Error::AuthenticationFailure));

    rx.rekey();
    let (message, _) = rx.pull(&chunk, b"").unwrap();
    assert_eq!(message, b"after rekey");
}

#[test]
fn same_message_encrypts_differently_per_position() {
    let (mut tx, _) = open();
    let a = tx.push(b"repeat", b"", Tag::Message).unwrap();
    let b = tx.push(b"repeat", b"", Tag::Message).unwrap();
    assert_ne!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_streams_round_trip(
        messages in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..200), 1..8),
        ad in proptest::collection::vec(any::<u8>(), 0..32),
        rekey_every in 1usize..4,
    ) {
        let (mut tx, mut rx) = open();

        for (i, message) in messages.iter().enumerate() {
            let tag = if i + 1 == messages.len() {
                Tag::Final
            } else if i % rekey_every == 0 {
                Tag::Rekey
            } else {
                Tag::Message
            };

            let chunk = tx.push(message, &ad, tag).unwrap();
            let (opened, opened_tag) = rx.pull(&chunk, &ad).unwrap();

            prop_assert_eq!(&opened, message);
            prop_assert_eq!(opened_tag, tag);
        }
    }
}
