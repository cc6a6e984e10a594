use purecrypt::Error;
use purecrypt::hash::{blake2b, blake2b_long, sha256};

#[test]
fn sha256_abc() {
    assert_eq!(
        hex::encode(sha256(b"abc")),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_empty() {
    assert_eq!(
        hex::encode(sha256(b"")),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn blake2b_512_abc() {
    assert_eq!(
        hex::encode(blake2b(64, b"abc").unwrap()),
        "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1\
         7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
    );
}

#[test]
fn blake2b_rejects_out_of_range_lengths() {
    assert!(matches!(blake2b(0, b"abc"), Err(Error::InvalidParameter(_))));
    assert!(matches!(blake2b(65, b"abc"), Err(Error::InvalidParameter(_))));
}

#[test]
fn blake2b_long_rejects_empty_output() {
    assert!(matches!(blake2b_long(0, b"abc"), Err(Error::InvalidParameter(_))));
    assert_eq!(blake2b_long(1, b"abc").unwrap().len(), 1);
}

#[test]
fn blake2b_long_short_outputs_prefix_the_length() {
    // For T <= 64, H'(X) = BLAKE2b-T(LE32(T) || X).
    let mut prefixed = 32u32.to_le_bytes().to_vec();
    prefixed.extend_from_slice(b"input");

    assert_eq!(
        blake2b_long(32, b"input").unwrap(),
        blake2b(32, &prefixed).unwrap()
    );
}

#[test]
fn blake2b_long_chains_for_long_outputs() {
    for len in [65usize, 96, 97, 128, 1024] {
        let out = blake2b_long(len, b"chained").unwrap();
        assert_eq!(out.len(), len);

        let mut prefixed = (len as u32).to_le_bytes().to_vec();
        prefixed.extend_from_slice(b"chained");
        let v1 = blake2b(64, &prefixed).unwrap();
        assert_eq!(out[..32], v1[..32]);
    }
}
