use crate::CallerIdentity;

const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

#[test]
fn identity_is_hex_sha256_of_secret() {
    let identity = CallerIdentity::from_secret("abc");

    assert_eq!(&*identity, ABC_SHA256);
    assert_eq!(identity.len(), CallerIdentity::LEN);
    assert_eq!(identity.to_string(), ABC_SHA256);
}

#[test]
fn same_secret_same_identity() {
    assert_eq!(
        CallerIdentity::from_secret("key-1"),
        CallerIdentity::from_secret("key-1")
    );
    assert_ne!(
        CallerIdentity::from_secret("key-1"),
        CallerIdentity::from_secret("key-2")
    );
}

#[test]
fn debug_shows_only_a_prefix() {
    let identity = CallerIdentity::from_secret("abc");

    assert_eq!(identity.short(), "ba7816bf8f01cfea");
    assert_eq!(format!("{identity:?}"), "CallerIdentity(ba7816bf8f01cfea...)");
}

#[test]
fn fingerprint_round_trip_requires_lowercase_hex() {
    assert_eq!(
        CallerIdentity::from_fingerprint(ABC_SHA256),
        Some(CallerIdentity::from_secret("abc"))
    );

    assert_eq!(CallerIdentity::from_fingerprint(&ABC_SHA256.to_uppercase()), None);
    assert_eq!(CallerIdentity::from_fingerprint(&ABC_SHA256[..63]), None);
    assert_eq!(CallerIdentity::from_fingerprint("abc"), None);
}
