use kelcore::{
    error::Error,
    prefix::{Prefix, SeedPrefix},
    signer::Signer,
};

// Vectors from RFC 8032 section 7.1.

#[test]
fn rfc8032_test_1() -> Result<(), Error> {
    let seed =
        hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60").unwrap();
    let expected_public =
        hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a").unwrap();
    let expected_signature = hex::decode(
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
         5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
    )
    .unwrap();

    let signer = Signer::from_seed(SeedPrefix::RandomSeed256Ed25519(seed), true)?;
    let key = signer.public_key()?;
    assert_eq!(key.derivative(), expected_public.as_slice());

    let signature = signer.sign(b"")?;
    assert_eq!(signature.signature(), expected_signature.as_slice());
    assert!(key.verify(b"", &signature)?);
    Ok(())
}

#[test]
fn rfc8032_test_2() -> Result<(), Error> {
    let seed =
        hex::decode("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb").unwrap();
    let expected_public =
        hex::decode("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c").unwrap();
    let expected_signature = hex::decode(
        "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
         085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00",
    )
    .unwrap();

    let signer = Signer::from_seed(SeedPrefix::RandomSeed256Ed25519(seed), true)?;
    let key = signer.public_key()?;
    assert_eq!(key.derivative(), expected_public.as_slice());

    let message = [0x72u8];
    let signature = signer.sign(&message)?;
    assert_eq!(signature.signature(), expected_signature.as_slice());
    assert!(key.verify(&message, &signature)?);
    Ok(())
}
