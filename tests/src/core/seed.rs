use armor_core::Seed;
use rand::RngCore;

#[test]
fn test_deterministic_rng() {
    let seed = Seed::from_hex("0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")
        .unwrap();

    let mut rng1 = seed.create_deterministic_rng();
    let mut rng2 = seed.create_deterministic_rng();

    assert_eq!(rng1.next_u32(), rng2.next_u32());
    assert_eq!(rng1.next_u64(), rng2.next_u64());
}

#[test]
fn test_integer_and_hex_forms_agree() {
    let from_integer = Seed::from_integer(0x0102);
    let hex = from_integer.to_hex();
    assert!(hex.starts_with("0x0201"));

    let parsed: Seed = hex.parse().unwrap();
    assert_eq!(parsed, from_integer);
    assert_eq!(
        parsed.create_deterministic_rng().next_u64(),
        from_integer.create_deterministic_rng().next_u64()
    );
}

#[test]
fn test_hash_deterministic() {
    let seed: Seed = "1337".parse().unwrap();
    assert_eq!(seed.hash(), seed.hash());

    let hash_hex = seed.hash_hex();
    assert!(hash_hex.starts_with("0x"));
    assert_eq!(hash_hex.len(), 66);
}

#[test]
fn test_different_seeds_different_rngs() {
    let mut rng1 = Seed::from_integer(1).create_deterministic_rng();
    let mut rng2 = Seed::from_integer(2).create_deterministic_rng();
    assert_ne!(rng1.next_u64(), rng2.next_u64());
}
