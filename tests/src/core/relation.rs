use armor_core::{ConstraintSystem, Relation, RelationKind, Secret};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every kind, instantiated on random operands of random secrets, holds on
/// those bytes and agrees with its own predicate.
#[test]
fn test_catalog_relations_hold_on_their_secret() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let bytes: Vec<u8> = (0..6).map(|_| rng.random()).collect();
        let kind = RelationKind::random(&mut rng, 3).unwrap();
        let operands: Vec<usize> = rand::seq::index::sample(&mut rng, bytes.len(), kind.arity())
            .into_vec();
        let relation = Relation::instantiate(kind, operands, &bytes).unwrap();

        assert!(relation.holds(&bytes), "{relation}");
        assert!(relation.predicate().holds(&bytes), "{relation}");

        let other: Vec<u8> = (0..6).map(|_| rng.random()).collect();
        assert_eq!(relation.holds(&other), relation.predicate().holds(&other));
    }
}

#[test]
fn test_systems_survive_json() {
    let secret: Secret = "CTF{flag}".parse().unwrap();
    let mut system = ConstraintSystem::for_secret(&secret);
    for (kind, operands) in [
        (RelationKind::Shift { amount: 3 }, vec![0, 8]),
        (RelationKind::Scale { factor: 45 }, vec![4]),
        (RelationKind::TripleSum, vec![1, 2, 3]),
    ] {
        system
            .push(Relation::instantiate(kind, operands, secret.as_bytes()).unwrap())
            .unwrap();
    }

    let json = serde_json::to_string(&system).unwrap();
    assert!(json.contains("\"shift\""));
    let restored: ConstraintSystem = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, system);
    assert!(restored.holds(secret.as_bytes()));
}

#[test]
fn test_json_rejects_bad_arity() {
    let json = r#"{"size":2,"relations":[{"kind":"xor","operands":[0],"constant":1}]}"#;
    assert!(serde_json::from_str::<ConstraintSystem>(json).is_err());
}
