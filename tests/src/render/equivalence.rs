use super::eval::{evaluate, Semantics};
use armor_core::{ConstraintSystem, Relation, RelationKind};
use armor_render::Flavor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_system(rng: &mut StdRng, size: usize) -> (ConstraintSystem, Vec<u8>) {
    let bytes: Vec<u8> = (0..size).map(|_| rng.random()).collect();
    let mut system = ConstraintSystem::new(size);
    for _ in 0..8 {
        let kind = RelationKind::random(rng, 3).unwrap();
        let operands = rand::seq::index::sample(rng, size, kind.arity()).into_vec();
        system
            .push(Relation::instantiate(kind, operands, &bytes).unwrap())
            .unwrap();
    }
    (system, bytes)
}

/// The C predicate, the Python assertions and direct evaluation accept
/// exactly the same assignments.
#[test]
fn test_flavors_agree_with_evaluation() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..40 {
        let (system, bytes) = random_system(&mut rng, 5);
        let predicate = Flavor::Validator.predicate(&system);
        let assertions: Vec<String> = system
            .relations()
            .iter()
            .map(|relation| Flavor::Solver.relation(relation))
            .collect();

        let mut candidates = vec![bytes.clone()];
        candidates.extend((0..20).map(|_| (0..5).map(|_| rng.random()).collect::<Vec<u8>>()));
        for candidate in candidates {
            let expected = system.holds(&candidate);
            assert_eq!(
                evaluate(&predicate, &candidate, Semantics::C) != 0,
                expected,
                "{predicate}"
            );
            assert_eq!(
                assertions
                    .iter()
                    .all(|assertion| evaluate(assertion, &candidate, Semantics::BitVec8) != 0),
                expected
            );
        }
    }
}

/// Every relation on its own, checked against wraparound edge values.
#[test]
fn test_each_relation_truncates_like_a_byte() {
    let edges = [0u8, 1, 127, 128, 200, 255];
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        let kind = RelationKind::random(&mut rng, 3).unwrap();
        let operands: Vec<usize> = (0..kind.arity()).collect();
        let relation = Relation::new(kind, operands, rng.random()).unwrap();
        let c = Flavor::Validator.relation(&relation);
        let python = Flavor::Solver.relation(&relation);

        for &a in &edges {
            for &b in &edges {
                let values = [a, b, a.wrapping_add(b)];
                let expected = relation.holds(&values);
                assert_eq!(evaluate(&c, &values, Semantics::C) != 0, expected, "{c}");
                assert_eq!(
                    evaluate(&python, &values, Semantics::BitVec8) != 0,
                    expected,
                    "{python}"
                );
            }
        }
    }
}
