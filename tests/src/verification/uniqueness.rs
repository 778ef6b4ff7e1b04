use armor_core::{ConstraintSystem, Relation, RelationKind, Secret};
use armor_verification::{ExhaustiveSolver, SearchSolver, UniquenessVerifier, Verdict};

fn system_for(secret: &Secret, relations: &[(RelationKind, &[usize])]) -> ConstraintSystem {
    let mut system = ConstraintSystem::for_secret(secret);
    for (kind, operands) in relations {
        system
            .push(Relation::instantiate(*kind, operands.to_vec(), secret.as_bytes()).unwrap())
            .unwrap();
    }
    system
}

/// A `Unique` verdict from the search backend is never contradicted by brute
/// force, and `NotUnique` always carries two real, distinct solutions.
#[test]
fn test_verdicts_match_brute_force() {
    let secret: Secret = "Hi".parse().unwrap();
    let cases: [&[(RelationKind, &[usize])]; 4] = [
        &[(RelationKind::Sum, &[0, 1])],
        &[(RelationKind::Sum, &[0, 1]), (RelationKind::Diff, &[0, 1])],
        &[(RelationKind::Xor, &[0, 1]), (RelationKind::Shift { amount: 1 }, &[1, 0])],
        &[(RelationKind::Product, &[0, 1]), (RelationKind::Scale { factor: 3 }, &[1])],
    ];

    let search = SearchSolver::default();
    for relations in cases {
        let system = system_for(&secret, relations);
        let all = ExhaustiveSolver.all_solutions(&system).unwrap();
        let verdict = UniquenessVerifier::new(&search)
            .verify_against(&system, &secret)
            .unwrap();

        match verdict {
            Verdict::Unique(model) => {
                assert_eq!(all, vec![model.clone()]);
                assert_eq!(model, secret.as_bytes());
            }
            Verdict::NotUnique { first, second } => {
                assert!(all.len() > 1);
                assert_ne!(first, second);
                assert!(all.contains(&first) && all.contains(&second));
            }
        }
    }
}

#[test]
fn test_verification_is_idempotent() {
    let secret: Secret = "Hi".parse().unwrap();
    let system = system_for(
        &secret,
        &[(RelationKind::Sum, &[0, 1]), (RelationKind::Offset, &[0, 1])],
    );
    let search = SearchSolver::default();
    let verifier = UniquenessVerifier::new(&search);
    let first = verifier.verify_against(&system, &secret).unwrap();
    let second = verifier.verify_against(&system, &secret).unwrap();
    assert_eq!(first, second);
}
