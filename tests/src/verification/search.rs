use armor_core::{ConstraintSystem, Relation, RelationKind};
use armor_verification::{enumerate_solutions, ExhaustiveSolver, Outcome, SearchSolver, Solver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random systems over two bytes, with constants drawn at random so some are
/// unsatisfiable.
fn random_system(rng: &mut StdRng) -> ConstraintSystem {
    let mut system = ConstraintSystem::new(2);
    for _ in 0..rng.random_range(1..=3) {
        let kind = RelationKind::random(rng, 2).unwrap();
        let operands = match kind.arity() {
            1 => vec![rng.random_range(0..2)],
            _ if rng.random_bool(0.5) => vec![0, 1],
            _ => vec![1, 0],
        };
        system
            .push(Relation::new(kind, operands, rng.random()).unwrap())
            .unwrap();
    }
    system
}

#[test]
fn test_search_agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let search = SearchSolver::default();

    for _ in 0..60 {
        let system = random_system(&mut rng);
        let all = ExhaustiveSolver.all_solutions(&system).unwrap();

        let outcome = search.solve(&system).unwrap();
        assert_eq!(outcome.is_sat(), !all.is_empty(), "{system:?}");
        if let Outcome::Model(model) = outcome {
            assert!(all.contains(&model));
        }

        let found = enumerate_solutions(&search, &system, 8).unwrap();
        assert_eq!(found.len(), all.len().min(8), "{system:?}");
        for model in &found {
            assert!(all.contains(model));
        }
    }
}

#[test]
fn test_exclusions_are_respected() {
    let mut system = ConstraintSystem::new(2);
    system
        .push(Relation::new(RelationKind::Or, vec![0, 1], 0x01).unwrap())
        .unwrap();
    // Solutions: (0,1), (1,0), (1,1).
    let search = SearchSolver::default();
    let outcome = search
        .solve_with_exclusion(&system, &[&[0, 1], &[1, 0]])
        .unwrap();
    assert_eq!(outcome, Outcome::Model(vec![1, 1]));
    assert_eq!(
        search
            .solve_with_exclusion(&system, &[&[0, 1], &[1, 0], &[1, 1]])
            .unwrap(),
        Outcome::Unsat
    );
}
