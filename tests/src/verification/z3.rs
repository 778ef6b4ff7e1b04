use armor_core::{Secret, Seed};
use armor_generator::{ConstraintGenerator, GeneratorConfig};
use armor_verification::{SearchSolver, SolverBackend, SolverConfig, UniquenessVerifier, Verdict};

#[test]
fn test_z3_and_search_agree_on_generated_systems() {
    let z3 = SolverBackend::Z3.build(SolverConfig::default()).unwrap();
    let search = SearchSolver::default();
    let config = GeneratorConfig::default();

    for (text, seed) in [("CTF{flag}", 0), ("z3", 7), ("armor", 42)] {
        let secret: Secret = text.parse().unwrap();
        let mut rng = Seed::from_integer(seed).create_deterministic_rng();
        let generation = ConstraintGenerator::new(&config, z3.as_ref())
            .generate(&secret, &mut rng)
            .unwrap();

        let verdict = UniquenessVerifier::new(&search)
            .verify(&generation.system)
            .unwrap();
        assert_eq!(verdict, Verdict::Unique(secret.as_bytes().to_vec()));
    }
}
