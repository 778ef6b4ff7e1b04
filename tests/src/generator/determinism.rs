use armor_core::Seed;
use armor_generator::{generate_artifacts, GenerationRequest, ReusePolicy, TemplateSource};
use armor_verification::SearchSolver;

fn request(seed: i128) -> GenerationRequest {
    GenerationRequest::new(
        "CTF{flag}".parse().unwrap(),
        Seed::from_integer(seed),
        TemplateSource::Builtin("crackme.c".to_string()),
    )
}

#[test]
fn test_same_seed_same_artifact() {
    crate::init_tracing();
    let solver = SearchSolver::default();
    let first = generate_artifacts(&request(0), &solver).unwrap();
    let second = generate_artifacts(&request(0), &solver).unwrap();

    assert_eq!(first.system, second.system);
    assert_eq!(first.artifacts[0].text, second.artifacts[0].text);
    assert_eq!(first.metadata.draws, second.metadata.draws);
}

#[test]
fn test_different_seeds_differ() {
    let solver = SearchSolver::default();
    let a = generate_artifacts(&request(1), &solver).unwrap();
    let b = generate_artifacts(&request(2), &solver).unwrap();
    assert_ne!(a.system, b.system);
    assert_ne!(a.metadata.seed, b.metadata.seed);
}

#[test]
fn test_every_reuse_policy_reaches_uniqueness() {
    let solver = SearchSolver::default();
    for policy in ReusePolicy::ALL {
        let mut request = request(5);
        request.generator.reuse_policy = policy;
        let result = generate_artifacts(&request, &solver).unwrap();
        assert!(result.system.holds(b"CTF{flag}"), "{policy}");
        assert_eq!(result.metadata.reuse_policy, policy.to_string());
    }
}
