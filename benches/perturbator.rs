use ark_bn254::Fr;
use criterion::{BatchSize, Criterion};
use honk_fold::field::HonkField;
use honk_fold::protogalaxy::perturbator::{
    compute_round_challenge_pows, construct_perturbator_coeffs, PerturbatorWorkspace,
};
use honk_fold::protogalaxy::{Instance, ProtoGalaxyProver};
use honk_fold::transcripts::{KeccakTranscript, Transcript};
use honk_fold::utils::test_trace::{random_relation_parameters, satisfying_instance};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

const LOG_SIZES: [usize; 3] = [10, 14, 18];

fn random_vector(rng: &mut ChaCha20Rng, len: usize) -> Vec<Fr> {
    (0..len).map(|_| Fr::random(rng)).collect()
}

fn benchmark_perturbator_tree(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(111111u64);
    for log_n in LOG_SIZES {
        let betas = random_vector(&mut rng, log_n);
        let deltas = compute_round_challenge_pows(log_n, Fr::random(&mut rng));
        let e = random_vector(&mut rng, 1 << log_n);

        c.bench_function(&format!("Perturbator tree, fresh buffers: 2^{log_n}"), |b| {
            b.iter(|| construct_perturbator_coeffs(&betas, &deltas, &e).unwrap());
        });

        let mut workspace = PerturbatorWorkspace::with_capacity(1 << log_n);
        c.bench_function(&format!("Perturbator tree, reused buffers: 2^{log_n}"), |b| {
            b.iter(|| workspace.construct(&betas, &deltas, &e).unwrap());
        });
    }
}

fn setup_fold(log_n: usize) -> Vec<Instance<Fr>> {
    let mut rng = ChaCha20Rng::seed_from_u64(log_n as u64);
    let params = random_relation_parameters::<Fr, _>(&mut rng, 1 << log_n);
    let alpha = Fr::random(&mut rng);
    (0..2)
        .map(|_| satisfying_instance(log_n, &params, alpha, &mut rng).unwrap())
        .collect()
}

fn benchmark_fold(c: &mut Criterion) {
    for log_n in [10, 14] {
        let instances = setup_fold(log_n);
        c.bench_function(&format!("ProtoGalaxy fold: 2^{log_n}"), |b| {
            b.iter_batched(
                || {
                    ProtoGalaxyProver::new(instances.clone(), KeccakTranscript::new(b"bench"))
                },
                |mut prover| prover.fold_instances().unwrap(),
                BatchSize::LargeInput,
            );
        });
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut c = Criterion::default()
        .configure_from_args()
        .sample_size(10)
        .warm_up_time(std::time::Duration::from_secs(5));

    benchmark_perturbator_tree(&mut c);
    benchmark_fold(&mut c);

    c.final_summary();
}
