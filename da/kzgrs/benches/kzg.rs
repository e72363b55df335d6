use std::sync::LazyLock;

use da_kzgrs::{
    bytes_to_polynomial, commit_polynomial, evaluation_domain, generate_element_proof,
    global_parameters_from_randomness, verify_element_proof, GlobalParameters, MAX_CHUNK_SIZE,
};
use divan::counter::ItemsCount;
use divan::{black_box, Bencher};
use rand::RngCore as _;

fn main() {
    divan::main()
}

static GLOBAL_PARAMETERS: LazyLock<GlobalParameters> = LazyLock::new(|| {
    let mut rng = rand::thread_rng();
    global_parameters_from_randomness(4096, &mut rng).unwrap()
});

fn rand_data_elements(elements_count: usize, chunk_size: usize) -> Vec<u8> {
    let mut buff = vec![0u8; elements_count * chunk_size];
    rand::thread_rng().fill_bytes(&mut buff);
    buff
}

#[divan::bench(args = [16, 32, 64, 128, 256, 512, 1024, 2048, 4096])]
fn commit_single_polynomial_with_element_count(bencher: Bencher, element_count: usize) {
    bencher
        .with_inputs(|| {
            let domain = evaluation_domain(element_count).unwrap();
            let data = rand_data_elements(element_count, MAX_CHUNK_SIZE);
            bytes_to_polynomial::<MAX_CHUNK_SIZE>(&data, domain).unwrap()
        })
        .input_counter(move |(_evals, _poly)| ItemsCount::new(1usize))
        .bench_refs(|(_evals, poly)| black_box(commit_polynomial(poly, &GLOBAL_PARAMETERS)));
}

#[divan::bench(args = [128, 256, 512, 1024, 2048, 4096])]
fn verify_single_proof(bencher: Bencher, element_count: usize) {
    bencher
        .with_inputs(|| {
            let domain = evaluation_domain(element_count).unwrap();
            let data = rand_data_elements(element_count, MAX_CHUNK_SIZE);
            let (evals, poly) = bytes_to_polynomial::<MAX_CHUNK_SIZE>(&data, domain).unwrap();
            let commitment = commit_polynomial(&poly, &GLOBAL_PARAMETERS).unwrap();
            let proof =
                generate_element_proof(0, &poly, &evals, &GLOBAL_PARAMETERS, domain).unwrap();
            (evals.evals[0], commitment, proof, domain)
        })
        .input_counter(|_| ItemsCount::new(1usize))
        .bench_refs(|(element, commitment, proof, domain)| {
            black_box(verify_element_proof(
                0,
                element,
                commitment,
                proof,
                *domain,
                &GLOBAL_PARAMETERS,
            ))
        });
}
