use std::sync::{Arc, LazyLock};

use da_kzgrs::{global_parameters_from_randomness, GlobalParameters};
use da_kzgrs_backend::DaVerifier;
use divan::counter::BytesCount;
use divan::{black_box, Bencher};
use rand::RngCore as _;

fn main() {
    divan::main()
}

static GLOBAL_PARAMETERS: LazyLock<Arc<GlobalParameters>> = LazyLock::new(|| {
    let mut rng = rand::thread_rng();
    Arc::new(global_parameters_from_randomness(4095, &mut rng).unwrap())
});

#[divan::bench(args = [1024, 8192, 32768, 126_945])]
fn verify_blob(bencher: Bencher, size: usize) {
    let verifier = DaVerifier::new(Arc::clone(&GLOBAL_PARAMETERS)).unwrap();
    bencher
        .with_inputs(|| {
            let mut blob = vec![0u8; size];
            rand::thread_rng().fill_bytes(&mut blob);
            let commitment = verifier
                .encoder()
                .encode(&blob)
                .unwrap()
                .commitment_bytes()
                .unwrap();
            (blob, commitment)
        })
        .input_counter(move |_| BytesCount::new(size))
        .bench_refs(|(blob, commitment)| black_box(verifier.verify(blob, commitment, None)));
}
