// std
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;
// crates
use ark_bls12_381::{fr::Fr, Bls12_381};
use ark_poly::polynomial::univariate::DensePolynomial;
use ark_poly_commit::kzg10::KZG10;
use ark_serialize::{CanonicalDeserialize as _, CanonicalSerialize as _};
use rand::Rng;
// internal
use super::GlobalParameters;
use crate::KzgRsError;

/// Insecure setup where the toxic waste comes from `rng`. Development only.
pub fn global_parameters_from_randomness<R: Rng>(
    max_degree: usize,
    rng: &mut R,
) -> Result<GlobalParameters, KzgRsError> {
    KZG10::<Bls12_381, DensePolynomial<Fr>>::setup(max_degree, true, rng)
        .map_err(KzgRsError::PolyCommitError)
}

/// Load uncompressed parameters written by [`global_parameters_to_file`].
///
/// Points are checked to be on the curve and in the right subgroup.
pub fn global_parameters_from_file(path: impl AsRef<Path>) -> Result<GlobalParameters, KzgRsError> {
    let file = File::open(path)?;
    let params = GlobalParameters::deserialize_uncompressed(BufReader::new(file))?;
    Ok(params)
}

pub fn global_parameters_to_file(
    params: &GlobalParameters,
    path: impl AsRef<Path>,
) -> Result<(), KzgRsError> {
    let mut writer = BufWriter::new(File::create(path)?);
    params.serialize_uncompressed(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Highest degree a polynomial committed with `params` can have.
#[must_use]
pub fn max_polynomial_degree(params: &GlobalParameters) -> Option<usize> {
    params.powers_of_g.len().checked_sub(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parameters_file_round_trip() {
        let mut rng = rand::thread_rng();
        let params = global_parameters_from_randomness(7, &mut rng).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kzgrs_test_params");
        global_parameters_to_file(&params, &path).unwrap();
        let loaded = global_parameters_from_file(&path).unwrap();
        assert_eq!(loaded.powers_of_g, params.powers_of_g);
        assert_eq!(loaded.beta_h, params.beta_h);
        assert_eq!(max_polynomial_degree(&loaded), Some(7));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            global_parameters_from_file("/nonexistent/kzgrs_params"),
            Err(KzgRsError::Io(_))
        ));
    }

    #[test]
    fn truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated");
        std::fs::write(&path, [0u8; 10]).unwrap();
        assert!(matches!(
            global_parameters_from_file(&path),
            Err(KzgRsError::Serialization(_))
        ));
    }
}
