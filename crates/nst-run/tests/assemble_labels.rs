use nst_core::errors::NsError;
use nst_run::{assemble_run, Matrix, NormalizedSamples};

fn two_samples(birth_logl: [f64; 2]) -> NormalizedSamples {
    NormalizedSamples {
        theta: Matrix::from_rows(&[[0.0], [1.0]]).unwrap(),
        logl: vec![1.0, 2.0],
        birth_logl: birth_logl.to_vec(),
    }
}

#[test]
fn huge_label_is_rejected_before_allocation() {
    let err = assemble_run(two_samples([-1e30, 1.0]), vec![0, usize::MAX]).unwrap_err();
    match err {
        NsError::Reconstruction(info) => {
            assert_eq!(info.code, "assemble.labels-not-dense");
            assert_eq!(info.context["index"], "1");
            assert_eq!(info.context["label"], usize::MAX.to_string());
        }
        other => panic!("unexpected error {other:?}"),
    }

    let err = assemble_run(two_samples([-1e30, 1.0]), vec![1 << 40, 0]).unwrap_err();
    assert_eq!(err.code(), "assemble.labels-not-dense");
    assert_eq!(err.info().context["index"], "0");
}

#[test]
fn skipped_label_is_rejected() {
    let normalized = NormalizedSamples {
        theta: Matrix::from_rows(&[[0.0], [1.0], [2.0]]).unwrap(),
        logl: vec![1.0, 2.0, 3.0],
        birth_logl: vec![-1e30, -1e30, 1.0],
    };
    let err = assemble_run(normalized, vec![0, 2, 2]).unwrap_err();
    assert!(matches!(&err, NsError::Reconstruction(info) if info.code == "assemble.labels-not-dense"));
    assert_eq!(err.info().context["missing_label"], "1");
}

#[test]
fn label_count_must_match_samples() {
    let err = assemble_run(two_samples([-1e30, 1.0]), vec![0]).unwrap_err();
    assert!(matches!(&err, NsError::Malformed(info) if info.code == "assemble.length-mismatch"));
    assert_eq!(err.info().context["labels"], "1");
}

#[test]
fn birth_without_matching_sample_is_rejected() {
    let err = assemble_run(two_samples([-1e30, 1.5]), vec![0, 1]).unwrap_err();
    match err {
        NsError::Reconstruction(info) => {
            assert_eq!(info.code, "assemble.unmatched-birth");
            assert_eq!(info.context["label"], "1");
            assert_eq!(info.context["birth_logl"], "1.5");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn valid_labels_assemble() {
    let run = assemble_run(two_samples([-1e30, 1.0]), vec![0, 0]).unwrap();
    assert_eq!(run.nthreads(), 1);
    assert_eq!(run.nlive_array, vec![1.0, 1.0]);
}
