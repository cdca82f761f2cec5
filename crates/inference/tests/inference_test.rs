use {
    base::Tensor,
    inference::{InferError, Inference, LandmarkEstimator, RegionSegmenter},
};

fn cpu() -> Inference {
    Inference::cpu().expect("CPU device always available")
}

#[test]
fn test_inference_cpu() {
    let inference = cpu();
    assert!(!inference.device().is_cuda());
}

#[test]
fn test_use_landmark_net_missing_file() {
    let inference = cpu();
    let result = inference.use_landmark_net("fake_path.safetensors");
    match result {
        Err(InferError::Io(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected Io error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_use_segmentation_net_missing_file() {
    let inference = cpu();
    assert!(inference.use_segmentation_net("fake_path.safetensors").is_err());
}

#[test]
fn test_infererror_display() {
    let err = InferError::Shape("bad frame".to_string());
    let display_str = format!("{}", err);
    assert!(display_str.contains("shape"));
    assert!(display_str.contains("bad frame"));
}

#[test]
fn test_silhouette_backends_agree_on_empty_frame() {
    let inference = cpu();
    let frame = Tensor::new(vec![16, 16, 3], vec![0.3; 16 * 16 * 3]).unwrap();
    let landmarks = inference.use_silhouette_estimator().estimate(&frame).unwrap();
    let mask = inference.use_silhouette_segmenter().segment(&frame).unwrap();
    assert!(landmarks.is_empty());
    assert!(mask.is_none());
}
