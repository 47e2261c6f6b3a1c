use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::{
    ClassifyError, FlowerLabel, ImageClassifier, Outcome, FLOWER_LABELS,
};

/// Picks the highest score (first one on ties) and names it.
pub fn select_outcome(scores: &[f32]) -> Result<Outcome, ClassifyError> {
    if scores.len() != FLOWER_LABELS.len() {
        return Err(ClassifyError::UnexpectedOutputLength {
            expected: FLOWER_LABELS.len(),
            actual: scores.len(),
        });
    }

    if let Some((index, &score)) = scores
        .iter()
        .enumerate()
        .find(|(_, score)| !(0.0..=1.0).contains(*score))
    {
        return Err(ClassifyError::InvalidScore { index, score });
    }

    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }

    let label = FlowerLabel::from_index(best).ok_or(ClassifyError::UnexpectedOutputLength {
        expected: FLOWER_LABELS.len(),
        actual: scores.len(),
    })?;

    Ok(Outcome {
        label,
        confidence: scores[best],
    })
}

pub fn classify(
    classifier: &dyn ImageClassifier,
    frame: &Frame,
) -> Result<Outcome, Box<dyn std::error::Error + Send + Sync>> {
    if !classifier.is_loaded() {
        return Err(Box::new(ClassifyError::ModelNotLoaded));
    }

    let scores = classifier.infer(frame)?;

    Ok(select_outcome(&scores)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::impl_fake::ImageClassifierFake;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgb, RgbImage};
    use std::sync::Arc;

    fn peaked_scores(peak: usize) -> Vec<f32> {
        (0..FLOWER_LABELS.len())
            .map(|i| if i == peak { 0.6 } else { 0.1 })
            .collect()
    }

    #[test]
    fn test_each_peak_maps_to_its_label() {
        let names = ["Daisy", "Dandelion", "Rose", "Sunflower", "Tulip"];

        for (i, name) in names.iter().enumerate() {
            let outcome = select_outcome(&peaked_scores(i)).unwrap();
            assert_eq!(outcome.label.name(), *name);
            assert_eq!(outcome.label, FLOWER_LABELS[i]);
            assert_eq!(outcome.confidence, 0.6);
        }
    }

    #[test]
    fn test_confidence_is_the_exact_score() {
        let scores = [0.01, 0.87231, 0.05, 0.03719, 0.0305];

        let outcome = select_outcome(&scores).unwrap();

        assert_eq!(outcome.label, FlowerLabel::Dandelion);
        assert_eq!(outcome.confidence, 0.87231);
    }

    #[test]
    fn test_ties_pick_first_occurrence() {
        let outcome = select_outcome(&[0.1, 0.4, 0.1, 0.4, 0.0]).unwrap();
        assert_eq!(outcome.label, FlowerLabel::Dandelion);

        let outcome = select_outcome(&[0.2; 5]).unwrap();
        assert_eq!(outcome.label, FlowerLabel::Daisy);
    }

    #[test]
    fn test_boundary_scores_are_accepted() {
        let outcome = select_outcome(&[0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        assert_eq!(outcome.label, FlowerLabel::Rose);
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert_eq!(
            select_outcome(&[0.5, 0.5]),
            Err(ClassifyError::UnexpectedOutputLength {
                expected: 5,
                actual: 2
            })
        );
        assert!(select_outcome(&[]).is_err());
    }

    #[test]
    fn test_out_of_range_scores_are_rejected() {
        assert_eq!(
            select_outcome(&[0.1, 1.5, 0.1, 0.1, 0.1]),
            Err(ClassifyError::InvalidScore {
                index: 1,
                score: 1.5
            })
        );
        assert!(select_outcome(&[0.1, 0.1, f32::NAN, 0.1, 0.1]).is_err());
        assert!(select_outcome(&[-0.1, 0.1, 0.1, 0.1, 0.1]).is_err());
    }

    #[test]
    fn test_classify_requires_loaded_model() {
        let classifier = ImageClassifierFake::new(Arc::new(LoggerFake::new()));
        let frame = Frame::new(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));

        let result = classify(&classifier, &frame);

        assert!(result.is_err());
        assert_eq!(classifier.infer_calls(), 0);
    }

    #[test]
    fn test_classify_runs_scripted_scores() {
        let classifier = ImageClassifierFake::new(Arc::new(LoggerFake::new()))
            .with_scores(vec![0.05, 0.05, 0.05, 0.8, 0.05]);
        classifier.load().unwrap();
        let frame = Frame::new(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));

        let outcome = classify(&classifier, &frame).unwrap();

        assert_eq!(outcome.label, FlowerLabel::Sunflower);
        assert_eq!(outcome.confidence, 0.8);
        assert_eq!(classifier.infer_calls(), 1);
    }
}
