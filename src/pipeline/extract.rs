//! Response extraction: find the generated image in a heterogeneous response.
//!
//! Only the first candidate is examined. Its parts are scanned in order and
//! the first one carrying non-empty inline data wins; text parts are skipped.

use crate::error::RenderError;
use crate::output::ImageDataUri;
use crate::pipeline::wire::GenerateContentResponse;

/// Extract the first inline image of the first candidate as a PNG data URI.
pub fn extract_image(response: &GenerateContentResponse) -> Result<ImageDataUri, RenderError> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.inline_data.as_ref())
                .find(|d| !d.data.is_empty())
        })
        .map(|d| ImageDataUri::png(&d.data))
        .ok_or(RenderError::NoImageReturned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::wire::{Candidate, CandidateContent, ResponsePart};

    #[test]
    fn text_then_image() {
        let resp = GenerateContentResponse::with_parts(vec![
            ResponsePart::from_text("..."),
            ResponsePart::from_image("image/png", "ABC123"),
        ]);
        let uri = extract_image(&resp).unwrap();
        assert_eq!(uri.as_str(), "data:image/png;base64,ABC123");
    }

    #[test]
    fn first_image_wins() {
        let resp = GenerateContentResponse::with_parts(vec![
            ResponsePart::from_image("image/png", "FIRST"),
            ResponsePart::from_image("image/png", "SECOND"),
        ]);
        assert_eq!(extract_image(&resp).unwrap().payload(), "FIRST");
    }

    #[test]
    fn empty_inline_data_is_skipped() {
        let resp = GenerateContentResponse::with_parts(vec![
            ResponsePart::from_image("image/png", ""),
            ResponsePart::from_image("image/png", "REAL"),
        ]);
        assert_eq!(extract_image(&resp).unwrap().payload(), "REAL");
    }

    #[test]
    fn jpeg_inline_data_is_still_wrapped_as_png() {
        let resp =
            GenerateContentResponse::with_parts(vec![ResponsePart::from_image("image/jpeg", "J")]);
        assert_eq!(extract_image(&resp).unwrap().as_str(), "data:image/png;base64,J");
    }

    #[test]
    fn no_candidates() {
        let resp = GenerateContentResponse::default();
        assert!(matches!(
            extract_image(&resp),
            Err(RenderError::NoImageReturned)
        ));
    }

    #[test]
    fn only_text_parts() {
        let resp = GenerateContentResponse::with_parts(vec![
            ResponsePart::from_text("I cannot draw that."),
        ]);
        assert!(matches!(
            extract_image(&resp),
            Err(RenderError::NoImageReturned)
        ));
    }

    #[test]
    fn candidate_without_content() {
        let resp = GenerateContentResponse {
            candidates: vec![Candidate {
                content: None,
                finish_reason: Some("IMAGE_SAFETY".into()),
            }],
        };
        assert!(matches!(
            extract_image(&resp),
            Err(RenderError::NoImageReturned)
        ));
    }

    #[test]
    fn later_candidates_are_ignored() {
        let resp = GenerateContentResponse {
            candidates: vec![
                Candidate {
                    content: Some(CandidateContent {
                        parts: vec![ResponsePart::from_text("no image here")],
                    }),
                    finish_reason: None,
                },
                Candidate {
                    content: Some(CandidateContent {
                        parts: vec![ResponsePart::from_image("image/png", "LATE")],
                    }),
                    finish_reason: None,
                },
            ],
        };
        assert!(matches!(
            extract_image(&resp),
            Err(RenderError::NoImageReturned)
        ));
    }
}
