use std::time::Instant;

use crate::config::DecoderConfig;
use crate::decoder::qr_decoder::QrDecoder;
use crate::detector::finder::{FinderDetector, strongest_patterns};
use crate::detector::grouping::{FinderTriple, candidate_triples};
use crate::error::{DecodeError, SymbolError};
use crate::models::{BitMatrix, DecodedSymbol, Point, RasterImage, Version};
use crate::utils::binarization::{adaptive_binarize, default_window, otsu_binarize};
use crate::utils::geometry::quad_contains;

/// Binarization strategy that produced a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binarizer {
    /// Integral-image local mean
    Adaptive,
    /// Global Otsu threshold
    Otsu,
}

/// Result of one attempted candidate, or of a pass that produced no candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOutcome {
    /// Pass the candidate came from
    pub binarizer: Binarizer,
    /// Finder centres involved (TL, TR, BL for triples)
    pub finders: Vec<Point>,
    /// Triple score, lower is better
    pub score: Option<f32>,
    /// Decoded version on success
    pub version: Option<Version>,
    /// Success, or the local failure that voided the candidate
    pub status: Result<(), SymbolError>,
}

/// Everything the coordinator learned about one image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Decoded symbols in discovery order
    pub symbols: Vec<DecodedSymbol>,
    /// Finder patterns found in the last pass
    pub finder_patterns: usize,
    /// Triples actually decoded, across passes
    pub candidates_tried: usize,
    /// Per-candidate results
    pub outcomes: Vec<CandidateOutcome>,
    /// Whether the Otsu pass ran
    pub used_otsu: bool,
    /// Whether the time budget cut the search short
    pub deadline_hit: bool,
}

impl DecodeReport {
    /// Failed candidates only
    pub fn failures(&self) -> impl Iterator<Item = &CandidateOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_err())
    }
}

/// Decode every symbol in the raster.
///
/// Runs the adaptive pass, then an Otsu pass when nothing was found and the
/// fallback is enabled.
pub(crate) fn decode_raster(
    image: &RasterImage,
    config: &DecoderConfig,
) -> Result<DecodeReport, DecodeError> {
    image.validate()?;
    let start = Instant::now();
    let deadline = config.time_budget.map(|budget| start + budget);
    let (width, height) = (image.width(), image.height());
    let gray = image.pixels();

    let mut report = DecodeReport::default();
    let window = config
        .adaptive_window
        .unwrap_or_else(|| default_window(width, height));
    let binary = adaptive_binarize(gray, width, height, window);
    run_pass(&binary, Binarizer::Adaptive, config, deadline, &mut report);

    if report.symbols.is_empty() && config.otsu_fallback && !report.deadline_hit {
        log::debug!("adaptive pass found nothing, retrying with Otsu");
        report.used_otsu = true;
        let binary = otsu_binarize(gray, width, height);
        run_pass(&binary, Binarizer::Otsu, config, deadline, &mut report);
    }

    log::debug!(
        "decoded {} symbols from {}x{} in {:?} ({} candidates tried)",
        report.symbols.len(),
        width,
        height,
        start.elapsed(),
        report.candidates_tried
    );
    Ok(report)
}

/// Symbols already decoded in this pass: their finders and image quads
#[derive(Default)]
struct Claims {
    /// Indices into the current round's pattern list
    finders: Vec<usize>,
    /// Finder centres of every decoded symbol
    centers: Vec<Point>,
    quads: Vec<[Point; 4]>,
}

impl Claims {
    fn overlaps(&self, triple: &FinderTriple) -> bool {
        triple.indices.iter().any(|i| self.finders.contains(i))
            || triple.centers().iter().any(|c| self.covers(c))
    }

    /// Whether a finder centre belongs to, or lies inside, a decoded symbol
    fn covers(&self, center: &Point) -> bool {
        self.centers.contains(center) || self.quads.iter().any(|q| quad_contains(q, center))
    }

    fn claim(&mut self, triple: &FinderTriple, quad: [Point; 4]) {
        self.finders.extend_from_slice(&triple.indices);
        self.centers.extend_from_slice(&triple.centers());
        self.quads.push(quad);
    }

    /// Pattern indices are per round
    fn next_round(&mut self) {
        self.finders.clear();
    }
}

fn run_pass(
    binary: &BitMatrix,
    binarizer: Binarizer,
    config: &DecoderConfig,
    deadline: Option<Instant>,
    report: &mut DecodeReport,
) {
    let mut remaining = FinderDetector::detect(binary);
    report.finder_patterns = remaining.len();
    if remaining.len() < 3 {
        let status = if remaining.is_empty() {
            SymbolError::NoFinderPatternsFound
        } else {
            SymbolError::InsufficientFinderPatterns {
                found: remaining.len(),
            }
        };
        log::debug!("{:?} pass: {}", binarizer, status);
        report.outcomes.push(CandidateOutcome {
            binarizer,
            finders: remaining.iter().map(|p| p.center).collect(),
            score: None,
            version: None,
            status: Err(status),
        });
        return;
    }

    let mut claims = Claims::default();
    let mut attempts = 0usize;
    let mut round = 0usize;
    // Each round sees the strongest finders not yet claimed; stop once a
    // round decodes nothing new
    while remaining.len() >= 3 {
        round += 1;
        let patterns = strongest_patterns(&remaining, config.max_finder_patterns);
        let triples = candidate_triples(&patterns, config.max_pitch_ratio);
        if triples.is_empty() {
            if round == 1 {
                report.outcomes.push(CandidateOutcome {
                    binarizer,
                    finders: patterns.iter().map(|p| p.center).collect(),
                    score: None,
                    version: None,
                    status: Err(SymbolError::GeometryDegenerate),
                });
            }
            return;
        }

        claims.next_round();
        let decoded_before = report.symbols.len();
        for triple in &triples {
            if attempts >= config.max_candidates {
                log::debug!("attempt budget of {} exhausted", config.max_candidates);
                return;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("time budget exhausted after {} attempts", attempts);
                report.deadline_hit = true;
                return;
            }
            if claims.overlaps(triple) {
                continue;
            }

            attempts += 1;
            report.candidates_tried += 1;
            log::trace!("candidate {:?} score {:.3}", triple.indices, triple.score);

            let outcome = match QrDecoder::decode(binary, triple) {
                Ok(symbol) => {
                    claims.claim(triple, symbol.position);
                    let version = symbol.version;
                    report.symbols.push(symbol);
                    CandidateOutcome {
                        binarizer,
                        finders: triple.centers().to_vec(),
                        score: Some(triple.score),
                        version: Some(version),
                        status: Ok(()),
                    }
                }
                Err(err) => {
                    log::debug!("candidate {:?} rejected: {}", triple.indices, err);
                    CandidateOutcome {
                        binarizer,
                        finders: triple.centers().to_vec(),
                        score: Some(triple.score),
                        version: None,
                        status: Err(err),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        let decoded = report.symbols.len() - decoded_before;
        if decoded == 0 {
            return;
        }
        remaining.retain(|p| !claims.covers(&p.center));
        log::debug!(
            "round {} decoded {} symbols, {} finders left",
            round,
            decoded,
            remaining.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image_reports_no_finders() {
        let pixels = vec![255u8; 64 * 64];
        let image = RasterImage::from_luma(&pixels, 64, 64);
        let report = decode_raster(&image, &DecoderConfig::default()).unwrap();
        assert!(report.symbols.is_empty());
        assert!(report.used_otsu);
        assert_eq!(report.candidates_tried, 0);
        assert!(
            report
                .failures()
                .all(|o| o.status == Err(SymbolError::NoFinderPatternsFound))
        );
    }

    #[test]
    fn test_invalid_image_is_fatal() {
        let pixels = vec![0u8; 10];
        let image = RasterImage::from_luma(&pixels, 4, 4);
        assert!(matches!(
            decode_raster(&image, &DecoderConfig::default()),
            Err(DecodeError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_claims() {
        let triple = FinderTriple {
            indices: [0, 1, 2],
            top_left: Point::new(10.0, 10.0),
            top_right: Point::new(50.0, 10.0),
            bottom_left: Point::new(10.0, 50.0),
            module_size: 2.0,
            score: 3.0,
        };
        let mut claims = Claims::default();
        assert!(!claims.overlaps(&triple));
        claims.claim(
            &triple,
            [
                Point::new(0.0, 0.0),
                Point::new(60.0, 0.0),
                Point::new(60.0, 60.0),
                Point::new(0.0, 60.0),
            ],
        );
        assert!(claims.overlaps(&triple));

        // Disjoint finders, but one sits inside the claimed quad
        let inside = FinderTriple {
            indices: [3, 4, 5],
            top_left: Point::new(30.0, 30.0),
            top_right: Point::new(130.0, 30.0),
            bottom_left: Point::new(30.0, 130.0),
            ..triple
        };
        assert!(claims.overlaps(&inside));

        let outside = FinderTriple {
            indices: [3, 4, 5],
            top_left: Point::new(100.0, 100.0),
            top_right: Point::new(140.0, 100.0),
            bottom_left: Point::new(100.0, 140.0),
            ..triple
        };
        assert!(!claims.overlaps(&outside));
    }

    #[test]
    fn test_claims_carry_over_rounds() {
        let triple = FinderTriple {
            indices: [0, 1, 2],
            top_left: Point::new(10.0, 10.0),
            top_right: Point::new(50.0, 10.0),
            bottom_left: Point::new(10.0, 50.0),
            module_size: 2.0,
            score: 3.0,
        };
        let mut claims = Claims::default();
        claims.claim(
            &triple,
            [
                Point::new(0.0, 0.0),
                Point::new(60.0, 0.0),
                Point::new(60.0, 60.0),
                Point::new(0.0, 60.0),
            ],
        );
        claims.next_round();

        // Same indices now name different finders
        let fresh = FinderTriple {
            top_left: Point::new(200.0, 200.0),
            top_right: Point::new(240.0, 200.0),
            bottom_left: Point::new(200.0, 240.0),
            ..triple
        };
        assert!(!claims.overlaps(&fresh));
        assert!(claims.covers(&Point::new(50.0, 10.0)));
        assert!(!claims.covers(&Point::new(240.0, 200.0)));
    }
}
