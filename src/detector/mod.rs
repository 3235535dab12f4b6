//! QR code detection modules
//!
//! This module contains all the logic for locating symbols in a binary image:
//! - Finder pattern detection (the three square markers)
//! - Grouping finders into ordered, scored triples
//! - Alignment pattern search (for larger QR codes)
//! - Timing pattern agreement (to rank size estimates)
//! - Module grid sampling through a perspective transform

/// Alignment pattern search for QR versions 2+
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triple ordering and scoring
pub mod grouping;
/// Timing pattern agreement of a sampled grid
pub mod timing;
/// Module grid sampling and perspective correction
pub mod transform;
