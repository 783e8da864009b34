//! Percussion pattern extraction.

use tracing::debug;

use super::literal::{sound_literal, strip_comments, tempo_factor};
use super::{BeatPattern, MAX_BPM, MIN_BPM, REFERENCE_BPM};

/// Rest symbol in mini-notation
const REST: char = '~';

/// Upper bound on a single `@weight` so the total span stays finite
const MAX_WEIGHT: f64 = 1024.0;

/// Extract beat positions and tempo from the first `s("...")` literal.
///
/// Each whitespace token is one step; tokens starting with `~` are rests.
/// A token may carry an `@weight` elongation. Hit positions are step
/// offsets divided by the total span, so they land in [0, 1). With no
/// literal or no hits the four-on-the-floor default is returned.
pub fn extract_beat_pattern(source: &str) -> BeatPattern {
    let code = strip_comments(source);

    let Some(literal) = sound_literal(&code) else {
        return BeatPattern::default();
    };
    let Some(beats) = hit_positions(literal) else {
        return BeatPattern::default();
    };

    let bpm = (REFERENCE_BPM * tempo_factor(&code)).clamp(MIN_BPM, MAX_BPM);
    debug!(hits = beats.len(), bpm, "beat pattern extracted");

    BeatPattern {
        beats,
        bpm,
        pattern_length: 1,
    }
}

fn hit_positions(literal: &str) -> Option<Vec<f64>> {
    let mut offset = 0.0;
    let mut hits = Vec::new();

    for token in literal.split_whitespace() {
        let (body, weight) = split_weight(token);
        if !body.starts_with(REST) {
            hits.push(offset);
        }
        offset += weight;
    }

    if hits.is_empty() || offset <= 0.0 {
        return None;
    }
    Some(hits.into_iter().map(|h| h / offset).collect())
}

/// `bd@3` → ("bd", 3.0); anything unparsable weighs 1
fn split_weight(token: &str) -> (&str, f64) {
    match token.split_once('@') {
        Some((body, weight)) => {
            let weight = weight
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w > 0.0)
                .map_or(1.0, |w| w.min(MAX_WEIGHT));
            (body, weight)
        }
        None => (token, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_hits() {
        let pattern = extract_beat_pattern(r#"s("bd hh sd hh")"#);
        assert_eq!(pattern.beats, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(pattern.bpm, 120.0);
        assert_eq!(pattern.pattern_length, 1);
    }

    #[test]
    fn test_single_hit_with_rests() {
        let pattern = extract_beat_pattern(r#"s("bd ~ ~ ~")"#);
        assert_eq!(pattern.beats, vec![0.0]);
        assert_eq!(pattern.bpm, 120.0);
    }

    #[test]
    fn test_offbeat_hits() {
        let pattern = extract_beat_pattern(r#"sound("~ hh ~ hh ~ hh ~ hh")"#);
        assert_eq!(pattern.beats, vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn test_rest_prefix_is_silent() {
        let pattern = extract_beat_pattern(r#"s("bd ~x ~ sd")"#);
        assert_eq!(pattern.beats, vec![0.0, 0.75]);
    }

    #[test]
    fn test_weighted_steps() {
        let pattern = extract_beat_pattern(r#"s("bd@3 sd")"#);
        assert_eq!(pattern.beats, vec![0.0, 0.75]);

        // Bad weights count as 1
        let pattern = extract_beat_pattern(r#"s("bd@x sd@0")"#);
        assert_eq!(pattern.beats, vec![0.0, 0.5]);
    }

    #[test]
    fn test_fallbacks() {
        let default = BeatPattern::default();
        assert_eq!(extract_beat_pattern(""), default);
        assert_eq!(extract_beat_pattern("note(\"c3 e3\")"), default);
        assert_eq!(extract_beat_pattern(r#"s("~ ~ ~")"#), default);
        assert_eq!(extract_beat_pattern(r#"s("   ")"#), default);
        assert_eq!(extract_beat_pattern(r#"s("bd sd"#), default);
        // Tempo modifiers do not apply to the fallback
        assert_eq!(extract_beat_pattern(r#"s("~").fast(2)"#), default);
    }

    #[test]
    fn test_tempo_modifiers() {
        assert_eq!(extract_beat_pattern(r#"s("bd sd").slow(2)"#).bpm, 60.0);
        assert_eq!(extract_beat_pattern(r#"s("bd sd").fast(2)"#).bpm, 180.0);
        assert_eq!(extract_beat_pattern(r#"s("bd sd").fast(1.25)"#).bpm, 150.0);
        assert_eq!(extract_beat_pattern(r#"s("bd sd").slow(4)"#).bpm, 60.0);
    }

    #[test]
    fn test_first_literal_wins() {
        let code = r#"
            // s("hh*8")
            stack(
              s("bd ~ sd ~"),
              s("hh hh hh hh hh hh hh hh")
            )
        "#;
        assert_eq!(extract_beat_pattern(code).beats, vec![0.0, 0.5]);
    }

    #[test]
    fn test_hit_count_and_ordering_law() {
        let vocab = ["bd", "~", "sd", "hh", "~", "cp"];
        for n in 1..=16usize {
            for seed in 0..vocab.len() {
                let tokens: Vec<&str> = (0..n).map(|i| vocab[(i * 7 + seed) % vocab.len()]).collect();
                let literal = tokens.join(" ");
                let hits = tokens.iter().filter(|t| !t.starts_with('~')).count();

                let pattern = extract_beat_pattern(&format!("s(\"{}\")", literal));
                if hits == 0 {
                    assert_eq!(pattern, BeatPattern::default());
                    continue;
                }

                assert_eq!(pattern.beats.len(), hits, "literal {:?}", literal);
                assert!(pattern.beats.iter().all(|b| (0.0..1.0).contains(b)));
                assert!(pattern.beats.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
