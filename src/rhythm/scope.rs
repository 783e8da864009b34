//! Secondary ("scope") modulation pattern extraction.

use tracing::debug;

use super::literal::{
    group_tokens, has_scope_call, has_scope_comment, has_voice_call, index_literal, literal_shape,
    note_literal, numbers, strip_comments, tempo_factor,
};
use super::ScopePattern;

/// Extract the modulation sequence driving the scope layer.
///
/// A source qualifies when it carries an explicit marker (a `// @scope`
/// comment or a live `.scope(` / `._scope(` call), or when an `n("...")`
/// index pattern appears alongside a `note(` / `s(` voice. The index literal's numbers become
/// the sequence, normalized by their largest magnitude and by an optional
/// `/k` divisor. Without usable index numbers, a `note("...")` literal
/// yields one evenly spaced step per token. Returns `None` when nothing
/// qualifies.
pub fn extract_scope_pattern(source: &str) -> Option<ScopePattern> {
    let code = strip_comments(source);
    let index = index_literal(&code);

    let qualifies = has_scope_comment(source)
        || has_scope_call(&code)
        || (index.is_some() && has_voice_call(&code));
    if !qualifies {
        return None;
    }

    let (sequence, pattern_length) = index
        .and_then(index_sequence)
        .or_else(|| note_literal(&code).and_then(pitch_sequence))?;

    let pattern = ScopePattern {
        sequence,
        speed: tempo_factor(&code),
        pattern_length,
    };
    debug!(
        steps = pattern.sequence.len(),
        speed = pattern.speed,
        length = pattern.pattern_length,
        "scope pattern extracted"
    );
    Some(pattern)
}

fn index_sequence(literal: &str) -> Option<(Vec<f64>, u32)> {
    let shape = literal_shape(literal);
    let values = numbers(shape.body);
    if values.is_empty() {
        return None;
    }

    let divisor = shape.divisor.unwrap_or(1.0);
    let peak = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let sequence = values
        .iter()
        .map(|v| {
            if peak > 0.0 {
                (v.abs() / peak / divisor).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect::<Vec<_>>();

    let cycles = divisor.round().max(1.0) as u32;
    let length = if shape.alternation {
        cycles.saturating_mul(sequence.len() as u32)
    } else {
        cycles
    };
    Some((sequence, length))
}

fn pitch_sequence(literal: &str) -> Option<(Vec<f64>, u32)> {
    let shape = literal_shape(literal);
    let tokens = group_tokens(shape.body);
    if tokens.is_empty() {
        return None;
    }

    let count = tokens.len();
    let sequence = (0..count)
        .map(|i| (i + 1) as f64 / count as f64)
        .collect::<Vec<_>>();
    let length = if shape.alternation { count as u32 } else { 1 };
    Some((sequence, length))
}
