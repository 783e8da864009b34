//! Built-in Glicol composition for live runs without an external signal.

/// Four-on-the-floor kick with an offbeat hat and a filtered saw line
pub const GLICOL_COMPOSITION: &str = r#"
~kick: speed 4.0 >> seq 60 60 60 60 >> bd 0.2
~hat: speed 4.0 >> seq _60 _60 _60 _60 >> hh 0.03
~gate: speed 2.0 >> seq 48 _ 55 _48
~amp: ~gate >> envperc 0.001 0.2
~pit: ~gate >> mul 130.81
~lead: saw ~pit >> mul ~amp >> lpf ~mod 3.0 >> mul 0.08
~mod: sin 0.25 >> mul 900 >> add 1200
o: mix ~kick ~hat ~lead >> plate 0.1
"#;

/// Pattern source matching [`GLICOL_COMPOSITION`]
pub const DEFAULT_PATTERN_CODE: &str = r#"stack(
  s("bd bd bd bd"),
  s("~ hh ~ hh"),
  n("<0 7 0 3>").note("c3")
)"#;
