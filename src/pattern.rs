//! Overwrite pattern sequences for each supported algorithm.

use crate::config::{Algorithm, ShredConfig, RANDOM_KEYWORD};
use crate::error::{Error, Result};
use std::fmt;

/// The fixed Gutmann byte passes, run between the leading and trailing random passes.
const GUTMANN_FIXED: [u8; 21] = [
    0x55, 0xAA, 0x92, 0x49, 0x24, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99,
    0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
];

/// Random passes before and after the fixed Gutmann passes.
const GUTMANN_RANDOM_PASSES: usize = 4;

/// What a single pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassPattern {
    /// Every byte set to this value.
    Fixed(u8),
    /// Fresh CSPRNG output, drawn per chunk at write time.
    Random,
}

impl PassPattern {
    /// Parse one custom pattern entry: `RANDOM` (any case) or exactly two hex digits.
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        if entry.eq_ignore_ascii_case(RANDOM_KEYWORD) {
            return Ok(PassPattern::Random);
        }
        if entry.len() != 2 {
            return Err(Error::InvalidPattern {
                entry: entry.to_string(),
            });
        }
        let mut byte = [0u8; 1];
        hex::decode_to_slice(entry, &mut byte).map_err(|_| Error::InvalidPattern {
            entry: entry.to_string(),
        })?;
        Ok(PassPattern::Fixed(byte[0]))
    }
}

impl fmt::Display for PassPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassPattern::Fixed(b) => write!(f, "{:02X}", b),
            PassPattern::Random => f.write_str(RANDOM_KEYWORD),
        }
    }
}

/// Ordered, non-empty list of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSequence(Vec<PassPattern>);

impl PatternSequence {
    /// Number of passes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a sequence built by a provider.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The passes in execution order.
    pub fn passes(&self) -> &[PassPattern] {
        &self.0
    }

    /// Iterate over the passes in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, PassPattern> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PatternSequence {
    type Item = &'a PassPattern;
    type IntoIter = std::slice::Iter<'a, PassPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PatternSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pass) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", pass)?;
        }
        Ok(())
    }
}

/// An overwrite algorithm, resolved from configuration.
///
/// Custom entries are parsed when the provider is built, so a malformed
/// pattern is rejected before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternProvider {
    Simple,
    Dod,
    Gutmann,
    Custom {
        cycle: Vec<PassPattern>,
        passes: u32,
    },
}

impl PatternProvider {
    /// Build the provider selected by `config`.
    pub fn from_config(config: &ShredConfig) -> Result<Self> {
        match config.algorithm {
            Algorithm::Simple => Ok(PatternProvider::Simple),
            Algorithm::Dod => Ok(PatternProvider::Dod),
            Algorithm::Gutmann => Ok(PatternProvider::Gutmann),
            Algorithm::Custom => {
                if config.custom_passes == 0 {
                    return Err(Error::InvalidConfig(
                        "Custom pass count must be at least 1".to_string(),
                    ));
                }
                Ok(PatternProvider::Custom {
                    cycle: parse_cycle(&config.custom_pattern)?,
                    passes: config.custom_passes,
                })
            }
        }
    }

    /// The ordered pass list for this algorithm.
    pub fn pattern_sequence(&self) -> PatternSequence {
        let passes = match self {
            PatternProvider::Simple => vec![PassPattern::Fixed(0x00)],
            PatternProvider::Dod => vec![
                PassPattern::Fixed(0x00),
                PassPattern::Fixed(0xFF),
                PassPattern::Random,
            ],
            PatternProvider::Gutmann => {
                let mut passes = vec![PassPattern::Random; GUTMANN_RANDOM_PASSES];
                passes.extend(GUTMANN_FIXED.iter().map(|&b| PassPattern::Fixed(b)));
                passes.extend(std::iter::repeat(PassPattern::Random).take(GUTMANN_RANDOM_PASSES));
                passes
            }
            PatternProvider::Custom { cycle, passes } => cycle
                .iter()
                .copied()
                .cycle()
                .take(*passes as usize)
                .collect(),
        };
        // Every variant yields at least one pass; `from_config` rejects zero custom passes.
        PatternSequence(passes)
    }

    /// Human-readable name used in log output.
    pub fn display_name(&self) -> String {
        match self {
            PatternProvider::Simple => "Simple (1-pass)".to_string(),
            PatternProvider::Dod => "DoD 5220.22-M (3-pass)".to_string(),
            PatternProvider::Gutmann => format!(
                "Gutmann ({}-pass)",
                GUTMANN_FIXED.len() + 2 * GUTMANN_RANDOM_PASSES
            ),
            PatternProvider::Custom { passes, .. } => format!("Custom ({}-pass)", passes),
        }
    }
}

/// Build the pass sequence for `config`, validating custom entries eagerly.
pub fn pattern_sequence(config: &ShredConfig) -> Result<PatternSequence> {
    Ok(PatternProvider::from_config(config)?.pattern_sequence())
}

/// Parse a comma-separated custom cycle. A blank string means `[RANDOM]`.
fn parse_cycle(pattern: &str) -> Result<Vec<PassPattern>> {
    if pattern.trim().is_empty() {
        return Ok(vec![PassPattern::Random]);
    }
    pattern.split(',').map(PassPattern::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use PassPattern::{Fixed, Random};

    fn custom(pattern: &str, passes: u32) -> ShredConfig {
        ShredConfig {
            algorithm: Algorithm::Custom,
            custom_pattern: pattern.to_string(),
            custom_passes: passes,
            ..ShredConfig::default()
        }
    }

    #[test]
    fn test_simple_sequence() {
        let seq = pattern_sequence(&ShredConfig::new(Algorithm::Simple)).unwrap();
        assert_eq!(seq.passes(), &[Fixed(0x00)]);
    }

    #[test]
    fn test_dod_sequence() {
        let seq = pattern_sequence(&ShredConfig::new(Algorithm::Dod)).unwrap();
        assert_eq!(seq.passes(), &[Fixed(0x00), Fixed(0xFF), Random]);
    }

    #[test]
    fn test_gutmann_sequence() {
        let seq = pattern_sequence(&ShredConfig::new(Algorithm::Gutmann)).unwrap();
        assert_eq!(seq.len(), 29);

        let passes = seq.passes();
        assert!(passes[..4].iter().all(|p| *p == Random));
        assert!(passes[25..].iter().all(|p| *p == Random));

        let fixed: Vec<u8> = passes[4..25]
            .iter()
            .map(|p| match p {
                Fixed(b) => *b,
                Random => panic!("unexpected random pass in fixed section"),
            })
            .collect();
        assert_eq!(fixed, GUTMANN_FIXED.to_vec());
        assert_eq!(fixed[0], 0x55);
        assert_eq!(fixed[20], 0xFF);
    }

    #[test]
    fn test_custom_cycles_entries() {
        let seq = pattern_sequence(&custom("00,FF,RANDOM", 7)).unwrap();
        assert_eq!(
            seq.passes(),
            &[
                Fixed(0x00),
                Fixed(0xFF),
                Random,
                Fixed(0x00),
                Fixed(0xFF),
                Random,
                Fixed(0x00)
            ]
        );
    }

    #[test]
    fn test_custom_fewer_passes_than_entries() {
        let seq = pattern_sequence(&custom("aa, 5b ,random,00", 2)).unwrap();
        assert_eq!(seq.passes(), &[Fixed(0xAA), Fixed(0x5B)]);
    }

    #[test]
    fn test_custom_empty_defaults_to_random() {
        let seq = pattern_sequence(&custom("", 3)).unwrap();
        assert_eq!(seq.passes(), &[Random, Random, Random]);

        let seq = pattern_sequence(&custom("   ", 1)).unwrap();
        assert_eq!(seq.passes(), &[Random]);
    }

    #[test]
    fn test_custom_invalid_entries_rejected() {
        for bad in ["GG", "0", "100", "0x1F", "00,,FF", "RAND", "ff,zz"] {
            let result = pattern_sequence(&custom(bad, 3));
            assert!(
                matches!(result, Err(Error::InvalidPattern { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_custom_zero_passes_rejected() {
        assert!(matches!(
            pattern_sequence(&custom("00", 0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display_names() {
        let name = |alg| {
            PatternProvider::from_config(&ShredConfig::new(alg))
                .unwrap()
                .display_name()
        };
        assert_eq!(name(Algorithm::Simple), "Simple (1-pass)");
        assert_eq!(name(Algorithm::Dod), "DoD 5220.22-M (3-pass)");
        assert_eq!(name(Algorithm::Gutmann), "Gutmann (29-pass)");
        assert_eq!(name(Algorithm::Custom), "Custom (3-pass)");
    }

    #[test]
    fn test_sequence_display() {
        let seq = pattern_sequence(&ShredConfig::new(Algorithm::Dod)).unwrap();
        assert_eq!(seq.to_string(), "00,FF,RANDOM");
    }
}
