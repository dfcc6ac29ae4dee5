use crate::core::matrix::MatrixError;

/// Symbols of the default nucleotide alphabet. `N` is the fallback.
pub const DNA_SYMBOLS: &[u8] = b"ACGTN";

/// An ordered set of symbols with a case-insensitive symbol -> index map.
///
/// The last symbol is the fallback: any input byte that is not in the
/// alphabet encodes to its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    lookup: [Option<u8>; 256],
}

impl Alphabet {
    /// Build an alphabet from its canonical symbols, in index order.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::Malformed` if `symbols` is empty, has more than
    /// 256 entries, or repeats a symbol (case-insensitively).
    pub fn new(symbols: &[u8]) -> Result<Self, MatrixError> {
        if symbols.is_empty() {
            return Err(MatrixError::Malformed("alphabet is empty".to_string()));
        }
        if symbols.len() > 256 {
            return Err(MatrixError::Malformed(format!(
                "alphabet has {} symbols, at most 256 are supported",
                symbols.len()
            )));
        }

        let mut lookup = [None; 256];
        let mut canonical = Vec::with_capacity(symbols.len());
        for (i, &symbol) in symbols.iter().enumerate() {
            let upper = symbol.to_ascii_uppercase();
            if lookup[usize::from(upper)].is_some() {
                return Err(MatrixError::Malformed(format!(
                    "alphabet repeats symbol '{}'",
                    char::from(symbol)
                )));
            }
            #[allow(clippy::cast_possible_truncation)] // len <= 256 checked above
            let index = i as u8;
            lookup[usize::from(upper)] = Some(index);
            lookup[usize::from(upper.to_ascii_lowercase())] = Some(index);
            canonical.push(upper);
        }

        Ok(Self {
            symbols: canonical,
            lookup,
        })
    }

    /// The nucleotide alphabet `A, C, G, T, N`.
    #[must_use]
    pub fn dna() -> Self {
        let mut lookup = [None; 256];
        for (i, &symbol) in DNA_SYMBOLS.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let index = i as u8;
            lookup[usize::from(symbol)] = Some(index);
            lookup[usize::from(symbol.to_ascii_lowercase())] = Some(index);
        }
        Self {
            symbols: DNA_SYMBOLS.to_vec(),
            lookup,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Index used for symbols outside the alphabet.
    #[must_use]
    pub fn fallback_index(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let last = (self.symbols.len() - 1) as u8;
        last
    }

    #[must_use]
    pub fn is_fallback(&self, index: usize) -> bool {
        index == self.symbols.len() - 1
    }

    /// Encode a sequence into alphabet indices.
    ///
    /// Total and length-preserving: unknown symbols become the fallback index.
    #[must_use]
    pub fn encode(&self, sequence: &[u8]) -> Vec<u8> {
        let fallback = self.fallback_index();
        sequence
            .iter()
            .map(|&b| self.lookup[usize::from(b)].unwrap_or(fallback))
            .collect()
    }
}
