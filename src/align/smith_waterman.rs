//! Affine-gap Smith-Waterman with full traceback.
//!
//! Recurrences (reference column `j` outer, query row `i` inner):
//!
//! ```text
//! E[i][j] = max(H[i][j-1] - open, E[i][j-1] - extend)   deletion
//! F[i][j] = max(H[i-1][j] - open, F[i-1][j] - extend)   insertion
//! H[i][j] = max(0, H[i-1][j-1] + s(q_i, r_j), E[i][j], F[i][j])
//! ```
//!
//! A gap of length `k` therefore costs `open + (k - 1) * extend`.
//!
//! The traceback matrix takes one byte per cell and is only allocated when
//! [`AlignParams::traceback`] is set.

use crate::align::{AlignParams, AlignmentEngine, AlignmentResult, CigarKind, CigarOp};
use crate::core::matrix::ScoringMatrix;

const NEG_INF: i32 = i32::MIN / 4;

// Traceback cell layout: bits 0-1 hold the source of H, bits 2-3 record
// whether E and F were extended rather than opened.
const SRC_MASK: u8 = 0b0011;
const FROM_ZERO: u8 = 0;
const FROM_DIAG: u8 = 1;
const FROM_E: u8 = 2;
const FROM_F: u8 = 3;
const E_EXTENDED: u8 = 0b0100;
const F_EXTENDED: u8 = 0b1000;

/// The bundled local alignment engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmithWaterman;

/// Query profile: for every alphabet symbol, the score of that symbol
/// against each query position.
#[derive(Debug, Clone)]
pub struct QueryProfile {
    query_len: usize,
    alphabet_size: usize,
    scores: Vec<i32>,
}

impl QueryProfile {
    #[must_use]
    pub fn query_len(&self) -> usize {
        self.query_len
    }

    fn row(&self, symbol: u8) -> &[i32] {
        let symbol = usize::from(symbol).min(self.alphabet_size - 1);
        &self.scores[symbol * self.query_len..(symbol + 1) * self.query_len]
    }
}

#[derive(Clone, Copy)]
enum State {
    H,
    E,
    F,
}

impl AlignmentEngine for SmithWaterman {
    type Profile = QueryProfile;

    fn prepare_profile(&self, query: &[u8], matrix: &ScoringMatrix) -> QueryProfile {
        let alphabet_size = matrix.size();
        let fallback = matrix.alphabet().fallback_index();
        let mut scores = Vec::with_capacity(alphabet_size * query.len());
        for symbol in 0..alphabet_size {
            #[allow(clippy::cast_possible_truncation)] // alphabet has at most 256 symbols
            let symbol = symbol as u8;
            scores.extend(
                query
                    .iter()
                    .map(|&q| i32::from(matrix.score(q.min(fallback), symbol))),
            );
        }
        QueryProfile {
            query_len: query.len(),
            alphabet_size,
            scores,
        }
    }

    #[allow(clippy::many_single_char_names)]
    fn align(
        &self,
        profile: &QueryProfile,
        reference: &[u8],
        params: &AlignParams,
    ) -> AlignmentResult {
        let m = profile.query_len;
        let n = reference.len();
        if m == 0 || n == 0 {
            return AlignmentResult::unaligned();
        }

        let open = params.gap_open;
        let extend = params.gap_extend;
        let stride = m + 1;

        let mut trace = if params.traceback {
            vec![0u8; stride * (n + 1)]
        } else {
            Vec::new()
        };
        let mut h_prev = vec![0i32; m + 1];
        let mut h_cur = vec![0i32; m + 1];
        let mut e = vec![NEG_INF; m + 1];
        let mut column_max = vec![0i32; n];

        let mut best = 0i32;
        let mut best_i = 0usize;
        let mut best_j = 0usize;

        for j in 1..=n {
            let row = profile.row(reference[j - 1]);
            h_cur[0] = 0;
            let mut f = NEG_INF;
            let mut col_best = 0i32;

            for i in 1..=m {
                let mut bits = 0u8;

                let e_open = h_prev[i] - open;
                let e_ext = e[i] - extend;
                let e_val = if e_ext > e_open {
                    bits |= E_EXTENDED;
                    e_ext
                } else {
                    e_open
                };
                e[i] = e_val;

                let f_open = h_cur[i - 1] - open;
                let f_ext = f - extend;
                f = if f_ext > f_open {
                    bits |= F_EXTENDED;
                    f_ext
                } else {
                    f_open
                };

                let diag = h_prev[i - 1] + row[i - 1];
                let mut h = 0;
                let mut src = FROM_ZERO;
                if diag > h {
                    h = diag;
                    src = FROM_DIAG;
                }
                if e_val > h {
                    h = e_val;
                    src = FROM_E;
                }
                if f > h {
                    h = f;
                    src = FROM_F;
                }

                if let Some(cell) = trace.get_mut(j * stride + i) {
                    *cell = bits | src;
                }
                h_cur[i] = h;
                col_best = col_best.max(h);
                if h > best {
                    best = h;
                    best_i = i;
                    best_j = j;
                }
            }

            column_max[j - 1] = col_best;
            std::mem::swap(&mut h_prev, &mut h_cur);
        }

        if best == 0 {
            return AlignmentResult::unaligned();
        }

        let ref_end = best_j - 1;
        let query_end = best_i - 1;
        let secondary_score = secondary_score(&column_max, ref_end, params.mask_len);
        if !params.traceback {
            return AlignmentResult {
                score: best,
                secondary_score,
                ref_end,
                query_end,
                ..AlignmentResult::unaligned()
            };
        }
        let (query_begin, ref_begin, cigar) = traceback(&trace, stride, best_i, best_j);

        AlignmentResult {
            score: best,
            secondary_score,
            ref_begin,
            ref_end,
            query_begin,
            query_end,
            cigar,
        }
    }
}

/// Best column maximum outside `[ref_end - mask_len, ref_end + mask_len]`.
fn secondary_score(column_max: &[i32], ref_end: usize, mask_len: usize) -> i32 {
    let left_edge = ref_end.saturating_sub(mask_len);
    let right_edge = ref_end.saturating_add(mask_len);

    let left = column_max[..left_edge].iter().copied().max().unwrap_or(0);
    let right = column_max
        .get(right_edge.saturating_add(1)..)
        .and_then(|tail| tail.iter().copied().max())
        .unwrap_or(0);
    left.max(right)
}

/// Walk back from the best cell; returns 0-based query and reference begins
/// plus the CIGAR in forward order.
fn traceback(
    trace: &[u8],
    stride: usize,
    end_i: usize,
    end_j: usize,
) -> (usize, usize, Vec<CigarOp>) {
    let mut reversed: Vec<CigarOp> = Vec::new();
    let mut push = |kind: CigarKind| match reversed.last_mut() {
        Some(op) if op.kind == kind => op.len += 1,
        _ => reversed.push(CigarOp::new(1, kind)),
    };

    let (mut i, mut j) = (end_i, end_j);
    let (mut query_begin, mut ref_begin) = (end_i - 1, end_j - 1);
    let mut state = State::H;

    while i > 0 && j > 0 {
        let bits = trace[j * stride + i];
        match state {
            State::H => match bits & SRC_MASK {
                FROM_DIAG => {
                    push(CigarKind::Match);
                    query_begin = i - 1;
                    ref_begin = j - 1;
                    i -= 1;
                    j -= 1;
                }
                FROM_E => state = State::E,
                FROM_F => state = State::F,
                _ => break,
            },
            State::E => {
                push(CigarKind::Deletion);
                if bits & E_EXTENDED == 0 {
                    state = State::H;
                }
                j -= 1;
            }
            State::F => {
                push(CigarKind::Insertion);
                if bits & F_EXTENDED == 0 {
                    state = State::H;
                }
                i -= 1;
            }
        }
    }

    reversed.reverse();
    (query_begin, ref_begin, reversed)
}
