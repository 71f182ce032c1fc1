//! Beam-search decoding over an abstract next-token scorer.

/// Produces next-token log-probabilities for a batch of decoder prefixes.
///
/// Every prefix in a call has the same length. The returned outer `Vec` is
/// parallel to `prefixes`; each inner `Vec` has one entry per vocabulary id.
pub trait StepScorer {
    type Error;

    fn log_probs(&mut self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamConfig {
    pub num_beams: usize,
    /// Cap on the decoder sequence length, forced prefix included.
    pub max_length: usize,
    pub eos_id: u32,
    pub length_penalty: f32,
}

impl BeamConfig {
    pub const fn new(num_beams: usize, max_length: usize, eos_id: u32) -> Self {
        Self {
            num_beams,
            max_length,
            eos_id,
            length_penalty: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Beam {
    tokens: Vec<u32>,
    score: f32,
}

#[derive(Debug, Clone)]
struct Hypothesis {
    /// Generated tokens: forced prefix and EOS stripped.
    tokens: Vec<u32>,
    normalized: f32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    beam: usize,
    token: u32,
    score: f32,
}

/// Runs beam search from `prefix` and returns the best generated sequence.
///
/// Finishes early once `num_beams` hypotheses have emitted EOS. Beams still
/// alive when `max_length` is reached are scored as they stand.
pub fn beam_search<S: StepScorer>(
    scorer: &mut S,
    prefix: &[u32],
    config: &BeamConfig,
) -> Result<Vec<u32>, S::Error> {
    let num_beams = config.num_beams.max(1);
    let mut finished: Vec<Hypothesis> = Vec::new();
    let mut live = vec![Beam {
        tokens: prefix.to_vec(),
        score: 0.0,
    }];

    while !live.is_empty() {
        let length = live[0].tokens.len();
        if length >= config.max_length {
            finished.extend(live.drain(..).map(|beam| finalize(&beam, prefix.len(), config)));
            break;
        }

        let prefixes: Vec<Vec<u32>> = live.iter().map(|b| b.tokens.clone()).collect();
        let log_probs = scorer.log_probs(&prefixes)?;

        let mut candidates: Vec<Candidate> = Vec::with_capacity(live.len() * 2 * num_beams);
        for (beam_index, (beam, row)) in live.iter().zip(&log_probs).enumerate() {
            for (token, lp) in top_k(row, 2 * num_beams) {
                candidates.push(Candidate {
                    beam: beam_index,
                    token: token as u32,
                    score: beam.score + lp,
                });
            }
        }
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(2 * num_beams);

        let mut next = Vec::with_capacity(num_beams);
        for (rank, candidate) in candidates.iter().enumerate() {
            let parent = &live[candidate.beam];
            if candidate.token == config.eos_id {
                // An EOS ranked below the beam width would displace nothing.
                if rank < num_beams {
                    finished.push(finalize(
                        &Beam {
                            tokens: parent.tokens.clone(),
                            score: candidate.score,
                        },
                        prefix.len(),
                        config,
                    ));
                }
                continue;
            }

            let mut tokens = Vec::with_capacity(parent.tokens.len() + 1);
            tokens.extend_from_slice(&parent.tokens);
            tokens.push(candidate.token);
            next.push(Beam {
                tokens,
                score: candidate.score,
            });
            if next.len() == num_beams {
                break;
            }
        }

        if finished.len() >= num_beams {
            break;
        }
        live = next;
    }

    Ok(finished
        .into_iter()
        .max_by(|a, b| a.normalized.total_cmp(&b.normalized))
        .map(|h| h.tokens)
        .unwrap_or_default())
}

fn finalize(beam: &Beam, prefix_len: usize, config: &BeamConfig) -> Hypothesis {
    let tokens = beam.tokens[prefix_len.min(beam.tokens.len())..].to_vec();
    // Count the closing EOS (or the would-be next token at the cap) so the
    // divisor is never zero.
    let length = (tokens.len() + 1) as f32;
    Hypothesis {
        tokens,
        normalized: beam.score / length.powf(config.length_penalty),
    }
}

/// The `k` largest entries of `values` as `(index, value)`, in no particular order.
fn top_k(values: &[f32], k: usize) -> Vec<(usize, f32)> {
    let k = k.min(values.len());
    if k == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.select_nth_unstable_by(k - 1, |&a, &b| values[b].total_cmp(&values[a]));
    indices.truncate(k);
    indices.into_iter().map(|i| (i, values[i])).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const START: u32 = 1;
    const EOS: u32 = 2;
    const A: u32 = 3;
    const B: u32 = 4;
    const VOCAB: usize = 5;
    const TINY: f32 = 1e-9;

    /// Scores the next token from the last token of each prefix.
    struct TableScorer<F: Fn(&[u32]) -> [f32; VOCAB]> {
        probs: F,
        calls: usize,
    }

    impl<F: Fn(&[u32]) -> [f32; VOCAB]> TableScorer<F> {
        const fn new(probs: F) -> Self {
            Self { probs, calls: 0 }
        }
    }

    impl<F: Fn(&[u32]) -> [f32; VOCAB]> StepScorer for TableScorer<F> {
        type Error = String;

        fn log_probs(&mut self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, String> {
            self.calls += 1;
            let length = prefixes[0].len();
            assert!(prefixes.iter().all(|p| p.len() == length));
            Ok(prefixes
                .iter()
                .map(|p| (self.probs)(p).iter().map(|x| x.ln()).collect())
                .collect())
        }
    }

    struct FailingScorer;

    impl StepScorer for FailingScorer {
        type Error = String;

        fn log_probs(&mut self, _prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, String> {
            Err("decoder exploded".to_string())
        }
    }

    /// Greedy decoding would take A first, but B followed by EOS is the better sequence.
    fn garden_path(prefix: &[u32]) -> [f32; VOCAB] {
        match prefix.last().copied() {
            Some(START) => [TINY, TINY, TINY, 0.55, 0.45],
            Some(A) => [TINY, TINY, 0.30, 0.35, 0.35],
            Some(B) => [TINY, TINY, 0.95, 0.025, 0.025],
            _ => [TINY, TINY, 1.0, TINY, TINY],
        }
    }

    #[test]
    fn test_beam_search_beats_greedy() {
        let mut scorer = TableScorer::new(garden_path);
        let config = BeamConfig::new(2, 10, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert_eq!(output, vec![B]);
    }

    /// Greedy keeps extending A; a wider beam finds B followed by EOS.
    fn greedy_trap(prefix: &[u32]) -> [f32; VOCAB] {
        match prefix.last().copied() {
            Some(START) => [TINY, TINY, TINY, 0.55, 0.45],
            Some(A) => [TINY, TINY, 0.25, 0.45, 0.30],
            Some(B) => [TINY, TINY, 0.95, 0.025, 0.025],
            _ => [TINY, TINY, 1.0, TINY, TINY],
        }
    }

    #[test]
    fn test_single_beam_is_greedy() {
        let mut scorer = TableScorer::new(greedy_trap);
        let config = BeamConfig::new(1, 4, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert_eq!(output, vec![A, A, A]);

        let mut scorer = TableScorer::new(greedy_trap);
        let config = BeamConfig::new(2, 4, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert_eq!(output, vec![B]);
    }

    #[test]
    fn test_early_stopping_limits_steps() {
        let mut scorer = TableScorer::new(|_: &[u32]| [TINY, TINY, 0.9, 0.05, 0.05]);
        let config = BeamConfig::new(4, 250, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert!(output.is_empty());
        assert!(scorer.calls < 5);
    }

    #[test]
    fn test_length_cap_finalizes_live_beams() {
        let mut scorer = TableScorer::new(|_: &[u32]| [TINY, TINY, TINY, 0.9, 0.1]);
        let config = BeamConfig::new(4, 5, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert_eq!(output, vec![A, A, A, A]);
    }

    #[test]
    fn test_forced_prefix_not_in_output() {
        let mut scorer = TableScorer::new(garden_path);
        let config = BeamConfig::new(4, 10, EOS);
        let output = beam_search(&mut scorer, &[EOS, START], &config).unwrap();
        assert_eq!(output, vec![B]);
    }

    #[test]
    fn test_prefix_at_cap_returns_empty() {
        let mut scorer = TableScorer::new(garden_path);
        let config = BeamConfig::new(4, 1, EOS);
        let output = beam_search(&mut scorer, &[START], &config).unwrap();
        assert!(output.is_empty());
        assert_eq!(scorer.calls, 0);
    }

    #[test]
    fn test_scorer_error_propagates() {
        let config = BeamConfig::new(4, 10, EOS);
        let result = beam_search(&mut FailingScorer, &[START], &config);
        assert_eq!(result, Err("decoder exploded".to_string()));
    }

    #[test]
    fn test_top_k() {
        let mut top = top_k(&[0.1, 0.5, 0.3, 0.9], 2);
        top.sort_by_key(|(i, _)| *i);
        assert_eq!(top, vec![(1, 0.5), (3, 0.9)]);
        assert!(top_k(&[], 3).is_empty());
        assert_eq!(top_k(&[1.0], 3).len(), 1);
    }
}
