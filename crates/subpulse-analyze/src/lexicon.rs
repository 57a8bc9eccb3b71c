//! Valence-lexicon polarity scorer, modelled on VADER.
//!
//! Each token is looked up in a valence table (roughly -4..4). Valences are
//! adjusted by nearby boosters and negations, ALL-CAPS emphasis, the "but"
//! contrast rule and trailing `!`/`?` emphasis, then summed and squashed into
//! a compound score in [-1, 1]. The built-in table is a small subset; a full
//! VADER lexicon file can be loaded with [`LexiconScorer::from_vader_file`].

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use subpulse_core::{Error, PolarityScore, Result};

use crate::scorers::PolarityScorer;

/// Booster increment.
const B_INCR: f64 = 0.293;
/// Booster decrement.
const B_DECR: f64 = -0.293;
/// ALL-CAPS emphasis increment.
const C_INCR: f64 = 0.733;
/// Negation scalar.
const N_SCALAR: f64 = -0.74;
/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for w in [
        "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly",
        "deeply", "effing", "enormously", "entirely", "especially", "exceptionally",
        "extremely", "fabulously", "flipping", "flippin", "fricking", "frickin", "frigging",
        "friggin", "fully", "fucking", "greatly", "hella", "highly", "hugely",
        "incredibly", "intensely", "majorly", "more", "most", "particularly", "purely",
        "quite", "really", "remarkably", "so", "substantially", "thoroughly", "totally",
        "tremendously", "uber", "unbelievably", "unusually", "utterly", "very",
    ] {
        m.insert(w, B_INCR);
    }
    for w in [
        "almost", "barely", "hardly", "kinda", "kindof", "kind-of", "less", "little",
        "marginally", "occasionally", "partly", "scarcely", "slightly", "somewhat",
        "sorta", "sortof", "sort-of",
    ] {
        m.insert(w, B_DECR);
    }
    m
});

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont",
    "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never",
    "none", "nope", "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt",
    "uhuh", "uh-uh", "wasnt", "werent", "without", "wont", "wouldnt", "rarely", "seldom",
    "despite",
];

/// Built-in valences (subset of the VADER lexicon).
const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // positive
    ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8),
    ("awesome", 3.1), ("love", 3.2), ("loved", 2.9), ("loves", 2.7), ("lovely", 2.8),
    ("like", 1.5), ("liked", 1.8), ("best", 3.2), ("better", 1.9), ("nice", 1.8),
    ("happy", 2.7), ("happiness", 2.6), ("glad", 2.0), ("fun", 2.3), ("funny", 1.9),
    ("cool", 1.3), ("wonderful", 2.7), ("fantastic", 2.6), ("beautiful", 2.9),
    ("perfect", 2.7), ("brilliant", 2.8), ("enjoy", 2.2), ("enjoyed", 2.3),
    ("excited", 1.4), ("exciting", 2.2), ("thanks", 1.9), ("thank", 1.5),
    ("win", 2.8), ("winning", 2.4), ("won", 2.7), ("success", 2.7),
    ("successful", 2.8), ("helpful", 1.8), ("hope", 1.9), ("interesting", 1.7),
    ("impressive", 2.3), ("recommend", 1.5), ("support", 1.7), ("safe", 1.9),
    ("strong", 2.3), ("agree", 1.5), ("yes", 1.7), ("free", 2.3), ("ok", 1.2),
    ("okay", 0.9), ("positive", 2.6), ("proud", 2.1), ("smart", 1.7), ("super", 2.9),
    ("wow", 2.8), ("lol", 1.8), ("haha", 2.0), ("care", 2.2), ("pretty", 2.2),
    ("kind", 2.4), ("friendly", 2.2), ("fair", 1.3), ("favorite", 2.0),
    ("useful", 1.9), ("easy", 1.9), ("clean", 1.7), ("solid", 0.6), ("fixed", 0.9),
    ("improved", 2.1), ("improvement", 2.0), ("congrats", 2.4), ("congratulations", 2.9),
    ("welcome", 2.0), ("win-win", 2.7), ("beautifully", 2.7), ("incredible", 3.4),
    ("joy", 2.8), ("laugh", 2.6), ("peace", 2.5), ("trust", 2.3), ("worth", 0.9),
    (":)", 2.0), (":-)", 2.0), (":d", 2.3), ("<3", 1.9),
    // negative
    ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5),
    ("worst", -3.1), ("worse", -2.1), ("hate", -2.7), ("hated", -3.2), ("hates", -1.9),
    ("sad", -2.1), ("angry", -2.3), ("anger", -2.7), ("disappointed", -1.9),
    ("disappointing", -2.2), ("poor", -2.1), ("problem", -1.7), ("problems", -1.7),
    ("fail", -2.5), ("failed", -2.3), ("failure", -2.3), ("broken", -2.1),
    ("wrong", -2.1), ("stupid", -2.4), ("dumb", -2.3), ("ugly", -2.3),
    ("annoying", -1.7), ("boring", -1.3), ("sucks", -1.5), ("suck", -1.9),
    ("crap", -1.6), ("shit", -2.6), ("damn", -1.7), ("kill", -3.7), ("killed", -3.5),
    ("death", -2.9), ("dead", -3.3), ("die", -2.9), ("war", -2.9), ("crisis", -3.1),
    ("scam", -2.5), ("fear", -2.2), ("scared", -1.9), ("afraid", -2.0),
    ("worried", -1.2), ("worry", -1.9), ("lose", -1.7), ("lost", -1.3), ("loss", -1.3),
    ("pain", -2.3), ("hurt", -2.4), ("sick", -2.3), ("crash", -1.7), ("attack", -2.1),
    ("no", -1.2), ("fake", -2.1), ("racist", -3.1), ("evil", -3.4), ("disaster", -3.1),
    ("mess", -1.5), ("useless", -1.8), ("toxic", -2.4), ("cry", -2.1), ("sorry", -0.3),
    ("risk", -1.1), ("danger", -2.4), ("dangerous", -2.1), ("difficult", -1.5),
    ("tired", -1.9), ("lonely", -2.0), ("depressed", -2.3), ("depression", -2.7),
    ("stress", -1.8), ("stressed", -1.4), ("threat", -2.4), ("violence", -3.1),
    ("abuse", -3.2), ("corrupt", -3.0), ("fraud", -2.8), ("ban", -2.6), ("banned", -2.0),
    ("hell", -3.6), ("rip", -1.6), ("wtf", -2.8), ("ridiculous", -1.5), ("lame", -1.8),
    ("garbage", -2.0), ("trash", -1.6), ("unfair", -2.1), ("outrage", -2.3),
    ("greedy", -1.3), ("collapse", -2.2), ("crashes", -1.7), ("bug", -0.5),
    (":(", -1.9), (":-(", -1.9), (":'(", -2.2),
];

/// VADER-style polarity scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(
            BUILTIN_LEXICON
                .iter()
                .map(|(w, v)| (w.to_string(), *v))
                .collect(),
        )
    }

    /// Scorer over a custom lexicon. Keys are matched lowercase.
    pub fn with_lexicon(lexicon: HashMap<String, f64>) -> Self {
        let lexicon = lexicon
            .into_iter()
            .map(|(w, v)| (w.to_lowercase(), v))
            .collect();
        Self { lexicon }
    }

    /// Load a `vader_lexicon.txt` style file: `token<TAB>mean<TAB>...` per line.
    pub fn from_vader_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read lexicon {}: {}", path.display(), e))
        })?;
        Ok(Self::with_lexicon(parse_vader_lexicon(&contents)?))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// Per-token valences after booster, negation and caps adjustments.
    fn valences(&self, tokens: &[&str], lowered: &[String]) -> Vec<f64> {
        let cap_diff = allcap_differential(tokens);
        let mut sentiments = Vec::with_capacity(tokens.len());

        for (i, lower) in lowered.iter().enumerate() {
            if BOOSTERS.contains_key(lower.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            let Some(&base) = self.lexicon.get(lower) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if cap_diff && is_upper(tokens[i]) {
                valence += if valence > 0.0 { C_INCR } else { -C_INCR };
            }

            for start_i in 0..3 {
                if i <= start_i {
                    break;
                }
                let prev = i - start_i - 1;
                if self.lexicon.contains_key(&lowered[prev]) {
                    continue;
                }

                let mut s = scalar_inc_dec(tokens[prev], &lowered[prev], valence, cap_diff);
                if start_i == 1 {
                    s *= 0.95;
                } else if start_i == 2 {
                    s *= 0.9;
                }
                valence += s;

                if is_negated(&lowered[prev]) {
                    let intensifies = start_i > 0
                        && lowered[prev] == "never"
                        && matches!(lowered[prev + 1].as_str(), "so" | "this");
                    valence *= if intensifies { 1.25 } else { N_SCALAR };
                }
            }

            // "least" negates unless it is "at least" / "very least"
            if i > 0 && lowered[i - 1] == "least" && !self.lexicon.contains_key("least") {
                let guarded = i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very");
                if !guarded {
                    valence *= N_SCALAR;
                }
            }

            sentiments.push(valence);
        }

        but_check(lowered, &mut sentiments);
        sentiments
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<PolarityScore> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(PolarityScore::zero());
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let sentiments = self.valences(&tokens, &lowered);
        Ok(score_valence(&sentiments, text))
    }
}

/// Parse the VADER lexicon format. Blank lines and `#` comments are skipped.
pub fn parse_vader_lexicon(contents: &str) -> Result<HashMap<String, f64>> {
    let mut lexicon = HashMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let word = fields.next().unwrap_or_default();
        let value = fields
            .next()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .ok_or_else(|| {
                Error::Config(format!("lexicon line {}: missing or invalid valence", lineno + 1))
            })?;
        lexicon.insert(word.to_string(), value);
    }
    Ok(lexicon)
}

/// Split on whitespace and strip surrounding punctuation from word tokens.
/// Tokens that are nothing but punctuation (emoticons) are kept whole.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.is_empty() {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn is_upper(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic())
        && !token.chars().any(|c| c.is_lowercase())
}

/// True when some but not all tokens are ALL CAPS.
fn allcap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_upper(t)).count();
    caps > 0 && caps < tokens.len()
}

fn is_negated(lower: &str) -> bool {
    NEGATIONS.contains(&lower) || lower.contains("n't")
}

fn scalar_inc_dec(token: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(&booster) = BOOSTERS.get(lower) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -booster } else { booster };
    if cap_diff && is_upper(token) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

/// Dampen sentiment before the first "but", amplify it after.
fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < bi {
            *s *= 0.5;
        } else if i > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm_count = text.matches('?').count();
    let qm = match qm_count {
        0 | 1 => 0.0,
        2..=3 => qm_count as f64 * 0.18,
        _ => 0.96,
    };
    ep + qm
}

fn normalize_score(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScore {
    if sentiments.is_empty() {
        return PolarityScore::zero();
    }

    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize_score(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > f64::abs(neg_sum) {
        pos_sum += punct;
    } else if pos_sum < f64::abs(neg_sum) {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    let (positive, neutral, negative) = if total > 0.0 {
        (
            (pos_sum / total).abs(),
            (neu_count / total).abs(),
            (neg_sum / total).abs(),
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    PolarityScore {
        compound: round_to(compound, 4),
        positive: round_to(positive, 3),
        neutral: round_to(neutral, 3),
        negative: round_to(negative, 3),
        label: None,
        confidence: None,
    }
}
