//! Regex-driven generation.
//!
//! `valid()` walks the pattern's HIR and emits one string structurally:
//! literals as-is, a random member of each class, a random branch of each
//! alternation, a random count for each repetition (unbounded repetitions
//! are capped at `min + max_repetition`). Look-around assertions emit
//! nothing. Every candidate is checked against the compiled regex before it
//! is returned.
//!
//! `invalid()` perturbs valid strings until one stops matching, up to the
//! configured number of tries, then falls back to the empty string.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use regex_syntax::hir::{Class, ClassBytes, ClassUnicode, Hir, HirKind};

use casegen_ir::{Value, ValueDomain};

use super::GenerationError;

/// Printable ASCII, preferred whenever a class allows it.
const PRINTABLE: (u32, u32) = (0x20, 0x7E);

/// Characters spliced into valid strings to break them.
const FOREIGN: &[char] = &[
    '#', '!', '%', '&', '*', '~', '^', '|', '<', '>', '?', '"', '\'', ' ', '\u{e9}', '\u{3a9}', '0',
    '9', 'Z', 'q',
];

/// Pattern-based generator.
pub struct PatternGenerator<'a, R: Rng + ?Sized> {
    domain: ValueDomain,
    pattern: String,
    hir: Hir,
    regex: Regex,
    max_repetition: u32,
    tries: usize,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> PatternGenerator<'a, R> {
    pub fn new(
        domain: ValueDomain,
        pattern: &str,
        max_repetition: u32,
        tries: usize,
        rng: &'a mut R,
    ) -> Result<Self, GenerationError> {
        let malformed = |message: String| GenerationError::MalformedPattern {
            pattern: pattern.to_string(),
            message,
        };
        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| malformed(e.to_string()))?;
        let regex = Regex::new(pattern).map_err(|e| malformed(e.to_string()))?;
        Ok(Self {
            domain,
            pattern: pattern.to_string(),
            hir,
            regex,
            max_repetition,
            tries: tries.max(1),
            rng,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    fn render(&mut self) -> Result<String, GenerationError> {
        let mut out = String::new();
        render(&self.hir, &mut *self.rng, self.max_repetition, &mut out).map_err(|reason| {
            GenerationError::UnsupportedPattern {
                pattern: self.pattern.clone(),
                reason,
            }
        })?;
        Ok(out)
    }

    /// A string that matches the pattern.
    pub fn valid(&mut self) -> Result<String, GenerationError> {
        for attempt in 0..self.tries {
            let candidate = self.render()?;
            if self.regex.is_match(&candidate) {
                return Ok(candidate);
            }
            tracing::trace!(pattern = %self.pattern, attempt, "rendered candidate did not match");
        }
        Err(GenerationError::Unsatisfiable {
            pattern: self.pattern.clone(),
            tries: self.tries,
        })
    }

    /// A string that does not match the pattern, or `""` once tries run out.
    pub fn invalid(&mut self) -> Result<String, GenerationError> {
        for _ in 0..self.tries {
            let base = self.render().unwrap_or_default();
            let candidate = self.perturb(base);
            if !self.regex.is_match(&candidate) {
                return Ok(candidate);
            }
        }
        tracing::debug!(
            pattern = %self.pattern,
            tries = self.tries,
            "no invalid value found, falling back to empty string"
        );
        Ok(String::new())
    }

    /// `valid()` converted into the generator's domain.
    ///
    /// Renders again while the text does not parse in the domain, up to the
    /// retry bound; the last text is kept as a string once tries run out.
    pub fn valid_value(&mut self) -> Result<Value, GenerationError> {
        let mut text = self.valid()?;
        for _ in 1..self.tries {
            if parse_in_domain(self.domain, &text).is_some() {
                break;
            }
            text = self.valid()?;
        }
        Ok(text_to_value(self.domain, text))
    }

    /// `invalid()` converted into the generator's domain where it parses.
    pub fn invalid_value(&mut self) -> Result<Value, GenerationError> {
        let text = self.invalid()?;
        Ok(text_to_value(self.domain, text))
    }

    fn foreign_char(&mut self) -> char {
        FOREIGN.choose(&mut *self.rng).copied().unwrap_or('#')
    }

    fn perturb(&mut self, base: String) -> String {
        let mut chars: Vec<char> = base.chars().collect();
        match self.rng.gen_range(0..5) {
            0 if !chars.is_empty() => {
                let i = self.rng.gen_range(0..chars.len());
                chars[i] = self.foreign_char();
            }
            1 => {
                let i = self.rng.gen_range(0..=chars.len());
                let c = self.foreign_char();
                chars.insert(i, c);
            }
            2 if !chars.is_empty() => {
                let i = self.rng.gen_range(0..chars.len());
                chars.remove(i);
            }
            3 if !chars.is_empty() => {
                let copy = chars.clone();
                chars.extend(copy);
            }
            _ => {
                let n = self.rng.gen_range(1..=8);
                chars = (0..n).map(|_| self.foreign_char()).collect();
            }
        }
        chars.into_iter().collect()
    }
}

fn render<R: Rng + ?Sized>(
    hir: &Hir,
    rng: &mut R,
    max_repetition: u32,
    out: &mut String,
) -> Result<(), String> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}
        HirKind::Literal(lit) => {
            let text = std::str::from_utf8(&lit.0).map_err(|_| "non-UTF-8 literal".to_string())?;
            out.push_str(text);
        }
        HirKind::Class(Class::Unicode(class)) => out.push(pick_unicode(class, rng)?),
        HirKind::Class(Class::Bytes(class)) => out.push(pick_byte(class, rng)?),
        HirKind::Repetition(rep) => {
            let max = rep
                .max
                .unwrap_or_else(|| rep.min.saturating_add(max_repetition))
                .max(rep.min);
            let count = rng.gen_range(rep.min..=max);
            for _ in 0..count {
                render(&rep.sub, rng, max_repetition, out)?;
            }
        }
        HirKind::Capture(cap) => render(&cap.sub, rng, max_repetition, out)?,
        HirKind::Concat(subs) => {
            for sub in subs {
                render(sub, rng, max_repetition, out)?;
            }
        }
        HirKind::Alternation(subs) => {
            let sub = subs.choose(rng).ok_or_else(|| "empty alternation".to_string())?;
            render(sub, rng, max_repetition, out)?;
        }
    }
    Ok(())
}

/// Weighted pick over inclusive `(start, end)` code point ranges.
fn pick_in_ranges<R: Rng + ?Sized>(ranges: &[(u32, u32)], rng: &mut R) -> Option<u32> {
    let total: u64 = ranges.iter().map(|(s, e)| u64::from(e - s) + 1).sum();
    if total == 0 {
        return None;
    }
    let mut offset = rng.gen_range(0..total);
    for (s, e) in ranges {
        let width = u64::from(e - s) + 1;
        if offset < width {
            return Some(s + offset as u32);
        }
        offset -= width;
    }
    None
}

fn printable_part(ranges: &[(u32, u32)]) -> Vec<(u32, u32)> {
    ranges
        .iter()
        .filter_map(|&(s, e)| {
            let (lo, hi) = (s.max(PRINTABLE.0), e.min(PRINTABLE.1));
            (lo <= hi).then_some((lo, hi))
        })
        .collect()
}

fn pick_unicode<R: Rng + ?Sized>(class: &ClassUnicode, rng: &mut R) -> Result<char, String> {
    let ranges: Vec<(u32, u32)> = class
        .ranges()
        .iter()
        .map(|r| (u32::from(r.start()), u32::from(r.end())))
        .collect();
    let printable = printable_part(&ranges);
    let pool = if printable.is_empty() { &ranges } else { &printable };
    let code = pick_in_ranges(pool, rng).ok_or_else(|| "empty character class".to_string())?;
    // Ranges may straddle the surrogate gap; fall back to the range start.
    char::from_u32(code)
        .or_else(|| {
            pool.iter()
                .find(|(s, e)| (*s..=*e).contains(&code))
                .and_then(|(s, _)| char::from_u32(*s))
        })
        .ok_or_else(|| "class member is not a scalar value".to_string())
}

fn pick_byte<R: Rng + ?Sized>(class: &ClassBytes, rng: &mut R) -> Result<char, String> {
    let ascii: Vec<(u32, u32)> = class
        .ranges()
        .iter()
        .filter_map(|r| {
            let (s, e) = (u32::from(r.start()), u32::from(r.end()).min(0x7F));
            (s <= e).then_some((s, e))
        })
        .collect();
    let printable = printable_part(&ascii);
    let pool = if printable.is_empty() { &ascii } else { &printable };
    pick_in_ranges(pool, rng)
        .and_then(char::from_u32)
        .ok_or_else(|| "byte class has no ASCII member".to_string())
}

/// Parse text as a value of `domain`. Strings always parse.
pub fn parse_in_domain(domain: ValueDomain, text: &str) -> Option<Value> {
    match domain {
        ValueDomain::Integer => text.parse().ok().map(Value::Integer),
        ValueDomain::Double => text
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(Value::Double),
        ValueDomain::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        ValueDomain::Time => NaiveTime::parse_from_str(text, "%H:%M:%S")
            .ok()
            .map(Value::Time),
        ValueDomain::DateTime => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(Value::DateTime),
        ValueDomain::Boolean => text.parse().ok().map(Value::Boolean),
        ValueDomain::String => Some(Value::String(text.to_string())),
    }
}

/// Interpret generated text in `domain`, keeping it as a string when it
/// does not parse.
pub fn text_to_value(domain: ValueDomain, text: String) -> Value {
    match domain {
        ValueDomain::String => Value::String(text),
        domain => parse_in_domain(domain, &text).unwrap_or(Value::String(text)),
    }
}
