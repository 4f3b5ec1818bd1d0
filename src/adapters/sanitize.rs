//! Log sanitization for secrets and platform identifiers.
//!
//! Task logs leave the enclave: the worker forwards stdout to the requester.
//! Every formatted log line therefore passes through [`sanitize`], which
//! replaces:
//! - bearer tokens (JWTs) and `key=value` style secrets
//! - wallet addresses and long hex strings (keys, task and deal ids);
//!   a digest labelled `sha256=` is kept so model fingerprints stay visible
//! - email addresses
//! - PEM private key blocks
//!
//! Secrets read by the crate are already redacted at the call site (see
//! `iexec::secrets`); this writer is the fallback for anything that slips
//! through. Input size is capped (`PRIVATEGENOME_SANITIZE_MAX_BYTES`).

use regex::{Captures, Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Defaults to 16 KiB.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;
const SANITIZE_MAX_BYTES_ENV: &str = "PRIVATEGENOME_SANITIZE_MAX_BYTES";

struct Pattern {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Pattern>,
    pem: Pattern,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var(SANITIZE_MAX_BYTES_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        // Applied in order; specific patterns come before the broad hex rule.
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b",
                "[REDACTED-JWT]",
            ),
            (
                r"(?i)\b(?:api[_-]?key|access[_-]?token|secret|password|private[_-]?key|mnemonic|seed|token)\b\s*[:=]\s*\S{8,}",
                "[REDACTED-SECRET]",
            ),
            (r"\b0x[0-9a-fA-F]{40}\b", "[REDACTED-ADDRESS]"),
            // Group 1 marks a labelled digest (the model fingerprint), kept as is.
            (
                r"(?i)(sha256\s*[=:]\s*)?\b(?:0x)?[0-9a-f]{32,}\b",
                "[REDACTED-HEX]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Pattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        // Kept out of the set: a large dot-matches-newline pattern bloats it.
        let pem = Pattern {
            regex: Regex::new(
                r"(?s)-----BEGIN [A-Z0-9 ]{0,40}PRIVATE KEY-----.{0,8192}?-----END [A-Z0-9 ]{0,40}PRIVATE KEY-----",
            )
            .expect("Valid regex"),
            replacement: "[REDACTED-PRIVATE-KEY]",
        };

        Patterns { set, rules, pem }
    })
}

/// Sanitize a string by replacing secret and identifier patterns.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let p = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in p.set.matches(prefix).into_iter() {
        let rule = &p.rules[idx];
        result = rule
            .regex
            .replace_all(&result, |caps: &Captures<'_>| {
                if caps.get(1).is_some() {
                    caps[0].to_string()
                } else {
                    rule.replacement.to_string()
                }
            })
            .into_owned();
    }
    if result.contains("-----BEGIN ") {
        result = p.pem.regex.replace_all(&result, p.pem.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    let p = patterns();
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    p.set.is_match(prefix) || (prefix.contains("-----BEGIN ") && p.pem.regex.is_match(prefix))
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single huge line without newlines must not buffer unboundedly.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
