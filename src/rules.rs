// src/rules.rs
//
// Ordered substitution table applied to the document buffer.
//
// - Literal fixes first: exact needles for the tags and class fragments that are
//   known to be damaged, found with memmem.
// - Pattern fixes next: regexes that generalize the literal fixes to any tag name,
//   any `>` after a quote/word char, and `name = "..."` / `name = '...'`.
// - Template fixes last: `${ ` and ` }`. The ` }` needle is unanchored on purpose
//   and collapses a space before ANY closing brace in the file.
// - Every rule runs once, in table order, over the output of the previous one.
//   Matches are global, non-overlapping, left to right.
// - `\s` and `\w` are Unicode-aware (regex crate default).

use memchr::memmem;
use regex::{Captures, Regex};

/* ============================== Rule tables ============================== */

const LITERAL_FIXES: &[(&str, &str)] = &[
    ("< div", "<div"),
    ("< table", "<table"),
    ("< button", "<button"),
    ("< input", "<input"),
    ("< label", "<label"),
    ("< span", "<span"),
    ("< p", "<p"),
    ("< textarea", "<textarea"),
    ("< option", "<option"),
    ("</ div", "</div"),
    ("</ table", "</table"),
    ("</ button", "</button"),
    ("</ label", "</label"),
    ("</ span", "</span"),
    ("</ p", "</p"),
    ("</ textarea", "</textarea"),
    ("</ option", "</option"),
    ("data - index", "data-index"),
    ("omr - ", "omr-"),
    ("q - ", "q-"),
    ("status - ", "status-"),
    ("badge - ", "badge-"),
];

/// (label, pattern, replacement). Replacements use `${n}` so a group is never
/// read as part of a longer name.
const PATTERN_FIXES: &[(&str, &str, &str)] = &[
    ("opening-tag", r"<\s+([a-zA-Z0-9-]+)", "<${1}"),
    ("closing-tag", r"</\s+([a-zA-Z0-9-]+)", "</${1}"),
    ("closing-bracket", r#"(["'\w])\s+>"#, "${1}>"),
    ("attribute-double-quote", r#"([a-zA-Z0-9-]+)\s+=\s+""#, "${1}=\""),
    ("attribute-single-quote", r"([a-zA-Z0-9-]+)\s+=\s+'", "${1}='"),
];

const TEMPLATE_FIXES: &[(&str, &str)] = &[("${ ", "${"), (" }", "}")];

/* ================================= Rules ================================= */

enum Matcher {
    Literal(memmem::Finder<'static>),
    Pattern(Regex),
}

/// One step of the normalization pass.
pub struct Rule {
    label: &'static str,
    matcher: Matcher,
    replacement: &'static str,
}

impl Rule {
    fn literal(find: &'static str, replacement: &'static str) -> Self {
        Rule {
            label: find,
            matcher: Matcher::Literal(memmem::Finder::new(find)),
            replacement,
        }
    }

    fn pattern(
        label: &'static str,
        pattern: &str,
        replacement: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Rule {
            label,
            matcher: Matcher::Pattern(Regex::new(pattern)?),
            replacement,
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Rewrite every match in `buf`, returning the new buffer and the number of
    /// substitutions made. An untouched buffer is handed back without copying.
    fn apply(&self, buf: String) -> (String, usize) {
        match &self.matcher {
            Matcher::Literal(finder) => replace_literal(finder, self.replacement, buf),
            Matcher::Pattern(re) => {
                if !re.is_match(&buf) {
                    return (buf, 0);
                }
                let mut hits = 0usize;
                let out = re
                    .replace_all(&buf, |caps: &Captures<'_>| {
                        hits += 1;
                        let mut dst = String::new();
                        caps.expand(self.replacement, &mut dst);
                        dst
                    })
                    .into_owned();
                (out, hits)
            }
        }
    }
}

fn replace_literal(finder: &memmem::Finder<'_>, replacement: &str, buf: String) -> (String, usize) {
    if finder.find(buf.as_bytes()).is_none() {
        return (buf, 0);
    }

    // Needle and haystack are both valid UTF-8, so every match starts and ends
    // on a char boundary.
    let needle_len = finder.needle().len();
    let mut out = String::with_capacity(buf.len());
    let mut last = 0usize;
    let mut hits = 0usize;
    for start in finder.find_iter(buf.as_bytes()) {
        out.push_str(&buf[last..start]);
        out.push_str(replacement);
        last = start + needle_len;
        hits += 1;
    }
    out.push_str(&buf[last..]);
    (out, hits)
}

/* ================================ Report ================================= */

/// Per-rule substitution counts, in rule order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    entries: Vec<(&'static str, usize)>,
}

impl Report {
    fn record(&mut self, label: &'static str, hits: usize) {
        self.entries.push((label, hits));
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, hits)| hits).sum()
    }

    /// Rules that changed the buffer at least once.
    pub fn changed(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.entries.iter().copied().filter(|&(_, hits)| hits > 0)
    }

    #[cfg(test)]
    fn hits(&self, label: &str) -> usize {
        self.entries
            .iter()
            .filter(|&&(l, _)| l == label)
            .map(|&(_, hits)| hits)
            .sum()
    }
}

/* ============================== Normalizer =============================== */

pub struct Normalizer {
    rules: Vec<Rule>,
}

impl Normalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let mut rules = Vec::with_capacity(
            LITERAL_FIXES.len() + PATTERN_FIXES.len() + TEMPLATE_FIXES.len(),
        );
        rules.extend(LITERAL_FIXES.iter().map(|&(f, r)| Rule::literal(f, r)));
        for &(label, pattern, replacement) in PATTERN_FIXES {
            rules.push(Rule::pattern(label, pattern, replacement)?);
        }
        rules.extend(TEMPLATE_FIXES.iter().map(|&(f, r)| Rule::literal(f, r)));
        Ok(Normalizer { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule over `text` in order.
    pub fn normalize(&self, text: &str) -> (String, Report) {
        let mut report = Report::default();
        let out = self.rules.iter().fold(text.to_owned(), |buf, rule| {
            let (next, hits) = rule.apply(buf);
            report.record(rule.label, hits);
            next
        });
        (out, report)
    }
}

/* ================================= Tests ================================= */
