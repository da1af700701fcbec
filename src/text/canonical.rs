//! Canonical text form used to compare search terms with rendered page text.
//!
//! Canonical text is lowercase, contains only letters, digits and single
//! spaces, and has ligatures, Greek letters and common math symbols spelled
//! out as ASCII words. Quote characters vanish without leaving a space so
//! that `“don’t”` and `dont` compare equal.
//!
//! Canonicalization is total: every character has a defined outcome, so the
//! functions here never fail.

use phf::phf_map;

/// Ligature glyphs and symbols spelled out as lowercase ASCII.
///
/// Every value is letters only: page text is indexed character by character
/// and each produced character maps back to the same source glyph.
static GLYPH_EXPANSIONS: phf::Map<char, &'static str> = phf_map! {
    // Latin ligatures (U+FB00-U+FB06)
    'ﬀ' => "ff",
    'ﬁ' => "fi",
    'ﬂ' => "fl",
    'ﬃ' => "ffi",
    'ﬄ' => "ffl",
    'ﬅ' => "st",
    'ﬆ' => "st",

    // Greek lowercase and variant forms. Uppercase reaches these through lowercasing.
    'α' => "alpha",
    'β' => "beta",
    'γ' => "gamma",
    'δ' => "delta",
    'ε' => "epsilon",
    'ϵ' => "epsilon",
    'ζ' => "zeta",
    'η' => "eta",
    'θ' => "theta",
    'ϑ' => "theta",
    'ι' => "iota",
    'κ' => "kappa",
    'λ' => "lambda",
    'μ' => "mu",
    'µ' => "mu", // MICRO SIGN
    'ν' => "nu",
    'ξ' => "xi",
    'ο' => "omicron",
    'π' => "pi",
    'ϖ' => "pi",
    'ρ' => "rho",
    'ϱ' => "rho",
    'σ' => "sigma",
    'ς' => "sigma",
    'τ' => "tau",
    'υ' => "upsilon",
    'φ' => "phi",
    'ϕ' => "phi",
    'χ' => "chi",
    'ψ' => "psi",
    'ω' => "omega",

    // Math operators and relations
    '±' => "pm",
    '∓' => "mp",
    '×' => "times",
    '÷' => "div",
    '≤' => "leq",
    '≥' => "geq",
    '≠' => "neq",
    '≈' => "approx",
    '≡' => "equiv",
    '∼' => "sim",
    '∝' => "propto",
    '∞' => "infinity",
    '∑' => "sum",
    '∏' => "prod",
    '∫' => "int",
    '∂' => "partial",
    '∇' => "nabla",
    '√' => "sqrt",
    '∈' => "in",
    '∉' => "notin",
    '⊂' => "subset",
    '⊆' => "subseteq",
    '∪' => "cup",
    '∩' => "cap",
    '∀' => "forall",
    '∃' => "exists",
    '∅' => "emptyset",
    '→' => "to",
    '⇒' => "implies",
    'ℓ' => "ell",
};

/// LaTeX macro names (without the backslash) and their canonical spelling.
///
/// Values agree with [`GLYPH_EXPANSIONS`] so `\leq` in a citation matches a
/// rendered `≤`. Macros for glyphs that canonicalize to a separator map to a space.
static MACRO_EXPANSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "alpha" => "alpha",
    "beta" => "beta",
    "gamma" => "gamma",
    "Gamma" => "gamma",
    "delta" => "delta",
    "Delta" => "delta",
    "epsilon" => "epsilon",
    "varepsilon" => "epsilon",
    "zeta" => "zeta",
    "eta" => "eta",
    "theta" => "theta",
    "vartheta" => "theta",
    "Theta" => "theta",
    "iota" => "iota",
    "kappa" => "kappa",
    "lambda" => "lambda",
    "Lambda" => "lambda",
    "mu" => "mu",
    "nu" => "nu",
    "xi" => "xi",
    "Xi" => "xi",
    "pi" => "pi",
    "varpi" => "pi",
    "Pi" => "pi",
    "rho" => "rho",
    "varrho" => "rho",
    "sigma" => "sigma",
    "varsigma" => "sigma",
    "Sigma" => "sigma",
    "tau" => "tau",
    "upsilon" => "upsilon",
    "Upsilon" => "upsilon",
    "phi" => "phi",
    "varphi" => "phi",
    "Phi" => "phi",
    "chi" => "chi",
    "psi" => "psi",
    "Psi" => "psi",
    "omega" => "omega",
    "Omega" => "omega",
    "pm" => "pm",
    "mp" => "mp",
    "times" => "times",
    "div" => "div",
    "le" => "leq",
    "leq" => "leq",
    "ge" => "geq",
    "geq" => "geq",
    "ne" => "neq",
    "neq" => "neq",
    "approx" => "approx",
    "equiv" => "equiv",
    "sim" => "sim",
    "propto" => "propto",
    "infty" => "infinity",
    "sum" => "sum",
    "prod" => "prod",
    "int" => "int",
    "partial" => "partial",
    "nabla" => "nabla",
    "sqrt" => "sqrt",
    "in" => "in",
    "notin" => "notin",
    "subset" => "subset",
    "subseteq" => "subseteq",
    "cup" => "cup",
    "cap" => "cap",
    "forall" => "forall",
    "exists" => "exists",
    "emptyset" => "emptyset",
    "to" => "to",
    "rightarrow" => "to",
    "implies" => "implies",
    "Rightarrow" => "implies",
    "ell" => "ell",
    "cdot" => " ",
    "cdots" => " ",
    "ldots" => " ",
    "dots" => " ",
};

/// Check if a character is one of the quote marks removed from canonical text.
///
/// # Examples
///
/// ```
/// use pdf_anchor::text::canonical::is_quote_char;
///
/// assert!(is_quote_char('“'));
/// assert!(is_quote_char('\''));
/// assert!(!is_quote_char('-'));
/// ```
pub fn is_quote_char(c: char) -> bool {
    matches!(
        c,
        '"' | '\''
            | '`'
            | '´'
            | '‘' // U+2018
            | '’' // U+2019
            | '‚' // U+201A
            | '‛' // U+201B
            | '“' // U+201C
            | '”' // U+201D
            | '„' // U+201E
            | '‟' // U+201F
            | '′' // U+2032
            | '″' // U+2033
            | '‹'
            | '›'
            | '«'
            | '»'
            | '「'
            | '」'
            | '『'
            | '』'
            | '＂' // FULLWIDTH QUOTATION MARK
            | '＇' // FULLWIDTH APOSTROPHE
    )
}

/// Spell out a ligature, Greek letter or math symbol.
///
/// # Examples
///
/// ```
/// use pdf_anchor::text::canonical::expand_glyph;
///
/// assert_eq!(expand_glyph('ﬁ'), Some("fi"));
/// assert_eq!(expand_glyph('β'), Some("beta"));
/// assert_eq!(expand_glyph('b'), None);
/// ```
pub fn expand_glyph(c: char) -> Option<&'static str> {
    GLYPH_EXPANSIONS.get(&c).copied()
}

/// What a single source character contributes to canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharKind {
    /// Removed without trace
    Quote,
    /// Produced zero or more canonical characters
    Text,
    /// Collapses into a single space
    Separator,
}

/// Feed the canonical characters of `c` to `emit`.
///
/// Nothing is emitted for quotes and separators; the caller decides whether a
/// separator becomes a space.
pub(crate) fn canonical_chars(c: char, mut emit: impl FnMut(char)) -> CharKind {
    if is_quote_char(c) {
        return CharKind::Quote;
    }
    if let Some(expansion) = expand_glyph(c) {
        expansion.chars().for_each(emit);
        return CharKind::Text;
    }
    if !c.is_alphanumeric() {
        return CharKind::Separator;
    }
    for lower in c.to_lowercase() {
        if let Some(expansion) = expand_glyph(lower) {
            expansion.chars().for_each(&mut emit);
        } else if lower.is_alphanumeric() {
            // Drops combining marks some lowercase mappings append (e.g. 'İ').
            emit(lower);
        }
    }
    CharKind::Text
}

/// Expand LaTeX macros such as `\alpha` or `\leq` into their canonical words.
///
/// The longest run of ASCII letters after a backslash is looked up as a whole,
/// so a longer macro is never shadowed by a shorter one it starts with
/// (`\infty` is not `\in` + `fty`), and a known name immediately followed by
/// another letter is left alone. Unknown macros pass through unchanged.
///
/// # Examples
///
/// ```
/// use pdf_anchor::text::canonical::expand_macros;
///
/// assert_eq!(expand_macros(r"\alpha-helix"), "alpha-helix");
/// assert_eq!(expand_macros(r"x \in S"), "x in S");
/// assert_eq!(expand_macros(r"n \to \infty"), "n to infinity");
/// assert_eq!(expand_macros(r"\unknown"), r"\unknown");
/// ```
pub fn expand_macros(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let followed_by_letter = after[name_len..]
            .chars()
            .next()
            .is_some_and(char::is_alphabetic);

        match MACRO_EXPANSIONS.get(name) {
            Some(expansion) if !name.is_empty() && !followed_by_letter => {
                result.push_str(expansion);
                rest = &after[name_len..];
            },
            _ => {
                result.push('\\');
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

/// Map arbitrary text to canonical form.
///
/// # Examples
///
/// ```
/// use pdf_anchor::text::canonical::canonicalize;
///
/// assert_eq!(canonicalize("The “efﬁcient” Transformer!"), "the efficient transformer");
/// assert_eq!(canonicalize(r"  $\alpha$-decay,  β-decay "), "alpha decay beta decay");
/// assert_eq!(canonicalize("..."), "");
/// ```
pub fn canonicalize(text: &str) -> String {
    let expanded = expand_macros(text);
    let mut out = String::with_capacity(expanded.len());

    for c in expanded.chars() {
        if canonical_chars(c, |ch| out.push(ch)) == CharKind::Separator
            && !out.is_empty()
            && !out.ends_with(' ')
        {
            out.push(' ');
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}
