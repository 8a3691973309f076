//! Named character reference lookup table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The standard defines 2,231 entities. This table carries the ones that show
//! up in real documents, including the legacy forms that are recognized
//! without a trailing semicolon.

/// Entity name (without the leading `&`) to replacement text.
static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp;", "&"),
    ("amp", "&"),
    ("AMP;", "&"),
    ("AMP", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("LT;", "<"),
    ("LT", "<"),
    ("gt;", ">"),
    ("gt", ">"),
    ("GT;", ">"),
    ("GT", ">"),
    ("quot;", "\""),
    ("quot", "\""),
    ("QUOT;", "\""),
    ("QUOT", "\""),
    ("apos;", "'"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
    ("copy;", "\u{00A9}"),
    ("copy", "\u{00A9}"),
    ("COPY;", "\u{00A9}"),
    ("reg;", "\u{00AE}"),
    ("reg", "\u{00AE}"),
    ("trade;", "\u{2122}"),
    ("mdash;", "\u{2014}"),
    ("ndash;", "\u{2013}"),
    ("hellip;", "\u{2026}"),
    ("bull;", "\u{2022}"),
    ("middot;", "\u{00B7}"),
    ("middot", "\u{00B7}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("laquo;", "\u{00AB}"),
    ("laquo", "\u{00AB}"),
    ("raquo;", "\u{00BB}"),
    ("raquo", "\u{00BB}"),
    ("sect;", "\u{00A7}"),
    ("sect", "\u{00A7}"),
    ("para;", "\u{00B6}"),
    ("para", "\u{00B6}"),
    ("shy;", "\u{00AD}"),
    ("shy", "\u{00AD}"),
    ("iexcl;", "\u{00A1}"),
    ("iquest;", "\u{00BF}"),
    ("cent;", "\u{00A2}"),
    ("cent", "\u{00A2}"),
    ("pound;", "\u{00A3}"),
    ("pound", "\u{00A3}"),
    ("euro;", "\u{20AC}"),
    ("yen;", "\u{00A5}"),
    ("yen", "\u{00A5}"),
    ("curren;", "\u{00A4}"),
    ("not;", "\u{00AC}"),
    ("not", "\u{00AC}"),
    ("notin;", "\u{2209}"),
    ("times;", "\u{00D7}"),
    ("times", "\u{00D7}"),
    ("divide;", "\u{00F7}"),
    ("divide", "\u{00F7}"),
    ("plusmn;", "\u{00B1}"),
    ("plusmn", "\u{00B1}"),
    ("minus;", "\u{2212}"),
    ("ne;", "\u{2260}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("deg;", "\u{00B0}"),
    ("deg", "\u{00B0}"),
    ("micro;", "\u{00B5}"),
    ("frac12;", "\u{00BD}"),
    ("frac14;", "\u{00BC}"),
    ("frac34;", "\u{00BE}"),
    ("sup2;", "\u{00B2}"),
    ("sup3;", "\u{00B3}"),
    ("infin;", "\u{221E}"),
    ("larr;", "\u{2190}"),
    ("rarr;", "\u{2192}"),
    ("uarr;", "\u{2191}"),
    ("darr;", "\u{2193}"),
    ("harr;", "\u{2194}"),
    ("alpha;", "\u{03B1}"),
    ("beta;", "\u{03B2}"),
    ("gamma;", "\u{03B3}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("lambda;", "\u{03BB}"),
    ("mu;", "\u{03BC}"),
    ("pi;", "\u{03C0}"),
    ("sigma;", "\u{03C3}"),
    ("omega;", "\u{03C9}"),
    ("Omega;", "\u{03A9}"),
    ("Agrave;", "\u{00C0}"),
    ("Aacute;", "\u{00C1}"),
    ("Acirc;", "\u{00C2}"),
    ("Atilde;", "\u{00C3}"),
    ("Auml;", "\u{00C4}"),
    ("Auml", "\u{00C4}"),
    ("agrave;", "\u{00E0}"),
    ("aacute;", "\u{00E1}"),
    ("acirc;", "\u{00E2}"),
    ("atilde;", "\u{00E3}"),
    ("auml;", "\u{00E4}"),
    ("auml", "\u{00E4}"),
    ("Egrave;", "\u{00C8}"),
    ("Eacute;", "\u{00C9}"),
    ("egrave;", "\u{00E8}"),
    ("eacute;", "\u{00E9}"),
    ("eacute", "\u{00E9}"),
    ("Igrave;", "\u{00CC}"),
    ("Iacute;", "\u{00CD}"),
    ("igrave;", "\u{00EC}"),
    ("iacute;", "\u{00ED}"),
    ("Ograve;", "\u{00D2}"),
    ("Oacute;", "\u{00D3}"),
    ("Ouml;", "\u{00D6}"),
    ("ograve;", "\u{00F2}"),
    ("oacute;", "\u{00F3}"),
    ("ouml;", "\u{00F6}"),
    ("ouml", "\u{00F6}"),
    ("Ugrave;", "\u{00D9}"),
    ("Uacute;", "\u{00DA}"),
    ("Uuml;", "\u{00DC}"),
    ("ugrave;", "\u{00F9}"),
    ("uacute;", "\u{00FA}"),
    ("uuml;", "\u{00FC}"),
    ("uuml", "\u{00FC}"),
    ("szlig;", "\u{00DF}"),
    ("szlig", "\u{00DF}"),
    ("ntilde;", "\u{00F1}"),
    ("Ntilde;", "\u{00D1}"),
    ("ccedil;", "\u{00E7}"),
    ("Ccedil;", "\u{00C7}"),
    ("fjlig;", "fj"),
    ("zwj;", "\u{200D}"),
    ("zwnj;", "\u{200C}"),
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
];

/// Look up a named character reference. `name` excludes the leading `&` and
/// includes the trailing `;` when present.
///
/// ```
/// use quill_html::tokenizer::named_character_references::lookup_entity;
///
/// assert_eq!(lookup_entity("amp;"), Some("&"));
/// assert_eq!(lookup_entity("amp"), Some("&"));
/// assert_eq!(lookup_entity("xyz;"), None);
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, replacement)| *replacement)
}

/// Whether any entity name starts with `prefix`. The named reference state
/// keeps consuming only while this holds.
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    NAMED_ENTITIES
        .iter()
        .any(|(entity, _)| entity.starts_with(prefix))
}
