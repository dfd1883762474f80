use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::{dict_value, Record};

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;
/// Length long names are cut to, leaving room for `-N` dedup suffixes.
pub const NAME_TRUNCATE_LENGTH: usize = NAME_MAX_LENGTH - 5;

static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*?[_-]((?:\d{2,4}[-/])?\d{2,4})$").expect("static year pattern")
});

/// Turns a dataset title into a URL-safe, lower-case, hyphenated name.
///
/// Long names are truncated; a trailing year-like group (`-2023`,
/// `-03-2023`, ...) survives the cut.
pub fn munge_title_to_name(title: &str) -> String {
    let ascii = substitute_ascii_equivalents(title);

    let mut name = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        match c {
            ' ' | '.' | ':' | '/' => name.push('-'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => {
                name.push(c.to_ascii_lowercase())
            }
            _ => {}
        }
    }

    let mut name = collapse_hyphens(&name).trim_matches('-').to_string();

    if name.len() > NAME_TRUNCATE_LENGTH {
        let year = TRAILING_YEAR
            .captures(&name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        name = match year {
            Some(year) if year.len() + 1 < NAME_TRUNCATE_LENGTH => {
                let head = name[..NAME_TRUNCATE_LENGTH - year.len() - 1].trim_end_matches('-');
                format!("{head}-{year}")
            }
            _ => name[..NAME_TRUNCATE_LENGTH].to_string(),
        };
    }

    munge_to_length(name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)
}

fn collapse_hyphens(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_hyphen = false;
    for c in input.chars() {
        if c == '-' {
            if !prev_hyphen {
                out.push(c);
            }
            prev_hyphen = true;
        } else {
            out.push(c);
            prev_hyphen = false;
        }
    }
    out
}

fn munge_to_length(mut name: String, min_length: usize, max_length: usize) -> String {
    while name.len() < min_length {
        name.push('_');
    }
    name.truncate(max_length);
    name
}

/// Replaces accented Latin letters with their ASCII spelling. Characters
/// without a mapping are left alone and later dropped by the name filter.
fn substitute_ascii_equivalents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ascii_equivalent(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

fn ascii_equivalent(c: char) -> Option<&'static str> {
    let s = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "Ae",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ÿ' | 'Ŷ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(s)
}

/// Names handed out during one harvest run.
///
/// Created at the start of a run and dropped with it; a new run starts with
/// an empty registry.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: Vec<String>,
    lookup: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Registers `name`, appending `-N` when it is already taken.
    ///
    /// `N` starts at one more than the number of registered names equal to
    /// `name` or prefixed by `name-`, so repeats of `title` come out as
    /// `title`, `title-2`, `title-3`.
    pub fn register(&mut self, name: &str) -> String {
        let mut assigned = name.to_string();
        if self.contains(name) {
            let prefix = format!("{name}-");
            let mut suffix = 1 + self
                .taken
                .iter()
                .filter(|taken| *taken == name || taken.starts_with(&prefix))
                .count();
            assigned = format!("{name}-{suffix}");
            while self.contains(&assigned) {
                suffix += 1;
                assigned = format!("{name}-{suffix}");
            }
        }
        self.lookup.insert(assigned.clone());
        self.taken.push(assigned.clone());
        assigned
    }

    /// Gives the record a unique `name`.
    ///
    /// A non-empty `name` already set by a profile is kept as the base;
    /// otherwise the base is munged from `title`. Returns `None`, leaving the
    /// record untouched, when neither is present.
    pub fn assign_name(&mut self, record: &mut Record) -> Option<String> {
        let base = match record.get("name").and_then(|v| v.as_str()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => munge_title_to_name(dict_value(record, "title")?),
        };
        let name = self.register(&base);
        record.insert("name".to_string(), name.clone().into());
        Some(name)
    }
}

/// Chooses a stable identifier for a harvested record.
///
/// First found of: `uri`, `identifier`, `source_url/name`, `name`.
pub fn resolve_guid(record: &Record, source_url: Option<&str>) -> Option<String> {
    if let Some(guid) = dict_value(record, "uri").or_else(|| dict_value(record, "identifier")) {
        return Some(guid.to_string());
    }

    let name = record
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())?;
    match source_url.filter(|url| !url.is_empty()) {
        Some(url) => Some(format!("{}/{}", url.trim_end_matches('/'), name)),
        None => Some(name.to_string()),
    }
}
