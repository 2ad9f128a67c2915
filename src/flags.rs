//! Flag parsing against a command's declared flags.
//!
//! GNU-style semantics:
//! - long form `--name value` and `--name=value`
//! - short aliases `-x value`, `-x=value`, attached `-xVALUE`
//! - clustered boolean shorts `-abc`
//! - `--no-name` clears a boolean flag
//! - array and map flags consume tokens greedily up to the next flag-looking token
//! - `--` ends flag parsing; everything after it is positional
//!
//! Tokens that look like flags but match nothing are collected and reported
//! together as [`FlagError::UnknownFlags`]. Negative numbers (`-5`, `-0.25`)
//! never count as flags.

use crate::error::FlagError;
use std::collections::BTreeMap;

/// Value shape of a flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// Present/absent switch, no value
    Boolean,
    /// Single text value
    String,
    /// Single numeric value (parsed as `f64`)
    Number,
    /// One or more text values
    Array,
    /// One or more `key:value` entries
    Map,
}

/// Typed flag value after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    /// Boolean flag
    Bool(bool),
    /// String flag
    Str(String),
    /// Number flag
    Number(f64),
    /// Array flag
    List(Vec<String>),
    /// Map flag
    Map(BTreeMap<String, String>),
}

/// Unit-only enum usable as the allowed value set of a flag.
///
/// Usually derived with `#[derive(Choice)]`, which maps each variant to its
/// kebab-case name.
pub trait Choice: Sized {
    /// Allowed values, in declaration order
    const CHOICES: &'static [&'static str];

    /// Parse from one of [`Choice::CHOICES`].
    fn from_choice(s: &str) -> Option<Self>;

    /// The value this variant is written as.
    fn as_choice(&self) -> &'static str;
}

/// Declaration of one flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    /// Long name without leading dashes (`limit` for `--limit`)
    pub name: String,

    /// Value shape
    pub kind: FlagKind,

    /// Optional single-character alias (`l` for `-l`)
    pub short: Option<char>,

    /// Value used when the flag is absent
    pub default: Option<FlagValue>,

    /// Allowed values for string and array flags
    pub choices: Option<Vec<String>>,

    /// Parsing fails when the flag is absent and has no default
    pub required: bool,

    /// Value completes as a filesystem path
    pub path: bool,

    /// One-line description for help output
    pub description: String,
}

impl FlagSpec {
    fn new(name: &str, kind: FlagKind) -> Self {
        Self {
            name: name.trim_start_matches('-').to_string(),
            kind,
            short: None,
            default: None,
            choices: None,
            required: false,
            path: false,
            description: String::new(),
        }
    }

    /// Boolean switch.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, FlagKind::Boolean)
    }

    /// Single text value.
    pub fn string(name: &str) -> Self {
        Self::new(name, FlagKind::String)
    }

    /// Single numeric value.
    pub fn number(name: &str) -> Self {
        Self::new(name, FlagKind::Number)
    }

    /// Repeated text values.
    pub fn array(name: &str) -> Self {
        Self::new(name, FlagKind::Array)
    }

    /// `key:value` entries.
    pub fn map(name: &str) -> Self {
        Self::new(name, FlagKind::Map)
    }

    /// String flag restricted to the variants of `T`.
    pub fn choice<T: Choice>(name: &str) -> Self {
        Self::string(name).choices(T::CHOICES)
    }

    /// Set the short alias.
    pub fn short(mut self, alias: char) -> Self {
        self.short = Some(alias);
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: FlagValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Restrict values to `allowed`.
    pub fn choices(mut self, allowed: &[&str]) -> Self {
        self.choices = Some(allowed.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the value as a filesystem path (for completion).
    pub fn path(mut self) -> Self {
        self.path = true;
        self
    }

    /// Set the help description.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Canonical long form, e.g. `--limit`.
    pub fn long(&self) -> String {
        format!("--{}", self.name)
    }

    /// Short form, e.g. `-l`.
    pub fn short_form(&self) -> Option<String> {
        self.short.map(|c| format!("-{}", c))
    }

    /// Usage fragment such as `-l, --limit <number>`.
    pub fn usage(&self) -> String {
        let placeholder = match self.kind {
            FlagKind::Boolean => "",
            FlagKind::String => " <value>",
            FlagKind::Number => " <number>",
            FlagKind::Array => " <value>...",
            FlagKind::Map => " <key:value>...",
        };
        match self.short_form() {
            Some(short) => format!("{}, {}{}", short, self.long(), placeholder),
            None => format!("{}{}", self.long(), placeholder),
        }
    }
}

/// Parsed flag values keyed by long name (without dashes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagValues(BTreeMap<String, FlagValue>);

impl FlagValues {
    /// Empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value lookup.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.0.insert(name.into(), value);
    }

    /// True when a value (given or defaulted) exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Boolean flag state; absent flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(FlagValue::Bool(true)))
    }

    /// String value.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FlagValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric value.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(FlagValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Array values; absent flags read as empty.
    pub fn list(&self, name: &str) -> &[String] {
        match self.0.get(name) {
            Some(FlagValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Map value.
    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.0.get(name) {
            Some(FlagValue::Map(m)) => Some(m),
            _ => None,
        }
    }

    /// String value decoded into a [`Choice`] enum.
    pub fn choice<T: Choice>(&self, name: &str) -> Option<T> {
        self.str(name).and_then(T::from_choice)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no values are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValue)> {
        self.0.iter()
    }

    /// Re-serialize into tokens that parse back to the same values.
    ///
    /// Every value uses the `--name=value` form so values that start with `-`
    /// survive; list and map entries repeat the flag once per entry.
    pub fn canonical_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for (name, value) in &self.0 {
            match value {
                FlagValue::Bool(true) => tokens.push(format!("--{}", name)),
                FlagValue::Bool(false) => tokens.push(format!("--{}=false", name)),
                FlagValue::Str(s) => tokens.push(format!("--{}={}", name, s)),
                FlagValue::Number(n) => tokens.push(format!("--{}={}", name, n)),
                FlagValue::List(items) => {
                    tokens.extend(items.iter().map(|item| format!("--{}={}", name, item)))
                }
                FlagValue::Map(entries) => tokens.extend(
                    entries
                        .iter()
                        .map(|(k, v)| format!("--{}={}:{}", name, k, v)),
                ),
            }
        }
        tokens
    }
}

/// Result of parsing a token list: positionals in order plus flag values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// Positional arguments in input order
    pub positionals: Vec<String>,

    /// Flag values (including applied defaults)
    pub flags: FlagValues,
}

/// True for a token shaped like a negative number (`-5`, `-0.25`, `-.5`).
pub fn is_signed_number(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') && rest.parse::<f64>().is_ok()
}

/// True for a token that would be read as a flag (`-x`, `--name`, but not `-`,
/// `--` or a negative number).
pub fn is_flag_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token != "--" && !is_signed_number(token)
}

/// Parse `tokens` against `specs`.
///
/// Returns positionals in order and the typed flag values with defaults
/// applied. Fails on the first malformed value; unknown flags are collected and
/// reported together once all tokens are consumed.
pub fn parse(tokens: &[String], specs: &[FlagSpec]) -> Result<ParsedArgs, FlagError> {
    let mut parsed = ParsedArgs::default();
    let mut unknown: Vec<String> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if token == "--" {
            parsed.positionals.extend(tokens[i..].iter().cloned());
            break;
        }

        if !is_flag_like(token) {
            parsed.positionals.push(token.clone());
            continue;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = split_inline(body);
            if let Some(spec) = specs.iter().find(|s| s.name == name) {
                apply(spec, inline, tokens, &mut i, &mut parsed.flags)?;
            } else if let Some(spec) = negated_boolean(name, specs) {
                if inline.is_some() {
                    return Err(FlagError::InvalidBoolean {
                        flag: spec.long(),
                        value: token.clone(),
                    });
                }
                parsed.flags.insert(spec.name.clone(), FlagValue::Bool(false));
            } else {
                unknown.push(token.clone());
            }
            continue;
        }

        // Single dash: alias, alias=value, attached value, or boolean cluster.
        let body = &token[1..];
        let (name, inline) = split_inline(body);
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            unknown.push(token.clone());
            continue;
        };
        let rest = chars.as_str();
        let Some(spec) = specs.iter().find(|s| s.short == Some(first)) else {
            unknown.push(token.clone());
            continue;
        };

        if rest.is_empty() {
            apply(spec, inline, tokens, &mut i, &mut parsed.flags)?;
        } else if spec.kind == FlagKind::Boolean && inline.is_none() {
            let cluster: Option<Vec<&FlagSpec>> = name
                .chars()
                .map(|c| {
                    specs
                        .iter()
                        .find(|s| s.short == Some(c) && s.kind == FlagKind::Boolean)
                })
                .collect();
            match cluster {
                Some(cluster) => {
                    for spec in cluster {
                        parsed.flags.insert(spec.name.clone(), FlagValue::Bool(true));
                    }
                }
                None => unknown.push(token.clone()),
            }
        } else if spec.kind != FlagKind::Boolean && inline.is_none() {
            apply(spec, Some(rest), tokens, &mut i, &mut parsed.flags)?;
        } else {
            unknown.push(token.clone());
        }
    }

    if !unknown.is_empty() {
        return Err(FlagError::UnknownFlags(unknown));
    }

    for spec in specs {
        if parsed.flags.contains(&spec.name) {
            continue;
        }
        if let Some(default) = &spec.default {
            parsed.flags.insert(spec.name.clone(), default.clone());
        } else if spec.required {
            return Err(FlagError::MissingRequired(spec.long()));
        }
    }

    Ok(parsed)
}

fn split_inline(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

fn negated_boolean<'a>(name: &str, specs: &'a [FlagSpec]) -> Option<&'a FlagSpec> {
    let target = name.strip_prefix("no-")?;
    specs
        .iter()
        .find(|s| s.name == target && s.kind == FlagKind::Boolean)
}

/// Consume the value(s) of `spec` starting at `tokens[*i]` and store them.
fn apply(
    spec: &FlagSpec,
    inline: Option<&str>,
    tokens: &[String],
    i: &mut usize,
    values: &mut FlagValues,
) -> Result<(), FlagError> {
    match spec.kind {
        FlagKind::Boolean => {
            let value = match inline {
                None => true,
                Some(text) => parse_bool(text).ok_or_else(|| FlagError::InvalidBoolean {
                    flag: spec.long(),
                    value: text.to_string(),
                })?,
            };
            values.insert(spec.name.clone(), FlagValue::Bool(value));
        }
        FlagKind::String | FlagKind::Number => {
            let text = match inline {
                Some(text) => text.to_string(),
                None => match tokens.get(*i) {
                    Some(next) if next != "--" && !is_flag_like(next) => {
                        *i += 1;
                        next.clone()
                    }
                    // `-inf`, `-nan`: meant as a value, rejected below
                    Some(next)
                        if spec.kind == FlagKind::Number && next.parse::<f64>().is_ok() =>
                    {
                        *i += 1;
                        next.clone()
                    }
                    _ => return Err(FlagError::MissingValue(spec.long())),
                },
            };
            let value = if spec.kind == FlagKind::Number {
                let n = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FlagError::InvalidNumber {
                        flag: spec.long(),
                        value: text.clone(),
                    })?;
                FlagValue::Number(n)
            } else {
                check_choice(spec, &text)?;
                FlagValue::Str(text)
            };
            values.insert(spec.name.clone(), value);
        }
        FlagKind::Array | FlagKind::Map => {
            let mut items: Vec<String> = inline.map(|s| vec![s.to_string()]).unwrap_or_default();
            while let Some(next) = tokens.get(*i) {
                if next == "--" || is_flag_like(next) {
                    break;
                }
                items.push(next.clone());
                *i += 1;
            }
            if items.is_empty() {
                return Err(FlagError::MissingValue(spec.long()));
            }

            if spec.kind == FlagKind::Array {
                for item in &items {
                    check_choice(spec, item)?;
                }
                match values.0.get_mut(&spec.name) {
                    Some(FlagValue::List(existing)) => existing.extend(items),
                    _ => values.insert(spec.name.clone(), FlagValue::List(items)),
                }
            } else {
                let mut entries = match values.0.remove(&spec.name) {
                    Some(FlagValue::Map(existing)) => existing,
                    _ => BTreeMap::new(),
                };
                for entry in items {
                    let Some((key, value)) = entry.split_once(':') else {
                        return Err(FlagError::InvalidMapEntry {
                            flag: spec.long(),
                            entry,
                        });
                    };
                    entries.insert(key.to_string(), value.to_string());
                }
                values.insert(spec.name.clone(), FlagValue::Map(entries));
            }
        }
    }
    Ok(())
}

fn check_choice(spec: &FlagSpec, value: &str) -> Result<(), FlagError> {
    match &spec.choices {
        Some(allowed) if !allowed.iter().any(|a| a == value) => Err(FlagError::InvalidChoice {
            flag: spec.long(),
            value: value.to_string(),
            allowed: allowed.clone(),
        }),
        _ => Ok(()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
