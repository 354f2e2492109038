//! Token view over the raw query text.
//!
//! The query is split on whitespace with no escaping scheme: every rewritten
//! query is generated by the engine itself and project names are kebab-cased
//! before they re-enter the query, so tokens never contain spaces.

/// Flag tokens recognised anywhere after the command.
pub mod flags {
    /// Time-span offset (`-t 5 mins`). Upper-case accepted as well.
    pub const TIME: [&str; 2] = ["-t", "-T"];
    /// Force project reselection in `edit`.
    pub const PROJECT: &str = "-p";
    /// Declared but carrying no behaviour: clear-description and the
    /// listing/resume/show-stop variants.
    pub const DECLARED: [&str; 4] = ["-C", "-l", "-R", "-S"];
}

/// Parsed token view of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    tokens: Vec<String>,
}

impl Query {
    /// Split the raw query on whitespace.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw.split_whitespace().map(str::to_string).collect();
        Self { raw: raw.to_string(), tokens }
    }

    /// The raw text as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First token, lower-cased: the command.
    pub fn command(&self) -> Option<String> {
        self.tokens.first().map(|t| t.to_lowercase())
    }

    /// Tokens after the command.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// One positional argument (0 = first token after the command).
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args().get(index).map(String::as_str)
    }

    /// Whether the query is exactly the bare command (no further tokens).
    pub fn is_bare_command(&self) -> bool {
        self.tokens.len() <= 1
    }

    /// Whether a flag token appears among the arguments.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args().iter().any(|t| t == flag)
    }

    /// Index (within [`Self::args`]) of the first of the given flag tokens.
    pub fn flag_position(&self, names: &[&str]) -> Option<usize> {
        self.args().iter().position(|t| names.iter().any(|n| t == n))
    }

    /// Text after the time-span flag, if the flag is present.
    ///
    /// `Some("")` means the flag was typed but no span text followed yet.
    pub fn span_text(&self) -> Option<String> {
        let at = self.flag_position(&flags::TIME)?;
        Some(self.args().get(at + 1..).unwrap_or(&[]).join(" "))
    }

    /// Free text from the given argument index up to (not including) any
    /// time-span flag, with declared no-op flags stripped.
    pub fn text_from(&self, index: usize) -> String {
        let end = self.flag_position(&flags::TIME).unwrap_or(self.args().len());
        self.args()
            .get(index..end)
            .unwrap_or(&[])
            .iter()
            .filter(|t| t.as_str() != flags::PROJECT && !flags::DECLARED.contains(&t.as_str()))
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build a rewritten query from tokens, with the trailing space that
/// re-triggers evaluation in the host.
pub fn rewrite(parts: &[&str]) -> String {
    let mut out = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    out.push(' ');
    out
}
