use std::fmt;

/// Requested level of detail for a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    /// Brief summary.
    Short,
    /// Clear summary; used for `"medium"` and any unrecognized hint.
    #[default]
    Medium,
    /// Detailed long summary.
    Long,
}

impl SummaryLength {
    /// Map a client-supplied hint onto a template. Only exact `"short"` and `"long"` are special.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("short") => Self::Short,
            Some("long") => Self::Long,
            _ => Self::Medium,
        }
    }

    /// Instruction line placed before the document text.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Short => "Summarize this document briefly:",
            Self::Medium => "Summarize this document clearly:",
            Self::Long => "Provide a detailed long summary of this document:",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        })
    }
}

/// Instruction, newline, then the text verbatim.
pub fn build_prompt(length: SummaryLength, text: &str) -> String {
    format!("{}\n{text}", length.instruction())
}
