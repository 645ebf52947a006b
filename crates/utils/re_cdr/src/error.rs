use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CdrError {
    #[error("read of {needed} byte(s) at body offset {offset} exceeds payload ({available} byte(s) left)")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("payload of {0} byte(s) is too short for the 4-byte encapsulation header")]
    ShortHeader(usize),

    #[error("unsupported CDR representation identifier {0:#06x}")]
    UnsupportedEncapsulation(u16),

    #[error(
        "sequence at body offset {offset} declares {declared} byte(s) but its elements take {consumed}"
    )]
    InvalidDelimiter {
        offset: usize,
        declared: usize,
        consumed: usize,
    },

    #[error("string at body offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl CdrError {
    /// Did the payload simply end too early?
    ///
    /// Every other variant means the bytes are there but make no sense.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::ShortHeader(_))
    }
}
