#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SCOPE_UNAVAILABLE: &str = "RUMIOUS-ERR-SCOPE-001";
pub const ERR_UNKNOWN_ELEMENT: &str = "RUMIOUS-ERR-ELEMENT-001";
pub const ERR_UNSUPPORTED_MODIFIER: &str = "RUMIOUS-ERR-COMPILE-001";
pub const ERR_PARSE: &str = "RUMIOUS-ERR-PARSE-001";
pub const ERR_INTERNAL: &str = "RUMIOUS-ERR-INTERNAL-001";

fn get_error_type(code: &str) -> &'static str {
    match code {
        ERR_SCOPE_UNAVAILABLE | ERR_INTERNAL => "COMPILER_INVARIANT_VIOLATION",
        ERR_PARSE => "SYNTAX_ERROR",
        _ => "TEMPLATE_ERROR",
    }
}

fn get_hint(code: &str) -> Option<&'static str> {
    match code {
        ERR_UNKNOWN_ELEMENT => {
            Some("Component tags must be an identifier or a dotted path such as `Ns.Component`.")
        }
        ERR_UNSUPPORTED_MODIFIER => Some("The only supported compile directive is `compile:preserveWhitespace`."),
        ERR_SCOPE_UNAVAILABLE => {
            Some("Identifiers can only be generated once the program scope has been entered.")
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub hints: Vec<String>,
    /// Byte offset into the source the error was raised at, until it is
    /// resolved into `line`/`column` by [`CompilerError::locate`].
    #[serde(skip)]
    pub offset: Option<u32>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: get_error_type(code).to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
            hints: get_hint(code).map(str::to_string).into_iter().collect(),
            offset: None,
        }
    }

    /// An error raised mid-lowering, positioned by byte offset only.
    pub fn at(code: &str, message: &str, offset: u32) -> Self {
        let mut error = Self::new(code, message, "", 0, 0);
        error.offset = Some(offset);
        error
    }

    pub fn scope_unavailable() -> Self {
        Self::new(
            ERR_SCOPE_UNAVAILABLE,
            "Cannot create unique identifier: no program scope is available",
            "",
            0,
            0,
        )
    }

    pub fn internal(message: &str) -> Self {
        Self::new(ERR_INTERNAL, message, "", 0, 0)
    }

    /// Attach the file name and turn a pending byte offset into a 1-based
    /// line and column.
    pub fn locate(mut self, file: &str, source: &str) -> Self {
        self.file = file.to_string();
        if let Some(offset) = self.offset.take() {
            let (line, column) = line_column(source, offset as usize);
            self.line = line;
            self.column = column;
        }
        self
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RumiousCompileError [{}]: {}", self.code, self.message)?;
        if !self.file.is_empty() {
            write!(f, " ({}:{}:{})", self.file, self.line, self.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompilerError {}

fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1;
    let mut column = 1;
    for (index, c) in source.char_indices() {
        if index >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
