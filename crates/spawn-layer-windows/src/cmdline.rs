//! Command-line construction for single-call process creation
//!
//! `CreateProcessW` takes one string instead of an argument vector. The child
//! splits it back into arguments with the MSVC runtime rules, so arguments are
//! quoted here to survive that round trip.

use std::fmt;

/// A complete command line, grown on demand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    line: String,
}

impl CommandLine {
    /// Join `args`, quoting each one so the child parses back the same tokens
    pub fn quoted<S: AsRef<str>>(args: &[S]) -> Self {
        let mut line = String::new();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            append_quoted(&mut line, arg.as_ref());
        }
        Self { line }
    }

    /// Join `args` with single spaces and no escaping
    ///
    /// Arguments containing whitespace or quotes are split or mangled by the
    /// child; kept for callers that depend on the unquoted form.
    pub fn joined<S: AsRef<str>>(args: &[S]) -> Self {
        let line = args
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self { line }
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// NUL-terminated UTF-16 buffer; `CreateProcessW` may write into it
    pub fn to_wide(&self) -> Vec<u16> {
        self.line.encode_utf16().chain(std::iter::once(0)).collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

fn needs_quotes(arg: &str) -> bool {
    arg.is_empty() || arg.contains([' ', '\t', '\n', '\u{0b}', '"'])
}

fn append_quoted(line: &mut String, arg: &str) {
    if !needs_quotes(arg) {
        line.push_str(arg);
        return;
    }

    line.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        if c == '\\' {
            backslashes += 1;
        } else {
            if c == '"' {
                // 2n+1 backslashes before a literal quote
                line.extend(std::iter::repeat_n('\\', backslashes + 1));
            }
            backslashes = 0;
        }
        line.push(c);
    }
    // Backslashes before the closing quote are doubled
    line.extend(std::iter::repeat_n('\\', backslashes));
    line.push('"');
}
