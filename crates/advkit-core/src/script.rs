//! The ordered command script executed by the packaging tool.
//!
//! The tool applies commands sequentially and later commands depend on
//! earlier state, so line order is significant: package-name, then
//! output-location, then signature reset, then user commands in their
//! original order, then the final `Build`.

use std::fmt;

/// An ordered sequence of tool command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandScript {
    lines: Vec<String>,
}

impl CommandScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for CommandScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for CommandScript {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Literal command spellings understood by the tool.
pub mod commands {
    use std::path::Path;

    pub fn set_package_name(output_name: &str, build_name: &str) -> String {
        format!("SetPackageName \"{output_name}\" -buildname \"{build_name}\"")
    }

    pub fn set_output_location(build_name: &str, path: &Path) -> String {
        format!(
            "SetOutputLocation -buildname \"{build_name}\" -path \"{}\"",
            path.display()
        )
    }

    pub const fn reset_sig() -> &'static str {
        "ResetSig"
    }

    pub fn build(build_list: &str) -> String {
        format!("Build -buildslist \"{build_list}\"")
    }
}
