/// Layout for human-readable error summaries.
///
/// Passed explicitly to every `render` call; there is no process-wide default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces placed before each detail line in multiline output.
    pub indent: usize,
    /// One line per entry when true, `; `-separated otherwise.
    pub multiline: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            multiline: true,
        }
    }
}

impl RenderOptions {
    pub(crate) fn join(&self, lines: &[String]) -> String {
        if self.multiline {
            let pad = " ".repeat(self.indent);
            lines
                .iter()
                .map(|line| format!("{pad}{line}"))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            lines.join("; ")
        }
    }
}
