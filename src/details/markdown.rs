/// Line-oriented markdown assembly for detail blurbs.
#[derive(Debug, Default)]
pub struct MarkdownBuilder {
    blocks: Vec<String>,
}

impl MarkdownBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn h2(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.blocks.push(format!("## {}", text.as_ref()));
        self
    }

    pub fn p(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
        self
    }

    /// Italic paragraph, used for placeholders.
    pub fn note(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.blocks.push(format!("_{}_", text.as_ref()));
        self
    }

    /// One line of `·`-separated facts.
    pub fn facts<I, S>(&mut self, facts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = facts
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");
        if !line.is_empty() {
            self.blocks.push(line);
        }
        self
    }

    /// One line of `|`-separated links.
    pub fn links<'a, I>(&mut self, links: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let line = links
            .into_iter()
            .map(|(label, url)| format!("[{label}]({url})"))
            .collect::<Vec<_>>()
            .join(" | ");
        if !line.is_empty() {
            self.blocks.push(line);
        }
        self
    }

    pub fn build(&self) -> String {
        self.blocks.join("\n\n")
    }
}
