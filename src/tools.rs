//! Shared capability toolkit for crew agents.
//!
//! The crew carries exactly three tool handles: web search, generic webpage
//! scraping, and browser-driven scraping. The handles are declarative: they
//! name a capability for the prompt and the runtime, they do not embed a
//! scraping stack in-process. Every agent receives the same toolkit; there
//! is no per-agent selection logic.

/// The capability a tool provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Query a web search index.
    WebSearch,
    /// Fetch and extract text from a webpage.
    WebScrape,
    /// Scrape a page that requires a driven browser (JS rendering, clicks).
    BrowserScrape,
}

/// One tool handle: a capability plus the name and description surfaced to
/// the agent prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// The capability this tool provides.
    pub kind: ToolKind,
    /// Short name used in prompts and logs.
    pub name: &'static str,
    /// One-line description of when to reach for this tool.
    pub description: &'static str,
}

/// The fixed set of tools shared by every agent in the crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolkit {
    tools: Vec<ToolSpec>,
}

impl Toolkit {
    /// Build the standard three-tool toolkit.
    pub fn standard() -> Self {
        Self {
            tools: vec![
                ToolSpec {
                    kind: ToolKind::WebSearch,
                    name: "web_search",
                    description: "Search the web for current information",
                },
                ToolSpec {
                    kind: ToolKind::WebScrape,
                    name: "web_scrape",
                    description: "Fetch and read the text content of a webpage",
                },
                ToolSpec {
                    kind: ToolKind::BrowserScrape,
                    name: "browser_scrape",
                    description: "Scrape a page that needs a real browser to render",
                },
            ],
        }
    }

    /// Iterate over the tool handles.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    /// Comma-separated tool names, for prompts and the plan view.
    pub fn names(&self) -> String {
        self.tools
            .iter()
            .map(|t| t.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of tools in the kit.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the kit is empty (never true for the standard kit).
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
