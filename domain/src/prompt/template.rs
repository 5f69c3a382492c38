//! Prompt templates for debate turns and the research loop

use crate::research::SearchHit;
use crate::session::entities::Message;
use crate::tool::entities::ToolDefinition;

/// Templates for building the messages of a turn
pub struct PromptTemplate;

impl PromptTemplate {
    /// Messages for a plain turn.
    ///
    /// The speaker's persona (absent for the moderator) and the round
    /// instructions go in as system messages; the rendered context is the
    /// user message.
    pub fn turn_messages(
        persona: Option<&str>,
        round_prompt: &str,
        context: &str,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(3);
        if let Some(persona) = persona.filter(|p| !p.trim().is_empty()) {
            messages.push(Message::system(persona));
        }
        if !round_prompt.trim().is_empty() {
            messages.push(Message::system(round_prompt));
        }
        messages.push(Message::user(context));
        messages
    }

    /// System message describing the search tool and the citation rule
    pub fn research_instructions(tool: &ToolDefinition, max_tool_calls: usize) -> String {
        let params = tool
            .parameters
            .iter()
            .map(|p| {
                let required = if p.required { " (required)" } else { "" };
                format!("    - {}: {}{}", p.name, p.description, required)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"## Research

Before answering you may search the web, at most {max_tool_calls} time(s) this turn.

- **{name}**: {description}
  Parameters:
{params}

To search, reply with only a JSON block in this format:

```tool
{{
  "tool": "{name}",
  "args": {{
    "query": "your search query"
  }}
}}
```

Search results come back numbered. Any claim that relies on a search result
must cite it inline with its number, for example "[2]". Do not cite sources
you were not given. When you have what you need, reply with your answer and
no tool block."#,
            name = tool.name,
            description = tool.description,
        )
    }

    /// Observation message for a search. `markers` holds the citation marker
    /// of each hit, in order.
    pub fn observation(query: &str, hits: &[SearchHit], markers: &[usize]) -> String {
        if hits.is_empty() {
            return format!("Search results for \"{query}\":\n\nNo results found.");
        }
        let mut out = format!("Search results for \"{query}\":\n");
        for (hit, marker) in hits.iter().zip(markers) {
            out.push_str(&format!(
                "\n[{marker}] {}\n    URL: {}\n    {}\n",
                hit.title, hit.url, hit.snippet
            ));
        }
        out
    }

    /// Observation for a search that failed; carries no results
    pub fn failed_observation(query: &str) -> String {
        format!("Search for \"{query}\" failed. No results are available for it.")
    }

    /// Reply to a tool request the loop could not parse
    pub fn unparseable_tool_request(error: &str) -> String {
        format!("Your tool request could not be read ({error}). Answer without it.")
    }

    /// Final instruction once the loop stops accepting tool requests
    pub fn forced_final() -> &'static str {
        "You cannot search any further. Write your final answer now, using only \
         the search results above, citing them inline by number where you rely \
         on them. Do not include a tool block."
    }
}
