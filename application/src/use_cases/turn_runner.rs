//! Turn runner: one agent or moderator turn.
//!
//! A plain turn is a single completion. When a search tool is configured and
//! the turn allows research, the turn runs the research loop instead:
//!
//! ```text
//! REASON ──(tool request)──▶ TOOL_CALL ──▶ OBSERVE ──▶ REASON
//!    │
//!    └──(answer | tool budget spent | failure streak)──▶ FINALIZE
//! ```
//!
//! The loop's state lives in [`ResearchLoop`]; this module does the I/O the
//! state machine asks for. Provider errors fail the turn. Search errors and
//! unreadable tool requests never do.

use crate::config::DebateParams;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, ProviderError};
use crate::ports::search_tool::{SearchError, SearchTool};
use parliament_domain::{
    Citation, CitationLedger, FinalizeReason, LlmResponse, Message, PromptTemplate,
    ResearchLoop, ResearchPhase, SearchHit, ToolDefinition, ToolInvocation, extract_invocation,
    research::strip_tool_blocks,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One search issued during a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchStepRecord {
    pub query: String,
    pub result_count: usize,
    pub failed: bool,
}

/// Result of running one turn.
///
/// `content` is `Err` with a provider error message when the turn failed.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub content: Result<String, String>,
    pub citations: Vec<Citation>,
    pub research_steps: Vec<ResearchStepRecord>,
    pub finalize_reason: Option<FinalizeReason>,
}

impl TurnOutcome {
    fn failed(error: ProviderError, research_steps: Vec<ResearchStepRecord>) -> Self {
        Self {
            research_steps,
            ..Self::from_error(error.to_string())
        }
    }

    pub(crate) fn from_error(error: impl Into<String>) -> Self {
        Self {
            content: Err(error.into()),
            citations: Vec::new(),
            research_steps: Vec::new(),
            finalize_reason: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.content.is_err()
    }

    /// Searches issued; each one counts against the tool-call tally
    pub fn tool_calls(&self) -> usize {
        self.research_steps.len()
    }
}

/// Runs single turns against the LLM gateway and optional search tool.
///
/// Cheap to clone; parallel rounds hand a clone to every spawned turn.
#[derive(Clone)]
pub struct TurnRunner {
    gateway: Arc<dyn LlmGateway>,
    search: Option<Arc<dyn SearchTool>>,
    params: DebateParams,
}

impl TurnRunner {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: DebateParams) -> Self {
        Self {
            gateway,
            search: None,
            params,
        }
    }

    pub fn with_search(mut self, search: Option<Arc<dyn SearchTool>>) -> Self {
        self.search = search;
        self
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn params(&self) -> &DebateParams {
        &self.params
    }

    /// Run one turn.
    ///
    /// `persona` is the speaker's system prompt (`None` for the moderator).
    /// `allow_research` is ignored when no search tool is configured.
    pub async fn run(
        &self,
        persona: Option<&str>,
        round_prompt: &str,
        context: &str,
        allow_research: bool,
    ) -> TurnOutcome {
        let messages = PromptTemplate::turn_messages(persona, round_prompt, context);
        match (&self.search, allow_research) {
            (Some(search), true) => self.research_turn(search.as_ref(), messages).await,
            _ => self.plain_turn(messages).await,
        }
    }

    async fn plain_turn(&self, messages: Vec<Message>) -> TurnOutcome {
        let result = self
            .complete(CompletionRequest::new(messages))
            .await
            .and_then(|response| non_empty(response.text_content()));
        match result {
            Ok(content) => TurnOutcome {
                content: Ok(content),
                citations: Vec::new(),
                research_steps: Vec::new(),
                finalize_reason: None,
            },
            Err(e) => TurnOutcome::failed(e, Vec::new()),
        }
    }

    async fn research_turn(&self, search: &dyn SearchTool, mut messages: Vec<Message>) -> TurnOutcome {
        let tool = ToolDefinition::web_search();
        let instructions =
            PromptTemplate::research_instructions(&tool, self.params.research.max_tool_calls);
        // Instructions go with the other system messages, ahead of the context.
        let at = messages.len().saturating_sub(1);
        messages.insert(at, Message::system(instructions));

        let mut state = ResearchLoop::new(self.params.research);
        let mut ledger = CitationLedger::new();
        let mut steps = Vec::new();
        let mut pending: Option<ToolInvocation> = None;
        let mut observation = String::new();
        let mut answer: Option<String> = None;

        while !state.is_finished() {
            match state.phase() {
                ResearchPhase::Reason => {
                    let request =
                        CompletionRequest::new(messages.clone()).with_tools(vec![tool.clone()]);
                    let response = match self.complete(request).await {
                        Ok(r) => r,
                        Err(e) => return TurnOutcome::failed(e, steps),
                    };
                    let text = response.text_content();

                    match extract_invocation(&response) {
                        Ok(Some(invocation)) => {
                            messages.push(Message::assistant(assistant_echo(&text, &invocation)));
                            if state.after_reason(true) == ResearchPhase::ToolCall {
                                debug!(
                                    "Research step {}: {}",
                                    state.tool_calls() + 1,
                                    invocation.query
                                );
                                pending = Some(invocation);
                            } else {
                                info!("Tool budget spent; forcing final answer");
                            }
                        }
                        Ok(None) => {
                            state.after_reason(false);
                            answer = Some(text);
                        }
                        Err(e) => {
                            warn!("Unreadable tool request, treating as an answer: {}", e);
                            state.after_reason(false);
                            let stripped = strip_tool_blocks(&text);
                            if stripped.trim().is_empty() {
                                // Nothing left to keep: ask once more without tools.
                                messages.push(Message::assistant(text));
                                messages.push(Message::user(
                                    PromptTemplate::unparseable_tool_request(&e.to_string()),
                                ));
                            } else {
                                answer = Some(stripped);
                            }
                        }
                    }
                }
                ResearchPhase::ToolCall => {
                    let Some(invocation) = pending.take() else {
                        // after_reason(true) always leaves an invocation pending
                        state.after_tool_call(false);
                        continue;
                    };
                    match self.search(search, &invocation.query).await {
                        Ok(hits) => {
                            let markers = ledger.register(&hits);
                            observation =
                                PromptTemplate::observation(&invocation.query, &hits, &markers);
                            steps.push(ResearchStepRecord {
                                query: invocation.query,
                                result_count: hits.len(),
                                failed: false,
                            });
                            state.after_tool_call(true);
                        }
                        Err(e) => {
                            warn!("Search '{}' failed: {}", invocation.query, e);
                            observation = PromptTemplate::failed_observation(&invocation.query);
                            steps.push(ResearchStepRecord {
                                query: invocation.query,
                                result_count: 0,
                                failed: true,
                            });
                            state.after_tool_call(false);
                        }
                    }
                }
                ResearchPhase::Observe => {
                    messages.push(Message::user(std::mem::take(&mut observation)));
                    if state.after_observe() == ResearchPhase::Finalize {
                        info!(
                            "{} consecutive searches failed; forcing final answer",
                            self.params.research.max_consecutive_failures
                        );
                    }
                }
                ResearchPhase::Finalize => {}
            }
        }

        let text = match answer {
            Some(text) => text,
            None => {
                messages.push(Message::user(PromptTemplate::forced_final()));
                match self.complete(CompletionRequest::new(messages)).await {
                    Ok(response) => strip_tool_blocks(&response.text_content()),
                    Err(e) => return TurnOutcome::failed(e, steps),
                }
            }
        };

        let text = match non_empty(text) {
            Ok(text) => text,
            Err(e) => return TurnOutcome::failed(e, steps),
        };
        let (content, citations) = ledger.attach_sources(&text);
        debug!(
            "Research turn finished after {} search(es), {} citation(s)",
            steps.len(),
            citations.len()
        );
        TurnOutcome {
            content: Ok(content),
            citations,
            research_steps: steps,
            finalize_reason: state.finalize_reason(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, ProviderError> {
        with_timeout(self.params.turn_timeout, self.gateway.complete(&request))
            .await
            .unwrap_or(Err(ProviderError::Timeout))
    }

    async fn search(&self, tool: &dyn SearchTool, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        with_timeout(self.params.tool_timeout, tool.search(query))
            .await
            .unwrap_or(Err(SearchError::Timeout))
    }
}

/// Await `fut`, giving up after `limit`. `None` means it timed out.
async fn with_timeout<T>(limit: Option<Duration>, fut: impl Future<Output = T>) -> Option<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn non_empty(text: String) -> Result<String, ProviderError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ProviderError::InvalidResponse("empty completion".to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Text kept in the conversation for a tool-requesting reply. Native tool
/// calls often carry no text, so the request is restated.
fn assistant_echo(text: &str, invocation: &ToolInvocation) -> String {
    if text.trim().is_empty() {
        format!("Searching the web for \"{}\".", invocation.query)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parliament_domain::{ContentBlock, Role, StopReason};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // ==================== Mock LLM Gateway ====================

    enum Scripted {
        Text(String),
        Native(String),
        Error(ProviderError),
    }

    struct ScriptedGateway {
        replies: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Scripted>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.replies.lock().unwrap().pop_front() {
                Some(Scripted::Text(t)) => Ok(LlmResponse::from_text(t)),
                Some(Scripted::Native(query)) => {
                    let mut input = HashMap::new();
                    input.insert("query".to_string(), serde_json::json!(query));
                    Ok(LlmResponse {
                        content: vec![ContentBlock::ToolUse {
                            id: "call_1".to_string(),
                            name: "web_search".to_string(),
                            input,
                        }],
                        stop_reason: Some(StopReason::ToolUse),
                        model: None,
                    })
                }
                Some(Scripted::Error(e)) => Err(e),
                // Out of script: search whenever tools are offered
                None if request.tools.is_empty() => Ok(LlmResponse::from_text("Forced answer.")),
                None => Ok(LlmResponse::from_text(tool_block("again"))),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn tool_block(query: &str) -> String {
        format!(
            "```tool\n{{\"tool\": \"web_search\", \"args\": {{\"query\": \"{query}\"}}}}\n```"
        )
    }

    // ==================== Mock Search Tool ====================

    struct StubSearch {
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl StubSearch {
        fn ok() -> Self {
            Self {
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchTool for StubSearch {
        fn name(&self) -> &str {
            "stub"
        }

        async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(SearchError::Transport("offline".to_string()));
            }
            Ok(vec![SearchHit::new(
                format!("About {query}"),
                format!("https://example.com/{}", query.replace(' ', "-")),
                "snippet",
            )])
        }
    }

    // ==================== Slow collaborators ====================

    /// Answers only after `delay`
    struct SlowGateway {
        delay: Duration,
    }

    #[async_trait]
    impl LlmGateway for SlowGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<LlmResponse, ProviderError> {
            tokio::time::sleep(self.delay).await;
            Ok(LlmResponse::from_text("Too late."))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    /// Never returns within any test timeout
    struct HangingSearch;

    #[async_trait]
    impl SearchTool for HangingSearch {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    fn runner(gateway: Arc<ScriptedGateway>, search: Option<Arc<StubSearch>>) -> TurnRunner {
        TurnRunner::new(gateway, DebateParams::default().with_max_tool_calls(2))
            .with_search(search.map(|s| s as Arc<dyn SearchTool>))
    }

    // ==================== Plain turns ====================

    #[tokio::test]
    async fn test_plain_turn_single_completion() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text(
            "I support it.".to_string(),
        )]));
        let outcome = runner(gateway.clone(), None)
            .run(Some("persona"), "Open.", "Topic", true)
            .await;

        assert_eq!(outcome.content, Ok("I support it.".to_string()));
        assert!(outcome.research_steps.is_empty());
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].tools.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_fails_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Error(
            ProviderError::RateLimited("slow down".to_string()),
        )]));
        let outcome = runner(gateway, None).run(None, "", "Topic", false).await;
        assert_eq!(outcome.content, Err("Rate limited: slow down".to_string()));
    }

    #[tokio::test]
    async fn test_empty_completion_fails_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text("  ".to_string())]));
        let outcome = runner(gateway, None).run(None, "", "Topic", false).await;
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_research_disallowed_skips_search() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text("Summary".to_string())]));
        let search = Arc::new(StubSearch::ok());
        let outcome = runner(gateway.clone(), Some(search.clone()))
            .run(None, "Summarize.", "Transcript", false)
            .await;
        assert_eq!(outcome.content, Ok("Summary".to_string()));
        assert!(search.queries.lock().unwrap().is_empty());
        assert!(gateway.requests()[0].tools.is_empty());
    }

    // ==================== Research loop ====================

    #[tokio::test]
    async fn test_research_then_answer_with_citation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text(tool_block("carbon tax")),
            Scripted::Text("Prices fall [1].".to_string()),
        ]));
        let search = Arc::new(StubSearch::ok());
        let outcome = runner(gateway.clone(), Some(search.clone()))
            .run(Some("persona"), "Open.", "Topic", true)
            .await;

        let content = outcome.content.clone().unwrap();
        assert!(content.starts_with("Prices fall [1]."));
        assert!(content.contains("Sources:\n[1] About carbon tax - https://example.com/carbon-tax"));
        assert_eq!(outcome.citations.len(), 1);
        assert_eq!(outcome.finalize_reason, Some(FinalizeReason::Answered));
        assert_eq!(
            outcome.research_steps,
            vec![ResearchStepRecord {
                query: "carbon tax".to_string(),
                result_count: 1,
                failed: false,
            }]
        );

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools.len(), 1);
        // persona, round prompt, research instructions, context
        assert_eq!(requests[0].messages.len(), 4);
        assert_eq!(requests[0].messages[3].role, Role::User);
        let observation = &requests[1].messages.last().unwrap().content;
        assert!(observation.contains("[1] About carbon tax"));
    }

    #[tokio::test]
    async fn test_native_tool_call_is_honored() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Native("ubi".to_string()),
            Scripted::Text("Done.".to_string()),
        ]));
        let search = Arc::new(StubSearch::ok());
        let outcome = runner(gateway.clone(), Some(search.clone()))
            .run(None, "", "Topic", true)
            .await;
        assert_eq!(outcome.content, Ok("Done.".to_string()));
        assert_eq!(*search.queries.lock().unwrap(), vec!["ubi".to_string()]);
        let echo = &gateway.requests()[1].messages;
        assert!(echo.iter().any(|m| m.content == "Searching the web for \"ubi\"."));
    }

    #[tokio::test]
    async fn test_always_tool_model_is_forced_to_finalize() {
        // Never answers on its own while tools are offered.
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let search = Arc::new(StubSearch::ok());
        let outcome = runner(gateway.clone(), Some(search.clone()))
            .run(None, "", "Topic", true)
            .await;

        assert_eq!(outcome.finalize_reason, Some(FinalizeReason::ToolBudgetExhausted));
        assert_eq!(outcome.tool_calls(), 2);
        assert_eq!(search.queries.lock().unwrap().len(), 2);
        // 3 reasoning calls + 1 forced final answer
        let requests = gateway.requests();
        assert_eq!(requests.len(), 4);
        let last = requests.last().unwrap();
        assert!(last.tools.is_empty());
        assert_eq!(last.messages.last().unwrap().content, PromptTemplate::forced_final());
        assert_eq!(outcome.content, Ok("Forced answer.".to_string()));
    }

    #[tokio::test]
    async fn test_failed_searches_force_finalization() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text(tool_block("a")),
            Scripted::Text(tool_block("b")),
            Scripted::Text("Answer without sources.".to_string()),
        ]));
        let search = Arc::new(StubSearch::failing());
        let params = DebateParams::default()
            .with_max_tool_calls(5)
            .with_max_consecutive_failures(2);
        let outcome = TurnRunner::new(gateway.clone(), params)
            .with_search(Some(search as Arc<dyn SearchTool>))
            .run(None, "", "Topic", true)
            .await;

        assert_eq!(outcome.finalize_reason, Some(FinalizeReason::ToolFailures));
        assert_eq!(outcome.content, Ok("Answer without sources.".to_string()));
        assert!(outcome.research_steps.iter().all(|s| s.failed));
        assert!(outcome.citations.is_empty());
        let requests = gateway.requests();
        assert!(requests[1].messages.last().unwrap().content.contains("failed"));
    }

    #[tokio::test]
    async fn test_unparseable_tool_block_is_plain_answer() {
        let reply = "My answer.\n\n```tool\n{not json}\n```".to_string();
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text(reply)]));
        let search = Arc::new(StubSearch::ok());
        let outcome = runner(gateway.clone(), Some(search.clone()))
            .run(None, "", "Topic", true)
            .await;
        assert_eq!(outcome.content, Ok("My answer.".to_string()));
        assert!(search.queries.lock().unwrap().is_empty());
        assert_eq!(gateway.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bare_unparseable_tool_block_asks_again() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text("```tool\n{\"tool\": \"calculator\"}\n```".to_string()),
            Scripted::Text("Plain answer.".to_string()),
        ]));
        let outcome = runner(gateway.clone(), Some(Arc::new(StubSearch::ok())))
            .run(None, "", "Topic", true)
            .await;
        assert_eq!(outcome.content, Ok("Plain answer.".to_string()));
        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].tools.is_empty());
    }

    // ==================== Timeouts ====================

    #[tokio::test]
    async fn test_slow_completion_fails_turn_with_timeout() {
        let gateway = Arc::new(SlowGateway {
            delay: Duration::from_millis(500),
        });
        let params = DebateParams::default().with_turn_timeout(Some(Duration::from_millis(50)));
        let outcome = TurnRunner::new(gateway, params)
            .run(Some("persona"), "Open.", "Topic", true)
            .await;

        assert_eq!(outcome.content, Err("Timeout".to_string()));
        assert!(outcome.research_steps.is_empty());
    }

    #[tokio::test]
    async fn test_hung_search_is_an_empty_observation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text(tool_block("slow query")),
            Scripted::Text("Answer anyway.".to_string()),
        ]));
        let params = DebateParams::default()
            .with_max_tool_calls(2)
            .with_tool_timeout(Some(Duration::from_millis(30)));
        let outcome = TurnRunner::new(gateway.clone(), params)
            .with_search(Some(Arc::new(HangingSearch) as Arc<dyn SearchTool>))
            .run(None, "", "Topic", true)
            .await;

        assert_eq!(outcome.content, Ok("Answer anyway.".to_string()));
        assert_eq!(
            outcome.research_steps,
            vec![ResearchStepRecord {
                query: "slow query".to_string(),
                result_count: 0,
                failed: true,
            }]
        );
        assert!(outcome.citations.is_empty());
        let requests = gateway.requests();
        let observation = &requests[1].messages.last().unwrap().content;
        assert_eq!(observation, &PromptTemplate::failed_observation("slow query"));
    }
}
