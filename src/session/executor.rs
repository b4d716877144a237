//! Chat session executor

use super::traits::{Renderer, ReplyHandle};
use crate::client::{AssistantClient, RequestContext, TransportError};
use crate::conversation::{ConversationStore, Turn};
use crate::cycle::{transition, CycleState, Effect, Event, TransitionError};
use crate::stream::{decode_reply, DecodeSummary, DisplayState};

/// One user's conversation with the assistant.
///
/// Generic over the client and renderer so the whole cycle runs against
/// mocks in tests. `submit` takes `&mut self` and drives a cycle to
/// completion, so at most one request is ever in flight per session.
pub struct ChatSession<C, R>
where
    C: AssistantClient,
    R: Renderer,
{
    session_id: String,
    state: CycleState,
    store: ConversationStore,
    client: C,
    renderer: R,
    /// Placeholder for the reply currently streaming
    reply: Option<ReplyHandle>,
}

impl<C, R> ChatSession<C, R>
where
    C: AssistantClient,
    R: Renderer,
{
    pub fn new(client: C, mut renderer: R, greeting: Option<String>) -> Self {
        let store = match greeting {
            Some(greeting) => {
                let store = ConversationStore::with_greeting(greeting);
                if let Some(turn) = store.latest() {
                    renderer.show_turn(turn);
                }
                store
            }
            None => ConversationStore::new(),
        };
        renderer.set_input_enabled(true);

        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %session_id,
            endpoint = %client.endpoint(),
            "Chat session started"
        );

        Self {
            session_id,
            state: CycleState::Idle,
            store,
            client,
            renderer,
            reply: None,
        }
    }

    /// Every turn so far, oldest first
    pub fn history(&self) -> &[Turn] {
        self.store.turns()
    }

    #[allow(dead_code)] // Used in tests
    pub fn state(&self) -> &CycleState {
        &self.state
    }

    #[allow(dead_code)] // Used in tests
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Run one request/reply cycle for `query`.
    ///
    /// Blank queries are ignored. Transport failures are not returned: they
    /// end the cycle with an error reply, like any other outcome.
    pub async fn submit(&mut self, query: &str) -> Result<(), TransitionError> {
        let Some(request) = self.apply(Event::Submit {
            query: query.to_string(),
        })?
        else {
            tracing::debug!(session_id = %self.session_id, "Ignoring blank query");
            return Ok(());
        };

        tracing::info!(
            session_id = %self.session_id,
            history_len = request.history.len(),
            "Submitting query"
        );

        let invoked = self.client.invoke(&request).await;
        let ending = match invoked {
            Ok(body) => {
                let decoded = decode_reply(body, |state| self.on_record(state)).await;
                self.stream_outcome(decoded)
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %error.message,
                    retryable = error.kind.is_retryable(),
                    "Request failed"
                );
                Event::RequestFailed
            }
        };

        self.apply(ending)?;
        Ok(())
    }

    fn stream_outcome(&self, decoded: Result<DecodeSummary, TransportError>) -> Event {
        match decoded {
            Ok(summary) => {
                tracing::info!(
                    session_id = %self.session_id,
                    records = summary.records,
                    decode_failures = summary.decode_failures,
                    "Reply complete"
                );
                Event::StreamEnded
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %error.message,
                    "Reply stream failed"
                );
                Event::StreamFailed
            }
        }
    }

    fn on_record(&mut self, state: DisplayState) {
        if let Err(e) = self.apply(Event::Record { state }) {
            tracing::error!(session_id = %self.session_id, error = %e, "Dropped reply update");
        }
    }

    /// Transition, then run the resulting effects in order.
    ///
    /// Returns the request to send if the transition asked for one.
    fn apply(&mut self, event: Event) -> Result<Option<RequestContext>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        let mut request = None;
        for effect in result.effects {
            if let Some(ctx) = self.execute_effect(effect) {
                request = Some(ctx);
            }
        }
        Ok(request)
    }

    fn execute_effect(&mut self, effect: Effect) -> Option<RequestContext> {
        match effect {
            Effect::SetInputEnabled(enabled) => self.renderer.set_input_enabled(enabled),
            Effect::AppendTurn(turn) => self.store.append(turn),
            Effect::ShowTurn(turn) => self.renderer.show_turn(&turn),
            Effect::BeginReply => {
                if let Some(stale) = self.reply.replace(self.renderer.begin_reply()) {
                    tracing::warn!(reply = stale.id(), "Replaced an unfinished reply placeholder");
                }
            }
            Effect::UpdateReply(state) => match &self.reply {
                Some(reply) => self.renderer.update_reply(reply, &state),
                None => tracing::warn!("Reply update with no placeholder"),
            },
            Effect::FinishReply(state) => match self.reply.take() {
                Some(reply) => self.renderer.finish_reply(reply, &state),
                None => tracing::warn!("Reply finish with no placeholder"),
            },
            Effect::RequestReply { query } => {
                return Some(RequestContext::new(query, self.store.context_prefix()));
            }
        }
        None
    }
}
