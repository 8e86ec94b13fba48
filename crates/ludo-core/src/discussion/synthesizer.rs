//! Coordinator synthesis of the agents' proposals

use super::types::AgentResponse;
use ludo_llm::BackendAdapter;
use tracing::{instrument, warn};

/// Module tag for synthesis dispatches
pub const SYNTHESIS_MODULE_TAG: &str = "multiagent_synthesis";

/// Returned when the synthesis dispatch fails
pub const SYNTHESIS_FALLBACK: &str = "Erro ao sintetizar propostas dos agentes.";

/// Merges agent responses into one recommendation
#[derive(Debug, Clone)]
pub struct Synthesizer {
    adapter: BackendAdapter,
    max_tokens: u32,
}

impl Synthesizer {
    /// Create a synthesizer dispatching through `adapter`
    pub fn new(adapter: BackendAdapter, max_tokens: u32) -> Self {
        Self {
            adapter,
            max_tokens,
        }
    }

    /// Synthesis prompt for `responses`
    #[must_use]
    pub fn prompt(responses: &[AgentResponse], message: &str) -> String {
        let proposals = responses
            .iter()
            .map(|r| format!("{}: {}", r.agent.name, r.response))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Como Agente Coordenador, sintetize as seguintes propostas dos agentes especialistas \
             para criar sugestões coerentes e implementáveis:\n\n\
             PROPOSTAS DOS AGENTES:\n{proposals}\n\n\
             CONTEXTO DA CONVERSA: {message}\n\n\
             Sintetize as propostas em sugestões específicas e práticas para o Endo-GDC.\n\
             Organize por seções do canvas quando relevante.\n\
             Evite contradições entre as propostas.\n\
             Forneça justificativas baseadas nas diferentes perspectivas dos agentes."
        )
    }

    /// Dispatch the synthesis; never fails
    #[instrument(skip(self, responses, message), fields(responses = responses.len()))]
    pub async fn synthesize(
        &self,
        responses: &[AgentResponse],
        message: &str,
        session_id: Option<i64>,
    ) -> String {
        let prompt = Self::prompt(responses, message);
        let result = self
            .adapter
            .dispatch(&prompt, SYNTHESIS_MODULE_TAG, session_id, self.max_tokens)
            .await;

        match result.content {
            Some(content) if result.success => content,
            _ => {
                warn!(error = ?result.error_message, "Synthesis failed, using fallback text");
                SYNTHESIS_FALLBACK.to_string()
            }
        }
    }
}
