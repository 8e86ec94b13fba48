//! Agent selection
//!
//! Routing is pure table lookup: keywords found in the lower-cased message
//! and the optional focus section map to specialists. When nothing matches,
//! two specialists are drawn at random so every discussion has a panel.

use super::registry::AgentId;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Specialists drawn when no keyword or section matched
const RANDOM_PANEL_SIZE: usize = 2;

/// Keyword and section routes to specialists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    keywords: Vec<(String, Vec<AgentId>)>,
    sections: Vec<(String, Vec<AgentId>)>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        use AgentId::*;

        let keywords = [
            ("narrativa", Narrative),
            ("história", Narrative),
            ("personagem", Narrative),
            ("mecânica", Mechanics),
            ("regras", Mechanics),
            ("sistema", Mechanics),
            ("aprendizado", Pedagogy),
            ("educacional", Pedagogy),
            ("pedagogia", Pedagogy),
            ("motivação", Engagement),
            ("engajamento", Engagement),
            ("diversão", Engagement),
            ("tecnologia", Technology),
            ("implementação", Technology),
            ("recursos", Technology),
        ];
        let sections = [
            ("Narrativa", Narrative),
            ("Mecânicas de Jogo", Mechanics),
            ("Objetivos de Aprendizagem", Pedagogy),
            ("Motivação e Engajamento", Engagement),
            ("Tecnologia", Technology),
        ];

        let mut table = Self::empty();
        for (keyword, id) in keywords {
            table = table.with_keyword(keyword, [id]);
        }
        for (section, id) in sections {
            table = table.with_section(section, [id]);
        }
        table
    }
}

impl RoutingTable {
    /// A table with no routes
    #[must_use]
    pub fn empty() -> Self {
        Self {
            keywords: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Route a keyword (matched case-insensitively as a substring)
    #[must_use]
    pub fn with_keyword(
        mut self,
        keyword: impl AsRef<str>,
        agents: impl IntoIterator<Item = AgentId>,
    ) -> Self {
        let keyword = keyword.as_ref().trim().to_lowercase();
        let agents: Vec<AgentId> = agents.into_iter().collect();
        match self.keywords.iter_mut().find(|(k, _)| *k == keyword) {
            Some((_, existing)) => existing.extend(agents),
            None => self.keywords.push((keyword, agents)),
        }
        self
    }

    /// Route a canvas section name (matched exactly)
    #[must_use]
    pub fn with_section(
        mut self,
        section: impl Into<String>,
        agents: impl IntoIterator<Item = AgentId>,
    ) -> Self {
        let section = section.into();
        let agents: Vec<AgentId> = agents.into_iter().collect();
        match self.sections.iter_mut().find(|(s, _)| *s == section) {
            Some((_, existing)) => existing.extend(agents),
            None => self.sections.push((section, agents)),
        }
        self
    }

    /// Agents whose keywords occur in `message`, in table order
    pub fn keyword_matches<'a>(&'a self, message: &str) -> impl Iterator<Item = AgentId> + 'a {
        let lower = message.to_lowercase();
        self.keywords
            .iter()
            .filter(move |(keyword, _)| lower.contains(keyword.as_str()))
            .flat_map(|(_, agents)| agents.iter().copied())
    }

    /// Agents routed from a focus section
    #[must_use]
    pub fn section_agents(&self, section: &str) -> &[AgentId] {
        self.sections
            .iter()
            .find(|(s, _)| s == section)
            .map(|(_, agents)| agents.as_slice())
            .unwrap_or_default()
    }

    /// Keywords in table order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|(k, _)| k.as_str())
    }

    /// Section names in table order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(s, _)| s.as_str())
    }
}

/// Picks the panel for a discussion
#[derive(Debug, Clone)]
pub struct AgentSelector {
    routes: RoutingTable,
    specialists: Vec<AgentId>,
}

impl AgentSelector {
    /// Create a selector drawing random panels from `specialists`
    pub fn new(routes: RoutingTable, specialists: impl IntoIterator<Item = AgentId>) -> Self {
        Self {
            routes,
            specialists: specialists
                .into_iter()
                .filter(|id| !id.is_coordinator())
                .collect(),
        }
    }

    /// Select the agents for `message`.
    ///
    /// The coordinator always comes first; the result is deduplicated and
    /// keeps insertion order. Route targets outside the specialist list are
    /// ignored, so a table naming only unavailable agents falls back to the
    /// random panel.
    pub fn select<R: Rng + ?Sized>(
        &self,
        message: &str,
        focus_section: Option<&str>,
        rng: &mut R,
    ) -> Vec<AgentId> {
        let mut selected = vec![AgentId::Coordinator];

        let routed = self.routes.keyword_matches(message).chain(
            focus_section
                .map(|s| self.routes.section_agents(s))
                .unwrap_or_default()
                .iter()
                .copied(),
        );
        for id in routed {
            if !id.is_coordinator() && !self.specialists.contains(&id) {
                debug!(agent = %id, "Route target unavailable, ignoring");
                continue;
            }
            if !selected.contains(&id) {
                selected.push(id);
            }
        }

        if selected.iter().all(AgentId::is_coordinator) {
            let n = RANDOM_PANEL_SIZE.min(self.specialists.len());
            selected.extend(self.specialists.choose_multiple(rng, n).copied());
            debug!(panel = ?selected, "No route matched, drew random panel");
        }

        selected
    }
}
