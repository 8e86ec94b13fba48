//! Agent catalog
//!
//! Every agent is a fixed [`AgentProfile`]: who it is, which backend family
//! answers for it and the template its prompt is rendered from.

use crate::error::{Error, Result};
use ludo_llm::BackendKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agent identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Frames the discussion and synthesizes the proposals
    Coordinator,
    /// Storytelling and worldbuilding
    Narrative,
    /// Game systems, rules and feedback loops
    Mechanics,
    /// Instructional design
    Pedagogy,
    /// Motivation and player engagement
    Engagement,
    /// Technical feasibility
    Technology,
}

impl AgentId {
    /// Every identifier, coordinator first
    pub const ALL: [AgentId; 6] = [
        AgentId::Coordinator,
        AgentId::Narrative,
        AgentId::Mechanics,
        AgentId::Pedagogy,
        AgentId::Engagement,
        AgentId::Technology,
    ];

    /// Identifier as used in configuration and JSON
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Coordinator => "coordinator",
            AgentId::Narrative => "narrative",
            AgentId::Mechanics => "mechanics",
            AgentId::Pedagogy => "pedagogy",
            AgentId::Engagement => "engagement",
            AgentId::Technology => "technology",
        }
    }

    /// Whether this is the coordinator
    #[must_use]
    pub fn is_coordinator(&self) -> bool {
        matches!(self, AgentId::Coordinator)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AgentId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Configuration(format!("unknown agent id: {}", s)))
    }
}

/// Pieces an agent prompt is rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Opening line stating the agent's role
    pub role: &'static str,
    /// Line introducing the focus list
    pub focus_heading: &'static str,
    /// Aspects the agent must cover
    pub focus: &'static [&'static str],
    /// Closing instruction
    pub closing: &'static str,
}

/// An expert agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Unique identifier
    pub id: AgentId,
    /// Human-readable name
    pub display_name: &'static str,
    /// One-line description of the specialty
    pub description: &'static str,
    /// Display emoji
    pub emoji: &'static str,
    /// Backend family that answers for this agent
    pub backend: BackendKind,
    /// Prompt template
    pub template: PromptTemplate,
}

impl AgentProfile {
    /// Public view of the profile, as embedded in discussion results
    #[must_use]
    pub fn card(&self) -> AgentCard {
        AgentCard {
            id: self.id,
            name: self.display_name.to_string(),
            description: self.description.to_string(),
            emoji: self.emoji.to_string(),
            backend: self.backend,
        }
    }
}

/// Serializable summary of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCard {
    /// Agent identifier
    pub id: AgentId,
    /// Display name
    pub name: String,
    /// Specialty description
    pub description: String,
    /// Display emoji
    pub emoji: String,
    /// Backend family
    pub backend: BackendKind,
}

/// Read-only catalog of agent profiles
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    profiles: Vec<AgentProfile>,
    coordinator: usize,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self {
            profiles: builtin_profiles(),
            coordinator: 0,
        }
    }
}

impl AgentRegistry {
    /// Build a registry from explicit profiles
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids or when no coordinator is present.
    pub fn new(profiles: Vec<AgentProfile>) -> Result<Self> {
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.id == profile.id) {
                return Err(Error::Configuration(format!(
                    "duplicate agent id: {}",
                    profile.id
                )));
            }
        }

        let coordinator = profiles
            .iter()
            .position(|p| p.id.is_coordinator())
            .ok_or_else(|| Error::Configuration("registry has no coordinator".to_string()))?;

        Ok(Self {
            profiles,
            coordinator,
        })
    }

    /// Look up a profile
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The coordinator profile
    #[must_use]
    pub fn coordinator(&self) -> &AgentProfile {
        &self.profiles[self.coordinator]
    }

    /// Every non-coordinator profile, in catalog order
    pub fn specialists(&self) -> impl Iterator<Item = &AgentProfile> {
        self.profiles.iter().filter(|p| !p.id.is_coordinator())
    }

    /// Every profile, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &AgentProfile> {
        self.profiles.iter()
    }

    /// Number of profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn builtin_profiles() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: AgentId::Coordinator,
            display_name: "Agente Coordenador",
            description: "Coordena a discussão entre agentes e sintetiza propostas",
            emoji: "🎯",
            backend: BackendKind::ChatCompletion,
            template: PromptTemplate {
                role: "Você é o Agente Coordenador de um sistema multiagentes para design de jogos educativos.",
                focus_heading: "Como coordenador, analise a situação e forneça diretrizes gerais para o design. Foque em:",
                focus: &[
                    "Coerência geral do projeto",
                    "Prioridades de design",
                    "Conectar elementos entre diferentes aspectos do jogo",
                ],
                closing: "Responda de forma concisa e estruturada.",
            },
        },
        AgentProfile {
            id: AgentId::Narrative,
            display_name: "Especialista em Narrativa",
            description: "Especializado em storytelling e design narrativo",
            emoji: "📖",
            backend: BackendKind::GenerateContent,
            template: PromptTemplate {
                role: "Você é o Especialista em Narrativa em um sistema de design de jogos educativos.",
                focus_heading: "Como especialista em narrativa, foque em:",
                focus: &[
                    "Storytelling e worldbuilding",
                    "Desenvolvimento de personagens",
                    "Progressão narrativa",
                    "Conexão entre narrativa e objetivos educacionais",
                ],
                closing: "Forneça sugestões específicas para elementos narrativos.",
            },
        },
        AgentProfile {
            id: AgentId::Mechanics,
            display_name: "Especialista em Mecânicas",
            description: "Foca em mecânicas de jogo e sistemas de feedback",
            emoji: "⚙️",
            backend: BackendKind::ChatCompletion,
            template: PromptTemplate {
                role: "Você é o Especialista em Mecânicas de Jogo em um sistema de design de jogos educativos.",
                focus_heading: "Como especialista em mecânicas, foque em:",
                focus: &[
                    "Sistemas de jogo e regras",
                    "Loops de feedback",
                    "Progressão e recompensas",
                    "Mecânicas que reforçam o aprendizado",
                ],
                closing: "Forneça sugestões específicas para mecânicas de jogo.",
            },
        },
        AgentProfile {
            id: AgentId::Pedagogy,
            display_name: "Especialista Pedagógico",
            description: "Especializado em design instrucional e pedagogia",
            emoji: "👨‍🎓",
            backend: BackendKind::GenerateContent,
            template: PromptTemplate {
                role: "Você é o Especialista Pedagógico em um sistema de design de jogos educativos.",
                focus_heading: "Como especialista pedagógico, foque em:",
                focus: &[
                    "Alinhamento com objetivos educacionais",
                    "Métodos de ensino eficazes",
                    "Avaliação da aprendizagem",
                    "Adaptação a diferentes estilos de aprendizagem",
                ],
                closing: "Forneça sugestões baseadas em princípios pedagógicos sólidos.",
            },
        },
        AgentProfile {
            id: AgentId::Engagement,
            display_name: "Especialista em Engajamento",
            description: "Foca em motivação e elementos de engajamento",
            emoji: "🎮",
            backend: BackendKind::ChatCompletion,
            template: PromptTemplate {
                role: "Você é o Especialista em Engajamento em um sistema de design de jogos educativos.",
                focus_heading: "Como especialista em engajamento, foque em:",
                focus: &[
                    "Elementos motivacionais",
                    "Flow e imersão",
                    "Sistemas de recompensa",
                    "Manutenção do interesse do jogador",
                ],
                closing: "Forneça sugestões para maximizar o engajamento dos estudantes.",
            },
        },
        AgentProfile {
            id: AgentId::Technology,
            display_name: "Especialista Técnico",
            description: "Avalia viabilidade técnica e recursos necessários",
            emoji: "💻",
            backend: BackendKind::GenerateContent,
            template: PromptTemplate {
                role: "Você é o Especialista Técnico em um sistema de design de jogos educativos.",
                focus_heading: "Como especialista técnico, foque em:",
                focus: &[
                    "Viabilidade técnica",
                    "Recursos necessários",
                    "Plataformas e tecnologias",
                    "Considerações de implementação",
                ],
                closing: "Forneça sugestões práticas e viáveis tecnicamente.",
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let registry = AgentRegistry::default();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.coordinator().id, AgentId::Coordinator);
        assert_eq!(registry.specialists().count(), 5);

        for id in AgentId::ALL {
            assert!(registry.get(id).is_some(), "missing profile for {id}");
        }
    }

    #[test]
    fn test_backend_affinity() {
        let registry = AgentRegistry::default();
        let backend = |id| registry.get(id).map(|p| p.backend);

        assert_eq!(backend(AgentId::Coordinator), Some(BackendKind::ChatCompletion));
        assert_eq!(backend(AgentId::Narrative), Some(BackendKind::GenerateContent));
        assert_eq!(backend(AgentId::Mechanics), Some(BackendKind::ChatCompletion));
        assert_eq!(backend(AgentId::Pedagogy), Some(BackendKind::GenerateContent));
        assert_eq!(backend(AgentId::Engagement), Some(BackendKind::ChatCompletion));
        assert_eq!(backend(AgentId::Technology), Some(BackendKind::GenerateContent));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let mut profiles = builtin_profiles();
        profiles.push(profiles[1].clone());
        assert!(matches!(
            AgentRegistry::new(profiles),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_new_requires_coordinator() {
        let profiles = builtin_profiles().into_iter().skip(1).collect();
        assert!(AgentRegistry::new(profiles).is_err());
    }

    #[test]
    fn test_new_finds_coordinator_anywhere() {
        let mut profiles = builtin_profiles();
        profiles.rotate_left(2);
        let registry = AgentRegistry::new(profiles).unwrap();
        assert_eq!(registry.coordinator().display_name, "Agente Coordenador");
    }

    #[test]
    fn test_agent_id_parsing() {
        assert_eq!("narrative".parse::<AgentId>().unwrap(), AgentId::Narrative);
        assert_eq!(" Technology ".parse::<AgentId>().unwrap(), AgentId::Technology);
        assert!("art".parse::<AgentId>().is_err());
    }

    #[test]
    fn test_card_serialization() {
        let registry = AgentRegistry::default();
        let card = registry.get(AgentId::Pedagogy).unwrap().card();
        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["id"], "pedagogy");
        assert_eq!(json["name"], "Especialista Pedagógico");
        assert_eq!(json["backend"], "generate_content");
    }
}
