//! The fixed vocabulary users pick from: NACE career-readiness competencies and
//! course majors. Names are validated here before any store query is built.

use serde::Serialize;
use thiserror::Error;

/// Number of competencies a user must pick.
pub const SELECTION_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(name: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry { name, description }
}

const NACE_COMPETENCIES: [CatalogEntry; 8] = [
    entry("Communication", "Effectively exchange information, ideas, and thoughts with others"),
    entry("Critical Thinking", "Analyze, evaluate, and synthesize information to make informed decisions"),
    entry("Leadership", "Guide, motivate, and influence others to achieve common goals"),
    entry("Teamwork", "Work collaboratively with others to achieve shared objectives"),
    entry("Technology", "Use, understand, and adapt to technological tools and systems"),
    entry("Professionalism", "Demonstrate appropriate workplace behavior, ethics, and work habits"),
    entry("Career & Self-Development", "Manage personal career growth and continuous learning"),
    entry("Equity & Inclusion", "Work effectively with diverse groups and promote inclusive environments"),
];

const COURSE_MAJORS: [CatalogEntry; 15] = [
    entry("Arts", "Creative and visual arts including fine arts, performing arts, and design"),
    entry("Social Sciences", "Study of human society and social relationships"),
    entry("Environmental Studies", "Interdisciplinary study of environmental issues and sustainability"),
    entry("Hospitality & Tourism Management", "Management and operations in hospitality and tourism industries"),
    entry("Applied Technology", "Practical application of technology in various industries"),
    entry("Business", "Study of business operations, management, and entrepreneurship"),
    entry("Communications", "Study of communication theory and practice across various media"),
    entry("Digital Media Arts", "Creative and technical skills in digital media production"),
    entry("Healthcare Administration", "Management and administration in healthcare organizations"),
    entry("Homeland Security", "Study of security, emergency management, and public safety"),
    entry("Human Resource Management", "Management of human resources and organizational behavior"),
    entry("Liberal Studies", "Interdisciplinary study across multiple academic fields"),
    entry("Public Administration", "Study of government operations and public policy"),
    entry("Technology", "Study of computer science, information technology, and technical systems"),
    entry("Sustainability", "Study of environmental sustainability and sustainable practices"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select exactly {SELECTION_SIZE} competencies")]
    WrongCount { got: usize },

    #[error("Competency '{0}' was selected more than once")]
    Duplicate(String),

    #[error("Unknown competency '{0}'")]
    UnknownCompetency(String),

    #[error("Please select a major")]
    MissingMajor,

    #[error("Unknown major '{0}'")]
    UnknownMajor(String),
}

/// Competency and major lists injected into both shells.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub competencies: Vec<CatalogEntry>,
    pub majors: Vec<CatalogEntry>,
}

impl Catalog {
    /// The built-in lists. These are the same whether or not a backend is reachable.
    pub fn builtin() -> Self {
        Catalog {
            competencies: NACE_COMPETENCIES.to_vec(),
            majors: COURSE_MAJORS.to_vec(),
        }
    }

    pub fn competency_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.competencies.iter().map(|c| c.name)
    }

    pub fn major_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.majors.iter().map(|m| m.name)
    }

    pub fn has_competency(&self, name: &str) -> bool {
        self.competency_names().any(|c| c == name)
    }

    /// Trims the name and checks it against the major list.
    pub fn validate_major(&self, name: &str) -> Result<String, SelectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SelectionError::MissingMajor);
        }
        if !self.major_names().any(|m| m == name) {
            return Err(SelectionError::UnknownMajor(name.to_string()));
        }
        Ok(name.to_string())
    }
}

/// Exactly three distinct, known competency names, kept sorted so the same
/// combination always produces the same query and the same ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetencySelection([String; SELECTION_SIZE]);

impl CompetencySelection {
    pub fn new<I, S>(names: I, catalog: &Catalog) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut picked: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .collect();

        if picked.len() != SELECTION_SIZE {
            return Err(SelectionError::WrongCount { got: picked.len() });
        }
        if let Some(unknown) = picked.iter().find(|n| !catalog.has_competency(n)) {
            return Err(SelectionError::UnknownCompetency(unknown.clone()));
        }

        picked.sort();
        if let Some(pair) = picked.windows(2).find(|w| w[0] == w[1]) {
            return Err(SelectionError::Duplicate(pair[0].clone()));
        }

        let [a, b, c]: [String; SELECTION_SIZE] = picked
            .try_into()
            .map_err(|v: Vec<String>| SelectionError::WrongCount { got: v.len() })?;
        Ok(CompetencySelection([a, b, c]))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn label(&self) -> String {
        self.0.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_sizes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.competencies.len(), 8);
        assert_eq!(catalog.majors.len(), 15);
    }

    #[test]
    fn test_selection_is_sorted() {
        let catalog = Catalog::builtin();
        let sel =
            CompetencySelection::new(["Teamwork", "Communication", "Leadership"], &catalog).unwrap();
        assert_eq!(sel.names(), ["Communication", "Leadership", "Teamwork"]);
        assert_eq!(sel.label(), "Communication, Leadership, Teamwork");
    }

    #[test]
    fn test_selection_requires_exactly_three() {
        let catalog = Catalog::builtin();
        let err = CompetencySelection::new(["Teamwork", "Leadership"], &catalog).unwrap_err();
        assert_eq!(err, SelectionError::WrongCount { got: 2 });
        assert_eq!(err.to_string(), "Please select exactly 3 competencies");
    }

    #[test]
    fn test_selection_rejects_duplicates() {
        let catalog = Catalog::builtin();
        let err = CompetencySelection::new(["Teamwork", "Teamwork", "Leadership"], &catalog)
            .unwrap_err();
        assert_eq!(err, SelectionError::Duplicate("Teamwork".to_string()));
    }

    #[test]
    fn test_selection_rejects_unknown_names() {
        let catalog = Catalog::builtin();
        let err = CompetencySelection::new(["Teamwork", "Leadership", "Juggling"], &catalog)
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownCompetency("Juggling".to_string()));
    }

    #[test]
    fn test_validate_major() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.validate_major(" Business ").unwrap(), "Business");
        assert_eq!(catalog.validate_major("  "), Err(SelectionError::MissingMajor));
        assert!(matches!(
            catalog.validate_major("Alchemy"),
            Err(SelectionError::UnknownMajor(_))
        ));
    }
}
