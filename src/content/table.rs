//! Closed allow-list of editable content tables.
//!
//! Table names arrive as strings at the HTTP boundary but are parsed into
//! this enum immediately, so an invalid table is an exhaustively-matched
//! condition everywhere past the edge.

use serde::{Deserialize, Serialize};

/// Fields that can only be set by the store, never by API input
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTable {
    SkillCategories,
    WorkExperiences,
    Education,
    Projects,
    Languages,
}

/// Column type for dynamic SQL binding and payload validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
    Integer,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind, nullable: false }
}

const fn nullable(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind, nullable: true }
}

const SKILL_CATEGORY_FIELDS: &[FieldDef] = &[
    field("icon_name", FieldKind::Text),
    field("title_en", FieldKind::Text),
    field("title_da", FieldKind::Text),
    field("skills", FieldKind::TextList),
    field("sort_order", FieldKind::Integer),
];

const WORK_EXPERIENCE_FIELDS: &[FieldDef] = &[
    field("title_en", FieldKind::Text),
    field("title_da", FieldKind::Text),
    field("position_en", FieldKind::Text),
    field("position_da", FieldKind::Text),
    field("points_en", FieldKind::TextList),
    field("points_da", FieldKind::TextList),
    field("year_label", FieldKind::Text),
    field("sort_order", FieldKind::Integer),
];

const EDUCATION_FIELDS: &[FieldDef] = &[
    field("title_en", FieldKind::Text),
    field("title_da", FieldKind::Text),
    field("institution_en", FieldKind::Text),
    field("institution_da", FieldKind::Text),
    field("competencies_en", FieldKind::TextList),
    field("competencies_da", FieldKind::TextList),
    field("year_label", FieldKind::Text),
    field("sort_order", FieldKind::Integer),
];

const PROJECT_FIELDS: &[FieldDef] = &[
    field("title_en", FieldKind::Text),
    field("title_da", FieldKind::Text),
    field("description_en", FieldKind::Text),
    field("description_da", FieldKind::Text),
    field("technologies", FieldKind::TextList),
    nullable("points_en", FieldKind::TextList),
    nullable("points_da", FieldKind::TextList),
    nullable("metrics", FieldKind::Json),
    field("label_en", FieldKind::Text),
    field("label_da", FieldKind::Text),
    nullable("year_label", FieldKind::Text),
    field("sort_order", FieldKind::Integer),
];

const LANGUAGE_FIELDS: &[FieldDef] = &[
    field("lang_en", FieldKind::Text),
    field("lang_da", FieldKind::Text),
    field("level_en", FieldKind::Text),
    field("level_da", FieldKind::Text),
    field("flag", FieldKind::Text),
    field("sort_order", FieldKind::Integer),
];

impl EntityTable {
    pub const ALL: &'static [EntityTable] = &[
        EntityTable::SkillCategories,
        EntityTable::WorkExperiences,
        EntityTable::Education,
        EntityTable::Projects,
        EntityTable::Languages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTable::SkillCategories => "skill_categories",
            EntityTable::WorkExperiences => "work_experiences",
            EntityTable::Education => "education",
            EntityTable::Projects => "projects",
            EntityTable::Languages => "languages",
        }
    }

    /// Writable column schema for this table
    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            EntityTable::SkillCategories => SKILL_CATEGORY_FIELDS,
            EntityTable::WorkExperiences => WORK_EXPERIENCE_FIELDS,
            EntityTable::Education => EDUCATION_FIELDS,
            EntityTable::Projects => PROJECT_FIELDS,
            EntityTable::Languages => LANGUAGE_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn is_system_field(name: &str) -> bool {
        SYSTEM_FIELDS.contains(&name)
    }
}

impl std::str::FromStr for EntityTable {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill_categories" => Ok(EntityTable::SkillCategories),
            "work_experiences" => Ok(EntityTable::WorkExperiences),
            "education" => Ok(EntityTable::Education),
            "projects" => Ok(EntityTable::Projects),
            "languages" => Ok(EntityTable::Languages),
            other => Err(UnknownTable(other.to_string())),
        }
    }
}

impl std::fmt::Display for EntityTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown content table: {0}")]
pub struct UnknownTable(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_every_allow_listed_table() {
        for table in EntityTable::ALL {
            assert_eq!(EntityTable::from_str(table.as_str()).unwrap(), *table);
        }
    }

    #[test]
    fn rejects_unknown_table() {
        assert!(EntityTable::from_str("admin_users").is_err());
        assert!(EntityTable::from_str("").is_err());
        assert!(EntityTable::from_str("Projects").is_err());
    }

    #[test]
    fn field_schema_lookup() {
        let projects = EntityTable::Projects;
        assert_eq!(projects.field("title_en").unwrap().kind, FieldKind::Text);
        assert_eq!(
            projects.field("technologies").unwrap().kind,
            FieldKind::TextList
        );
        assert!(projects.field("points_en").unwrap().nullable);
        assert!(projects.field("nonexistent").is_none());
    }

    #[test]
    fn system_fields_are_not_writable() {
        assert!(EntityTable::is_system_field("id"));
        assert!(EntityTable::is_system_field("updated_at"));
        for table in EntityTable::ALL {
            for def in table.fields() {
                assert!(!EntityTable::is_system_field(def.name));
            }
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&EntityTable::SkillCategories).unwrap();
        assert_eq!(json, "\"skill_categories\"");
        let back: EntityTable = serde_json::from_str("\"work_experiences\"").unwrap();
        assert_eq!(back, EntityTable::WorkExperiences);
    }
}
