use petgraph::Directed;
use petgraph::stable_graph::StableGraph;
use serde::{Deserialize, Serialize};

/// Позиция сущности на канвасе
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Сдвиг позиции на (dx, dy)
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Колонка сущности
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    /// Свободный тег типа: "INTEGER", "VARCHAR(255)", "TEXT", "DATE"...
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<String>,
}

impl Column {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            description: None,
            sample_value: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_sample_value(mut self, sample: impl Into<String>) -> Self {
        self.sample_value = Some(sample.into());
        self
    }

    /// Does the data type tag name a date or time type (case-insensitive)
    pub fn is_temporal(&self) -> bool {
        let data_type = self.data_type.to_lowercase();
        data_type.contains("date") || data_type.contains("time")
    }
}

/// Сущность (таблица) схемы
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Позиция на канвасе, на логику движка не влияет
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: Vec::new(),
            position: Position::default(),
            visible: true,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn find_column(&self, column_id: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.id == column_id)
    }

    pub fn foreign_key_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_foreign_key).count()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }

    /// Name of the first primary-key column, `id` when none is flagged
    pub fn primary_key_name(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .unwrap_or("id")
    }
}

/// Проект редактора: именованный набор сущностей
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Входной документ: либо проект целиком, либо голый список сущностей
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum SchemaDocument {
    Project(Project),
    Entities(Vec<Entity>),
}

impl SchemaDocument {
    pub fn entities(&self) -> &[Entity] {
        match self {
            SchemaDocument::Project(project) => &project.entities,
            SchemaDocument::Entities(entities) => entities,
        }
    }

    pub fn into_entities(self) -> Vec<Entity> {
        match self {
            SchemaDocument::Project(project) => project.entities,
            SchemaDocument::Entities(entities) => entities,
        }
    }
}

/// Связь между сущностями, выведенная из соглашения об именах
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    /// Сущность, на которую ссылаются (сторона "один")
    pub from_entity_id: String,
    /// Сущность с колонкой внешнего ключа (сторона "многие")
    pub to_entity_id: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub from_column: String,
    pub to_column: String,
}

/// Тип связи между сущностями
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    /// Один к одному
    #[display("1:1")]
    OneToOne,
    /// Один ко многим
    #[display("1:N")]
    OneToMany,
    /// Многие ко многим
    #[display("N:M")]
    ManyToMany,
}

impl RelationshipType {
    pub fn label(&self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "One-to-One",
            RelationshipType::OneToMany => "One-to-Many",
            RelationshipType::ManyToMany => "Many-to-Many",
        }
    }
}

/// Граф связей: узлы - id сущностей, ребра - связи
pub type RelationshipGraph = StableGraph<String, Relationship, Directed>;
