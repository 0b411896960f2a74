//! Schema model: databases, collections, fields and field directives.
//!
//! These types are produced by the upstream schema parser and are read-only
//! from the point of view of this crate. Directives are a closed set so that
//! contradictory combinations (a primary key that is also a foreign key, a
//! foreign key without a target table) are rejected by [`FieldType::validate`]
//! instead of being carried around as loose flags.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Default sort direction for index directives.
pub const DEFAULT_INDEX_SORT: &str = "asc";

/// Default position of a field inside a composite index.
pub const DEFAULT_INDEX_ORDER: i32 = 1;

/// Column size used for `ID` fields (`VARCHAR(50)`).
pub const SQL_TYPE_ID_SIZE: u32 = 50;

/// All databases known to the gateway, keyed by database name.
pub type Type = HashMap<String, Collection>;

/// Collections of one database, keyed by collection (table) name.
pub type Collection = HashMap<String, Fields>;

/// Fields of one collection, keyed by field (column) name.
pub type Fields = HashMap<String, FieldType>;

/// Logical kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Integer,
    String,
    Float,
    Boolean,
    DateTime,
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "JSON")]
    Json,
    Object,
    Enum,
}

impl FieldKind {
    /// Name used by the schema definition language.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Integer => "Integer",
            FieldKind::String => "String",
            FieldKind::Float => "Float",
            FieldKind::Boolean => "Boolean",
            FieldKind::DateTime => "DateTime",
            FieldKind::Id => "ID",
            FieldKind::Json => "JSON",
            FieldKind::Object => "Object",
            FieldKind::Enum => "Enum",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Integer" => Ok(FieldKind::Integer),
            "String" => Ok(FieldKind::String),
            "Float" => Ok(FieldKind::Float),
            "Boolean" => Ok(FieldKind::Boolean),
            "DateTime" => Ok(FieldKind::DateTime),
            "ID" => Ok(FieldKind::Id),
            "JSON" => Ok(FieldKind::Json),
            "Object" => Ok(FieldKind::Object),
            "Enum" => Ok(FieldKind::Enum),
            other => Err(GatewayError::config(format!("unknown field kind '{}'", other))),
        }
    }
}

/// Parameters attached to relation and index directives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProperties {
    /// Local end of a relation.
    #[serde(default)]
    pub from: String,

    /// Remote end of a relation.
    #[serde(default)]
    pub to: String,

    /// Target table.
    #[serde(default)]
    pub table: String,

    /// Target field.
    #[serde(default)]
    pub field: String,

    /// ON DELETE action (e.g. "CASCADE").
    #[serde(default)]
    pub on_delete: String,

    /// Backing database type of the target.
    #[serde(default)]
    pub db_type: String,

    /// Index group name for composite indexes.
    #[serde(default)]
    pub group: String,

    /// Index sort direction.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Position inside a composite index.
    #[serde(default = "default_order")]
    pub order: i32,

    /// Explicit constraint name.
    #[serde(default)]
    pub constraint_name: String,
}

fn default_sort() -> String {
    DEFAULT_INDEX_SORT.to_string()
}

fn default_order() -> i32 {
    DEFAULT_INDEX_ORDER
}

impl Default for TableProperties {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            table: String::new(),
            field: String::new(),
            on_delete: String::new(),
            db_type: String::new(),
            group: String::new(),
            sort: default_sort(),
            order: default_order(),
            constraint_name: String::new(),
        }
    }
}

impl TableProperties {
    /// Relation target `table.field`.
    pub fn reference(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            ..Self::default()
        }
    }

    /// Index membership in `group`.
    pub fn index_group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Self::default()
        }
    }
}

/// A schema annotation attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "directive", content = "args", rename_all = "camelCase")]
pub enum Directive {
    Primary,
    Unique(TableProperties),
    Index(TableProperties),
    Foreign(TableProperties),
    Link(TableProperties),
    Default(Value),
    CreatedAt,
    UpdatedAt,
}

impl Directive {
    /// Directive name as written in the schema definition language.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Primary => "primary",
            Directive::Unique(_) => "unique",
            Directive::Index(_) => "index",
            Directive::Foreign(_) => "foreign",
            Directive::Link(_) => "link",
            Directive::Default(_) => "default",
            Directive::CreatedAt => "createdAt",
            Directive::UpdatedAt => "updatedAt",
        }
    }
}

/// Full description of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    pub field_name: String,

    pub kind: FieldKind,

    #[serde(default, rename = "isFieldTypeRequired")]
    pub is_required: bool,

    #[serde(default)]
    pub is_list: bool,

    /// Sub-fields for `Object` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_object: Option<Fields>,

    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl FieldType {
    /// Create an optional, scalar field with no directives.
    pub fn new(field_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            field_name: field_name.into(),
            kind,
            is_required: false,
            is_list: false,
            nested_object: None,
            directives: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn nested(mut self, fields: Fields) -> Self {
        self.nested_object = Some(fields);
        self
    }

    /// Attach a directive. `Primary` also marks the field required.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        if directive == Directive::Primary {
            self.is_required = true;
        }
        self.directives.push(directive);
        self
    }

    pub fn is_primary(&self) -> bool {
        self.has(|d| matches!(d, Directive::Primary))
    }

    pub fn is_unique(&self) -> bool {
        self.has(|d| matches!(d, Directive::Unique(_)))
    }

    pub fn is_index(&self) -> bool {
        self.has(|d| matches!(d, Directive::Index(_)))
    }

    pub fn is_foreign(&self) -> bool {
        self.has(|d| matches!(d, Directive::Foreign(_)))
    }

    pub fn is_linked(&self) -> bool {
        self.has(|d| matches!(d, Directive::Link(_)))
    }

    pub fn is_created_at(&self) -> bool {
        self.has(|d| matches!(d, Directive::CreatedAt))
    }

    pub fn is_updated_at(&self) -> bool {
        self.has(|d| matches!(d, Directive::UpdatedAt))
    }

    /// Directive-supplied default value.
    pub fn default_value(&self) -> Option<&Value> {
        self.directives.iter().find_map(|d| match d {
            Directive::Default(v) => Some(v),
            _ => None,
        })
    }

    /// Index parameters for `index` and `unique` directives.
    pub fn index_info(&self) -> Option<&TableProperties> {
        self.directives.iter().find_map(|d| match d {
            Directive::Index(p) | Directive::Unique(p) => Some(p),
            _ => None,
        })
    }

    /// Virtual relation target for `link` directives.
    pub fn linked_table(&self) -> Option<&TableProperties> {
        self.directives.iter().find_map(|d| match d {
            Directive::Link(p) => Some(p),
            _ => None,
        })
    }

    /// Foreign key target for `foreign` directives.
    pub fn joint_table(&self) -> Option<&TableProperties> {
        self.directives.iter().find_map(|d| match d {
            Directive::Foreign(p) => Some(p),
            _ => None,
        })
    }

    /// Check directive combinations.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Config` when a directive appears twice, when a
    /// primary key is optional or also a relation, when a relation has no
    /// target table, or when a default does not fit the field kind.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&'static str> = Vec::with_capacity(self.directives.len());
        for directive in &self.directives {
            let name = directive.name();
            if seen.contains(&name) {
                return Err(self.invalid(format!("directive '@{}' given more than once", name)));
            }
            seen.push(name);
        }

        if self.is_primary() {
            if !self.is_required {
                return Err(self.invalid("primary key must be required"));
            }
            if self.is_foreign() || self.is_linked() {
                return Err(self.invalid("primary key cannot be a foreign key or link"));
            }
        }

        if self.is_foreign() && self.is_linked() {
            return Err(self.invalid("field cannot be both a foreign key and a link"));
        }

        for props in [self.joint_table(), self.linked_table()].into_iter().flatten() {
            if props.table.is_empty() {
                return Err(self.invalid("relation directive needs a target table"));
            }
        }

        if let Some(default) = self.default_value() {
            if !default_fits_kind(self.kind, default) {
                return Err(self.invalid(format!(
                    "default value {} does not match kind {}",
                    default, self.kind
                )));
            }
        }

        if let Some(nested) = &self.nested_object {
            validate_fields(nested)?;
        }

        Ok(())
    }

    fn has(&self, pred: impl Fn(&Directive) -> bool) -> bool {
        self.directives.iter().any(pred)
    }

    fn invalid(&self, message: impl Into<String>) -> GatewayError {
        GatewayError::config(format!("field '{}': {}", self.field_name, message.into()))
    }
}

fn default_fits_kind(kind: FieldKind, value: &Value) -> bool {
    match kind {
        FieldKind::Integer => value.is_i64() || value.is_u64(),
        FieldKind::Float => value.is_number(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::String | FieldKind::Id | FieldKind::DateTime | FieldKind::Enum => {
            value.is_string()
        }
        FieldKind::Json | FieldKind::Object => true,
    }
}

/// Validate every field in a collection.
pub fn validate_fields(fields: &Fields) -> Result<()> {
    for (name, field) in fields {
        if name != &field.field_name {
            return Err(GatewayError::config(format!(
                "field keyed as '{}' is named '{}'",
                name, field.field_name
            )));
        }
        field.validate()?;
    }
    Ok(())
}

/// Validate every collection of every database.
pub fn validate_schema(schema: &Type) -> Result<()> {
    for (db, collections) in schema {
        for (collection, fields) in collections {
            validate_fields(fields).map_err(|e| {
                GatewayError::config(format!("{}.{}: {}", db, collection, e))
            })?;
        }
    }
    Ok(())
}

/// Look up a single field.
pub fn lookup_field<'a>(
    schema: &'a Type,
    db: &str,
    collection: &str,
    field: &str,
) -> Option<&'a FieldType> {
    schema.get(db)?.get(collection)?.get(field)
}

/// Primary key field names of a collection, sorted.
pub fn primary_keys(fields: &Fields) -> Vec<&str> {
    let mut keys: Vec<&str> = fields
        .values()
        .filter(|f| f.is_primary())
        .map(|f| f.field_name.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

/// One column as reported by database inspection (`DESCRIBE`-style rows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectorFieldType {
    #[serde(rename = "Field")]
    pub field_name: String,

    #[serde(rename = "Type")]
    pub field_type: String,

    /// `YES` or `NO`.
    #[serde(rename = "Null", default)]
    pub field_null: String,

    /// `PRI`, `UNI`, `MUL` or empty.
    #[serde(rename = "Key", default)]
    pub field_key: String,

    #[serde(rename = "Default", default)]
    pub field_default: String,
}

impl InspectorFieldType {
    pub fn is_nullable(&self) -> bool {
        self.field_null.eq_ignore_ascii_case("YES")
    }

    pub fn is_primary(&self) -> bool {
        self.field_key.eq_ignore_ascii_case("PRI")
    }
}

/// One foreign key as reported by database inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ForeignKeysType {
    pub table_name: String,
    pub column_name: String,
    pub constraint_name: String,
    #[serde(default)]
    pub delete_rule: String,
    #[serde(rename = "REFERENCED_TABLE_NAME")]
    pub ref_table_name: String,
    #[serde(rename = "REFERENCED_COLUMN_NAME")]
    pub ref_column_name: String,
}

impl ForeignKeysType {
    /// Relation properties for a `foreign` directive on the local column.
    pub fn table_properties(&self) -> TableProperties {
        TableProperties {
            on_delete: self.delete_rule.clone(),
            constraint_name: self.constraint_name.clone(),
            ..TableProperties::reference(&self.ref_table_name, &self.ref_column_name)
        }
    }
}

/// One index column as reported by database inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IndexType {
    pub table_name: String,
    pub column_name: String,
    pub index_name: String,
    #[serde(rename = "SEQ_IN_INDEX")]
    pub order: i32,
    #[serde(default)]
    pub sort: String,
    /// `yes`/`no` as reported by the backend.
    #[serde(default)]
    pub is_unique: String,
}

impl IndexType {
    pub fn is_unique(&self) -> bool {
        matches!(self.is_unique.to_ascii_lowercase().as_str(), "yes" | "true" | "1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            "id".to_string(),
            FieldType::new("id", FieldKind::Id).with_directive(Directive::Primary),
        );
        fields.insert(
            "email".to_string(),
            FieldType::new("email", FieldKind::String)
                .required()
                .with_directive(Directive::Unique(TableProperties::index_group("email_idx"))),
        );
        fields.insert(
            "team_id".to_string(),
            FieldType::new("team_id", FieldKind::Id)
                .with_directive(Directive::Foreign(TableProperties::reference("teams", "id"))),
        );
        fields
    }

    #[test]
    fn test_primary_implies_required() {
        let field = FieldType::new("id", FieldKind::Integer).with_directive(Directive::Primary);
        assert!(field.is_primary());
        assert!(field.is_required);
        assert!(field.validate().is_ok());
    }

    #[test]
    fn test_optional_primary_rejected() {
        let mut field = FieldType::new("id", FieldKind::Integer).with_directive(Directive::Primary);
        field.is_required = false;
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_primary_foreign_rejected() {
        let field = FieldType::new("id", FieldKind::Id)
            .with_directive(Directive::Primary)
            .with_directive(Directive::Foreign(TableProperties::reference("teams", "id")));
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_foreign_needs_target_table() {
        let field = FieldType::new("team_id", FieldKind::Id)
            .with_directive(Directive::Foreign(TableProperties::default()));
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_duplicate_directive_rejected() {
        let field = FieldType::new("created", FieldKind::DateTime)
            .with_directive(Directive::CreatedAt)
            .with_directive(Directive::CreatedAt);
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_default_must_match_kind() {
        let ok = FieldType::new("age", FieldKind::Integer)
            .with_directive(Directive::Default(json!(18)));
        assert!(ok.validate().is_ok());
        assert_eq!(ok.default_value(), Some(&json!(18)));

        let bad = FieldType::new("age", FieldKind::Integer)
            .with_directive(Directive::Default(json!("x")));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_index_defaults() {
        let props = TableProperties::default();
        assert_eq!(props.sort, "asc");
        assert_eq!(props.order, 1);

        let parsed: TableProperties = serde_json::from_value(json!({"group": "g"})).unwrap();
        assert_eq!(parsed.sort, DEFAULT_INDEX_SORT);
        assert_eq!(parsed.order, DEFAULT_INDEX_ORDER);
    }

    #[test]
    fn test_relation_accessors() {
        let fields = users();
        assert_eq!(fields["team_id"].joint_table().unwrap().table, "teams");
        assert!(fields["team_id"].linked_table().is_none());
        assert_eq!(fields["email"].index_info().unwrap().group, "email_idx");
        assert!(fields["id"].index_info().is_none());
    }

    #[test]
    fn test_validate_schema_and_lookup() {
        let mut collection = Collection::new();
        collection.insert("users".to_string(), users());
        let mut schema = Type::new();
        schema.insert("app".to_string(), collection);

        assert!(validate_schema(&schema).is_ok());
        assert_eq!(primary_keys(&schema["app"]["users"]), vec!["id"]);
        assert!(lookup_field(&schema, "app", "users", "email").unwrap().is_unique());
        assert!(lookup_field(&schema, "app", "users", "missing").is_none());
    }

    #[test]
    fn test_mismatched_key_rejected() {
        let mut fields = Fields::new();
        fields.insert("a".to_string(), FieldType::new("b", FieldKind::String));
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_deserialize_field_type() {
        let field: FieldType = serde_json::from_value(json!({
            "fieldName": "tags",
            "kind": "JSON",
            "isFieldTypeRequired": false,
            "isList": true,
            "directives": [
                {"directive": "index", "args": {"group": "tag_idx", "sort": "desc"}},
                {"directive": "createdAt"}
            ]
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Json);
        assert!(field.is_list);
        assert!(field.is_created_at());
        let info = field.index_info().unwrap();
        assert_eq!(info.sort, "desc");
        assert_eq!(info.order, 1);
    }

    #[test]
    fn test_field_kind_round_trip_names() {
        assert_eq!("ID".parse::<FieldKind>().unwrap(), FieldKind::Id);
        assert_eq!(FieldKind::Json.to_string(), "JSON");
        assert!("Blob".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_inspection_rows() {
        let column: InspectorFieldType = serde_json::from_value(json!({
            "Field": "id", "Type": "varchar(50)", "Null": "NO", "Key": "PRI", "Default": ""
        }))
        .unwrap();
        assert!(column.is_primary());
        assert!(!column.is_nullable());
        assert_eq!(column.field_type, format!("varchar({})", SQL_TYPE_ID_SIZE));

        let fk: ForeignKeysType = serde_json::from_value(json!({
            "TABLE_NAME": "orders",
            "COLUMN_NAME": "user_id",
            "CONSTRAINT_NAME": "c_orders_user_id",
            "DELETE_RULE": "CASCADE",
            "REFERENCED_TABLE_NAME": "users",
            "REFERENCED_COLUMN_NAME": "id"
        }))
        .unwrap();
        let props = fk.table_properties();
        assert_eq!(props.table, "users");
        assert_eq!(props.field, "id");
        assert_eq!(props.on_delete, "CASCADE");

        let index: IndexType = serde_json::from_value(json!({
            "TABLE_NAME": "users",
            "COLUMN_NAME": "email",
            "INDEX_NAME": "index__users__email",
            "SEQ_IN_INDEX": 1,
            "SORT": "asc",
            "IS_UNIQUE": "yes"
        }))
        .unwrap();
        assert!(index.is_unique());
        assert_eq!(index.order, DEFAULT_INDEX_ORDER);
    }
}
