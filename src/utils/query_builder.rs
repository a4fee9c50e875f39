use std::marker::PhantomData;
use std::str::FromStr;

use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select, Value};
use serde_json::{Map, Value as JsonValue};

use crate::database::SoftDelete;
use crate::errors::RepoError;
use crate::utils::resource_query::parse_date;

/// How a filter whose value is an array is applied.
///
/// `Equality` compares the field against the array itself (serialized as
/// JSON text), which is how listing has always behaved. `Membership` turns
/// it into `field IN (...)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Equality,
    Membership,
}

impl FilterMode {
    pub fn from_flag(membership: bool) -> Self {
        if membership {
            FilterMode::Membership
        } else {
            FilterMode::Equality
        }
    }
}

/// Accumulating predicate for listing an entity. It always starts from the
/// not-deleted condition; every `with_*` call only narrows it further.
#[derive(Debug, Clone)]
pub struct ListQuery<E> {
    condition: Condition,
    filter_mode: FilterMode,
    _entity: PhantomData<E>,
}

impl<E: SoftDelete> ListQuery<E> {
    pub fn new(filter_mode: FilterMode) -> Self {
        Self {
            condition: Condition::all().add(E::not_deleted()),
            filter_mode,
            _entity: PhantomData,
        }
    }

    /// Case-insensitive substring match of `key` against any of `fields`.
    /// A blank key or an empty field list leaves the query untouched.
    pub fn with_search<S: AsRef<str>>(mut self, key: &str, fields: &[S]) -> Self {
        if key.is_empty() || fields.is_empty() {
            return self;
        }

        let pattern = format!("%{}%", escape_like(&key.to_lowercase()));
        let any = fields.iter().fold(Condition::any(), |any, field| {
            any.add(
                Expr::expr(Func::lower(field_expr::<E>(field.as_ref())))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        });
        self.condition = self.condition.add(any);
        self
    }

    /// Applies a JSON object of `field -> value` filters. Input that is not
    /// a JSON object is ignored rather than rejected.
    pub fn with_filters(mut self, filters: &str) -> Self {
        if filters.is_empty() {
            return self;
        }

        for (field, value) in parse_filters(filters) {
            let predicate = filter_predicate::<E>(&field, value, self.filter_mode);
            self.condition = self.condition.add(predicate);
        }
        self
    }

    /// Inclusive creation-time window. Bounds are not shifted between
    /// timezones; naive values are read as UTC.
    pub fn with_date_range(mut self, from: &str, to: &str) -> Result<Self, RepoError> {
        let start = parse_date(from).ok_or_else(|| RepoError::InvalidDate(from.to_string()))?;
        let end = parse_date(to).ok_or_else(|| RepoError::InvalidDate(to.to_string()))?;

        self.condition = self
            .condition
            .add(E::created_at_column().between(start, end));
        Ok(self)
    }

    /// Adds an arbitrary caller-built predicate.
    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = self.condition.add(condition.into());
        self
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn into_select(self) -> Select<E> {
        E::find().filter(self.condition)
    }
}

/// Resolves a request-supplied field name to a column of `E`, accepting
/// either `camelCase` or `snake_case`. Names that match no column are sent
/// to the store as written.
pub fn field_expr<E: EntityTrait>(name: &str) -> Expr {
    let column = E::Column::from_str(name)
        .ok()
        .or_else(|| E::Column::from_str(&to_snake_case(name)).ok());

    match column {
        Some(column) => Expr::col((E::default(), column)),
        None => Expr::col((E::default(), Alias::new(name))),
    }
}

fn parse_filters(raw: &str) -> Map<String, JsonValue> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::debug!(filters = raw, "ignoring filters that are not a JSON object");
            Map::new()
        }
    }
}

fn filter_predicate<E: EntityTrait>(field: &str, value: JsonValue, mode: FilterMode) -> SimpleExpr {
    let column = field_expr::<E>(field);
    match value {
        JsonValue::Null => column.is_null(),
        JsonValue::Array(values) if mode == FilterMode::Membership => {
            column.is_in(values.into_iter().map(json_to_value))
        }
        other => column.eq(json_to_value(other)),
    }
}

fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Bool(b) => b.into(),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_u64().map(Value::from))
            .or_else(|| n.as_f64().map(Value::from))
            .unwrap_or(Value::Double(None)),
        JsonValue::String(s) => s.into(),
        JsonValue::Null => Value::String(None),
        nested => nested.to_string().into(),
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if !snake.is_empty() {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}
