// ============================================================================
// QUERY STATE - Filtros / orden / paginación de una lista <-> query string
// ============================================================================

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::utils::constants::{DEFAULT_QUERY_SENTINELS, QUERY_PAGE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.values().into_iter().next()
    }
}

/// Reglas de serialización de una vista de lista
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Valores que significan "sin filtro" ("all", "none"...)
    pub sentinels: Vec<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_QUERY_SENTINELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl QueryOptions {
    pub fn new(sentinels: &[String]) -> Self {
        Self {
            sentinels: sentinels.to_vec(),
        }
    }

    fn is_omitted(&self, value: &str) -> bool {
        value.trim().is_empty() || self.sentinels.iter().any(|s| s == value)
    }
}

/// Estado de consulta de una lista. `page` siempre existe y vale "1" por defecto.
///
/// La igualdad no depende del orden de los campos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    fields: IndexMap<String, QueryValue>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        let mut fields = IndexMap::new();
        fields.insert(QUERY_PAGE.to_string(), QueryValue::Single("1".to_string()));
        Self { fields }
    }

    /// Construir desde el query string de la URL (con o sin `?`)
    pub fn parse(raw: &str, options: &QueryOptions) -> Self {
        let raw = raw.trim_start_matches('?');
        let mut state = Self::new();
        let mut page: Option<String> = None;

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if key.is_empty() || options.is_omitted(&value) {
                continue;
            }
            if key == QUERY_PAGE {
                page = Some(value.into_owned());
                continue;
            }
            let value = value.into_owned();
            match state.fields.get_mut(&*key) {
                Some(existing) => match existing {
                    QueryValue::Single(first) => {
                        let first = std::mem::take(first);
                        *existing = QueryValue::Multi(vec![first, value]);
                    }
                    QueryValue::Multi(values) => values.push(value),
                },
                None => {
                    state
                        .fields
                        .insert(key.into_owned(), QueryValue::Single(value));
                }
            }
        }

        let page = page.as_deref().map(normalize_page).unwrap_or(1);
        state.set_page(page);
        state
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.fields.get(name)
    }

    /// Primer valor del campo
    pub fn get_single(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(QueryValue::first)
    }

    pub fn page(&self) -> u32 {
        self.get_single(QUERY_PAGE).map(normalize_page).unwrap_or(1)
    }

    /// Cambiar de página (no reinicia nada más)
    pub fn set_page(&mut self, page: u32) -> bool {
        let value = QueryValue::Single(page.max(1).to_string());
        if self.fields.get(QUERY_PAGE) == Some(&value) {
            return false;
        }
        self.fields.insert(QUERY_PAGE.to_string(), value);
        true
    }

    /// Asignar un campo. Vacío => se elimina. Cualquier cambio vuelve a la página 1.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        if name == QUERY_PAGE {
            return self.set_page(normalize_page(value));
        }
        if value.trim().is_empty() {
            return self.remove(name);
        }
        let value = QueryValue::Single(value.to_string());
        self.replace(name, value)
    }

    /// Asignar un campo multivalor (`status=A&status=B`)
    pub fn set_multi<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> bool {
        if name == QUERY_PAGE {
            let page = values.first().map(|v| normalize_page(v.as_ref())).unwrap_or(1);
            return self.set_page(page);
        }
        let mut cleaned: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .filter(|v| !v.trim().is_empty())
            .collect();
        match cleaned.len() {
            0 => self.remove(name),
            1 => self.replace(name, QueryValue::Single(cleaned.remove(0))),
            _ => self.replace(name, QueryValue::Multi(cleaned)),
        }
    }

    /// Valor por defecto (p. ej. `limit`) si el campo no existe. No reinicia la página.
    pub fn set_default(&mut self, name: &str, value: &str) -> bool {
        if name == QUERY_PAGE || value.trim().is_empty() || self.fields.contains_key(name) {
            return false;
        }
        self.fields
            .insert(name.to_string(), QueryValue::Single(value.to_string()));
        true
    }

    /// Quitar un campo. Quitar `page` lo devuelve a 1.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == QUERY_PAGE {
            return self.set_page(1);
        }
        if self.fields.shift_remove(name).is_some() {
            self.set_page(1);
            true
        } else {
            false
        }
    }

    /// Campos distintos de `page`, en orden de inserción
    pub fn filters(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields
            .iter()
            .filter(|(k, _)| k.as_str() != QUERY_PAGE)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Serializar: omite vacíos y centinelas, repite claves multivalor, `page` al final
    pub fn to_query_string(&self, options: &QueryOptions) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.filters() {
            for v in value.values() {
                if !options.is_omitted(v) {
                    serializer.append_pair(key, v);
                }
            }
        }
        serializer.append_pair(QUERY_PAGE, &self.page().to_string());
        serializer.finish()
    }

    /// Igual que `to_query_string` pero con `?` delante
    pub fn to_search(&self, options: &QueryOptions) -> String {
        format!("?{}", self.to_query_string(options))
    }

    fn replace(&mut self, name: &str, value: QueryValue) -> bool {
        if self.fields.get(name) == Some(&value) {
            return false;
        }
        self.fields.insert(name.to_string(), value);
        self.set_page(1);
        true
    }
}

fn normalize_page(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> QueryOptions {
        QueryOptions::default()
    }

    #[test]
    fn test_empty_query_has_page_one() {
        let state = QueryState::parse("", &opts());
        assert_eq!(state.page(), 1);
        assert_eq!(state.to_query_string(&opts()), "page=1");
    }

    #[test]
    fn test_parse_keeps_page_and_filters() {
        let state = QueryState::parse("?page=3&status=PENDING", &opts());
        assert_eq!(state.page(), 3);
        assert_eq!(state.get_single("status"), Some("PENDING"));
        assert_eq!(state.to_query_string(&opts()), "status=PENDING&page=3");
    }

    #[test]
    fn test_invalid_page_normalizes_to_one() {
        assert_eq!(QueryState::parse("page=0", &opts()).page(), 1);
        assert_eq!(QueryState::parse("page=-2", &opts()).page(), 1);
        assert_eq!(QueryState::parse("page=abc", &opts()).page(), 1);
    }

    #[test]
    fn test_repeated_keys_become_multi() {
        let state = QueryState::parse("status=PENDING&status=SHIPPED&status=PAID", &opts());
        assert_eq!(
            state.get("status"),
            Some(&QueryValue::Multi(vec![
                "PENDING".to_string(),
                "SHIPPED".to_string(),
                "PAID".to_string()
            ]))
        );
        assert_eq!(
            state.to_query_string(&opts()),
            "status=PENDING&status=SHIPPED&status=PAID&page=1"
        );
    }

    #[test]
    fn test_empty_and_sentinel_values_are_omitted() {
        let mut state = QueryState::new();
        state.set("searchTerm", "");
        state.set("status", "all");
        state.set("sortBy", "price");
        state.set_multi("category", &["none", "shoes"]);
        assert_eq!(
            state.to_query_string(&opts()),
            "sortBy=price&category=shoes&page=1"
        );
        assert!(state.get("searchTerm").is_none());

        let parsed = QueryState::parse("status=all&searchTerm=&sortBy=price", &opts());
        assert!(parsed.get("status").is_none());
        assert!(parsed.get("searchTerm").is_none());
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let mut state = QueryState::new();
        state.set("searchTerm", "red shoes & bags");
        let query = state.to_query_string(&opts());
        assert_eq!(query, "searchTerm=red+shoes+%26+bags&page=1");
        assert_eq!(
            QueryState::parse(&query, &opts()).get_single("searchTerm"),
            Some("red shoes & bags")
        );
    }

    #[test]
    fn test_changing_a_filter_resets_page() {
        let mut state = QueryState::parse("page=4&status=PENDING", &opts());
        assert!(state.set("status", "PAID"));
        assert_eq!(state.page(), 1);

        state.set_page(5);
        assert!(!state.set("status", "PAID"));
        assert_eq!(state.page(), 5);

        assert!(state.remove("status"));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_set_default_keeps_page_and_existing_value() {
        let mut state = QueryState::parse("page=3&limit=50", &opts());
        assert!(!state.set_default("limit", "10"));
        assert_eq!(state.get_single("limit"), Some("50"));

        let mut state = QueryState::parse("page=3&status=PAID", &opts());
        assert!(state.set_default("limit", "10"));
        assert_eq!(state.page(), 3);
        assert_eq!(state.to_query_string(&opts()), "status=PAID&limit=10&page=3");
    }

    #[test]
    fn test_set_page_through_set() {
        let mut state = QueryState::new();
        state.set("sortOrder", "desc");
        assert!(state.set("page", "7"));
        assert_eq!(state.page(), 7);
        assert_eq!(state.get_single("sortOrder"), Some("desc"));
    }

    #[test]
    fn test_equality_ignores_field_order() {
        let a = QueryState::parse("status=PENDING&sortBy=price&page=2", &opts());
        let b = QueryState::parse("page=2&sortBy=price&status=PENDING", &opts());
        assert_eq!(a, b);
    }
}
