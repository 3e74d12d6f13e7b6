use model::{core::type_handle::TypeHandle, filter::Filter};
use serde::{Deserialize, Serialize};

/// A search over documents of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub type_handle: TypeHandle,
    pub query: Option<String>,
    pub filters: Vec<Filter>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

impl SearchRequest {
    pub fn new(type_handle: TypeHandle) -> Self {
        Self {
            type_handle,
            query: None,
            filters: Vec::new(),
            skip: None,
            take: None,
        }
    }

    /// All attached filters as one tree. Several filters are AND-ed.
    pub fn combined_filter(&self) -> Option<Filter> {
        match self.filters.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(Filter::and(many.to_vec())),
        }
    }
}

pub struct SearchRequestBuilder {
    type_handle: TypeHandle,
    query: Option<String>,
    filters: Vec<Filter>,
    skip: Option<usize>,
    take: Option<usize>,
}

impl SearchRequestBuilder {
    pub fn new(type_handle: TypeHandle) -> Self {
        SearchRequestBuilder {
            type_handle,
            query: None,
            filters: Vec::new(),
            skip: None,
            take: None,
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn build(self) -> SearchRequest {
        SearchRequest {
            type_handle: self.type_handle,
            query: self.query,
            filters: self.filters,
            skip: self.skip,
            take: self.take,
        }
    }
}
