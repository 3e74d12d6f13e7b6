use crate::{
    conventions::ClientConventions,
    error::Result,
    request::SearchRequest,
};
use expression_engine::Captures;
use filter_compiler::{FilterCompiler, PredicateCompiler};
use model::{core::type_handle::TypeHandle, filter::Filter, schema::SchemaRegistry};
use predicate_syntax::Expression;
use tracing::{debug, info};

/// Entry point for turning predicates into search filters.
#[derive(Default)]
pub struct Client {
    conventions: ClientConventions,
}

impl Client {
    pub fn new(conventions: ClientConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &ClientConventions {
        &self.conventions
    }

    /// Compiles `predicate` with this client's field and type conventions.
    /// `None` means nothing in the predicate could be filtered.
    pub fn where_filter(&self, predicate: &Expression, captures: &Captures) -> Result<Option<Filter>> {
        let compiler = PredicateCompiler::new(
            self.conventions.field_names.as_ref(),
            self.conventions.type_hierarchy.as_ref(),
            captures,
        );
        Ok(compiler.compile(predicate)?)
    }

    pub fn search(&self, type_handle: TypeHandle) -> TypeSearch<'_> {
        info!(type_name = %type_handle, "Starting search");
        TypeSearch {
            client: self,
            request: SearchRequest::new(type_handle),
        }
    }
}

/// A search over one document type, accumulating filters.
pub struct TypeSearch<'c> {
    client: &'c Client,
    request: SearchRequest,
}

impl TypeSearch<'_> {
    /// Compiles `predicate` and attaches the result. A predicate that yields
    /// no filter leaves the request untouched.
    pub fn filter_where(mut self, predicate: &Expression, captures: &Captures) -> Result<Self> {
        match self.client.where_filter(predicate, captures)? {
            Some(filter) => self.request.filters.push(filter),
            None => debug!(predicate = %predicate, "Predicate added no filter"),
        }
        Ok(self)
    }

    /// Parses predicate text over this search's type, then behaves like
    /// [`TypeSearch::filter_where`].
    pub fn filter_text(
        self,
        source: &str,
        registry: &SchemaRegistry,
        captures: &Captures,
    ) -> Result<Self> {
        let root = self.request.type_handle.full_name().to_string();
        let predicate = predicate_syntax::parse(source, registry, &root)?;
        self.filter_where(&predicate, captures)
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.request.filters.push(filter);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.request.query = Some(query.into());
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.request.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.request.take = Some(take);
        self
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn into_request(self) -> SearchRequest {
        self.request
    }
}
