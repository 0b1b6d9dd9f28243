//! Schema Validation Engine
//!
//! Declarative response descriptors ([`SchemaNode`]), compiled once into
//! immutable validators and evaluated into a [`ValidationVerdict`] that lists
//! every violation with its path.

mod compile;
pub mod definitions;
mod node;
mod verdict;

pub use compile::{compile, CompiledValidator, SchemaError};
pub use node::{
    AdditionalProperties, ArraySchema, Constraints, ObjectSchema, PrimitiveKind, PrimitiveSchema, SchemaNode,
};
pub use verdict::{Constraint, ValidationVerdict, Violation};

use crate::api::Endpoint;

/// Validators for every endpoint, compiled once and shared across cases
#[derive(Debug)]
pub struct CompiledSchemas {
    pub quote: CompiledValidator,
    pub routes: CompiledValidator,
    pub tools: CompiledValidator,
    pub tokens: CompiledValidator,
    pub token_details: CompiledValidator,
    pub chains: CompiledValidator,
    pub error: CompiledValidator,
}

impl CompiledSchemas {
    pub fn standard() -> Result<Self, SchemaError> {
        Ok(Self {
            quote: compile(definitions::quote_response_schema())?,
            routes: compile(definitions::routes_response_schema())?,
            tools: compile(definitions::tools_response_schema())?,
            tokens: compile(definitions::tokens_response_schema())?,
            token_details: compile(definitions::token_details_schema())?,
            chains: compile(definitions::chains_response_schema())?,
            error: compile(definitions::error_response_schema())?,
        })
    }

    /// Success-response validator for an endpoint
    pub fn for_endpoint(&self, endpoint: Endpoint) -> &CompiledValidator {
        match endpoint {
            Endpoint::Quote => &self.quote,
            Endpoint::Routes => &self.routes,
            Endpoint::Tools => &self.tools,
            Endpoint::Tokens => &self.tokens,
            Endpoint::Token => &self.token_details,
            Endpoint::Chains => &self.chains,
        }
    }
}

#[cfg(test)]
mod contract_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schemas_compile() {
        let schemas = CompiledSchemas::standard();
        assert!(schemas.is_ok(), "{:?}", schemas.err());
    }
}
