pub mod api_response;
pub mod query_builder;
pub mod resource_query;
